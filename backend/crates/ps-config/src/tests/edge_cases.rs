use crate::tests::{EnvGuard, setup_config_dir, write_config};
use crate::{Config, LogLevel};

use std::str::FromStr;

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, err};
use log::LevelFilter;
use serial_test::serial;

// =========================================================================
// Edge Cases
// =========================================================================

#[test]
#[serial]
fn given_malformed_toml_when_load_then_error_mentions_file() {
    // Given
    let temp = setup_config_dir();
    write_config(&temp.0, "this is not valid toml {{{{");

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring("config.toml"));
}

#[test]
#[serial]
fn given_log_file_with_traversal_when_validate_then_error() {
    // Given
    let _temp = setup_config_dir();
    let _file = EnvGuard::set("PS_LOG_FILE", "../../etc/push.log");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
    let err_msg = format!("{}", result.unwrap_err());
    assert_that!(err_msg, contains_substring(".."));
}

#[test]
#[serial]
fn given_unknown_log_level_in_toml_when_load_then_defaults_to_info() {
    // Given
    let temp = setup_config_dir();
    write_config(
        &temp.0,
        r#"
            [logging]
            level = "chatty"
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(*config.logging.level, eq(LevelFilter::Info));
}

#[test]
fn given_mixed_case_level_when_parsed_then_recognized() {
    let level = LogLevel::from_str("DeBuG").unwrap();

    assert_that!(level, eq(LogLevel(LevelFilter::Debug)));
}
