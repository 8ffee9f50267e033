use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, contains_substring, eq, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _temp = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.server.port, eq(crate::DEFAULT_PORT));
    assert_that!(config.store.max_channels, eq(0));
    assert_that!(config.store.store_messages, eq(true));
    assert_that!(config.publisher.admin, eq(false));
    assert!(config.logging.file.is_none());
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let _temp = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let temp = setup_config_dir();
    write_config(
        &temp.0,
        r#"
            [server]
            port = 9100

            [store]
            max_channels = 10
            max_messages_stored_per_channel = 2
            message_ttl_secs = 60

            [publisher]
            admin = true
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.server.port, eq(9100));
    assert_that!(config.store.max_channels, eq(10));
    assert_that!(config.store.max_messages_stored_per_channel, eq(2));
    assert_that!(config.store.message_ttl_secs, eq(60));
    assert_that!(config.publisher.admin, eq(true));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let temp = setup_config_dir();
    write_config(
        &temp.0,
        r#"
            [store]
            max_channels = 10
        "#,
    );
    let _max = EnvGuard::set("PS_STORE_MAX_CHANNELS", "25");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.store.max_channels, eq(25));
}

#[test]
#[serial]
fn given_bool_env_vars_when_load_then_accepts_one_and_true() {
    // Given
    let _temp = setup_config_dir();
    let _admin = EnvGuard::set("PS_PUBLISHER_ADMIN", "1");
    let _store = EnvGuard::set("PS_STORE_MESSAGES", "no");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.publisher.admin, eq(true));
    assert_that!(config.store.store_messages, eq(false));
}

#[test]
#[serial]
fn given_log_file_env_var_when_load_then_file_set() {
    // Given
    let _temp = setup_config_dir();
    let _file = EnvGuard::set("PS_LOG_FILE", "push-stream.log");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_eq!(config.logging.file.as_deref(), Some("push-stream.log"));
}

#[test]
#[serial]
fn given_unparseable_env_var_when_load_then_keeps_default() {
    // Given
    let _temp = setup_config_dir();
    let _ttl = EnvGuard::set("PS_STORE_MESSAGE_TTL_SECS", "soon");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.store.message_ttl_secs, eq(0));
}

#[test]
#[serial]
fn given_host_and_port_when_bind_addr_then_joined() {
    // Given
    let _temp = setup_config_dir();
    let _host = EnvGuard::set("PS_SERVER_HOST", "0.0.0.0");
    let _port = EnvGuard::set("PS_SERVER_PORT", "9200");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.bind_addr(), contains_substring("0.0.0.0:9200"));
}
