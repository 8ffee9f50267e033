use crate::{
    CONFIG_DIR_ENV, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIRECTORY, LoggingConfig,
    PublisherConfig, ServerConfig, StoreConfig, SubscriberConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub store: StoreConfig,
    pub publisher: PublisherConfig,
    pub subscriber: SubscriberConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for PS_CONFIG_DIR env var, else use ./.push-stream/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply PS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: PS_CONFIG_DIR env var > ./.push-stream/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIRECTORY))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.store.validate()?;
        self.subscriber.validate()?;

        if let Some(ref file) = self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::config(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  store: channels={}, stored/channel={}, ttl={}s, store_messages={}",
            Self::limit(self.store.max_channels),
            Self::limit(self.store.max_messages_stored_per_channel),
            self.store.message_ttl_secs,
            self.store.store_messages
        );
        info!(
            "  store: id_length={}, subscribers/channel={}, memory={} bytes",
            self.store.max_channel_id_length,
            Self::limit(self.store.max_subscribers_per_channel),
            Self::limit(self.store.shared_memory_size)
        );
        info!(
            "  cleanup: every {}s, inactivity={}s",
            self.store.buffer_cleanup_interval_secs, self.store.channel_inactivity_secs
        );
        info!(
            "  publisher: admin {}",
            if self.publisher.admin {
                "enabled"
            } else {
                "disabled"
            }
        );
        info!(
            "  subscriber: buffer={}, heartbeat={}s, longpolling={}s",
            self.subscriber.send_buffer_size,
            self.subscriber.heartbeat_interval_secs,
            self.subscriber.longpolling_timeout_secs
        );
    }

    fn limit(value: usize) -> String {
        if value == 0 {
            String::from("unbounded")
        } else {
            value.to_string()
        }
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("PS_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("PS_SERVER_PORT", &mut self.server.port);

        // Logging
        Self::apply_env_parse("PS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("PS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("PS_LOG_FILE", &mut self.logging.file);

        // Store
        Self::apply_env_parse("PS_STORE_MAX_CHANNELS", &mut self.store.max_channels);
        Self::apply_env_parse(
            "PS_STORE_MAX_MESSAGES_PER_CHANNEL",
            &mut self.store.max_messages_stored_per_channel,
        );
        Self::apply_env_parse("PS_STORE_MESSAGE_TTL_SECS", &mut self.store.message_ttl_secs);
        Self::apply_env_bool("PS_STORE_MESSAGES", &mut self.store.store_messages);
        Self::apply_env_parse(
            "PS_STORE_MAX_CHANNEL_ID_LENGTH",
            &mut self.store.max_channel_id_length,
        );
        Self::apply_env_parse(
            "PS_STORE_MAX_SUBSCRIBERS_PER_CHANNEL",
            &mut self.store.max_subscribers_per_channel,
        );
        Self::apply_env_parse(
            "PS_STORE_SHARED_MEMORY_SIZE",
            &mut self.store.shared_memory_size,
        );
        Self::apply_env_parse(
            "PS_STORE_CLEANUP_INTERVAL_SECS",
            &mut self.store.buffer_cleanup_interval_secs,
        );
        Self::apply_env_parse(
            "PS_STORE_CHANNEL_INACTIVITY_SECS",
            &mut self.store.channel_inactivity_secs,
        );

        // Publisher
        Self::apply_env_bool("PS_PUBLISHER_ADMIN", &mut self.publisher.admin);

        // Subscriber
        Self::apply_env_parse(
            "PS_SUBSCRIBER_SEND_BUFFER_SIZE",
            &mut self.subscriber.send_buffer_size,
        );
        Self::apply_env_parse(
            "PS_SUBSCRIBER_HEARTBEAT_INTERVAL_SECS",
            &mut self.subscriber.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "PS_SUBSCRIBER_LONGPOLLING_TIMEOUT_SECS",
            &mut self.subscriber.longpolling_timeout_secs,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
