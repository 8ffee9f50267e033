mod config;
mod error;
mod log_level;
mod logging_config;
mod publisher_config;
mod server_config;
mod store_config;
mod subscriber_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use publisher_config::PublisherConfig;
pub use server_config::ServerConfig;
pub use store_config::StoreConfig;
pub use subscriber_config::SubscriberConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9080;
const MIN_PORT: u16 = 1024;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_CONFIG_DIRECTORY: &str = ".push-stream";
const CONFIG_DIR_ENV: &str = "PS_CONFIG_DIR";
