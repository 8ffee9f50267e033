use serde::Deserialize;

/// Publisher endpoint settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Allow DELETE on the publisher endpoint
    pub admin: bool,
}
