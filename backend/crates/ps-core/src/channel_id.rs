use crate::{Result as StoreErrorResult, StoreError};

use std::fmt;
use std::panic::Location;

use error_location::ErrorLocation;

/// Channel id meaning "every channel" in statistics queries
pub const ALL_CHANNELS_ID: &str = "ALL";

/// Marks a prefix query in statistics; forbidden in channel names
pub const WILDCARD: char = '*';

/// A channel identifier that passed length validation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(String);

impl ChannelId {
    /// Validate a raw identifier taken from a request.
    #[track_caller]
    pub fn parse(raw: Option<&str>, max_length: usize) -> StoreErrorResult<Self> {
        let value = match raw {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(StoreError::ChannelIdUnset {
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        if value.len() > max_length {
            return Err(StoreError::ChannelIdTooLarge {
                length: value.len(),
                max: max_length,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self(value.to_string()))
    }

    /// Reject names reserved for statistics queries.
    #[track_caller]
    pub fn ensure_publishable(&self) -> StoreErrorResult<()> {
        ensure_publishable(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret this identifier as a statistics query
    pub fn to_query(&self) -> ChannelQuery {
        match self.0.find(WILDCARD) {
            Some(0) => ChannelQuery::All,
            Some(pos) => ChannelQuery::Prefix(self.0[..pos].to_string()),
            None if self.0 == ALL_CHANNELS_ID => ChannelQuery::All,
            None => ChannelQuery::Exact(self.0.clone()),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[track_caller]
pub(crate) fn ensure_publishable(name: &str) -> StoreErrorResult<()> {
    if name == ALL_CHANNELS_ID || name.contains(WILDCARD) {
        return Err(StoreError::forbidden(name));
    }
    Ok(())
}

/// Selection of channels for detailed statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelQuery {
    All,
    Prefix(String),
    Exact(String),
}

impl ChannelQuery {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Exact(exact) => name == exact,
        }
    }
}
