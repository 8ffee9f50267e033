use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No channel id provided {location}")]
    ChannelIdUnset { location: ErrorLocation },

    #[error("Channel id is too large: {length} bytes (max: {max}) {location}")]
    ChannelIdTooLarge {
        length: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Channel id not authorized for this method: {name} {location}")]
    ForbiddenChannelName {
        name: String,
        location: ErrorLocation,
    },

    #[error("Empty post requests are not allowed {location}")]
    EmptyMessage { location: ErrorLocation },

    #[error("Number of channels were exceeded: {current} channels (max: {max}) {location}")]
    ChannelCapacityExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Subscribers limit per channel has been exceeded on {channel} (max: {max}) {location}")]
    SubscriberCapacityExceeded {
        channel: String,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Unable to allocate {requested} bytes ({available} available) {location}")]
    AllocationFailure {
        requested: usize,
        available: usize,
        location: ErrorLocation,
    },

    #[error("Channel not found: {name} {location}")]
    ChannelNotFound {
        name: String,
        location: ErrorLocation,
    },
}

impl StoreError {
    #[track_caller]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ChannelNotFound {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn forbidden(name: impl Into<String>) -> Self {
        Self::ForbiddenChannelName {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChannelIdUnset { .. } => "CHANNEL_ID_UNSET",
            Self::ChannelIdTooLarge { .. } => "CHANNEL_ID_TOO_LARGE",
            Self::ForbiddenChannelName { .. } => "FORBIDDEN_CHANNEL",
            Self::EmptyMessage { .. } => "EMPTY_MESSAGE",
            Self::ChannelCapacityExceeded { .. } => "CHANNEL_LIMIT",
            Self::SubscriberCapacityExceeded { .. } => "SUBSCRIBER_LIMIT",
            Self::AllocationFailure { .. } => "ALLOCATION_FAILURE",
            Self::ChannelNotFound { .. } => "NOT_FOUND",
        }
    }

    /// Input validation failures are rejected before the store is touched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ChannelIdUnset { .. }
                | Self::ChannelIdTooLarge { .. }
                | Self::ForbiddenChannelName { .. }
                | Self::EmptyMessage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
