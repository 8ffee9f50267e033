//! Error responses for the publisher, statistics and subscriber endpoints.
//!
//! Every error renders as `{"error": {"code", "message"}}` with a matching
//! HTTP status.

use ps_core::StoreError;

use std::panic::Location;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use error_location::ErrorLocation;
use serde::Serialize;
use thiserror::Error;

/// Methods the publisher endpoint accepts when admin is disabled
pub const PUBLISHER_ALLOWED_METHODS: &str = "GET, POST";

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g. "NOT_FOUND", "CHANNEL_ID_UNSET")
    pub code: String,
    pub message: String,
}

/// API errors with associated HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400
    #[error("Bad request: {message} {location}")]
    BadRequest {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// 403
    #[error("Forbidden: {message} {location}")]
    Forbidden {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// 404
    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// 405 with an `Allow` header
    #[error("Method not allowed (allow: {allow}) {location}")]
    MethodNotAllowed {
        allow: &'static str,
        location: ErrorLocation,
    },

    /// 500
    #[error("Internal error: {message} {location}")]
    Internal {
        code: &'static str,
        message: String,
        location: ErrorLocation,
    },
}

impl ApiError {
    #[track_caller]
    pub fn method_not_allowed(allow: &'static str) -> Self {
        ApiError::MethodNotAllowed {
            allow,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }

        let (code, message, allow) = match self {
            ApiError::BadRequest { code, message, .. }
            | ApiError::Forbidden { code, message, .. }
            | ApiError::Internal { code, message, .. } => (code, message, None),
            ApiError::NotFound { message, .. } => ("NOT_FOUND", message, None),
            ApiError::MethodNotAllowed { allow, .. } => (
                "METHOD_NOT_ALLOWED",
                String::from("Method not allowed."),
                Some(allow),
            ),
        };

        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(allow) = allow {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(allow));
        }
        response
    }
}

/// Map store errors to client-facing messages
impl From<StoreError> for ApiError {
    #[track_caller]
    fn from(e: StoreError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let code = e.error_code();

        match e {
            StoreError::ChannelIdUnset { .. } => ApiError::BadRequest {
                code,
                message: String::from("No channel id provided."),
                location,
            },
            StoreError::ChannelIdTooLarge { .. } => ApiError::BadRequest {
                code,
                message: String::from("Channel id is too large."),
                location,
            },
            StoreError::EmptyMessage { .. } => ApiError::BadRequest {
                code,
                message: String::from("Empty post requests are not allowed"),
                location,
            },
            StoreError::ForbiddenChannelName { .. } => ApiError::Forbidden {
                code,
                message: String::from("Channel id not authorized for this method."),
                location,
            },
            StoreError::ChannelCapacityExceeded { .. } => ApiError::Forbidden {
                code,
                message: String::from("Number of channels were exceeded."),
                location,
            },
            StoreError::SubscriberCapacityExceeded { .. } => ApiError::Forbidden {
                code,
                message: String::from("Subscribers limit per channel has been exceeded."),
                location,
            },
            StoreError::AllocationFailure { .. } => ApiError::Internal {
                code,
                message: String::from("Unable to allocate memory for the message."),
                location,
            },
            StoreError::ChannelNotFound { .. } => ApiError::NotFound {
                message: String::from("Channel not found."),
                location,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
