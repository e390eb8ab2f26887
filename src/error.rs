//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and a JSON body carrying a
//! human-readable message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "message": "Event not found",
///   "error": { "code": 2001, "kind": "event_not_found" }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error classification.
    pub error: ErrorBody,
}

/// Machine-readable part of an error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Stable snake_case error kind.
    pub kind: &'static str,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status               |
/// |-----------|------------------|---------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request           |
/// | 2000–2999 | Not Found        | 404 Not Found             |
/// | 3000–3999 | Server           | 500 Internal Server Error |
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// A required field is missing or empty, an enum value is unknown, or an
    /// email address is malformed.
    #[error("{0}")]
    Validation(String),

    /// The date could not be parsed into a calendar date.
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// The time is not a valid 12-hour or 24-hour clock time.
    #[error("{0}")]
    InvalidTime(String),

    /// Another event already owns the derived slug.
    #[error("Event with slug \"{0}\" already exists")]
    DuplicateSlug(String),

    /// The email address already booked this event.
    #[error("{email} has already booked this event")]
    DuplicateBooking {
        /// Event that was booked.
        event_id: uuid::Uuid,
        /// Normalized email of the existing booking.
        email: String,
    },

    /// The referenced event does not exist (or its id is malformed).
    #[error("{0}")]
    EventNotFound(String),

    /// The document store could not be reached.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// A store operation failed after a connection was established.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The image host rejected or failed an upload.
    #[error("image upload failed: {0}")]
    ImageUpload(String),

    /// Required configuration is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Builds an [`GatewayError::EventNotFound`] for a lookup by slug.
    #[must_use]
    pub fn event_not_found(slug: &str) -> Self {
        Self::EventNotFound(format!("Event with slug \"{slug}\" does not exist"))
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::InvalidDate(_) => 1002,
            Self::InvalidTime(_) => 1003,
            Self::DuplicateSlug(_) => 1004,
            Self::DuplicateBooking { .. } => 1005,
            Self::EventNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Connection(_) => 3002,
            Self::ImageUpload(_) => 3003,
            Self::Configuration(_) => 3004,
        }
    }

    /// Returns the stable snake_case kind for this variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidTime(_) => "invalid_time",
            Self::DuplicateSlug(_) => "duplicate_slug",
            Self::DuplicateBooking { .. } => "duplicate_booking",
            Self::EventNotFound(_) => "event_not_found",
            Self::Connection(_) => "connection",
            Self::Persistence(_) => "persistence",
            Self::ImageUpload(_) => "image_upload",
            Self::Configuration(_) => "configuration",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidDate(_)
            | Self::InvalidTime(_)
            | Self::DuplicateSlug(_)
            | Self::DuplicateBooking { .. } => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) => StatusCode::NOT_FOUND,
            Self::Connection(_)
            | Self::Persistence(_)
            | Self::ImageUpload(_)
            | Self::Configuration(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "request failed");
        }
        let body = ErrorResponse {
            message: self.to_string(),
            error: ErrorBody {
                code: self.error_code(),
                kind: self.kind(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
