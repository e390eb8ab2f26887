//! Service layer: the event and booking record stores.
//!
//! [`EventService`] and [`BookingService`] own validation and
//! normalization and delegate storage to the repositories in
//! [`crate::persistence`].

pub mod booking_service;
pub mod event_service;

pub use booking_service::BookingService;
pub use event_service::EventService;

use crate::error::GatewayError;

/// Normalizes a slug taken from a URL: percent-decode, trim, lowercase.
pub(crate) fn normalize_slug_param(raw: &str) -> Result<String, GatewayError> {
    let invalid = || GatewayError::Validation("Invalid slug parameter".to_string());
    let decoded = urlencoding::decode(raw).map_err(|_| invalid())?;
    let slug = decoded.trim().to_lowercase();
    if slug.is_empty() {
        return Err(invalid());
    }
    Ok(slug)
}
