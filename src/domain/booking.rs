//! Bookings: one email address reserving a place at one event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, EventId};
use crate::error::GatewayError;

/// A stored booking.
///
/// `(event_id, email)` is unique across all bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Booked event.
    pub event_id: EventId,
    /// Lowercased, trimmed email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Raw fields of a booking request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Event id as sent by the client; parsed and checked on write.
    pub event_id: String,
    /// Email address; normalized on write.
    pub email: String,
}

/// Trims and lowercases an email address, then validates its shape.
///
/// The accepted shape is `local@domain.tld`: no whitespace, exactly one
/// `@`, and a dot in the domain with at least one character on each side.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] if the address is empty or
/// malformed.
pub fn normalize_email(raw: &str) -> Result<String, GatewayError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(GatewayError::Validation("Email is required".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(GatewayError::Validation(
            "Please provide a valid email address".to_string(),
        ));
    }
    Ok(email)
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |part: &str| !part.is_empty() && !part.contains(char::is_whitespace);
    if !clean(local) || !clean(domain) || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
