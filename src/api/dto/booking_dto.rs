//! Booking DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Booking;

/// Response body for `POST /bookings` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    /// The stored booking.
    pub booking: Booking,
    /// Human-readable outcome.
    pub message: String,
}

/// Response body for `GET /events/{slug}/bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingsResponse {
    /// Bookings, newest first.
    pub bookings: Vec<Booking>,
    /// Human-readable outcome.
    pub message: String,
}
