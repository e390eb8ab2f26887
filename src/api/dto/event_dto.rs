//! Event DTOs for list, get, create and update operations.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Event;

/// Response body carrying a single event.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// The event.
    pub event: Event,
    /// Human-readable outcome.
    pub message: String,
}

/// Response body carrying a list of events.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventsResponse {
    /// Events in response order.
    pub events: Vec<Event>,
    /// Human-readable outcome.
    pub message: String,
}

/// Multipart form accepted by `POST /events`.
///
/// Only used for API documentation; the handler reads the parts one by
/// one. `agenda` and `tags` may be sent as repeated parts (optionally
/// named `agenda[]` / `tags[]`) or as a single JSON array.
#[derive(Debug, ToSchema)]
pub struct CreateEventForm {
    /// Event title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Short overview.
    pub overview: String,
    /// Venue name.
    pub venue: String,
    /// City or address.
    pub location: String,
    /// Date in any accepted layout.
    pub date: String,
    /// Time in 12-hour or 24-hour form.
    pub time: String,
    /// `online`, `offline` or `hybrid`.
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Agenda items.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Event picture.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}
