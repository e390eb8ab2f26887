//! Database row models for the `events` and `bookings` tables.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Booking, BookingId, Event, EventId, EventMode};
use crate::error::GatewayError;

/// A row of the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Primary key.
    pub id: Uuid,
    /// Trimmed title.
    pub title: String,
    /// Unique lowercase slug.
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// Short overview.
    pub overview: String,
    /// Image URL.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City or address.
    pub location: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM AM/PM`.
    pub time: String,
    /// Mode wire name (`online`, `offline`, `hybrid`).
    pub mode: String,
    /// Intended audience.
    pub audience: String,
    /// Agenda items (`TEXT[]`).
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Tags (`TEXT[]`).
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = GatewayError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let mode: EventMode = row.mode.parse().map_err(|_| {
            GatewayError::Persistence(format!(
                "event {} has unknown mode {:?}",
                row.id, row.mode
            ))
        })?;
        Ok(Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            overview: row.overview,
            image: row.image,
            venue: row.venue,
            location: row.location,
            date: row.date,
            time: row.time,
            mode,
            audience: row.audience,
            agenda: row.agenda,
            organizer: row.organizer,
            tags: row.tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row of the `bookings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingRow {
    /// Primary key.
    pub id: Uuid,
    /// Booked event.
    pub event_id: Uuid,
    /// Normalized email.
    pub email: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: BookingId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
