//! Persistence layer: record repositories and the lazy store connection.
//!
//! [`EventRepository`] and [`BookingRepository`] are raw document storage.
//! They enforce the storage-level uniqueness rules (`events.slug`,
//! `(bookings.event_id, bookings.email)`) and nothing else; validation and
//! normalization live in the service layer. Two backends exist:
//! PostgreSQL ([`postgres`]) behind a [`LazyConnection`], and an in-memory
//! store ([`memory`]) used when persistence is disabled and in tests.

pub mod connection;
pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

pub use connection::LazyConnection;
pub use memory::{MemoryBookingRepository, MemoryEventRepository};
pub use postgres::{PgBookingRepository, PgEventRepository};

use crate::domain::{Booking, Event, EventId};
use crate::error::GatewayError;

/// Storage for [`Event`] records.
#[async_trait]
pub trait EventRepository: Send + Sync + fmt::Debug {
    /// Inserts a new event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateSlug`] if another event already
    /// owns `event.slug`, or a connection/persistence error.
    async fn insert(&self, event: &Event) -> Result<(), GatewayError>;

    /// Replaces the stored event with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateSlug`] if the new slug collides
    /// with another event, [`GatewayError::EventNotFound`] if the id is
    /// unknown, or a connection/persistence error.
    async fn update(&self, event: &Event) -> Result<(), GatewayError>;

    /// Looks up an event by its exact (already normalized) slug.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, GatewayError>;

    /// Looks up an event by id.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, GatewayError>;

    /// Returns `true` if an event with this slug exists.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn slug_exists(&self, slug: &str) -> Result<bool, GatewayError>;

    /// Returns all events, newest `created_at` first.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn list_newest_first(&self) -> Result<Vec<Event>, GatewayError>;

    /// Returns up to `limit` events other than `exclude` that carry at
    /// least one of `tags`, in the store's default order.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn find_sharing_tags(
        &self,
        exclude: EventId,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<Event>, GatewayError>;
}

/// Storage for [`Booking`] records.
#[async_trait]
pub trait BookingRepository: Send + Sync + fmt::Debug {
    /// Inserts a new booking.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DuplicateBooking`] if the
    /// `(event_id, email)` pair is already booked, or a
    /// connection/persistence error.
    async fn insert(&self, booking: &Booking) -> Result<(), GatewayError>;

    /// Returns the bookings of one event, newest first.
    ///
    /// # Errors
    ///
    /// Returns a connection/persistence error.
    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Booking>, GatewayError>;
}
