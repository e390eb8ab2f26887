//! In-memory repositories.
//!
//! Records live in insertion-ordered vectors behind a
//! [`tokio::sync::RwLock`]. Every uniqueness check and the write it guards
//! happen under the same write lock, which gives the same outcome as a
//! unique index: of two racing inserts with the same key, exactly one
//! succeeds.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{BookingRepository, EventRepository};
use crate::domain::{Booking, Event, EventId};
use crate::error::GatewayError;

/// Event storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), GatewayError> {
        let mut events = self.events.write().await;
        if events.iter().any(|e| e.slug == event.slug) {
            return Err(GatewayError::DuplicateSlug(event.slug.clone()));
        }
        events.push(event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), GatewayError> {
        let mut events = self.events.write().await;
        if events
            .iter()
            .any(|e| e.slug == event.slug && e.id != event.id)
        {
            return Err(GatewayError::DuplicateSlug(event.slug.clone()));
        }
        let stored = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| GatewayError::event_not_found(&event.slug))?;
        *stored = event.clone();
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, GatewayError> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, GatewayError> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, GatewayError> {
        let events = self.events.read().await;
        Ok(events.iter().any(|e| e.slug == slug))
    }

    async fn list_newest_first(&self) -> Result<Vec<Event>, GatewayError> {
        let events = self.events.read().await;
        // Reverse first so that equal timestamps keep latest-inserted first
        // under the stable sort.
        let mut list: Vec<Event> = events.iter().rev().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn find_sharing_tags(
        &self,
        exclude: EventId,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<Event>, GatewayError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| e.id != exclude && e.tags.iter().any(|t| tags.contains(t)))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Booking storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl MemoryBookingRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), GatewayError> {
        let mut bookings = self.bookings.write().await;
        if bookings
            .iter()
            .any(|b| b.event_id == booking.event_id && b.email == booking.email)
        {
            return Err(GatewayError::DuplicateBooking {
                event_id: *booking.event_id.as_uuid(),
                email: booking.email.clone(),
            });
        }
        bookings.push(booking.clone());
        Ok(())
    }

    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Booking>, GatewayError> {
        let bookings = self.bookings.read().await;
        let mut list: Vec<Booking> = bookings
            .iter()
            .rev()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }
}
