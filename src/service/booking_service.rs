//! Booking service: one reservation per email per event.

use std::sync::Arc;

use chrono::Utc;

use super::normalize_slug_param;
use crate::domain::booking::normalize_email;
use crate::domain::{Booking, BookingId, EventId};
use crate::error::GatewayError;
use crate::persistence::{BookingRepository, EventRepository};

/// Record-store operations for bookings.
#[derive(Debug, Clone)]
pub struct BookingService {
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { events, bookings }
    }

    /// Books `email` onto the event identified by `event_id`.
    ///
    /// The event's existence is checked on every call.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if `event_id` is malformed
    /// or unknown, [`GatewayError::Validation`] for a bad email, and
    /// [`GatewayError::DuplicateBooking`] if the pair is already booked.
    pub async fn create(&self, event_id: &str, email: &str) -> Result<Booking, GatewayError> {
        let id: EventId = event_id.parse().map_err(|_| {
            GatewayError::EventNotFound(format!("Invalid event ID format: {event_id}"))
        })?;

        if self.events.find_by_id(id).await?.is_none() {
            return Err(GatewayError::EventNotFound(format!(
                "Event with ID {id} does not exist"
            )));
        }

        let email = normalize_email(email)?;
        let now = Utc::now();
        let booking = Booking {
            id: BookingId::new(),
            event_id: id,
            email,
            created_at: now,
            updated_at: now,
        };
        self.bookings.insert(&booking).await?;

        tracing::info!(booking_id = %booking.id, event_id = %id, "booking created");
        Ok(booking)
    }

    /// Returns the bookings of the event addressed by `slug`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no event has this slug,
    /// or a store error.
    pub async fn list_for_event(&self, slug: &str) -> Result<Vec<Booking>, GatewayError> {
        let slug = normalize_slug_param(slug)?;
        let event = self
            .events
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| GatewayError::event_not_found(&slug))?;
        self.bookings.list_for_event(event.id).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Event;
    use crate::domain::event::tests::sample_new_event;
    use crate::persistence::{MemoryBookingRepository, MemoryEventRepository};

    async fn setup() -> (BookingService, Event) {
        let events = Arc::new(MemoryEventRepository::new());
        let Ok(event) = sample_new_event("Rust Meetup").into_event(EventId::new(), Utc::now())
        else {
            panic!("valid event rejected");
        };
        let Ok(()) = events.insert(&event).await else {
            panic!("insert failed");
        };
        let service = BookingService::new(events, Arc::new(MemoryBookingRepository::new()));
        (service, event)
    }

    #[tokio::test]
    async fn booking_normalizes_email() {
        let (service, event) = setup().await;
        let Ok(booking) = service
            .create(&event.id.to_string(), "  Ada@Example.COM ")
            .await
        else {
            panic!("booking failed");
        };
        assert_eq!(booking.email, "ada@example.com");
        assert_eq!(booking.event_id, event.id);
    }

    #[tokio::test]
    async fn unknown_event_is_rejected() {
        let (service, _) = setup().await;
        let Err(GatewayError::EventNotFound(message)) = service
            .create(&EventId::new().to_string(), "ada@example.com")
            .await
        else {
            panic!("booking for unknown event accepted");
        };
        assert!(message.contains("does not exist"));
    }

    #[tokio::test]
    async fn malformed_event_id_is_not_found() {
        let (service, _) = setup().await;
        let Err(GatewayError::EventNotFound(message)) =
            service.create("not-a-uuid", "ada@example.com").await
        else {
            panic!("malformed id accepted");
        };
        assert_eq!(message, "Invalid event ID format: not-a-uuid");
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let (service, event) = setup().await;
        let Err(GatewayError::Validation(message)) =
            service.create(&event.id.to_string(), "ada@localhost").await
        else {
            panic!("invalid email accepted");
        };
        assert_eq!(message, "Please provide a valid email address");
    }

    #[tokio::test]
    async fn duplicate_booking_differs_only_in_case() {
        let (service, event) = setup().await;
        let id = event.id.to_string();
        assert!(service.create(&id, "ada@example.com").await.is_ok());
        assert!(matches!(
            service.create(&id, "ADA@example.com ").await,
            Err(GatewayError::DuplicateBooking { .. })
        ));
    }

    #[tokio::test]
    async fn list_for_event_by_slug() {
        let (service, event) = setup().await;
        let id = event.id.to_string();
        let _ = service.create(&id, "a@example.com").await;
        let _ = service.create(&id, "b@example.com").await;

        let Ok(bookings) = service.list_for_event(&event.slug).await else {
            panic!("list failed");
        };
        assert_eq!(bookings.len(), 2);

        assert!(matches!(
            service.list_for_event("ghost").await,
            Err(GatewayError::EventNotFound(_))
        ));
    }
}
