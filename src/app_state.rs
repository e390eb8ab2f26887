//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::media::ImageHost;
use crate::persistence::{BookingRepository, EventRepository};
use crate::service::{BookingService, EventService};

/// Number of similar events returned when the request names no limit.
pub const DEFAULT_SIMILAR_EVENTS_LIMIT: usize = 3;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event record store.
    pub event_service: Arc<EventService>,
    /// Booking record store.
    pub booking_service: Arc<BookingService>,
    /// Image host for event pictures; `None` stores the placeholder URL.
    pub image_host: Option<Arc<dyn ImageHost>>,
    /// Secret used by `POST /api/sign-cloudinary`.
    pub signing_secret: Option<Arc<str>>,
    /// Default result size for similar-event lookups.
    pub similar_events_limit: usize,
}

impl AppState {
    /// Builds the services over the given repositories, with no image
    /// host and no signing secret.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self {
            event_service: Arc::new(EventService::new(Arc::clone(&events))),
            booking_service: Arc::new(BookingService::new(events, bookings)),
            image_host: None,
            signing_secret: None,
            similar_events_limit: DEFAULT_SIMILAR_EVENTS_LIMIT,
        }
    }

    /// Sets the image host.
    #[must_use]
    pub fn with_image_host(mut self, host: Arc<dyn ImageHost>) -> Self {
        self.image_host = Some(host);
        self
    }

    /// Sets the upload signing secret.
    #[must_use]
    pub fn with_signing_secret(mut self, secret: &str) -> Self {
        self.signing_secret = Some(Arc::from(secret));
        self
    }

    /// Sets the default similar-events limit.
    #[must_use]
    pub fn with_similar_events_limit(mut self, limit: usize) -> Self {
        self.similar_events_limit = limit;
        self
    }
}
