//! Event service: validated creation, partial updates and lookups.

use std::sync::Arc;

use chrono::Utc;

use super::normalize_slug_param;
use crate::domain::slug::generate_slug;
use crate::domain::{Event, EventChanges, EventId, NewEvent};
use crate::error::GatewayError;
use crate::persistence::EventRepository;

/// Record-store operations for events.
///
/// Every write validates and normalizes its input before it reaches the
/// repository; a failure at any step aborts the whole write.
#[derive(Debug, Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
}

impl EventService {
    /// Creates a new `EventService` over the given repository.
    #[must_use]
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }

    /// Validates, normalizes and stores a new event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`], [`GatewayError::InvalidDate`]
    /// or [`GatewayError::InvalidTime`] for bad input, and
    /// [`GatewayError::DuplicateSlug`] if the title's slug is taken.
    pub async fn create(&self, new: NewEvent) -> Result<Event, GatewayError> {
        let event = new.into_event(EventId::new(), Utc::now())?;
        self.events.insert(&event).await?;
        tracing::info!(event_id = %event.id, slug = %event.slug, "event created");
        Ok(event)
    }

    /// Applies a partial update to the event addressed by `slug`.
    ///
    /// Only fields present in `changes` are validated and written; the
    /// slug follows the title only when the title is part of the write.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if no event has this slug,
    /// [`GatewayError::Validation`] if `changes` names no field or a
    /// changed field is invalid, or [`GatewayError::DuplicateSlug`] if a
    /// new title collides.
    pub async fn update(&self, slug: &str, changes: EventChanges) -> Result<Event, GatewayError> {
        let slug = normalize_slug_param(slug)?;
        let current = self
            .events
            .find_by_slug(&slug)
            .await?
            .ok_or_else(|| GatewayError::event_not_found(&slug))?;
        if changes.is_empty() {
            return Err(GatewayError::Validation("No fields to update".to_string()));
        }

        let next = current.with_changes(changes, Utc::now())?;
        self.events.update(&next).await?;

        if next.slug == current.slug {
            tracing::info!(event_id = %next.id, slug = %next.slug, "event updated");
        } else {
            tracing::info!(
                event_id = %next.id,
                old_slug = %current.slug,
                slug = %next.slug,
                "event updated and renamed"
            );
        }
        Ok(next)
    }

    /// Looks up an event by a slug taken from a URL path.
    ///
    /// The raw value is percent-decoded, lowercased and trimmed first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if nothing is left after
    /// normalization, or a store error.
    pub async fn find_by_slug(&self, raw: &str) -> Result<Option<Event>, GatewayError> {
        let slug = normalize_slug_param(raw)?;
        self.events.find_by_slug(&slug).await
    }

    /// Returns every event, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list(&self) -> Result<Vec<Event>, GatewayError> {
        self.events.list_newest_first().await
    }

    /// Returns up to `limit` other events sharing a tag with the event
    /// addressed by `slug`, or `None` if that event does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an empty slug, or a store
    /// error.
    pub async fn find_similar(
        &self,
        slug: &str,
        limit: usize,
    ) -> Result<Option<Vec<Event>>, GatewayError> {
        let slug = normalize_slug_param(slug)?;
        let Some(source) = self.events.find_by_slug(&slug).await? else {
            return Ok(None);
        };
        if limit == 0 {
            return Ok(Some(Vec::new()));
        }
        let similar = self
            .events
            .find_sharing_tags(source.id, &source.tags, limit)
            .await?;
        Ok(Some(similar))
    }

    /// Returns `true` if an event with the slug derived from `title`
    /// already exists.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn exists_by_title(&self, title: &str) -> Result<bool, GatewayError> {
        let slug = generate_slug(title);
        if slug.is_empty() {
            return Ok(false);
        }
        self.events.slug_exists(&slug).await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::tests::sample_new_event;
    use crate::persistence::MemoryEventRepository;

    fn service() -> EventService {
        EventService::new(Arc::new(MemoryEventRepository::new()))
    }

    async fn create(service: &EventService, title: &str, tags: &[&str]) -> Event {
        let mut new = sample_new_event(title);
        new.tags = tags.iter().map(|t| (*t).to_string()).collect();
        let Ok(event) = service.create(new).await else {
            panic!("create failed for {title}");
        };
        event
    }

    #[tokio::test]
    async fn create_normalizes_fields() {
        let service = service();
        let event = create(&service, "  RustConf 2026!  ", &["rust", "rust", " "]).await;
        assert_eq!(event.title, "RustConf 2026!");
        assert_eq!(event.slug, "rustconf-2026");
        assert_eq!(event.venue, "Convention Center");
        assert_eq!(event.date, "2026-09-08");
        assert_eq!(event.time, "09:00 AM");
        assert_eq!(event.agenda, vec!["Keynote", "Workshops"]);
        assert_eq!(event.tags, vec!["rust"]);
        assert_eq!(event.created_at, event.updated_at);
    }

    #[tokio::test]
    async fn second_create_with_same_slug_fails() {
        let service = service();
        let _ = create(&service, "Rust Meetup", &["rust"]).await;

        let Err(GatewayError::DuplicateSlug(slug)) =
            service.create(sample_new_event("RUST  meetup")).await
        else {
            panic!("duplicate accepted");
        };
        assert_eq!(slug, "rust-meetup");
    }

    #[tokio::test]
    async fn invalid_input_persists_nothing() {
        let service = service();
        let mut new = sample_new_event("Bad Time");
        new.time = "25:00".to_string();
        assert!(matches!(
            service.create(new).await,
            Err(GatewayError::InvalidTime(_))
        ));
        let Ok(list) = service.list().await else {
            panic!("list failed");
        };
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn update_without_title_keeps_slug() {
        let service = service();
        let event = create(&service, "Original Title", &["rust"]).await;

        let changes = EventChanges {
            time: Some("13:30".to_string()),
            ..EventChanges::default()
        };
        let Ok(updated) = service.update(&event.slug, changes).await else {
            panic!("update failed");
        };
        assert_eq!(updated.slug, "original-title");
        assert_eq!(updated.time, "01:30 PM");
        assert_eq!(updated.date, event.date);
        assert!(updated.updated_at >= event.updated_at);
    }

    #[tokio::test]
    async fn update_with_title_rederives_slug() {
        let service = service();
        let event = create(&service, "Old Name", &["rust"]).await;

        let changes = EventChanges {
            title: Some("New Name".to_string()),
            ..EventChanges::default()
        };
        let Ok(updated) = service.update(&event.slug, changes).await else {
            panic!("update failed");
        };
        assert_eq!(updated.slug, "new-name");

        let Ok(old) = service.find_by_slug("old-name").await else {
            panic!("lookup failed");
        };
        assert!(old.is_none());
    }

    #[tokio::test]
    async fn update_of_missing_event_is_not_found() {
        let service = service();
        assert!(matches!(
            service.update("ghost", EventChanges::default()).await,
            Err(GatewayError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn empty_update_is_rejected_and_changes_nothing() {
        let service = service();
        let event = create(&service, "Quiet Event", &["rust"]).await;

        let Err(GatewayError::Validation(message)) =
            service.update(&event.slug, EventChanges::default()).await
        else {
            panic!("empty update accepted");
        };
        assert_eq!(message, "No fields to update");

        let Ok(Some(stored)) = service.find_by_slug(&event.slug).await else {
            panic!("lookup failed");
        };
        assert_eq!(stored.updated_at, event.updated_at);
    }

    #[tokio::test]
    async fn find_by_slug_decodes_and_lowercases() {
        let service = service();
        let _ = create(&service, "Rust Meetup", &["rust"]).await;

        let Ok(Some(found)) = service.find_by_slug("%20RUST-Meetup%20").await else {
            panic!("event not found");
        };
        assert_eq!(found.slug, "rust-meetup");

        assert!(matches!(
            service.find_by_slug("%20%20").await,
            Err(GatewayError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn similar_excludes_source_and_respects_limit() {
        let service = service();
        let source = create(&service, "Source", &["rust", "wasm"]).await;
        for i in 0..4 {
            let _ = create(&service, &format!("Related {i}"), &["wasm"]).await;
        }
        let _ = create(&service, "Unrelated", &["go"]).await;

        let Ok(Some(similar)) = service.find_similar(&source.slug, 3).await else {
            panic!("similar lookup failed");
        };
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|e| e.id != source.id && e.shares_tag_with(&source)));

        let Ok(missing) = service.find_similar("nope", 3).await else {
            panic!("lookup failed");
        };
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn exists_by_title_uses_derived_slug() {
        let service = service();
        let _ = create(&service, "Rust Meetup", &["rust"]).await;

        assert!(matches!(service.exists_by_title("rust meetup!").await, Ok(true)));
        assert!(matches!(service.exists_by_title("Go Meetup").await, Ok(false)));
        assert!(matches!(service.exists_by_title("!!!").await, Ok(false)));
    }
}
