//! Event records, their input shapes and field validation.
//!
//! [`NewEvent`] is the raw payload of a creation request and
//! [`EventChanges`] the raw payload of an update. Both are turned into a
//! canonical [`Event`] here: required fields are checked, the slug is
//! derived from the title, and date/time are normalized. On update only
//! the fields present in [`EventChanges`] are touched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::EventId;
use super::schedule::{normalize_date, normalize_time};
use super::slug::generate_slug;
use crate::error::GatewayError;

/// How attendees take part in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    /// Remote attendance only.
    Online,
    /// In-person attendance only.
    Offline,
    /// Both remote and in-person attendance.
    Hybrid,
}

impl EventMode {
    /// Returns the lowercase wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for EventMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventMode {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(GatewayError::Validation("Mode is required".to_string()));
        }
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(GatewayError::Validation(
                "Mode must be one of: online, offline, or hybrid".to_string(),
            )),
        }
    }
}

/// A stored event in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// URL slug derived from the title; unique across events.
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// Short overview shown on listing cards.
    pub overview: String,
    /// Public URL of the event image.
    pub image: String,
    /// Venue name.
    pub venue: String,
    /// City or address.
    pub location: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time, `HH:MM AM/PM`.
    pub time: String,
    /// Attendance mode.
    pub mode: EventMode,
    /// Intended audience.
    pub audience: String,
    /// Ordered agenda items.
    pub agenda: Vec<String>,
    /// Organizer name.
    pub organizer: String,
    /// Tags used for similarity matching.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Raw fields of an event creation request.
///
/// Nothing here is trusted: [`NewEvent::into_event`] validates and
/// normalizes every field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEvent {
    /// Event title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Short overview.
    pub overview: String,
    /// Image URL (normally filled in from the image host).
    pub image: String,
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
}

impl NewEvent {
    /// Validates and normalizes the request into a storable [`Event`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a missing or empty field,
    /// an unknown mode, or a title that yields an empty slug;
    /// [`GatewayError::InvalidDate`] / [`GatewayError::InvalidTime`] when
    /// the date or time cannot be normalized.
    pub fn into_event(self, id: EventId, now: DateTime<Utc>) -> Result<Event, GatewayError> {
        let title = trimmed("Title", &self.title)?;
        let slug = slug_for(&title)?;

        Ok(Event {
            id,
            slug,
            title,
            description: required("Description", self.description)?,
            overview: required("Overview", self.overview)?,
            image: required("Image URL", self.image)?,
            venue: trimmed("Venue", &self.venue)?,
            location: trimmed("Location", &self.location)?,
            date: normalize_date(&required("Date", self.date)?)?,
            time: normalize_time(&required("Time", self.time)?)?,
            mode: self.mode.parse()?,
            audience: trimmed("Audience", &self.audience)?,
            agenda: agenda_items(&self.agenda)?,
            organizer: trimmed("Organizer", &self.organizer)?,
            tags: tag_set(&self.tags)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of an event.
///
/// Every field is optional; `Some` marks the field as part of this write.
/// Absent fields keep their stored value verbatim, so the slug is only
/// re-derived when `title` is present and date/time are only re-normalized
/// when present.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EventChanges {
    /// New title; re-derives the slug.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New overview.
    pub overview: Option<String>,
    /// New image URL.
    pub image: Option<String>,
    /// New venue.
    pub venue: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New date; normalized on write.
    pub date: Option<String>,
    /// New time; normalized on write.
    pub time: Option<String>,
    /// New mode.
    pub mode: Option<String>,
    /// New audience.
    pub audience: Option<String>,
    /// Replacement agenda.
    pub agenda: Option<Vec<String>>,
    /// New organizer.
    pub organizer: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

impl EventChanges {
    /// Returns `true` when no field is part of the write.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.overview.is_none()
            && self.image.is_none()
            && self.venue.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.mode.is_none()
            && self.audience.is_none()
            && self.agenda.is_none()
            && self.organizer.is_none()
            && self.tags.is_none()
    }
}

impl Event {
    /// Returns a copy of this event with `changes` applied.
    ///
    /// The original is left untouched if any changed field fails
    /// validation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`NewEvent::into_event`], evaluated only for the
    /// fields present in `changes`.
    pub fn with_changes(
        &self,
        changes: EventChanges,
        now: DateTime<Utc>,
    ) -> Result<Self, GatewayError> {
        let mut next = self.clone();

        if let Some(title) = changes.title {
            next.title = trimmed("Title", &title)?;
            next.slug = slug_for(&next.title)?;
        }
        if let Some(description) = changes.description {
            next.description = required("Description", description)?;
        }
        if let Some(overview) = changes.overview {
            next.overview = required("Overview", overview)?;
        }
        if let Some(image) = changes.image {
            next.image = required("Image URL", image)?;
        }
        if let Some(venue) = changes.venue {
            next.venue = trimmed("Venue", &venue)?;
        }
        if let Some(location) = changes.location {
            next.location = trimmed("Location", &location)?;
        }
        if let Some(date) = changes.date {
            next.date = normalize_date(&required("Date", date)?)?;
        }
        if let Some(time) = changes.time {
            next.time = normalize_time(&required("Time", time)?)?;
        }
        if let Some(mode) = changes.mode {
            next.mode = mode.parse()?;
        }
        if let Some(audience) = changes.audience {
            next.audience = trimmed("Audience", &audience)?;
        }
        if let Some(agenda) = changes.agenda {
            next.agenda = agenda_items(&agenda)?;
        }
        if let Some(organizer) = changes.organizer {
            next.organizer = trimmed("Organizer", &organizer)?;
        }
        if let Some(tags) = changes.tags {
            next.tags = tag_set(&tags)?;
        }

        next.updated_at = now;
        Ok(next)
    }

    /// Returns `true` if this event shares at least one tag with `other`.
    #[must_use]
    pub fn shares_tag_with(&self, other: &Self) -> bool {
        self.tags.iter().any(|tag| other.tags.contains(tag))
    }
}

/// Non-blank check that keeps the value as given.
fn required(field: &str, value: String) -> Result<String, GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::Validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Non-blank check that stores the trimmed value.
fn trimmed(field: &str, value: &str) -> Result<String, GatewayError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GatewayError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn slug_for(title: &str) -> Result<String, GatewayError> {
    let slug = generate_slug(title);
    if slug.is_empty() {
        return Err(GatewayError::Validation(format!(
            "Title \"{title}\" does not contain any URL-safe characters"
        )));
    }
    Ok(slug)
}

fn agenda_items(items: &[String]) -> Result<Vec<String>, GatewayError> {
    let items: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(GatewayError::Validation(
            "Agenda must have at least one item".to_string(),
        ));
    }
    Ok(items)
}

/// Trims tags, drops blanks and duplicates while keeping first-seen order.
fn tag_set(tags: &[String]) -> Result<Vec<String>, GatewayError> {
    let mut set: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !set.iter().any(|t| t == tag) {
            set.push(tag.to_string());
        }
    }
    if set.is_empty() {
        return Err(GatewayError::Validation(
            "Tags must have at least one item".to_string(),
        ));
    }
    Ok(set)
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;

    /// A complete, valid creation request used across the crate's tests.
    pub(crate) fn sample_new_event(title: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "Two days of talks and workshops.".to_string(),
            overview: "The yearly community conference.".to_string(),
            image: "https://img.example.com/conf.png".to_string(),
            venue: "  Convention Center ".to_string(),
            location: "Portland, OR".to_string(),
            date: "2026-09-08".to_string(),
            time: "9:00 am".to_string(),
            mode: "hybrid".to_string(),
            audience: "Developers".to_string(),
            agenda: vec!["Keynote".to_string(), " Workshops ".to_string()],
            organizer: "Community Team".to_string(),
            tags: vec!["rust".to_string(), "systems".to_string()],
        }
    }

    fn build(new: NewEvent) -> Result<Event, GatewayError> {
        new.into_event(EventId::new(), Utc::now())
    }

    #[test]
    fn into_event_derives_slug_and_normalizes() {
        let Ok(event) = build(sample_new_event("  RustConf 2026 ")) else {
            panic!("valid event rejected");
        };
        assert_eq!(event.title, "RustConf 2026");
        assert_eq!(event.slug, "rustconf-2026");
        assert_eq!(event.venue, "Convention Center");
        assert_eq!(event.time, "09:00 AM");
        assert_eq!(event.date, "2026-09-08");
        assert_eq!(event.mode, EventMode::Hybrid);
        assert_eq!(event.agenda, vec!["Keynote", "Workshops"]);
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut new = sample_new_event("Conf");
        new.venue = "   ".to_string();
        let Err(GatewayError::Validation(msg)) = build(new) else {
            panic!("blank venue accepted");
        };
        assert_eq!(msg, "Venue is required");

        let mut new = sample_new_event("Conf");
        new.agenda = vec![" ".to_string()];
        assert!(matches!(build(new), Err(GatewayError::Validation(_))));

        let mut new = sample_new_event("Conf");
        new.tags.clear();
        assert!(matches!(build(new), Err(GatewayError::Validation(_))));
    }

    #[test]
    fn unknown_mode_is_a_validation_error() {
        let mut new = sample_new_event("Conf");
        new.mode = "virtual".to_string();
        let Err(GatewayError::Validation(msg)) = build(new) else {
            panic!("unknown mode accepted");
        };
        assert!(msg.contains("online, offline, or hybrid"));
    }

    #[test]
    fn bad_date_and_time_keep_their_error_kinds() {
        let mut new = sample_new_event("Conf");
        new.date = "someday".to_string();
        assert!(matches!(build(new), Err(GatewayError::InvalidDate(_))));

        let mut new = sample_new_event("Conf");
        new.time = "25:00".to_string();
        assert!(matches!(build(new), Err(GatewayError::InvalidTime(_))));
    }

    #[test]
    fn punctuation_only_title_is_rejected() {
        assert!(matches!(
            build(sample_new_event("!!!")),
            Err(GatewayError::Validation(_))
        ));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let mut new = sample_new_event("Conf");
        new.tags = vec![
            "rust".to_string(),
            " wasm ".to_string(),
            "rust".to_string(),
            String::new(),
        ];
        let Ok(event) = build(new) else {
            panic!("valid event rejected");
        };
        assert_eq!(event.tags, vec!["rust", "wasm"]);
    }

    #[test]
    fn changes_without_title_keep_a_stale_slug() {
        let Ok(mut event) = build(sample_new_event("RustConf")) else {
            panic!("valid event rejected");
        };
        event.slug = "legacy-slug".to_string();
        event.date = "2026/09/08".to_string();

        let changes = EventChanges {
            description: Some("Updated description".to_string()),
            ..EventChanges::default()
        };
        let Ok(updated) = event.with_changes(changes, Utc::now()) else {
            panic!("update rejected");
        };
        assert_eq!(updated.slug, "legacy-slug");
        assert_eq!(updated.date, "2026/09/08");
        assert_eq!(updated.description, "Updated description");
    }

    #[test]
    fn changing_title_rederives_slug() {
        let Ok(event) = build(sample_new_event("RustConf")) else {
            panic!("valid event rejected");
        };
        let changes = EventChanges {
            title: Some("RustConf Europe".to_string()),
            time: Some("18:30".to_string()),
            ..EventChanges::default()
        };
        let Ok(updated) = event.with_changes(changes, Utc::now()) else {
            panic!("update rejected");
        };
        assert_eq!(updated.slug, "rustconf-europe");
        assert_eq!(updated.time, "06:30 PM");
        assert_eq!(updated.id, event.id);
        assert_eq!(updated.created_at, event.created_at);
    }

    #[test]
    fn failed_change_reports_error() {
        let Ok(event) = build(sample_new_event("RustConf")) else {
            panic!("valid event rejected");
        };
        let changes = EventChanges {
            title: Some("New Title".to_string()),
            time: Some("8:70 AM".to_string()),
            ..EventChanges::default()
        };
        assert!(matches!(
            event.with_changes(changes, Utc::now()),
            Err(GatewayError::InvalidTime(_))
        ));
        assert_eq!(event.slug, "rustconf");
    }

    #[test]
    fn empty_changes_detected() {
        assert!(EventChanges::default().is_empty());
        let changes = EventChanges {
            tags: Some(vec!["x".to_string()]),
            ..EventChanges::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn mode_round_trips_through_strings() {
        for mode in [EventMode::Online, EventMode::Offline, EventMode::Hybrid] {
            assert_eq!(mode.as_str().parse::<EventMode>().ok(), Some(mode));
        }
    }

    #[test]
    fn mode_must_match_exactly() {
        for raw in [" online ", "Online", "online\n"] {
            let Err(GatewayError::Validation(message)) = raw.parse::<EventMode>() else {
                panic!("{raw:?} should be rejected");
            };
            assert_eq!(message, "Mode must be one of: online, offline, or hybrid");
        }
        let Err(GatewayError::Validation(message)) = "  ".parse::<EventMode>() else {
            panic!("blank mode should be rejected");
        };
        assert_eq!(message, "Mode is required");
    }

    #[test]
    fn event_serializes_with_camel_case_timestamps() {
        let Ok(event) = build(sample_new_event("RustConf")) else {
            panic!("valid event rejected");
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert!(json.get("createdAt").is_some());
        assert_eq!(json.get("mode").and_then(|m| m.as_str()), Some("hybrid"));
    }
}
