//! Event handlers: list, get, create, update, similar.

use axum::extract::multipart::Field;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateEventForm, EventResponse, EventsResponse, SimilarParams};
use crate::app_state::AppState;
use crate::domain::{EventChanges, NewEvent};
use crate::error::{ErrorResponse, GatewayError};
use crate::media::{ImageFile, upload_or_placeholder};

/// `GET /events`: List every event, newest first.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    summary = "List events",
    description = "Returns every event, newest first.",
    responses(
        (status = 200, description = "All events", body = EventsResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, GatewayError> {
    let events = state.event_service.list().await?;
    let message = format!("{} events fetched successfully", events.len());
    Ok(Json(EventsResponse { events, message }))
}

/// `GET /events/{slug}`: Fetch one event.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for an empty slug and
/// [`GatewayError::EventNotFound`] for an unknown one.
#[utoipa::path(
    get,
    path = "/api/events/{slug}",
    tag = "Events",
    summary = "Get event by slug",
    description = "The slug is percent-decoded, trimmed and lowercased before lookup.",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 400, description = "Invalid slug", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .event_service
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| GatewayError::EventNotFound("Event not found".to_string()))?;
    Ok(Json(EventResponse {
        event,
        message: "Event fetched successfully".to_string(),
    }))
}

/// `POST /events`: Create an event from a multipart form.
///
/// The title is checked for an existing slug before the image is
/// uploaded. A missing image or a failed upload stores the placeholder
/// URL instead.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for malformed form data, a taken
/// title, or any field that fails validation.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    summary = "Create an event",
    description = "Validates and stores a new event. The slug is derived from the title.",
    request_body(content = CreateEventForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid form or duplicate title", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, GatewayError> {
    let form = EventForm::read(&mut multipart).await?;
    let mut new = form.fields;

    if state.event_service.exists_by_title(&new.title).await? {
        return Err(GatewayError::Validation(format!(
            "Event with title \"{}\" already exists",
            new.title.trim()
        )));
    }

    new.image = upload_or_placeholder(state.image_host.as_deref(), form.image).await;
    let event = state.event_service.create(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            event,
            message: "Event created successfully".to_string(),
        }),
    ))
}

/// `PATCH /events/{slug}`: Update selected fields of an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown slug, or a
/// validation error for a body that names no valid change.
#[utoipa::path(
    patch,
    path = "/api/events/{slug}",
    tag = "Events",
    summary = "Update an event",
    description = "Only fields present in the body are written. Changing the title re-derives the slug.",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    request_body = EventChanges,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Unreadable body, no fields, or invalid field", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    payload: Result<Json<EventChanges>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(changes) = payload?;
    let event = state.event_service.update(&slug, changes).await?;
    Ok(Json(EventResponse {
        event,
        message: "Event updated successfully".to_string(),
    }))
}

/// `GET /events/{slug}/similar`: Events sharing a tag with this one.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for an unknown slug.
#[utoipa::path(
    get,
    path = "/api/events/{slug}/similar",
    tag = "Events",
    summary = "List similar events",
    description = "Returns other events that share at least one tag, never the event itself.",
    params(
        ("slug" = String, Path, description = "Event slug"),
        SimilarParams,
    ),
    responses(
        (status = 200, description = "Similar events", body = EventsResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn similar_events(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<SimilarParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let limit = params.limit.unwrap_or(state.similar_events_limit);
    let events = state
        .event_service
        .find_similar(&slug, limit)
        .await?
        .ok_or_else(|| GatewayError::EventNotFound("Event not found".to_string()))?;
    let message = format!("{} similar events fetched successfully", events.len());
    Ok(Json(EventsResponse { events, message }))
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{slug}", get(get_event).patch(update_event))
        .route("/events/{slug}/similar", get(similar_events))
}

// ── Multipart Parsing ───────────────────────────────────────────────────

/// Fields collected from a multipart event creation request.
#[derive(Debug, Default)]
struct EventForm {
    fields: NewEvent,
    image: Option<ImageFile>,
}

impl EventForm {
    async fn read(multipart: &mut Multipart) -> Result<Self, GatewayError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                form.image = read_file(field).await?;
            } else {
                let value = field.text().await.map_err(invalid_form)?;
                form.apply(&name, value);
            }
        }
        Ok(form)
    }

    fn apply(&mut self, name: &str, value: String) {
        let fields = &mut self.fields;
        match name {
            "title" => fields.title = value,
            "description" => fields.description = value,
            "overview" => fields.overview = value,
            "venue" => fields.venue = value,
            "location" => fields.location = value,
            "date" => fields.date = value,
            "time" => fields.time = value,
            "mode" => fields.mode = value,
            "audience" => fields.audience = value,
            "organizer" => fields.organizer = value,
            "agenda" | "agenda[]" => push_list_value(&mut fields.agenda, value),
            "tags" | "tags[]" => push_list_value(&mut fields.tags, value),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }
}

/// Appends a repeated list part, or every item of a JSON array part.
fn push_list_value(list: &mut Vec<String>, value: String) {
    if value.trim_start().starts_with('[')
        && let Ok(items) = serde_json::from_str::<Vec<String>>(&value)
    {
        list.extend(items);
        return;
    }
    list.push(value);
}

async fn read_file(field: Field<'_>) -> Result<Option<ImageFile>, GatewayError> {
    let filename = field.file_name().unwrap_or("image").to_string();
    let bytes = field.bytes().await.map_err(invalid_form)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(ImageFile {
        filename,
        bytes: bytes.to_vec(),
    }))
}

fn invalid_form(e: axum::extract::multipart::MultipartError) -> GatewayError {
    GatewayError::Validation(format!("Invalid form data: {}", e.body_text()))
}
