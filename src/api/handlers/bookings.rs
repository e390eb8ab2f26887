//! Booking handlers: create and list per event.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{BookingResponse, BookingsResponse};
use crate::app_state::AppState;
use crate::domain::NewBooking;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /bookings`: Book an email address onto an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for a malformed or unknown
/// event id, [`GatewayError::Validation`] for an unreadable body or a bad
/// email, and
/// [`GatewayError::DuplicateBooking`] if the email already booked.
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    summary = "Book an event",
    description = "Stores one booking per (event, email) pair. The email is trimmed and lowercased.",
    request_body = NewBooking,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid email or duplicate booking", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = payload?;
    let booking = state
        .booking_service
        .create(&req.event_id, &req.email)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            booking,
            message: "Booking created successfully".to_string(),
        }),
    ))
}

/// `GET /events/{slug}/bookings`: List an event's bookings.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the slug is unknown.
#[utoipa::path(
    get,
    path = "/api/events/{slug}/bookings",
    tag = "Bookings",
    summary = "List bookings of an event",
    description = "Returns the event's bookings, newest first.",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    responses(
        (status = 200, description = "Bookings", body = BookingsResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_event_bookings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let bookings = state.booking_service.list_for_event(&slug).await?;
    let message = format!("{} bookings fetched successfully", bookings.len());
    Ok(Json(BookingsResponse { bookings, message }))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/events/{slug}/bookings", get(list_event_bookings))
}
