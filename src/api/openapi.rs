//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    BookingResponse, BookingsResponse, CreateEventForm, EventResponse, EventsResponse,
    SignRequest, SignResponse,
};
use crate::api::handlers::{bookings, events, system, uploads};
use crate::domain::{Booking, BookingId, Event, EventChanges, EventId, EventMode, NewBooking};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of every endpoint, served by Swagger UI.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "DevEvents API",
        description = "Developer event listings and bookings",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::similar_events,
        bookings::create_booking,
        bookings::list_event_bookings,
        uploads::sign_upload,
        system::health_handler,
    ),
    components(schemas(
        Event,
        EventId,
        EventMode,
        EventChanges,
        CreateEventForm,
        EventResponse,
        EventsResponse,
        Booking,
        BookingId,
        NewBooking,
        BookingResponse,
        BookingsResponse,
        SignRequest,
        SignResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Events", description = "Event listings"),
        (name = "Bookings", description = "Event bookings"),
        (name = "Uploads", description = "Image upload signing"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
