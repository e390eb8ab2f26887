//! Domain layer: event and booking records, identifiers, and the pure
//! normalization rules applied at the write boundary.
//!
//! Nothing in this module performs I/O. The slug generator and the
//! date/time normalizers are plain functions; [`event`] and [`booking`]
//! turn raw request payloads into canonical records.

pub mod booking;
pub mod event;
pub mod ids;
pub mod schedule;
pub mod slug;

pub use booking::{Booking, NewBooking};
pub use event::{Event, EventChanges, EventMode, NewEvent};
pub use ids::{BookingId, EventId};
