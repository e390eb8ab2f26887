//! # devevents-gateway
//!
//! REST API for listing, creating and booking developer events.
//!
//! Event titles become URL slugs, dates and times are normalized to one
//! canonical layout, and every email may book an event once. Storage is
//! PostgreSQL behind a lazily opened, shared connection, or an in-memory
//! store when persistence is disabled.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EventService / BookingService (service/)
//!     ├── Slug, schedule and email rules (domain/)
//!     ├── Image host (media/)
//!     │
//!     ├── EventRepository / BookingRepository (persistence/)
//!     │
//!     └── PostgreSQL via LazyConnection, or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod media;
pub mod persistence;
pub mod service;
