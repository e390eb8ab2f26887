//! PostgreSQL implementation of the repositories.
//!
//! Uniqueness is enforced by the unique indexes created in
//! `migrations/`; a unique violation is mapped to
//! [`GatewayError::DuplicateSlug`] or [`GatewayError::DuplicateBooking`].
//! Every operation first obtains the pool from the shared
//! [`LazyConnection`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::models::{BookingRow, EventRow};
use super::{BookingRepository, EventRepository, LazyConnection};
use crate::config::GatewayConfig;
use crate::domain::{Booking, Event, EventId};
use crate::error::GatewayError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const EVENT_COLUMNS: &str = "id, title, slug, description, overview, image, venue, location, \
     date, time, mode, audience, agenda, organizer, tags, created_at, updated_at";

const BOOKING_COLUMNS: &str = "id, event_id, email, created_at, updated_at";

/// Builds the lazily connected PostgreSQL pool described by `config`.
///
/// The first successful connect also applies pending migrations.
#[must_use]
pub fn connect_lazy(config: &GatewayConfig) -> LazyConnection<PgPool> {
    let url = config.database_url.clone();
    let options = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs));

    LazyConnection::new(move || {
        let url = url.clone();
        let options = options.clone();
        async move {
            let pool = options
                .connect(&url)
                .await
                .map_err(|e| GatewayError::Connection(e.to_string()))?;
            MIGRATOR
                .run(&pool)
                .await
                .map_err(|e| GatewayError::Connection(format!("migrations failed: {e}")))?;
            tracing::info!("connected to PostgreSQL");
            Ok(pool)
        }
    })
}

/// Maps a driver error that is not a uniqueness violation.
fn store_error(e: sqlx::Error) -> GatewayError {
    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => GatewayError::Connection(e.to_string()),
        other => GatewayError::Persistence(other.to_string()),
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// PostgreSQL-backed event repository.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    conn: Arc<LazyConnection<PgPool>>,
}

impl PgEventRepository {
    /// Creates a repository sharing the given connection.
    #[must_use]
    pub fn new(conn: Arc<LazyConnection<PgPool>>) -> Self {
        Self { conn }
    }
}

fn rows_to_events(rows: Vec<EventRow>) -> Result<Vec<Event>, GatewayError> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), GatewayError> {
        let pool = self.conn.get().await?;
        sqlx::query(
            "INSERT INTO events (id, title, slug, description, overview, image, venue, location, \
             date, time, mode, audience, agenda, organizer, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(event.mode.as_str())
        .bind(&event.audience)
        .bind(&event.agenda)
        .bind(&event.organizer)
        .bind(&event.tags)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GatewayError::DuplicateSlug(event.slug.clone())
            } else {
                store_error(e)
            }
        })?;
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), GatewayError> {
        let pool = self.conn.get().await?;
        let result = sqlx::query(
            "UPDATE events SET title = $2, slug = $3, description = $4, overview = $5, \
             image = $6, venue = $7, location = $8, date = $9, time = $10, mode = $11, \
             audience = $12, agenda = $13, organizer = $14, tags = $15, updated_at = $16 \
             WHERE id = $1",
        )
        .bind(event.id.as_uuid())
        .bind(&event.title)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.overview)
        .bind(&event.image)
        .bind(&event.venue)
        .bind(&event.location)
        .bind(&event.date)
        .bind(&event.time)
        .bind(event.mode.as_str())
        .bind(&event.audience)
        .bind(&event.agenda)
        .bind(&event.organizer)
        .bind(&event.tags)
        .bind(event.updated_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GatewayError::DuplicateSlug(event.slug.clone())
            } else {
                store_error(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::event_not_found(&event.slug));
        }
        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, GatewayError> {
        let pool = self.conn.get().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(store_error)?;
        row.map(Event::try_from).transpose()
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, GatewayError> {
        let pool = self.conn.get().await?;
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await
        .map_err(store_error)?;
        row.map(Event::try_from).transpose()
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, GatewayError> {
        let pool = self.conn.get().await?;
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
            .map_err(store_error)
    }

    async fn list_newest_first(&self) -> Result<Vec<Event>, GatewayError> {
        let pool = self.conn.get().await?;
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
        .map_err(store_error)?;
        rows_to_events(rows)
    }

    async fn find_sharing_tags(
        &self,
        exclude: EventId,
        tags: &[String],
        limit: usize,
    ) -> Result<Vec<Event>, GatewayError> {
        let pool = self.conn.get().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id <> $1 AND tags && $2 LIMIT $3"
        ))
        .bind(exclude.as_uuid())
        .bind(tags)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(store_error)?;
        rows_to_events(rows)
    }
}

/// PostgreSQL-backed booking repository.
#[derive(Debug, Clone)]
pub struct PgBookingRepository {
    conn: Arc<LazyConnection<PgPool>>,
}

impl PgBookingRepository {
    /// Creates a repository sharing the given connection.
    #[must_use]
    pub fn new(conn: Arc<LazyConnection<PgPool>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), GatewayError> {
        let pool = self.conn.get().await?;
        sqlx::query(
            "INSERT INTO bookings (id, event_id, email, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.event_id.as_uuid())
        .bind(&booking.email)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                GatewayError::DuplicateBooking {
                    event_id: *booking.event_id.as_uuid(),
                    email: booking.email.clone(),
                }
            } else {
                store_error(e)
            }
        })?;
        Ok(())
    }

    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Booking>, GatewayError> {
        let pool = self.conn.get().await?;
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE event_id = $1 ORDER BY created_at DESC"
        ))
        .bind(event_id.as_uuid())
        .fetch_all(pool)
        .await
        .map_err(store_error)?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
