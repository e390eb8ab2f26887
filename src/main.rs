//! devevents-gateway server entry point.
//!
//! Loads configuration, selects the storage backend and serves the REST
//! API.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use devevents_gateway::api;
use devevents_gateway::app_state::AppState;
use devevents_gateway::config::GatewayConfig;
use devevents_gateway::media::CloudinaryImageHost;
use devevents_gateway::persistence::{
    MemoryBookingRepository, MemoryEventRepository, PgBookingRepository, PgEventRepository,
    postgres,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting devevents-gateway");

    // Build persistence and service layers
    let mut app_state = if config.persistence_enabled {
        let conn = Arc::new(postgres::connect_lazy(&config));
        AppState::new(
            Arc::new(PgEventRepository::new(Arc::clone(&conn))),
            Arc::new(PgBookingRepository::new(conn)),
        )
    } else {
        tracing::warn!("persistence disabled, records are kept in memory only");
        AppState::new(
            Arc::new(MemoryEventRepository::new()),
            Arc::new(MemoryBookingRepository::new()),
        )
    };
    app_state = app_state.with_similar_events_limit(config.similar_events_limit);

    // Image host
    if let Some(secret) = config.cloudinary_api_secret.as_deref() {
        app_state = app_state.with_signing_secret(secret);
    }
    match config.cloudinary.clone() {
        Some(cloudinary) => {
            let timeout = Duration::from_secs(config.image_upload_timeout_secs);
            let host = CloudinaryImageHost::new(cloudinary, timeout)?;
            app_state = app_state.with_image_host(Arc::new(host));
        }
        None => tracing::info!("image host not configured, new events use the placeholder image"),
    }

    // Build router
    let mut app = Router::new().merge(api::build_router());
    #[cfg(feature = "swagger-ui")]
    {
        app = app.merge(api::docs_router());
        tracing::info!("swagger UI available at /api/docs");
    }
    let app = app
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
