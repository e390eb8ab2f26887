//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api`; `/health` sits at the
//! root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}

/// Swagger UI at `/api/docs`, backed by [`openapi::ApiDoc`].
#[cfg(feature = "swagger-ui")]
pub fn docs_router() -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    let swagger_ui =
        SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi::ApiDoc::openapi());
    Router::new().merge(swagger_ui)
}
