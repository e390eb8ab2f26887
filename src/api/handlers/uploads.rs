//! Client-side upload signing.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{SignRequest, SignResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::media::sign_params;

/// `POST /sign-cloudinary`: Sign upload parameters for the browser.
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] when no API secret is
/// configured and [`GatewayError::Validation`] for an unreadable body.
#[utoipa::path(
    post,
    path = "/api/sign-cloudinary",
    tag = "Uploads",
    summary = "Sign image upload parameters",
    description = "Returns the SHA-256 signature of the sorted parameters with the API secret appended.",
    request_body = SignRequest,
    responses(
        (status = 200, description = "Signature", body = SignResponse),
        (status = 400, description = "Unreadable body", body = ErrorResponse),
        (status = 500, description = "Signing not configured", body = ErrorResponse),
    )
)]
pub async fn sign_upload(
    State(state): State<AppState>,
    payload: Result<Json<SignRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(req) = payload?;
    let secret = state.signing_secret.as_deref().ok_or_else(|| {
        GatewayError::Configuration("CLOUDINARY_API_SECRET is not set".to_string())
    })?;
    let signature = sign_params(&req.string_params(), secret);
    Ok(Json(SignResponse { signature }))
}

/// Upload signing routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sign-cloudinary", post(sign_upload))
}
