//! Shared DTO types used across multiple endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for `GET /events/{slug}/similar`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SimilarParams {
    /// Maximum number of events returned. Defaults to the configured
    /// limit (3 unless overridden).
    #[serde(default)]
    pub limit: Option<usize>,
}
