//! Update check endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};
use update_check_core::CheckRequest;

use crate::state::{AppState, Outcome};

/// Tell a client whether its commit is current.
///
/// Current clients get an empty 200. Outdated clients get the configured
/// update payload as JSON. Bad requests get an empty 400. A repeated
/// parameter is read from its first occurrence.
pub async fn check(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, StatusCode> {
    let request = CheckRequest::from_pairs(params);

    let outcome = state.checker.check(&request).await.map_err(|e| {
        if e.is_client_error() {
            warn!("Rejected check {:?}: {}", request, e);
            StatusCode::BAD_REQUEST
        } else {
            error!("Check failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    })?;

    match outcome {
        Outcome::Current => Ok(StatusCode::OK.into_response()),
        Outcome::Outdated(update) => Ok(Json(update).into_response()),
    }
}
