use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::server::app::AppState;

/// Retention sweep endpoint, triggered by an external cron
///
/// Requires the exact `Bearer <CRON_SECRET>` credential and reports how
/// many expired assets were deleted.
pub async fn cleanup_handler(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Response {
    let expected = format!("Bearer {}", state.cron_secret);
    let authorized = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(|value| value == expected)
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    match state.sweeper.sweep().await {
        Ok(deleted) => format!("Cleaned {} files", deleted).into_response(),
        Err(e) => {
            error!(error = %e, "retention sweep failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Cleanup failed").into_response()
        }
    }
}
