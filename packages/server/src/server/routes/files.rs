use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::server::app::AppState;

/// Serve files written by the local blob store
///
/// Only active when the server runs against local storage; returns 404
/// otherwise so nothing is exposed in blob-backed deployments.
pub async fn serve_local_dump(
    Extension(state): Extension<AppState>,
    Path(path): Path<String>,
) -> Response {
    let Some(root) = &state.local_dump_dir else {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    };

    // Keep requests inside the dump directory
    if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
    }

    let file_path = root.join(&path);
    match tokio::fs::read(&file_path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&file_path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], bytes).into_response()
        }
        Err(_) => {
            debug!(path = %path, "local dump file not found");
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}
