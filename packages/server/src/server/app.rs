//! Application setup and server configuration.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use extraction::{BrandPipeline, RetentionSweeper};

use crate::server::auth::JwtService;
use crate::server::routes::{
    cleanup_handler, extract_brand_handler, health_handler, serve_local_dump,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BrandPipeline>,
    pub sweeper: Arc<RetentionSweeper>,
    /// None disables extraction auth (local development)
    pub jwt: Option<Arc<JwtService>>,
    pub cron_secret: String,
    /// Some only when the local file store is active
    pub local_dump_dir: Option<PathBuf>,
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .route("/api/extract-brand", get(extract_brand_handler))
        .route("/api/cleanup", get(cleanup_handler))
        .route("/local-dump/*path", get(serve_local_dump))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
