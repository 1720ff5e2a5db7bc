// Main entry point for the brand extraction API server

use std::sync::Arc;

use anyhow::{Context, Result};
use extraction::stores::{LocalFileStore, VercelBlobStore};
use extraction::{BlobStore, BrandPipeline, HttpFetcher, OpenRouterClassifier, RetentionSweeper};
use openrouter_client::OpenRouterClient;
use server_core::{
    server::{auth::JwtService, build_app, AppState},
    Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Brand Extraction API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Pick the blob backend: Vercel Blob when a token is present,
    // local files otherwise
    let (store, local_dump_dir): (Arc<dyn BlobStore>, Option<_>) =
        match config.blob_read_write_token.clone() {
            Some(token) => {
                tracing::info!("Using Vercel Blob storage");
                (Arc::new(VercelBlobStore::new(token)), None)
            }
            None => {
                tracing::info!(
                    dir = %config.local_dump_dir.display(),
                    "Using local file storage"
                );
                let local = LocalFileStore::new(&config.local_dump_dir, &config.public_base_url);
                (Arc::new(local), Some(config.local_dump_dir.clone()))
            }
        };

    let classifier = OpenRouterClassifier::new(OpenRouterClient::new(&config.openrouter_api_key))
        .with_model(&config.openrouter_model);
    tracing::info!(model = %classifier.model(), "Classifier ready");

    let pipeline = Arc::new(BrandPipeline::new(
        Arc::new(HttpFetcher::new()),
        store.clone(),
        Arc::new(classifier),
    ));
    let sweeper = Arc::new(RetentionSweeper::new(store));

    let jwt = config
        .jwt_secret
        .as_deref()
        .map(|secret| Arc::new(JwtService::new(secret)));
    if jwt.is_none() {
        tracing::warn!("JWT_SECRET not set - extraction endpoint is unauthenticated");
    }

    // Build application
    let app = build_app(AppState {
        pipeline,
        sweeper,
        jwt,
        cron_secret: config.cron_secret,
        local_dump_dir,
    });

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
