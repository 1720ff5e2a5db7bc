use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub jwt_secret: Option<String>,
    pub cron_secret: String,
    pub blob_read_write_token: Option<String>,
    pub local_dump_dir: PathBuf,
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        Ok(Self {
            port,
            openrouter_api_key: env::var("OPENROUTER_API_KEY")
                .context("OPENROUTER_API_KEY must be set")?,
            openrouter_model: env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| extraction::DEFAULT_MODEL.to_string()),
            // Unset means the extraction endpoint runs unauthenticated
            // (local development parity)
            jwt_secret: env::var("JWT_SECRET").ok(),
            cron_secret: env::var("CRON_SECRET").context("CRON_SECRET must be set")?,
            blob_read_write_token: env::var("BLOB_READ_WRITE_TOKEN").ok(),
            local_dump_dir: env::var("LOCAL_DUMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./local-dump")),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}", port)),
        })
    }
}
