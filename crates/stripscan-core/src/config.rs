//! Configuration module
//!
//! Environment-driven configuration for the API and services. Values are
//! loaded once at startup via [`Config::from_env`] and validated before the
//! server starts accepting connections.

use std::env;

use crate::constants::MAX_UPLOAD_SIZE_BYTES;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_DB_TIMEOUT_SECS: u64 = 30;
const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Shared directory holding uploaded originals and generated thumbnails.
    pub upload_dir: String,
    pub max_upload_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub allowed_extensions: Vec<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(v) => v
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Best-effort: a missing .env file is not an error.
        let _ = dotenvy::dotenv();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Config {
            server_port: env_or("PORT", DEFAULT_PORT),
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", DEFAULT_DB_TIMEOUT_SECS),
            cors_origins: env_list("CORS_ORIGINS", &[]),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string()),
            max_upload_size_bytes: env_or("MAX_UPLOAD_SIZE_BYTES", MAX_UPLOAD_SIZE_BYTES),
            allowed_content_types: env_list(
                "ALLOWED_CONTENT_TYPES",
                &["image/jpeg", "image/jpg", "image/png"],
            ),
            allowed_extensions: env_list("ALLOWED_EXTENSIONS", &["jpg", "jpeg", "png"]),
        })
    }

    /// Fail fast on configuration that cannot possibly work.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.max_upload_size_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_SIZE_BYTES must be greater than zero");
        }
        if self.allowed_content_types.is_empty() {
            anyhow::bail!("ALLOWED_CONTENT_TYPES must not be empty");
        }
        if self.upload_dir.is_empty() {
            anyhow::bail!("UPLOAD_DIR must not be empty");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}
