use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::jobs::runner::RunnerConfig;

/// Fetched comment sets stay cached this long.
const CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 12);

/// Job records expire this long after their last update, terminal
/// states included.
const JOB_TTL: Duration = Duration::from_secs(60 * 60 * 4);

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub yt_api_key: String,
    pub redis_url: String,
    pub export_dir: PathBuf,
    pub fallback_export_dir: PathBuf,
    pub default_limit: u32,
    pub cache_ttl: Duration,
    pub job_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            yt_api_key: env::var("YT_API_KEY").context("YT_API_KEY must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            export_dir: env::var("EXPORT_DIR")
                .unwrap_or_else(|_| "./exports".to_string())
                .into(),
            fallback_export_dir: env::var("FALLBACK_EXPORT_DIR")
                .unwrap_or_else(|_| "/tmp/yt_exports".to_string())
                .into(),
            default_limit: env::var("DEFAULT_LIMIT")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .context("DEFAULT_LIMIT must be a valid number")?,
            cache_ttl: CACHE_TTL,
            job_ttl: JOB_TTL,
        })
    }

    /// The subset of configuration the job runner needs.
    pub fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            export_dir: self.export_dir.clone(),
            fallback_export_dir: self.fallback_export_dir.clone(),
            cache_ttl: self.cache_ttl,
            job_ttl: self.job_ttl,
        }
    }
}
