//! Comment export job pipeline.
//!
//! Executes one export job end-to-end: look up the comment cache, fetch
//! from the YouTube API on a miss, filter and sort, write the export
//! file, and maintain status/progress/result records in a shared
//! key-value store with cooperative cancellation at each stage boundary.
//!
//! The pipeline is invoked as a function call with a job id and a
//! settings snapshot; the queue transport and the front-end that reads
//! the records live elsewhere.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use export_worker::{Config, ExportSettings, JobRunner, RedisStore, YouTubeClient};
//!
//! let config = Config::from_env()?;
//! let store = Arc::new(RedisStore::connect(&config.redis_url).await?);
//! let source = Arc::new(YouTubeClient::new(config.yt_api_key.clone()));
//! let runner = JobRunner::new(source, store, config.runner());
//!
//! let settings = ExportSettings::new("dQw4w9WgXcQ").with_limit(500);
//! runner.run("job-id", &settings).await?;
//! ```
//!
//! # Modules
//!
//! - [`jobs`] - pipeline runner, state records, key derivation
//! - [`store`] - `KvStore` seam with memory and Redis backends
//! - [`cache`] - compressed read-through comment cache
//! - [`filter`] - pure filter/sort/truncate stage
//! - [`export`] - CSV / XLSX / JSON writers
//! - [`settings`] - immutable per-job settings
//! - [`config`] - process configuration from the environment
//! - [`testing`] - scripted mocks for pipeline tests

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod jobs;
pub mod settings;
pub mod source;
pub mod store;
pub mod testing;

pub use cache::CommentCache;
pub use config::Config;
pub use error::{JobError, StoreError};
pub use filter::apply_filters;
pub use jobs::keys::FetchParams;
pub use jobs::runner::{JobOutcome, JobRunner, RunnerConfig};
pub use jobs::state::{JobProgress, JobResult, JobState, JobStatus};
pub use settings::{ExportFormat, ExportSettings, Field, KeywordMode, SettingsError, SortKey};
pub use source::CommentSource;
pub use store::{KvStore, MemoryStore, RedisStore};

// Re-export the client types that cross the package boundary.
pub use youtube_client::{Comment, YouTubeClient, YouTubeError};
