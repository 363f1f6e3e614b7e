//! Orchestrator for one export job.
//!
//! Drives the pipeline end-to-end with a progress record published
//! before each stage and cancellation honored at the checkpoints
//! between stages.
//!
//! # Architecture
//!
//! ```text
//! run(job_id, settings)
//!     │
//!     ├─► status running, progress "Fetching comments..."
//!     ├─► CommentCache.get ── hit ──────────────────┐
//!     │       └─ miss ─► CommentSource.fetch ───────┤  progress per page,
//!     │                  CommentCache.put           │  cancel flag polled
//!     ├─► checkpoint ─► apply_filters               │
//!     ├─► checkpoint ─► export (fallback dir if read-only)
//!     └─► result record, status done
//! ```
//!
//! Cancellation is a normal terminal path; every other failure is
//! classified into a persisted `error` status plus a short message.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};
use youtube_client::{Cancelled, Comment, FetchSignals};

use crate::cache::CommentCache;
use crate::error::JobError;
use crate::export;
use crate::filter::apply_filters;
use crate::settings::ExportSettings;
use crate::source::CommentSource;
use crate::store::KvStore;

use super::keys::FetchParams;
use super::state::{JobProgress, JobResult, JobState, JobStatus};

const MSG_FETCHING: &str = "Fetching comments...";
const MSG_FILTERING: &str = "Filtering...";
const MSG_EXPORTING: &str = "Exporting...";

/// Fixed knobs of the runner, a subset of [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub export_dir: PathBuf,
    pub fallback_export_dir: PathBuf,
    pub cache_ttl: Duration,
    pub job_ttl: Duration,
}

/// Terminal outcome of a run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Done(JobResult),
    Cancelled,
}

/// Executes export jobs against a comment source and a shared store.
///
/// One `run` call owns its job's records exclusively; concurrent jobs
/// only share the comment cache, which is keyed by content fingerprint.
pub struct JobRunner {
    source: Arc<dyn CommentSource>,
    store: Arc<dyn KvStore>,
    config: RunnerConfig,
}

impl JobRunner {
    pub fn new(source: Arc<dyn CommentSource>, store: Arc<dyn KvStore>, config: RunnerConfig) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// Execute one job to a terminal state.
    ///
    /// The terminal status and a short message are always persisted
    /// before this returns; the `Err` carries the same failure for the
    /// caller's logs. Cancellation resolves to `Ok(JobOutcome::Cancelled)`.
    pub async fn run(
        &self,
        job_id: &str,
        settings: &ExportSettings,
    ) -> Result<JobOutcome, JobError> {
        let state = JobState::new(self.store.clone(), job_id, self.config.job_ttl);
        match self.execute(&state, settings).await {
            Ok(outcome) => Ok(outcome),
            Err(JobError::Cancelled) => {
                info!(job_id, "job cancelled");
                self.finish(&state, JobStatus::Cancelled, "Cancelled".to_owned())
                    .await;
                Ok(JobOutcome::Cancelled)
            }
            Err(err) => {
                warn!(job_id, error = %err, "job failed");
                self.finish(
                    &state,
                    JobStatus::Error,
                    format!("Error: {}", err.user_message()),
                )
                .await;
                Err(err)
            }
        }
    }

    async fn execute(
        &self,
        state: &JobState,
        settings: &ExportSettings,
    ) -> Result<JobOutcome, JobError> {
        let video_id = settings.video_id.as_str();

        state.set_status(JobStatus::Running).await?;
        state
            .publish_progress(&JobProgress {
                message: MSG_FETCHING.to_owned(),
                fetched: 0,
                limit: Some(settings.limit),
                exported: None,
            })
            .await?;
        info!(
            job_id = %state.job_id(),
            video_id,
            limit = settings.limit,
            include_replies = settings.include_replies,
            "job started"
        );

        let params = FetchParams {
            include_replies: settings.include_replies,
            limit: settings.limit,
        };
        let cache = CommentCache::new(self.store.clone(), self.config.cache_ttl);

        let comments = match cache.get(video_id, &params).await {
            Ok(Some(comments)) => {
                info!(job_id = %state.job_id(), video_id, count = comments.len(), "cache hit");
                comments
            }
            Ok(None) => self.fetch_and_cache(state, settings, &cache, &params).await?,
            Err(JobError::CacheCorruption(reason)) => {
                warn!(job_id = %state.job_id(), video_id, reason = %reason, "corrupted cache entry, refetching");
                self.fetch_and_cache(state, settings, &cache, &params).await?
            }
            Err(err) => return Err(err),
        };

        self.checkpoint(state).await?;
        state
            .publish_progress(&JobProgress {
                message: MSG_FILTERING.to_owned(),
                fetched: comments.len() as u64,
                limit: Some(settings.limit),
                exported: None,
            })
            .await?;
        let filtered = apply_filters(comments, settings);

        self.checkpoint(state).await?;
        state
            .publish_progress(&JobProgress {
                message: MSG_EXPORTING.to_owned(),
                fetched: filtered.len() as u64,
                limit: Some(settings.limit),
                exported: None,
            })
            .await?;
        let path = self.export_with_fallback(state, settings, &filtered).await?;

        let result = JobResult {
            file_path: path.to_string_lossy().into_owned(),
            count: filtered.len() as u64,
            format: settings.format,
            video_id: video_id.to_owned(),
        };
        state.set_result(&result).await?;
        state.set_status(JobStatus::Done).await?;
        state
            .publish_progress(&JobProgress {
                message: "Done".to_owned(),
                fetched: filtered.len() as u64,
                limit: Some(settings.limit),
                exported: Some(true),
            })
            .await?;
        info!(
            job_id = %state.job_id(),
            video_id,
            count = result.count,
            file = %result.file_path,
            "job done"
        );

        Ok(JobOutcome::Done(result))
    }

    /// Cancellation checkpoint between pipeline stages.
    async fn checkpoint(&self, state: &JobState) -> Result<(), JobError> {
        if state.cancel_requested().await? {
            return Err(JobError::Cancelled);
        }
        Ok(())
    }

    async fn fetch_and_cache(
        &self,
        state: &JobState,
        settings: &ExportSettings,
        cache: &CommentCache,
        params: &FetchParams,
    ) -> Result<Vec<Comment>, JobError> {
        let signals = RunSignals {
            state,
            limit: settings.limit,
        };
        let comments = self
            .source
            .fetch(
                &settings.video_id,
                settings.limit as usize,
                settings.include_replies,
                &signals,
            )
            .await?;
        cache.put(&settings.video_id, params, &comments).await?;
        Ok(comments)
    }

    async fn export_with_fallback(
        &self,
        state: &JobState,
        settings: &ExportSettings,
        comments: &[Comment],
    ) -> Result<PathBuf, JobError> {
        match export::export(
            comments,
            &self.config.export_dir,
            &settings.video_id,
            &settings.fields,
            settings.format,
        ) {
            Ok(path) => Ok(path),
            Err(err) if export::is_read_only_fs(&err) => {
                let fallback = &self.config.fallback_export_dir;
                warn!(
                    job_id = %state.job_id(),
                    dir = %self.config.export_dir.display(),
                    fallback = %fallback.display(),
                    "export dir read-only, using fallback"
                );
                let notice = JobProgress {
                    message: format!("Export dir read-only, using {}", fallback.display()),
                    fetched: comments.len() as u64,
                    limit: Some(settings.limit),
                    exported: None,
                };
                if let Err(store_err) = state.publish_progress(&notice).await {
                    warn!(job_id = %state.job_id(), error = %store_err, "failed to publish fallback notice");
                }
                Ok(export::export(
                    comments,
                    fallback,
                    &settings.video_id,
                    &settings.fields,
                    settings.format,
                )?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist a terminal status and message, logging rather than
    /// propagating store failures so the original outcome survives.
    async fn finish(&self, state: &JobState, status: JobStatus, message: String) {
        if let Err(err) = state.set_status(status).await {
            warn!(job_id = %state.job_id(), error = %err, "failed to persist terminal status");
        }
        let progress = JobProgress {
            message,
            fetched: 0,
            limit: None,
            exported: Some(false),
        };
        if let Err(err) = state.publish_progress(&progress).await {
            warn!(job_id = %state.job_id(), error = %err, "failed to persist terminal progress");
        }
    }
}

/// Fetch signals wired to a job's records: the page callback polls the
/// cancel flag and republishes progress with the running count.
struct RunSignals<'a> {
    state: &'a JobState,
    limit: u32,
}

#[async_trait]
impl FetchSignals for RunSignals<'_> {
    async fn on_page(&self, collected: usize) -> Result<(), Cancelled> {
        if self.state.cancel_requested().await.unwrap_or(false) {
            return Err(Cancelled);
        }
        let progress = JobProgress {
            message: MSG_FETCHING.to_owned(),
            fetched: collected as u64,
            limit: Some(self.limit),
            exported: None,
        };
        if let Err(err) = self.state.publish_progress(&progress).await {
            warn!(job_id = %self.state.job_id(), error = %err, "failed to publish fetch progress");
        }
        Ok(())
    }

    async fn is_cancelled(&self) -> bool {
        self.state.cancel_requested().await.unwrap_or(false)
    }
}
