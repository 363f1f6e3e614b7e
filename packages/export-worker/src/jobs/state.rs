//! Job status, progress and result records.
//!
//! All records live behind the shared [`KvStore`] at fixed per-job keys
//! and expire with the job TTL, terminal states included: the records
//! are an operational window onto the job, not an archive.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::settings::ExportFormat;
use crate::store::KvStore;

use super::keys;

/// Lifecycle states of an export job.
///
/// `Queued → Running → {Done, Error, Cancelled}`; terminal states never
/// transition further. Cancellation may be requested in any state and is
/// honored at the runner's checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Error => "error",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "done" => Some(Self::Done),
            "error" => Some(Self::Error),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Progress snapshot published before each pipeline stage and after
/// every fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub message: String,
    pub fetched: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported: Option<bool>,
}

/// Final result record for a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    pub file_path: String,
    pub count: u64,
    pub format: ExportFormat,
    pub video_id: String,
}

/// Handle to one job's records in the key-value store.
///
/// The runner is the only writer of status/progress/result; the cancel
/// flag is written by whoever wants the job stopped and only read here.
#[derive(Clone)]
pub struct JobState {
    store: Arc<dyn KvStore>,
    job_id: String,
    ttl: Duration,
}

impl JobState {
    pub fn new(store: Arc<dyn KvStore>, job_id: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            job_id: job_id.into(),
            ttl,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub async fn set_status(&self, status: JobStatus) -> Result<(), StoreError> {
        debug!(job_id = %self.job_id, status = status.as_str(), "job status");
        self.store
            .set_ex(
                &keys::job_status_key(&self.job_id),
                status.as_str().as_bytes(),
                self.ttl,
            )
            .await
    }

    pub async fn status(&self) -> Result<Option<JobStatus>, StoreError> {
        let raw = self.store.get(&keys::job_status_key(&self.job_id)).await?;
        Ok(raw
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|s| JobStatus::parse(&s)))
    }

    pub async fn publish_progress(&self, progress: &JobProgress) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(progress).map_err(StoreError::new)?;
        self.store
            .set_ex(&keys::job_progress_key(&self.job_id), &payload, self.ttl)
            .await
    }

    pub async fn progress(&self) -> Result<Option<JobProgress>, StoreError> {
        let raw = self.store.get(&keys::job_progress_key(&self.job_id)).await?;
        Ok(raw.and_then(|bytes| serde_json::from_slice(&bytes).ok()))
    }

    pub async fn set_result(&self, result: &JobResult) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(result).map_err(StoreError::new)?;
        self.store
            .set_ex(&keys::job_result_key(&self.job_id), &payload, self.ttl)
            .await
    }

    pub async fn result(&self) -> Result<Option<JobResult>, StoreError> {
        let raw = self.store.get(&keys::job_result_key(&self.job_id)).await?;
        Ok(raw.and_then(|bytes| serde_json::from_slice(&bytes).ok()))
    }

    /// Ask the runner to stop at its next checkpoint.
    pub async fn request_cancel(&self) -> Result<(), StoreError> {
        self.store
            .set_ex(&keys::job_cancel_key(&self.job_id), b"1", self.ttl)
            .await
    }

    pub async fn cancel_requested(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(&keys::job_cancel_key(&self.job_id))
            .await?
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn state() -> JobState {
        JobState::new(Arc::new(MemoryStore::new()), "j1", Duration::from_secs(60))
    }

    #[tokio::test]
    async fn status_round_trips() {
        let state = state();
        assert_eq!(state.status().await.unwrap(), None);

        state.set_status(JobStatus::Queued).await.unwrap();
        assert_eq!(state.status().await.unwrap(), Some(JobStatus::Queued));

        state.set_status(JobStatus::Running).await.unwrap();
        assert_eq!(state.status().await.unwrap(), Some(JobStatus::Running));
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[tokio::test]
    async fn progress_round_trips() {
        let state = state();
        let progress = JobProgress {
            message: "Fetching comments...".into(),
            fetched: 42,
            limit: Some(200),
            exported: None,
        };
        state.publish_progress(&progress).await.unwrap();
        assert_eq!(state.progress().await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn result_round_trips() {
        let state = state();
        let result = JobResult {
            file_path: "/exports/comments_vid_20240101_0000.csv".into(),
            count: 7,
            format: ExportFormat::Csv,
            video_id: "vid".into(),
        };
        state.set_result(&result).await.unwrap();
        assert_eq!(state.result().await.unwrap(), Some(result));
    }

    #[tokio::test]
    async fn cancel_flag_is_observed() {
        let state = state();
        assert!(!state.cancel_requested().await.unwrap());
        state.request_cancel().await.unwrap();
        assert!(state.cancel_requested().await.unwrap());
    }

    #[tokio::test]
    async fn records_expire_with_the_job_ttl() {
        let state = JobState::new(Arc::new(MemoryStore::new()), "j1", Duration::ZERO);
        state.set_status(JobStatus::Done).await.unwrap();
        assert_eq!(state.status().await.unwrap(), None);
    }
}
