//! Batch records and their state predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Processing state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchState {
    /// Waiting to be processed
    Queued,
    /// Being processed
    InProgress,
    /// Processed; individual records may still have failed
    Completed,
    /// Could not be processed; see `state_message`
    Failed,
    /// Will not be processed (e.g. the job was aborted, or PK chunking
    /// replaced the original batch)
    NotProcessed,
}

impl BatchState {
    /// Get the API string for this state.
    pub fn api_name(&self) -> &'static str {
        match self {
            BatchState::Queued => "Queued",
            BatchState::InProgress => "InProgress",
            BatchState::Completed => "Completed",
            BatchState::Failed => "Failed",
            BatchState::NotProcessed => "NotProcessed",
        }
    }

    /// Check if the batch will not change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchState::Completed | BatchState::Failed | BatchState::NotProcessed
        )
    }
}

impl FromStr for BatchState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            BatchState::Queued,
            BatchState::InProgress,
            BatchState::Completed,
            BatchState::Failed,
            BatchState::NotProcessed,
        ]
        .into_iter()
        .find(|state| state.api_name().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unknown batch state: {}", s))
    }
}

impl std::fmt::Display for BatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_name())
    }
}

/// A batch submitted under a job.
///
/// `state` is kept as the raw string the server sent; the predicates compare
/// it case-insensitively and treat a missing state as "not in that state".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Batch ID
    #[serde(default)]
    pub id: String,
    /// ID of the owning job
    #[serde(default)]
    pub job_id: String,
    /// Raw processing state (`Queued`, `InProgress`, ...)
    #[serde(default)]
    pub state: Option<String>,
    /// Reason for a `Failed` or `NotProcessed` state
    #[serde(default)]
    pub state_message: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub system_modstamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub number_records_processed: u64,
    #[serde(default)]
    pub number_records_failed: u64,
    /// Milliseconds spent processing the batch
    #[serde(default)]
    pub total_processing_time: u64,
    #[serde(default)]
    pub api_active_processing_time: u64,
    #[serde(default)]
    pub apex_processing_time: u64,
}

impl Batch {
    /// Check the state against `candidate`, ignoring case.
    pub fn state_is(&self, candidate: &str) -> bool {
        self.state
            .as_deref()
            .is_some_and(|state| state.eq_ignore_ascii_case(candidate))
    }

    pub fn is_queued(&self) -> bool {
        self.state_is(BatchState::Queued.api_name())
    }

    pub fn is_in_progress(&self) -> bool {
        self.state_is(BatchState::InProgress.api_name())
    }

    pub fn is_completed(&self) -> bool {
        self.state_is(BatchState::Completed.api_name())
    }

    pub fn is_failed(&self) -> bool {
        self.state_is(BatchState::Failed.api_name())
    }

    pub fn is_not_processed(&self) -> bool {
        self.state_is(BatchState::NotProcessed.api_name())
    }

    /// Parse the raw state, if it is one the API documents.
    pub fn parsed_state(&self) -> Option<BatchState> {
        self.state.as_deref()?.parse().ok()
    }
}

/// Body of `GET job/{id}/batch`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BatchInfoList {
    #[serde(rename = "batchInfo", default)]
    pub batches: Vec<Batch>,
}
