//! Job types for the Bulk API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

use salesforce_bulk_client::xml::BULK_NAMESPACE;

/// Deserialize a text element through `FromStr`.
///
/// Bulk API documents carry enum values as element text, sometimes in a
/// different case than documented, so parsing goes through the
/// case-insensitive `FromStr` impls below.
pub(crate) fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let text = String::deserialize(deserializer)?;
    text.trim().parse().map_err(serde::de::Error::custom)
}

/// Optional variant of [`deserialize_from_str`].
pub(crate) fn deserialize_opt_from_str<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = String>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    match text.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $api:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Get the API string for this value.
            pub fn api_name(&self) -> &'static str {
                match self {
                    $( $name::$variant => $api ),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($api) {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("unknown {} value: {}", stringify!($name), s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.api_name())
            }
        }
    };
}

api_enum! {
    /// Bulk API job states.
    JobState {
        /// Job is open and accepting batches
        Open => "Open",
        /// No more batches will be accepted
        Closed => "Closed",
        /// Job was aborted; unprocessed batches will not run
        Aborted => "Aborted",
        /// Job failed
        Failed => "Failed",
    }
}

impl JobState {
    /// Check if the job no longer accepts batches.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Open)
    }
}

api_enum! {
    /// Bulk API operation types.
    Operation {
        /// Insert new records
        Insert => "insert",
        /// Update existing records
        Update => "update",
        /// Upsert based on external ID
        Upsert => "upsert",
        /// Delete records (soft delete)
        Delete => "delete",
        /// Hard delete records (permanent)
        HardDelete => "hardDelete",
        /// Query records
        Query => "query",
        /// Query all records including deleted
        QueryAll => "queryAll",
    }
}

impl Operation {
    /// Check if this is a query operation.
    pub fn is_query(&self) -> bool {
        matches!(self, Operation::Query | Operation::QueryAll)
    }
}

api_enum! {
    /// Batch content type of a job.
    ContentType {
        Csv => "CSV",
        Xml => "XML",
        Json => "JSON",
        ZipCsv => "ZIP_CSV",
        ZipXml => "ZIP_XML",
        ZipJson => "ZIP_JSON",
    }
}

api_enum! {
    /// How batches of a job are scheduled.
    ConcurrencyMode {
        Parallel => "Parallel",
        Serial => "Serial",
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Request to create a job.
///
/// Element order is significant to the API and follows the field order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "jobInfo", rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    /// Operation type
    pub operation: String,
    /// SObject API name
    pub object: String,
    /// External ID field for upsert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id_field_name: Option<String>,
    /// Concurrency mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_mode: Option<String>,
    /// Content type
    pub content_type: String,
    /// Enable PK chunking for query jobs (sent as a header)
    #[serde(skip)]
    pub pk_chunking: bool,
    /// Chunk size for PK chunking
    #[serde(skip)]
    pub pk_chunk_size: Option<u32>,
}

impl CreateJobRequest {
    /// Create a new CSV job request.
    pub fn new(sobject: impl Into<String>, operation: Operation) -> Self {
        Self {
            xmlns: BULK_NAMESPACE.to_string(),
            operation: operation.api_name().to_string(),
            object: sobject.into(),
            external_id_field_name: None,
            concurrency_mode: None,
            content_type: ContentType::Csv.api_name().to_string(),
            pk_chunking: false,
            pk_chunk_size: None,
        }
    }

    /// Set the external ID field for upsert operations.
    pub fn with_external_id_field(mut self, field: impl Into<String>) -> Self {
        self.external_id_field_name = Some(field.into());
        self
    }

    /// Set the concurrency mode.
    pub fn with_concurrency_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = Some(mode.api_name().to_string());
        self
    }

    /// Set the content type.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type.api_name().to_string();
        self
    }

    /// Enable PK chunking, optionally with a chunk size.
    pub fn with_pk_chunking(mut self, chunk_size: Option<u32>) -> Self {
        self.pk_chunking = true;
        self.pk_chunk_size = chunk_size;
        self
    }
}

/// Request to change the state of a job (close or abort).
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "jobInfo")]
pub(crate) struct UpdateJobStateRequest {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    state: String,
}

impl UpdateJobStateRequest {
    pub(crate) fn closed() -> Self {
        Self::with_state(JobState::Closed)
    }

    pub(crate) fn aborted() -> Self {
        Self::with_state(JobState::Aborted)
    }

    fn with_state(state: JobState) -> Self {
        Self {
            xmlns: BULK_NAMESPACE.to_string(),
            state: state.api_name().to_string(),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Job information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// Job ID
    pub id: String,
    /// Operation type
    #[serde(deserialize_with = "deserialize_from_str")]
    pub operation: Operation,
    /// SObject API name
    pub object: String,
    /// Id of the user who created the job
    #[serde(default)]
    pub created_by_id: Option<String>,
    /// Job creation time
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub system_modstamp: Option<DateTime<Utc>>,
    /// Current state
    #[serde(deserialize_with = "deserialize_from_str")]
    pub state: JobState,
    /// External ID field for upsert
    #[serde(default)]
    pub external_id_field_name: Option<String>,
    /// Concurrency mode
    #[serde(default, deserialize_with = "deserialize_opt_from_str")]
    pub concurrency_mode: Option<ConcurrencyMode>,
    /// Content type
    #[serde(default, deserialize_with = "deserialize_opt_from_str")]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub number_batches_queued: u64,
    #[serde(default)]
    pub number_batches_in_progress: u64,
    #[serde(default)]
    pub number_batches_completed: u64,
    #[serde(default)]
    pub number_batches_failed: u64,
    #[serde(default)]
    pub number_batches_total: u64,
    #[serde(default)]
    pub number_records_processed: u64,
    #[serde(default)]
    pub number_retries: u64,
    /// API version the job was created with
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub number_records_failed: u64,
    /// Total processing time in milliseconds
    #[serde(default)]
    pub total_processing_time: u64,
    #[serde(default)]
    pub api_active_processing_time: u64,
    #[serde(default)]
    pub apex_processing_time: u64,
}

impl JobInfo {
    /// Check if every batch of the job has finished processing.
    pub fn all_batches_finished(&self) -> bool {
        self.number_batches_queued == 0 && self.number_batches_in_progress == 0
    }
}
