//! # salesforce-bulk-jobs
//!
//! Salesforce Bulk API (async, `/services/async/{version}/`) jobs and batches.
//!
//! ## Features
//!
//! - **Jobs** - Create, inspect, close, and abort insert/update/upsert/delete/query jobs
//! - **Batches** - Upload rows as CSV and read batch state with case-insensitive predicates
//! - **Results** - Per-row outcomes from either CSV or XML result bodies
//! - **Query Results** - Result set ids and CSV rows of query batches
//!
//! Each operation is one HTTP round trip. Waiting for a batch to finish is
//! up to the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use salesforce_bulk_jobs::{BulkClient, CreateJobRequest, Operation, Record};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), salesforce_bulk_jobs::Error> {
//!     let client = BulkClient::new("https://na1.salesforce.com", "session-id")?;
//!
//!     let job = client
//!         .create_job(
//!             CreateJobRequest::new("VideoEvent__c", Operation::Upsert)
//!                 .with_external_id_field("Id__c"),
//!         )
//!         .await?;
//!
//!     let rows = vec![
//!         Record::new()
//!             .field("Id__c", 12345)
//!             .field("Title__c", "This is a test video")
//!             .null("IsPreview__c"),
//!         Record::new()
//!             .field("Id__c", 23456)
//!             .field("Title__c", "A second test!")
//!             .field("IsPreview__c", true),
//!     ];
//!
//!     let batch = client.add_batch(&job.id, &rows).await?;
//!     println!("batch {} is {:?}", batch.id, batch.state);
//!
//!     Ok(())
//! }
//! ```

mod batch;
mod client;
mod error;
mod record;
mod result;
mod types;

pub use batch::{Batch, BatchState};
pub use client::BulkClient;
pub use error::{Error, ErrorKind, Result};
pub use record::{records_to_csv, rows_to_csv, FieldValue, Record};
pub use result::{BatchResult, BatchResultCollection};
pub use types::{
    ConcurrencyMode, ContentType, CreateJobRequest, JobInfo, JobState, Operation,
};
