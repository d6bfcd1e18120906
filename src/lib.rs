//! # salesforce-bulk
//!
//! A Salesforce Bulk API (async XML/CSV API) client library for Rust.
//!
//! ## Security
//!
//! - Session ids and passwords are redacted in Debug output
//! - Tracing spans skip credentials and request bodies
//! - Error messages sanitize session ids
//!
//! ## Crates
//!
//! - **salesforce-bulk-client** - HTTP transport, configuration, Bulk API error parsing, XML codec
//! - **salesforce-bulk-auth** - Session credentials and SOAP username/password login
//! - **salesforce-bulk-jobs** - Jobs, batches, per-row results, and query result sets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salesforce_bulk::{BulkClient, CreateJobRequest, Operation, PasswordLogin, Record};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let login = PasswordLogin::new("user@example.com", "password")
//!         .with_security_token("token");
//!     let client = BulkClient::login(&login).await?;
//!
//!     let job = client
//!         .create_job(CreateJobRequest::new("Account", Operation::Insert))
//!         .await?;
//!     let batch = client
//!         .add_batch(&job.id, &[Record::new().field("Name", "Acme")])
//!         .await?;
//!     client.close_job(&job.id).await?;
//!
//!     println!("batch {} queued: {}", batch.id, batch.is_queued());
//!     Ok(())
//! }
//! ```

#[cfg(feature = "auth")]
pub use salesforce_bulk_auth as auth;
#[cfg(feature = "client")]
pub use salesforce_bulk_client as client;
#[cfg(feature = "jobs")]
pub use salesforce_bulk_jobs as jobs;

#[cfg(feature = "auth")]
pub use salesforce_bulk_auth::{Credentials, PasswordLogin, SalesforceCredentials};
#[cfg(feature = "client")]
pub use salesforce_bulk_client::{ClientConfig, SalesforceClient};
#[cfg(feature = "jobs")]
pub use salesforce_bulk_jobs::{
    Batch, BatchResult, BatchResultCollection, BatchState, BulkClient, CreateJobRequest,
    JobInfo, JobState, Operation, Record,
};
