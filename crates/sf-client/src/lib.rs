//! # salesforce-bulk-client
//!
//! HTTP transport for the Salesforce Bulk API (the XML/CSV "async" API).
//!
//! This crate provides the foundational client with:
//! - Session authentication via the `X-SFDC-Session` header
//! - Compression support (gzip, deflate)
//! - Rate limit detection
//! - Bulk API `<error>` body parsing and message sanitizing
//! - XML (de)serialization helpers for Bulk API payloads
//! - Request/response tracing
//!
//! Every call is one HTTP round trip. Failures, rate limits included,
//! propagate to the caller without retries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │  (sf-bulk: jobs, batches, results)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds instance URL + session id                          │
//! │  - Builds /services/async/{version}/ URLs                   │
//! │  - Typed XML methods (get_xml, post_xml)                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP with compression, rate limit detection          │
//! │  - Response handling and error mapping                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use salesforce_bulk_client::SalesforceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), salesforce_bulk_client::Error> {
//!     let client = SalesforceClient::new("https://na1.salesforce.com", "session-id")?;
//!
//!     let url = client.async_url("job/750xx0000000001");
//!     let body = client.execute(client.get(&url)).await?.text().await?;
//!     println!("{body}");
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod xml;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::{BodyFormat, Response, ResponseExt};
pub use salesforce_client::SalesforceClient;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Header carrying the session id on every Bulk API request.
pub const SESSION_HEADER: &str = "X-SFDC-Session";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("salesforce-bulk/", env!("CARGO_PKG_VERSION"));
