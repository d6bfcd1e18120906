//! High-level Salesforce client bound to one Bulk API session.
//!
//! This module provides `SalesforceClient`, which combines a session with
//! an HTTP client and provides typed XML methods for Bulk API interactions.
//!
//! ## Security
//!
//! - Session ids are redacted in Debug output
//! - Sensitive parameters are skipped in tracing spans

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::RequestBuilder;
use crate::DEFAULT_API_VERSION;

/// High-level Salesforce Bulk API client.
///
/// Every request built through this client carries the `X-SFDC-Session`
/// header. It's designed to be used by the job and batch layer (sf-bulk).
///
/// # Example
///
/// ```rust,ignore
/// use salesforce_bulk_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://na1.salesforce.com", "session-id")?;
/// let url = client.async_url("job/750xx0000000001/batch");
/// let list: BatchInfoList = client.get_xml(&url).await?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    session_id: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("session_id", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new client for the given instance URL and session id.
    pub fn new(instance_url: impl Into<String>, session_id: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, session_id, ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        session_id: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&instance_url)?;

        let http = SfHttpClient::new(config)?;
        Ok(Self {
            http,
            instance_url,
            session_id: session_id.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the session id.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Base URL of the Bulk API, ending in a slash.
    ///
    /// Example: `https://na1.salesforce.com/services/async/62.0/`
    pub fn async_base_url(&self) -> String {
        format!(
            "{}/services/async/{}/",
            self.instance_url, self.api_version
        )
    }

    /// Build the Bulk API URL for a path.
    ///
    /// Example: `async_url("job/750x/batch")` -> `.../services/async/62.0/job/750x/batch`
    pub fn async_url(&self, path: &str) -> String {
        format!("{}{}", self.async_base_url(), path.trim_start_matches('/'))
    }

    /// Build a Bulk API URL from path segments, percent-encoding each one.
    ///
    /// Example: `async_path(&["job", job_id, "batch"])`
    pub fn async_path(&self, segments: &[&str]) -> String {
        let encoded: Vec<String> = segments
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        self.async_url(&encoded.join("/"))
    }

    // =========================================================================
    // Base HTTP Methods (with session header)
    // =========================================================================

    /// Create a GET request builder with the session header.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).session(&self.session_id)
    }

    /// Create a POST request builder with the session header.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).session(&self.session_id)
    }

    /// Execute a request and return the raw response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<crate::Response> {
        self.http.execute(request).await
    }

    // =========================================================================
    // Typed XML Methods
    // =========================================================================

    /// GET request with XML response deserialization.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_xml<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.execute(self.get(url)).await?;
        response.xml().await
    }

    /// GET request returning the body as text.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.http.execute(self.get(url)).await?;
        response.text().await
    }

    /// POST request with an XML body and XML response.
    #[instrument(skip(self, body), fields(url = %url))]
    pub async fn post_xml<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T> {
        let xml = crate::xml::to_string(body)?;
        let request = self.post(url).xml(xml);
        let response = self.http.execute(request).await?;
        response.xml().await
    }

    /// POST request with a CSV body and XML response.
    #[instrument(skip(self, csv), fields(url = %url, bytes = csv.len()))]
    pub async fn post_csv<T: DeserializeOwned>(&self, url: &str, csv: String) -> Result<T> {
        let request = self.post(url).csv(csv);
        let response = self.http.execute(request).await?;
        response.xml().await
    }
}
