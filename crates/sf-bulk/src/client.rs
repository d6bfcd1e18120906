//! Bulk API client.
//!
//! Every operation is a single request against
//! `{instance}/services/async/{version}/`; nothing here polls or retries.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};

use salesforce_bulk_auth::{Credentials, PasswordLogin};
use salesforce_bulk_client::{ClientConfig, SalesforceClient};

use crate::batch::{Batch, BatchInfoList};
use crate::error::{Error, ErrorKind, Result};
use crate::record::{records_to_csv, rows_to_csv, Record};
use crate::result::{parse_csv, parse_query_result_ids, BatchResultCollection};
use crate::types::{CreateJobRequest, JobInfo, UpdateJobStateRequest};

/// Salesforce Bulk API client.
///
/// Provides the job and batch operations of the async API:
/// - Create, inspect, close, and abort jobs
/// - Upload CSV batches and read their state
/// - Fetch per-row results and query result sets
///
/// # Example
///
/// ```rust,ignore
/// use salesforce_bulk_jobs::{BulkClient, CreateJobRequest, Operation, Record};
///
/// let client = BulkClient::new("https://na1.salesforce.com", "session-id")?;
///
/// let job = client
///     .create_job(CreateJobRequest::new("Account", Operation::Insert))
///     .await?;
///
/// let batch = client
///     .add_batch(&job.id, &[Record::new().field("Name", "Acme")])
///     .await?;
///
/// client.close_job(&job.id).await?;
///
/// let batch = client.batch_info(&job.id, &batch.id).await?;
/// if batch.is_completed() {
///     let results = client.batch_result_list(&job.id, &batch.id).await?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BulkClient {
    client: SalesforceClient,
}

impl BulkClient {
    /// Create a client from an instance URL and an existing session id.
    pub fn new(instance_url: impl Into<String>, session_id: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, session_id)?;
        Ok(Self { client })
    }

    /// Create a client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        session_id: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, session_id, config)?;
        Ok(Self { client })
    }

    /// Create a client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self { client }
    }

    /// Create a client from session credentials, using their API version.
    pub fn from_credentials(credentials: &impl Credentials) -> Result<Self> {
        let client = SalesforceClient::new(credentials.instance_url(), credentials.session_id())?
            .with_api_version(credentials.api_version());
        Ok(Self { client })
    }

    /// Log in with a username and password and create a client for the session.
    #[instrument(skip(login), fields(username = %login.username()))]
    pub async fn login(login: &PasswordLogin) -> Result<Self> {
        let credentials = login.login().await?.into_credentials();
        Self::from_credentials(&credentials)
    }

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    pub fn instance_url(&self) -> &str {
        self.client.instance_url()
    }

    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }

    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Create a new job.
    #[instrument(skip(self, request), fields(object = %request.object, operation = %request.operation))]
    pub async fn create_job(&self, request: CreateJobRequest) -> Result<JobInfo> {
        let url = self.client.async_url("job");
        let body = salesforce_bulk_client::xml::to_string(&request)?;

        let mut req = self.client.post(&url).xml(body);
        if request.pk_chunking {
            req = req.pk_chunking(request.pk_chunk_size);
        }

        let job: JobInfo = self.client.execute(req).await?.xml().await?;
        debug!(job_id = %job.id, state = %job.state, "Job created");
        Ok(job)
    }

    /// Get job information.
    #[instrument(skip(self))]
    pub async fn job_info(&self, job_id: &str) -> Result<JobInfo> {
        let url = self.client.async_path(&["job", job_id]);
        let job: JobInfo = self.client.get_xml(&url).await?;
        Ok(job)
    }

    /// Close a job; no more batches can be added.
    #[instrument(skip(self))]
    pub async fn close_job(&self, job_id: &str) -> Result<JobInfo> {
        let url = self.client.async_path(&["job", job_id]);
        let job: JobInfo = self
            .client
            .post_xml(&url, &UpdateJobStateRequest::closed())
            .await?;
        Ok(job)
    }

    /// Abort a job; unprocessed batches are not run.
    #[instrument(skip(self))]
    pub async fn abort_job(&self, job_id: &str) -> Result<JobInfo> {
        let url = self.client.async_path(&["job", job_id]);
        let job: JobInfo = self
            .client
            .post_xml(&url, &UpdateJobStateRequest::aborted())
            .await?;
        Ok(job)
    }

    // =========================================================================
    // Batch Operations
    // =========================================================================

    /// Add a batch of rows to a job.
    ///
    /// The CSV header is taken from the first row's fields.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn add_batch(&self, job_id: &str, records: &[Record]) -> Result<Batch> {
        let csv = records_to_csv(records)?;
        self.add_batch_csv(job_id, csv).await
    }

    /// Add a batch of serializable rows to a job.
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn add_batch_rows<T: Serialize>(&self, job_id: &str, rows: &[T]) -> Result<Batch> {
        let csv = rows_to_csv(rows)?;
        self.add_batch_csv(job_id, csv).await
    }

    /// Add a batch from a CSV document with a header line.
    #[instrument(skip(self, csv), fields(bytes = csv.len()))]
    pub async fn add_batch_csv(&self, job_id: &str, csv: String) -> Result<Batch> {
        if csv.trim().is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "batch CSV must not be empty".to_string(),
            )));
        }

        let url = self.client.async_path(&["job", job_id, "batch"]);
        let batch: Batch = self.client.post_csv(&url, csv).await?;
        debug!(batch_id = %batch.id, state = ?batch.state, "Batch created");
        Ok(batch)
    }

    /// List the batches of a job, in server order.
    #[instrument(skip(self))]
    pub async fn batch_info_list(&self, job_id: &str) -> Result<Vec<Batch>> {
        let url = self.client.async_path(&["job", job_id, "batch"]);
        let list: BatchInfoList = self.client.get_xml(&url).await?;
        Ok(list.batches)
    }

    /// Get the current information of a batch.
    #[instrument(skip(self))]
    pub async fn batch_info(&self, job_id: &str, batch_id: &str) -> Result<Batch> {
        let url = self.client.async_path(&["job", job_id, "batch", batch_id]);
        let batch: Batch = self.client.get_xml(&url).await?;
        Ok(batch)
    }

    /// Get the per-row results of a batch.
    ///
    /// Accepts either a CSV or an XML result body.
    #[instrument(skip(self))]
    pub async fn batch_result_list(
        &self,
        job_id: &str,
        batch_id: &str,
    ) -> Result<BatchResultCollection> {
        let url = self
            .client
            .async_path(&["job", job_id, "batch", batch_id, "result"]);
        let body = self.client.get_text(&url).await?;
        let results = BatchResultCollection::parse(job_id, batch_id, &body)?;
        debug!(
            results = results.len(),
            failures = results.failures().count(),
            "Batch results received"
        );
        Ok(results)
    }

    // =========================================================================
    // Query Results
    // =========================================================================

    /// Get the result set ids of a completed query batch.
    #[instrument(skip(self))]
    pub async fn query_result_ids(&self, job_id: &str, batch_id: &str) -> Result<Vec<String>> {
        let url = self
            .client
            .async_path(&["job", job_id, "batch", batch_id, "result"]);
        let body = self.client.get_text(&url).await?;
        parse_query_result_ids(&body)
    }

    /// Get one query result set as raw CSV.
    #[instrument(skip(self))]
    pub async fn query_result(
        &self,
        job_id: &str,
        batch_id: &str,
        result_id: &str,
    ) -> Result<String> {
        let url = self
            .client
            .async_path(&["job", job_id, "batch", batch_id, "result", result_id]);
        let body = self.client.get_text(&url).await?;
        Ok(body)
    }

    /// Get one query result set deserialized into rows.
    #[instrument(skip(self))]
    pub async fn query_records<T: DeserializeOwned>(
        &self,
        job_id: &str,
        batch_id: &str,
        result_id: &str,
    ) -> Result<Vec<T>> {
        let body = self.query_result(job_id, batch_id, result_id).await?;
        parse_csv(&body)
    }
}
