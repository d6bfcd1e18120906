//! HTTP request building with Bulk API headers.

use std::collections::HashMap;

/// Content type used for CSV batch uploads.
pub(crate) const CSV_CONTENT_TYPE: &str = "text/csv; charset=UTF-8";

/// Content type used for XML job payloads.
pub(crate) const XML_CONTENT_TYPE: &str = "application/xml; charset=UTF-8";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Builder for HTTP requests against the Bulk API.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) session_id: Option<String>,
}

/// Request body content.
#[derive(Debug)]
pub enum RequestBody {
    Text(String),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            session_id: None,
        }
    }

    /// Set the session id sent as `X-SFDC-Session`.
    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set CSV body (batch uploads).
    pub fn csv(mut self, data: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(data.into()));
        self.headers
            .insert("Content-Type".to_string(), CSV_CONTENT_TYPE.to_string());
        self
    }

    /// Set XML body (job payloads).
    pub fn xml(mut self, data: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(data.into()));
        self.headers
            .insert("Content-Type".to_string(), XML_CONTENT_TYPE.to_string());
        self
    }

    /// Set `Sforce-Enable-PKChunking` for large query jobs.
    pub fn pk_chunking(mut self, chunk_size: Option<u32>) -> Self {
        let value = match chunk_size {
            Some(size) => format!("chunkSize={}", size),
            None => "true".to_string(),
        };
        self.headers
            .insert("Sforce-Enable-PKChunking".to_string(), value);
        self
    }
}
