//! HTTP response handling with Bulk API extensions.

use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        let status = self.status();
        (200..300).contains(&status)
    }

    /// Get a header value.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Get the Retry-After header as a Duration.
    pub fn retry_after(&self) -> Option<Duration> {
        // Salesforce sends Retry-After in seconds
        let value = self.header("retry-after")?;
        value.parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the response body as XML.
    pub async fn xml<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        let body = self.text().await?;
        crate::xml::from_str(&body)
    }

    /// Get access to the inner reqwest::Response.
    pub fn into_inner(self) -> reqwest::Response {
        self.inner
    }
}

/// Payload format of a response body.
///
/// Result lists for CSV-created batches come back as CSV whatever the
/// request asked for, so callers sniff the body instead of trusting headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Xml,
    Csv,
}

impl BodyFormat {
    /// Detect the format of a body: a leading `<` (after a BOM or
    /// whitespace) is XML, anything else is CSV.
    pub fn detect(body: &str) -> Self {
        let trimmed = body.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('<') {
            BodyFormat::Xml
        } else {
            BodyFormat::Csv
        }
    }
}

/// Extension trait for processing Bulk API responses.
pub trait ResponseExt {
    /// Check for Bulk API errors and convert to the appropriate error type.
    fn check_bulk_error(self) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_bulk_error(self) -> Result<Response> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let retry_after = self.retry_after();
        let body = self.text().await.unwrap_or_default();
        Err(parse_error_response(status, retry_after, &body))
    }
}

/// Bulk API error body.
///
/// ```xml
/// <error xmlns="http://www.force.com/2009/06/asyncapi/dataload">
///   <exceptionCode>InvalidSessionId</exceptionCode>
///   <exceptionMessage>Invalid session id</exceptionMessage>
/// </error>
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkErrorResponse {
    exception_code: String,
    exception_message: String,
}

/// Parse an error response body and convert to the appropriate error kind.
fn parse_error_response(status: u16, retry_after: Option<Duration>, body: &str) -> Error {
    if status == 429 {
        return Error::new(ErrorKind::RateLimited { retry_after });
    }

    if BodyFormat::detect(body) == BodyFormat::Xml {
        if let Ok(err) = crate::xml::from_str::<BulkErrorResponse>(body) {
            return Error::new(ErrorKind::BulkApi {
                status,
                exception_code: err.exception_code,
                exception_message: sanitize_error_message(&err.exception_message),
            });
        }
    }

    let sanitized = sanitize_error_message(body);
    let kind = match status {
        401 => ErrorKind::Authentication(sanitized),
        403 => ErrorKind::Authorization(sanitized),
        404 => ErrorKind::NotFound(sanitized),
        _ => ErrorKind::Http {
            status,
            message: sanitized,
        },
    };

    Error::new(kind)
}

/// Sanitize an error message to prevent exposing sensitive data.
///
/// Truncates messages longer than 500 characters and redacts anything that
/// looks like a session id.
fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let mut sanitized = message.trim().to_string();

    // Session ids start with the 15/18 char org id, then "!" and a token
    let token_pattern = regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+")
        .expect("static regex");
    sanitized = token_pattern
        .replace_all(&sanitized, "[REDACTED_SESSION]")
        .to_string();

    let sid_pattern = regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}").expect("static regex");
    sanitized = sid_pattern
        .replace_all(&sanitized, "sid=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
