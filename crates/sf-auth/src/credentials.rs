//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// Trait for Bulk API session credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the session id sent as `X-SFDC-Session`.
    fn session_id(&self) -> &str;

    /// Get the API version (e.g., "62.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.session_id().is_empty()
    }
}

/// Standard session credentials.
///
/// The session id is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    session_id: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("session_id", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        session_id: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            session_id: session_id.into(),
            api_version: api_version.into(),
        }
    }

    /// Replace the session id (e.g., after logging in again).
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_INSTANCE_URL` or `SALESFORCE_INSTANCE_URL`
    /// - `SF_SESSION_ID` or `SALESFORCE_SESSION_ID`
    ///
    /// Optional:
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "62.0")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through `lookup`, using the same names as [`Self::from_env`].
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let instance_url = env_var(&lookup, "SF_INSTANCE_URL", "SALESFORCE_INSTANCE_URL")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_INSTANCE_URL".to_string())))?;

        let session_id = env_var(&lookup, "SF_SESSION_ID", "SALESFORCE_SESSION_ID")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_SESSION_ID".to_string())))?;

        let api_version = env_var(&lookup, "SF_API_VERSION", "SALESFORCE_API_VERSION")
            .unwrap_or_else(|| salesforce_bulk_client::DEFAULT_API_VERSION.to_string());

        let creds = Self::new(instance_url, session_id, api_version);
        if !creds.is_valid() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "instance URL and session id must not be empty".to_string(),
            )));
        }

        Ok(creds)
    }
}

/// Read the first non-empty value out of a primary and fallback name.
pub(crate) fn env_var(
    lookup: impl Fn(&str) -> Option<String>,
    primary: &str,
    fallback: &str,
) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty())
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_new() {
        let creds = SalesforceCredentials::new("https://na1.salesforce.com/", "123456789", "62.0");

        assert_eq!(creds.instance_url(), "https://na1.salesforce.com");
        assert_eq!(creds.session_id(), "123456789");
        assert_eq!(creds.api_version(), "62.0");
        assert!(creds.is_valid());
    }

    #[test]
    fn test_credentials_invalid_when_empty() {
        let creds = SalesforceCredentials::new("https://na1.salesforce.com", "", "62.0");
        assert!(!creds.is_valid());
    }

    #[test]
    fn test_set_session_id() {
        let mut creds = SalesforceCredentials::new("https://na1.salesforce.com", "old", "62.0");
        creds.set_session_id("new");
        assert_eq!(creds.session_id(), "new");
    }

    #[test]
    fn test_debug_redacts_session() {
        let creds = SalesforceCredentials::new(
            "https://na1.salesforce.com",
            "00Dxx0000001gEF!secret_session",
            "62.0",
        );

        let debug_output = format!("{:?}", creds);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret_session"));
        assert!(debug_output.contains("na1.salesforce.com"));
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_from_lookup_primary_names() {
        let creds = SalesforceCredentials::from_lookup(lookup(&[
            ("SF_INSTANCE_URL", "https://na1.salesforce.com/"),
            ("SF_SESSION_ID", "00Dsession"),
            ("SF_API_VERSION", "58.0"),
        ]))
        .unwrap();

        assert_eq!(creds.instance_url(), "https://na1.salesforce.com");
        assert_eq!(creds.session_id(), "00Dsession");
        assert_eq!(creds.api_version(), "58.0");
    }

    #[test]
    fn test_from_lookup_fallback_names_and_default_version() {
        let creds = SalesforceCredentials::from_lookup(lookup(&[
            ("SALESFORCE_INSTANCE_URL", "https://cs1.salesforce.com"),
            ("SALESFORCE_SESSION_ID", "00Dfallback"),
        ]))
        .unwrap();

        assert_eq!(creds.instance_url(), "https://cs1.salesforce.com");
        assert_eq!(creds.session_id(), "00Dfallback");
        assert_eq!(creds.api_version(), "62.0");
    }

    #[test]
    fn test_from_lookup_empty_value_is_unset() {
        let creds = SalesforceCredentials::from_lookup(lookup(&[
            ("SF_INSTANCE_URL", ""),
            ("SALESFORCE_INSTANCE_URL", "https://cs1.salesforce.com"),
            ("SF_SESSION_ID", "00Dsession"),
            ("SF_API_VERSION", ""),
        ]))
        .unwrap();

        assert_eq!(creds.instance_url(), "https://cs1.salesforce.com");
        assert_eq!(creds.api_version(), "62.0");
    }

    #[test]
    fn test_from_lookup_missing_variable() {
        let err = SalesforceCredentials::from_lookup(lookup(&[(
            "SF_INSTANCE_URL",
            "https://na1.salesforce.com",
        )]))
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EnvVar(ref name) if name == "SF_SESSION_ID"));

        let err = SalesforceCredentials::from_lookup(lookup(&[("SF_SESSION_ID", "  ")]))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EnvVar(ref name) if name == "SF_INSTANCE_URL"));
    }
}
