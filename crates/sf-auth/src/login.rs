//! Username/password login through the SOAP partner API.
//!
//! The Bulk API authenticates with a session id; the classic way to obtain
//! one is the partner `login` call, which takes the username and the
//! password with the user's security token appended.

use tracing::{debug, instrument};

use salesforce_bulk_client::{xml, ClientConfig, DEFAULT_API_VERSION};

use crate::credentials::{env_var, SalesforceCredentials};
use crate::error::{Error, ErrorKind, Result};
use crate::PRODUCTION_LOGIN_URL;

/// Username/password login settings.
///
/// The password and security token are redacted in Debug output.
#[derive(Clone)]
pub struct PasswordLogin {
    username: String,
    password: String,
    security_token: String,
    login_url: String,
    api_version: String,
    config: ClientConfig,
}

impl std::fmt::Debug for PasswordLogin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordLogin")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .field("login_url", &self.login_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl PasswordLogin {
    /// Create a login for the production login host.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: String::new(),
            login_url: PRODUCTION_LOGIN_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            config: ClientConfig::default(),
        }
    }

    /// Set the security token appended to the password.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = token.into();
        self
    }

    /// Set the login URL (e.g., [`crate::SANDBOX_LOGIN_URL`]).
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API version used for the login call and the resulting session.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the HTTP configuration (timeouts, user agent).
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Get the login URL.
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Load login settings from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_USERNAME` or `SALESFORCE_USERNAME`
    /// - `SF_PASSWORD` or `SALESFORCE_PASSWORD`
    ///
    /// Optional:
    /// - `SF_SECURITY_TOKEN` or `SALESFORCE_SECURITY_TOKEN`
    /// - `SF_LOGIN_URL` or `SALESFORCE_LOGIN_URL` (default: production)
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "62.0")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load login settings through `lookup`, using the same names as [`Self::from_env`].
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = env_var(&lookup, "SF_USERNAME", "SALESFORCE_USERNAME")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;
        let password = env_var(&lookup, "SF_PASSWORD", "SALESFORCE_PASSWORD")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;

        let mut login = Self::new(username, password);
        if let Some(token) = env_var(&lookup, "SF_SECURITY_TOKEN", "SALESFORCE_SECURITY_TOKEN") {
            login = login.with_security_token(token);
        }
        if let Some(url) = env_var(&lookup, "SF_LOGIN_URL", "SALESFORCE_LOGIN_URL") {
            login = login.with_login_url(url);
        }
        if let Some(version) = env_var(&lookup, "SF_API_VERSION", "SALESFORCE_API_VERSION") {
            login = login.with_api_version(version);
        }
        Ok(login)
    }

    /// SOAP endpoint of the partner API login call.
    fn soap_url(&self) -> String {
        format!("{}/services/Soap/u/{}", self.login_url, self.api_version)
    }

    /// Build the SOAP envelope for the login call.
    fn envelope(&self) -> String {
        let password = format!("{}{}", self.password, self.security_token);
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="utf-8"?>"#,
                r#"<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
                r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
                r#"xmlns:env="http://schemas.xmlsoap.org/soap/envelope/">"#,
                r#"<env:Body><n1:login xmlns:n1="urn:partner.soap.sforce.com">"#,
                "<n1:username>{}</n1:username>",
                "<n1:password>{}</n1:password>",
                "</n1:login></env:Body></env:Envelope>"
            ),
            xml::escape(&self.username),
            xml::escape(&password),
        )
    }

    /// Log in and obtain a session.
    #[instrument(skip(self), fields(username = %self.username, login_url = %self.login_url))]
    pub async fn login(&self) -> Result<LoginResult> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "username and password must not be empty".to_string(),
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .connect_timeout(self.config.connect_timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        let response = http
            .post(self.soap_url())
            .header("Content-Type", "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(self.envelope())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // Faults come back as HTTP 500 with a SOAP body
        if let Some(fault) = parse_fault(&body)? {
            return Err(Error::new(fault));
        }

        if !status.is_success() {
            return Err(Error::new(ErrorKind::Http(format!(
                "Login failed: status {}",
                status.as_u16()
            ))));
        }

        let result = LoginResult::parse(&body, &self.api_version)?;
        debug!(instance_url = %result.instance_url, "Logged in");
        Ok(result)
    }
}

/// Session obtained from a successful login.
#[derive(Clone)]
pub struct LoginResult {
    /// Session id for the `X-SFDC-Session` header.
    pub session_id: String,
    /// Partner API server URL returned by the login call.
    pub server_url: String,
    /// Instance URL (`scheme://host`) derived from the server URL.
    pub instance_url: String,
    /// Id of the logged-in user.
    pub user_id: Option<String>,
    /// Id of the user's organization.
    pub organization_id: Option<String>,
    /// Whether the user's password has expired.
    pub password_expired: bool,
    /// Whether the org is a sandbox.
    pub sandbox: bool,
    api_version: String,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_id", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .field("instance_url", &self.instance_url)
            .field("user_id", &self.user_id)
            .field("organization_id", &self.organization_id)
            .field("password_expired", &self.password_expired)
            .field("sandbox", &self.sandbox)
            .finish()
    }
}

impl LoginResult {
    fn parse(body: &str, api_version: &str) -> Result<Self> {
        let session_id = extract_element(body, "sessionId")?.ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse("missing sessionId".to_string()))
        })?;
        let server_url = extract_element(body, "serverUrl")?.ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse("missing serverUrl".to_string()))
        })?;

        let instance_url = url::Url::parse(&server_url)?.origin().ascii_serialization();

        Ok(Self {
            session_id,
            server_url,
            instance_url,
            user_id: extract_element(body, "userId")?,
            organization_id: extract_element(body, "organizationId")?,
            password_expired: extract_element(body, "passwordExpired")?.as_deref() == Some("true"),
            sandbox: extract_element(body, "sandbox")?.as_deref() == Some("true"),
            api_version: api_version.to_string(),
        })
    }

    /// Convert into session credentials for the Bulk API.
    pub fn into_credentials(self) -> SalesforceCredentials {
        SalesforceCredentials::new(self.instance_url, self.session_id, self.api_version)
    }
}

/// Parse a SOAP fault out of a response body, if there is one.
fn parse_fault(body: &str) -> Result<Option<ErrorKind>> {
    let Some(code) = extract_element(body, "faultcode")? else {
        return Ok(None);
    };
    let message = extract_element(body, "faultstring")?
        .unwrap_or_else(|| "Unknown error".to_string());
    Ok(Some(ErrorKind::LoginFault { code, message }))
}

/// Extract the text of the first element with the given local name.
///
/// Matches both `<tag>` and prefixed `<ns:tag>` forms, the way partner API
/// responses mix them.
fn extract_element(xml_body: &str, tag: &str) -> Result<Option<String>> {
    let mut search_from = xml_body;
    while let Some(idx) = search_from.find('<') {
        let rest = &search_from[idx + 1..];
        let name_end = rest
            .find(|c: char| c == '>' || c == ' ' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        let local = name.rsplit(':').next().unwrap_or(name);

        if local == tag && !name.starts_with('/') {
            let Some(open_end) = rest.find('>') else {
                break;
            };
            if rest[..open_end].ends_with('/') {
                return Ok(Some(String::new()));
            }
            let content = &rest[open_end + 1..];
            let close = format!("</{}>", name);
            let Some(close_idx) = content.find(&close) else {
                break;
            };
            let text = quick_xml::escape::unescape(&content[..close_idx]).map_err(|e| {
                Error::with_source(ErrorKind::InvalidResponse(format!("bad <{}> text", tag)), e)
            })?;
            return Ok(Some(text.into_owned()));
        }
        search_from = rest;
    }
    Ok(None)
}
