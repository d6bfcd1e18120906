//! # salesforce-bulk-auth
//!
//! Session credentials and username/password login for the Salesforce
//! Bulk API.
//!
//! ## Security
//!
//! - Session ids and passwords are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages never echo credential values
//!
//! ## Supported Authentication Methods
//!
//! - **SOAP partner login** - username, password and security token
//! - **Existing session** - an instance URL and session id obtained elsewhere
//!
//! ## Example
//!
//! ```rust,ignore
//! use salesforce_bulk_auth::{Credentials, PasswordLogin, SalesforceCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), salesforce_bulk_auth::Error> {
//!     // From environment variables
//!     let creds = SalesforceCredentials::from_env()?;
//!
//!     // Username/password login
//!     let login = PasswordLogin::new("user@example.com", "password")
//!         .with_security_token("token");
//!     let creds = login.login().await?.into_credentials();
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod login;

pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
pub use login::{LoginResult, PasswordLogin};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
