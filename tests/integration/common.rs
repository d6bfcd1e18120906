use salesforce_bulk::{BulkClient, PasswordLogin, SalesforceCredentials};

/// Prefix of every record the suite creates, so leftovers are easy to find.
pub const TEST_PREFIX: &str = "BulkIntTest_";

/// Whether a password login is configured.
pub fn has_login() -> bool {
    std::env::var("SF_USERNAME").is_ok() && std::env::var("SF_PASSWORD").is_ok()
}

/// Build a client for the configured org, or `None` when no org is configured.
///
/// A configured but broken org panics: a misconfigured run should fail
/// rather than silently skip.
pub async fn require_client() -> Option<BulkClient> {
    if std::env::var("SF_SESSION_ID").is_ok() {
        let creds = SalesforceCredentials::from_env()
            .unwrap_or_else(|e| panic!("SF_SESSION_ID is set but credentials are invalid: {e}"));
        return Some(BulkClient::from_credentials(&creds).expect("Failed to create Bulk client"));
    }

    if has_login() {
        let login = PasswordLogin::from_env().expect("Invalid login configuration");
        let client = BulkClient::login(&login)
            .await
            .unwrap_or_else(|e| panic!("Login failed for {}: {e}", login.username()));
        return Some(client);
    }

    None
}

/// A unique name for test records.
pub fn unique_name(label: &str) -> String {
    format!(
        "{}{}_{}",
        TEST_PREFIX,
        label,
        chrono::Utc::now().timestamp_millis()
    )
}
