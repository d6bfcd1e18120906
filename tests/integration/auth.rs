//! Password login against a real org.

use super::common::has_login;
use salesforce_bulk::{Credentials, PasswordLogin};

#[tokio::test]
async fn test_password_login() {
    if !has_login() {
        return;
    }

    let login = PasswordLogin::from_env().expect("Invalid login configuration");
    let result = login.login().await.expect("Login should succeed");

    assert!(result.instance_url.starts_with("https://"));
    assert!(!result.instance_url.ends_with('/'));
    assert!(result.server_url.starts_with(&result.instance_url));
    assert!(result.organization_id.is_some());

    let creds = result.into_credentials();
    assert!(creds.is_valid());
}

#[tokio::test]
async fn test_bad_password_is_a_login_fault() {
    if !has_login() {
        return;
    }

    let login = PasswordLogin::from_env().expect("Invalid login configuration");
    let bad = PasswordLogin::new(login.username(), "definitely-not-the-password")
        .with_login_url(login.login_url());

    let err = bad.login().await.expect_err("Login should fail");
    assert!(
        matches!(err.kind, salesforce_bulk::auth::ErrorKind::LoginFault { .. }),
        "unexpected error: {err}"
    );
}
