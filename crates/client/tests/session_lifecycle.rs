//! Login handshake, renewal and shutdown against a stub portal.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use harica_client::{
    Authenticator, CertificateOperations, Credentials, PortalError, SessionManager, SessionState,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

use common::*;

/// Matches a two-factor login body carrying a six-digit code
struct TwoFactorBody;

impl Match for TwoFactorBody {
    fn matches(&self, request: &Request) -> bool {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return false;
        };
        let code_ok = body
            .get("token")
            .and_then(Value::as_str)
            .is_some_and(|t| t.len() == 6 && t.chars().all(|c| c.is_ascii_digit()));

        code_ok && body["email"] == REQUESTER_EMAIL && body["password"] == PASSWORD
    }
}

fn requester() -> Credentials {
    Credentials::new(REQUESTER_EMAIL, PASSWORD)
}

#[tokio::test]
async fn test_password_login() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let exp = in_secs(3600);
    let token = mint_token(REQUESTER_EMAIL, exp);

    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .and(header("RequestVerificationToken", VERIFICATION_TOKEN))
        .and(body_json(json!({"email": REQUESTER_EMAIL, "password": PASSWORD})))
        .respond_with(login_response(&token))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/User/Login2FA"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let session = Authenticator::new(config(&server))
        .authenticate(&requester())
        .await
        .unwrap();

    assert_eq!(session.token(), token);
    assert_eq!(session.expires_at().timestamp(), exp);
    assert!(session.expires_at() > Utc::now());
    assert!(session.transport().is_authenticated());

    server.verify().await;
}

#[tokio::test]
async fn test_two_factor_login() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let token = mint_token(REQUESTER_EMAIL, in_secs(3600));

    Mock::given(method("POST"))
        .and(path("/api/User/Login2FA"))
        .and(header("RequestVerificationToken", VERIFICATION_TOKEN))
        .and(TwoFactorBody)
        .respond_with(login_response(&token))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/User/Login"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let session = Authenticator::new(config(&server))
        .authenticate(&requester().with_totp_seed(TOTP_SEED))
        .await
        .unwrap();

    assert_eq!(session.token(), token);
    server.verify().await;
}

#[tokio::test]
async fn test_rejected_login() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("\"Invalid credentials\""))
        .mount(&server)
        .await;

    let err = Authenticator::new(config(&server))
        .authenticate(&requester())
        .await
        .unwrap_err();

    match err {
        PortalError::InvalidCredentials { status } => assert_eq!(status.as_u16(), 401),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_landing_page_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>maintenance</body></html>"))
        .mount(&server)
        .await;
    Mock::given(path("/api/User/Login"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = Authenticator::new(config(&server))
        .authenticate(&requester())
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::TokenNotFound));
    server.verify().await;
}

#[tokio::test]
async fn test_login_returns_malformed_token() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    mount_login(&server, REQUESTER_EMAIL, "not-a-jwt").await;

    let err = Authenticator::new(config(&server))
        .authenticate(&requester())
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::MalformedToken(_)));
}

#[tokio::test]
async fn test_invalid_seed_fails_before_login() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let err = Authenticator::new(config(&server))
        .authenticate(&requester().with_totp_seed("not base32 at all!"))
        .await
        .unwrap_err();

    assert!(matches!(err, PortalError::OneTimeCode(_)));
    server.verify().await;
}

#[tokio::test]
async fn test_ensure_fresh_is_idempotent() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let exp = in_secs(3600);
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(login_response(&mint_token(REQUESTER_EMAIL, exp)))
        .expect(1)
        .mount(&server)
        .await;

    let manager = SessionManager::new(config(&server), requester());
    manager.ensure_fresh().await.unwrap();
    manager.ensure_fresh().await.unwrap();

    assert_eq!(manager.state(), SessionState::Active);
    assert_eq!(manager.current().unwrap().expires_at().timestamp(), exp);
    server.verify().await;
}

#[tokio::test]
async fn test_near_expiry_token_is_renewed() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    // Inside the default 15 minute window
    let exp = in_secs(5 * 60);
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(login_response(&mint_token(REQUESTER_EMAIL, exp)))
        .expect(2)
        .mount(&server)
        .await;

    let manager = SessionManager::new(config(&server), requester());
    manager.ensure_fresh().await.unwrap();
    let first = manager.current().unwrap();

    manager.ensure_fresh().await.unwrap();
    let second = manager.current().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    // The replaced snapshot stays readable
    assert_eq!(first.expires_at().timestamp(), exp);
    server.verify().await;
}

#[tokio::test]
async fn test_concurrent_ensure_fresh_logs_in_once() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(
            login_response(&mint_token(REQUESTER_EMAIL, in_secs(3600)))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(SessionManager::new(config(&server), requester()));
    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.ensure_fresh().await })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
    server.verify().await;
}

#[tokio::test]
async fn test_background_renewal_until_shutdown() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    // Already expired, so every scheduled check logs in again
    mount_login(&server, REQUESTER_EMAIL, &mint_token(REQUESTER_EMAIL, in_secs(-60))).await;

    let config = config(&server).with_refresh_interval(Duration::from_millis(100));
    let manager = SessionManager::connect(config, requester()).await.unwrap();
    assert_eq!(count_requests(&server, "/api/User/Login").await, 1);

    tokio::time::sleep(Duration::from_millis(650)).await;
    assert!(count_requests(&server, "/api/User/Login").await >= 3);

    manager.shutdown().await.unwrap();
    assert_eq!(manager.state(), SessionState::Closed);

    let after_shutdown = count_requests(&server, "/api/User/Login").await;
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(count_requests(&server, "/api/User/Login").await, after_shutdown);

    manager.shutdown().await.unwrap();
    assert!(matches!(manager.ensure_fresh().await, Err(PortalError::SessionClosed)));
    assert!(manager.current().is_ok());
}

#[tokio::test]
async fn test_failed_renewal_keeps_session_and_task() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    let token = mint_token(REQUESTER_EMAIL, in_secs(-60));
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(login_response(&token))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config(&server).with_refresh_interval(Duration::from_millis(100));
    let manager = SessionManager::connect(config, requester()).await.unwrap();

    let err = manager.ensure_fresh().await.unwrap_err();
    assert!(matches!(err, PortalError::InvalidCredentials { .. }));
    assert_eq!(manager.state(), SessionState::Active);
    assert_eq!(manager.current().unwrap().token(), token);

    // The scheduler keeps trying after failures
    let before = count_requests(&server, "/api/User/Login").await;
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(count_requests(&server, "/api/User/Login").await > before);
    assert_eq!(manager.current().unwrap().token(), token);

    manager.shutdown().await.unwrap();
}

/// First login succeeds with `first_exp`, every later login answers 503
async fn mount_flaky_login(server: &MockServer, first_exp: i64) -> String {
    let token = mint_token(REQUESTER_EMAIL, first_exp);
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(login_response(&token))
        .up_to_n_times(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .respond_with(ResponseTemplate::new(503))
        .mount(server)
        .await;
    token
}

#[tokio::test]
async fn test_operations_continue_on_unexpired_session_after_failed_renewal() {
    let server = MockServer::start().await;
    mount_landing(&server).await;

    // Inside the renewal window but not yet expired
    let token = mount_flaky_login(&server, in_secs(10 * 60)).await;

    Mock::given(method("POST"))
        .and(path("/api/Certificate/GetRevocationReasons"))
        .and(header("Authorization", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "superseded"}])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = Arc::new(SessionManager::new(config(&server), requester()));
    manager.ensure_fresh().await.unwrap();

    let operations = CertificateOperations::new(Arc::clone(&manager));
    let reasons = operations.revocation_reasons().await.unwrap();

    assert_eq!(reasons[0]["name"], "superseded");
    assert_eq!(count_requests(&server, "/api/User/Login").await, 2);
    assert_eq!(manager.current().unwrap().token(), token);
    server.verify().await;
}

#[tokio::test]
async fn test_operations_fail_on_expired_session_after_failed_renewal() {
    let server = MockServer::start().await;
    mount_landing(&server).await;
    mount_flaky_login(&server, in_secs(-60)).await;

    Mock::given(path("/api/Certificate/GetRevocationReasons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let manager = Arc::new(SessionManager::new(config(&server), requester()));
    manager.ensure_fresh().await.unwrap();

    let operations = CertificateOperations::new(Arc::clone(&manager));
    let err = operations.revocation_reasons().await.unwrap_err();
    assert!(matches!(err, PortalError::InvalidCredentials { .. }));

    manager.shutdown().await.unwrap();
    assert!(matches!(
        operations.revocation_reasons().await,
        Err(PortalError::SessionClosed)
    ));
    server.verify().await;
}
