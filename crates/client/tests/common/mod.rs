//! Stub portal shared by the integration tests.

#![allow(dead_code)]

use chrono::Utc;
use harica_client::PortalConfig;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VERIFICATION_TOKEN: &str = "CfDJ8-stub-verification-token";

pub const REQUESTER_EMAIL: &str = "requester@example.org";
pub const VALIDATOR_EMAIL: &str = "validator@example.org";
pub const PASSWORD: &str = "correct horse battery staple";

/// RFC 6238 test secret in base32
pub const TOTP_SEED: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

pub fn landing_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>HARICA CertManager</title></head>
<body>
  <form id="login" method="post">
    <input type="email" name="email">
    <input name="__RequestVerificationToken" type="hidden" value="{VERIFICATION_TOKEN}">
  </form>
</body>
</html>"#
    )
}

/// Sign a bearer token for `subject` expiring at `exp` (Unix seconds)
pub fn mint_token(subject: &str, exp: i64) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        &json!({"sub": subject, "exp": exp}),
        &EncodingKey::from_secret(b"stub-portal-key"),
    )
    .unwrap()
}

/// Unix timestamp `secs` seconds from now
pub fn in_secs(secs: i64) -> i64 {
    Utc::now().timestamp() + secs
}

pub fn config(server: &MockServer) -> PortalConfig {
    PortalConfig::new(&server.uri()).unwrap()
}

pub async fn mount_landing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(landing_page()))
        .mount(server)
        .await;
}

/// Accept a password login for `email`, answering with `token`
pub async fn mount_login(server: &MockServer, email: &str, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/User/Login"))
        .and(header("RequestVerificationToken", VERIFICATION_TOKEN))
        .and(body_partial_json(json!({"email": email})))
        .respond_with(login_response(token))
        .mount(server)
        .await;
}

/// The login endpoints answer with the token as a JSON string literal
pub fn login_response(token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/json; charset=utf-8")
        .set_body_string(format!("\"{token}\""))
}

/// Requests the stub received on `path`
pub async fn count_requests(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .count()
}

/// Bodies the stub received on `path`, in arrival order
pub async fn request_bodies(server: &MockServer, request_path: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == request_path)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}
