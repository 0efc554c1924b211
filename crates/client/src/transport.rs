//! HTTP transport for the portal
//!
//! A [`PortalTransport`] owns a `reqwest` client and its cookie jar. In its
//! unauthenticated form it only serves the login handshake. Once a bearer
//! token is attached, every request carries the token verbatim in the
//! `Authorization` header and a freshly scraped anti-forgery token, fetched
//! over the same cookie jar right before the request goes out.

use std::sync::Arc;

use harica_models::LoginRequest;
use reqwest::cookie::Jar;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PortalConfig;
use crate::endpoints;
use crate::error::PortalError;
use crate::session::anti_forgery::{self, TOKEN_HEADER};

const USER_AGENT: &str = concat!("harica-client/", env!("CARGO_PKG_VERSION"));

/// Request-sending capability bound to one portal and one cookie jar
#[derive(Clone)]
pub struct PortalTransport {
    http: reqwest::Client,
    cookies: Arc<Jar>,
    config: PortalConfig,
    bearer: Option<Arc<str>>,
}

impl PortalTransport {
    /// Create an unauthenticated transport with an empty cookie jar
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        let cookies = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            cookies,
            config: config.clone(),
            bearer: None,
        })
    }

    /// Derive a transport that authenticates with `bearer`
    ///
    /// The new transport shares this one's client and cookie jar.
    pub fn authenticated(&self, bearer: &str) -> Self {
        Self {
            http: self.http.clone(),
            cookies: Arc::clone(&self.cookies),
            config: self.config.clone(),
            bearer: Some(Arc::from(bearer)),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer.is_some()
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// GET the landing page without bearer credentials
    pub(crate) async fn landing_page(&self) -> Result<String, PortalError> {
        let url = self.config.endpoint(endpoints::LANDING_PAGE)?;
        let response = self.http.get(url).send().await?;
        self.read(endpoints::LANDING_PAGE, response).await
    }

    /// Submit a login body with an explicit anti-forgery token
    ///
    /// Returns the raw response body. Any non-success status is reported as
    /// [`PortalError::InvalidCredentials`]; the portal does not distinguish
    /// a wrong password from other login failures.
    pub async fn login(
        &self,
        path: &str,
        verification_token: &str,
        body: &LoginRequest<'_>,
    ) -> Result<String, PortalError> {
        let url = self.config.endpoint(path)?;
        debug!(path = %path, email = %body.email, "Submitting portal login");

        let response = self
            .http
            .post(url)
            .header(TOKEN_HEADER, verification_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = %path, status = %status, "Portal rejected login");
            return Err(PortalError::InvalidCredentials { status });
        }

        // The body is the bearer token; never traced.
        Ok(response.text().await?)
    }

    /// POST a JSON body and decode a JSON answer
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, PortalError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.request(path).await?.json(body);
        let text = self.execute(path, request).await?;
        decode(path, &text)
    }

    /// POST a multipart form and decode a JSON answer
    pub async fn post_form<R: DeserializeOwned>(&self, path: &str, form: Form) -> Result<R, PortalError> {
        let request = self.request(path).await?.multipart(form);
        let text = self.execute(path, request).await?;
        decode(path, &text)
    }

    /// POST a multipart form, only checking the status
    pub async fn submit_form(&self, path: &str, form: Form) -> Result<(), PortalError> {
        let request = self.request(path).await?.multipart(form);
        self.execute(path, request).await?;
        Ok(())
    }

    /// POST without a body and decode a JSON answer
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, PortalError> {
        let request = self.request(path).await?;
        let text = self.execute(path, request).await?;
        decode(path, &text)
    }

    /// Build a POST, attaching bearer and anti-forgery headers when
    /// authenticated
    async fn request(&self, path: &str) -> Result<RequestBuilder, PortalError> {
        let url = self.config.endpoint(path)?;
        let mut request = self.http.post(url);

        if let Some(bearer) = &self.bearer {
            let verification_token = anti_forgery::fetch(self).await?;
            request = request
                .header(AUTHORIZATION, bearer.as_ref())
                .header(TOKEN_HEADER, verification_token);
        }

        Ok(request)
    }

    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<String, PortalError> {
        if self.config.debug {
            debug!(path = %path, "Sending portal request");
        }
        let response = request.send().await?;
        self.read(path, response).await
    }

    async fn read(&self, path: &str, response: Response) -> Result<String, PortalError> {
        let status = response.status();
        let body = response.text().await?;

        if self.config.debug {
            debug!(path = %path, status = %status, body = %body, "Portal response");
        }

        if !status.is_success() {
            return Err(PortalError::Status {
                path: path.to_string(),
                status,
            });
        }

        Ok(body)
    }
}

impl std::fmt::Debug for PortalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalTransport")
            .field("base_url", &self.config.base_url.as_str())
            .field("authenticated", &self.bearer.is_some())
            .finish()
    }
}

fn decode<R: DeserializeOwned>(path: &str, body: &str) -> Result<R, PortalError> {
    serde_json::from_str(body).map_err(|source| PortalError::Decode {
        path: path.to_string(),
        source,
    })
}
