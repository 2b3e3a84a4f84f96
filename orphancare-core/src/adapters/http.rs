//! OrphanCare API transport
//!
//! Thin wrapper around an async reqwest client that turns HTTP outcomes
//! into domain errors:
//!
//! - 2xx: body parsed as JSON into the requested type
//! - 401: `SessionExpired` (or `InvalidCredentials` for login)
//! - other non-2xx: `RequestFailed` with the server's `message`/`error`
//! - transport failure: `Network`
//!
//! Paths are passed as segments and percent-encoded onto the base URL, so
//! an id can never add segments or a query of its own.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::Config;
use crate::domain::result::{Error, Result};
use crate::domain::{Credentials, LoginResponse};
use crate::services::logging::{LogEvent, LoggingService};

/// Message taken from an error body: `message`, then `error`, then a
/// generic one naming the status
pub fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<JsonValue> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };
    field("message")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("Request failed (HTTP {})", status.as_u16()))
}

/// First path segment, used as the resource name in logs (never ids)
fn resource_of<'a>(path: &[&'a str]) -> &'a str {
    path.first().copied().unwrap_or_default()
}

/// Empty, `.` and `..` segments would be dropped or resolved away by the
/// URL parser instead of reaching the server
fn check_segment(segment: &str) -> Result<()> {
    if segment.trim().is_empty() || segment == "." || segment == ".." {
        return Err(Error::validation(format!("Invalid identifier: {:?}", segment)));
    }
    Ok(())
}

/// HTTP client bound to one API base URL
pub struct ApiClient {
    client: Client,
    base_url: Url,
    anon_key: Option<String>,
    timeout: Duration,
    logger: Option<Arc<LoggingService>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("Invalid API base URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid API base URL: {}", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            anon_key: None,
            timeout,
            logger: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.api_base_url, config.timeout())?.with_anon_key(config.anon_key.clone()))
    }

    /// Project key sent as the bearer token on login
    pub fn with_anon_key(mut self, anon_key: Option<String>) -> Self {
        self.anon_key = anon_key.filter(|k| !k.is_empty());
        self
    }

    pub fn with_logger(mut self, logger: Option<Arc<LoggingService>>) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &[&str]) -> Result<Url> {
        for segment in path {
            check_segment(segment)?;
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    /// `POST /login`
    ///
    /// 401 means bad credentials; anything else that is not a 2xx, and any
    /// transport failure, is reported as `LoginFailed`.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let mut request = self
            .client
            .post(self.url(&["login"]).map_err(|e| Error::LoginFailed(e.to_string()))?)
            .header(CONTENT_TYPE, "application/json")
            .json(&serde_json::json!({
                "email": credentials.email.trim(),
                "password": credentials.password,
            }));
        if let Some(key) = &self.anon_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::LoginFailed(self.describe_transport_error(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::LoginFailed(self.describe_transport_error(&e)))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(Error::LoginFailed(error_message(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::LoginFailed(format!("Invalid login response: {}", e)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &[&str], headers: HeaderMap) -> Result<T> {
        self.send(Method::GET, path, headers, None::<&()>).await
    }

    pub async fn post<B, T>(&self, path: &[&str], headers: HeaderMap, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, headers, Some(body)).await
    }

    pub async fn put<B, T>(&self, path: &[&str], headers: HeaderMap, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, headers, Some(body)).await
    }

    /// DELETE carries no body, so no Content-Type is sent
    pub async fn delete<T: DeserializeOwned>(&self, path: &[&str], mut headers: HeaderMap) -> Result<T> {
        headers.remove(CONTENT_TYPE);
        self.send(Method::DELETE, path, headers, None::<&()>).await
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &[&str],
        headers: HeaderMap,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let result = self.dispatch(method, path, headers, body).await;
        if let Err(e) = &result {
            self.log_failure(path, e);
        }
        result
    }

    async fn dispatch<B, T>(
        &self,
        method: Method,
        path: &[&str],
        headers: HeaderMap,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.request(method, self.url(path)?).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(self.describe_transport_error(&e)))?;
        self.read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(self.describe_transport_error(&e)))?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(Error::request_failed(status.as_u16(), error_message(status, &body)));
        }

        // Some mutations answer with an empty body
        let parsed = if body.trim().is_empty() {
            serde_json::from_value(JsonValue::Object(Default::default()))
        } else {
            serde_json::from_str(&body)
        };
        parsed.map_err(|e| {
            Error::request_failed(status.as_u16(), format!("Invalid response from server: {}", e))
        })
    }

    fn describe_transport_error(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("Connection timed out after {} seconds", self.timeout.as_secs())
        } else if error.is_connect() {
            "Unable to connect to the OrphanCare servers".to_string()
        } else {
            format!("Request failed: {}", error)
        }
    }

    fn log_failure(&self, path: &[&str], error: &Error) {
        let Some(logger) = &self.logger else {
            return;
        };
        let mut event = LogEvent::new("request_failed")
            .with_resource(resource_of(path))
            .with_error(error.to_string());
        if let Some(status) = error.status() {
            event = event.with_error_details(format!("status={}", status));
        }
        let _ = logger.log(event);
    }
}

/// `Content-Type` plus `Authorization: Bearer <token>`
pub fn bearer_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| Error::storage("Stored access token is not a valid header value"))?;
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
