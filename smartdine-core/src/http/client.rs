//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

/// A response whose body has been read to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP clients, enabling mockability in tests.
///
/// Implementations must not apply their own overall deadline; the caller
/// races the returned future against its timer and drops it on expiry.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError>;

    /// POST a JSON body.
    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, FetchError>;
}

/// Configuration for ReqwestClient.
#[derive(Clone)]
pub struct ReqwestClientBuilder {
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("SmartDine/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<ReqwestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(ReqwestClient { inner })
    }
}

/// Production HTTP client backed by reqwest.
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        ReqwestClientBuilder::new().build()
    }

    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, FetchError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        tracing::debug!(%url, "network: GET");
        let response = self.inner.get(url.clone()).send().await?;
        Self::read(response).await
    }

    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, FetchError> {
        tracing::debug!(%url, "network: POST");
        let response = self.inner.post(url.clone()).json(body).send().await?;
        Self::read(response).await
    }
}

/// Canned reply for one path of a [`MockClient`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    Reply {
        status: u16,
        body: String,
        delay: Duration,
    },
    Error {
        message: String,
        delay: Duration,
    },
}

impl MockResponse {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        MockResponse::Reply {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        MockResponse::Reply {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn error(message: &str) -> Self {
        MockResponse::Error {
            message: message.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay` before settling.
    pub fn delayed(self, delay: Duration) -> Self {
        match self {
            MockResponse::Reply { status, body, .. } => MockResponse::Reply {
                status,
                body,
                delay,
            },
            MockResponse::Error { message, .. } => MockResponse::Error { message, delay },
        }
    }
}

/// A request seen by a [`MockClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Mock HTTP client for testing.
///
/// Replies are keyed by URL path, so any base URL works.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a path such as `/recommend`.
    pub fn with_response(mut self, path: &str, response: MockResponse) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    /// Add a JSON response for a path.
    pub fn with_json(self, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.with_response(path, MockResponse::json(status, &body))
    }

    /// Every request issued so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    async fn respond(
        &self,
        method: &'static str,
        url: &Url,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, FetchError> {
        let path = url.path().to_string();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                method,
                path: path.clone(),
                body,
            });

        match self.responses.get(&path) {
            Some(MockResponse::Reply {
                status,
                body,
                delay,
            }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(HttpResponse::new(*status, body.clone()))
            }
            Some(MockResponse::Error { message, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Err(FetchError::Connection(message.clone()))
            }
            None => Err(FetchError::Connection(format!(
                "No mock response for path: {}",
                path
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse, FetchError> {
        self.respond("GET", url, None).await
    }

    async fn post_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, FetchError> {
        self.respond("POST", url, Some(body.clone())).await
    }
}
