//! HTTP transport layer for the Context.IO Lite client.
//!
//! The pipeline talks to an [`HttpTransport`] trait object so tests can
//! swap in [`MockHttpTransport`](crate::mocks::MockHttpTransport). A
//! response hands back its body as a [`ResponseBody`], which the caller
//! reads and then releases explicitly.

use crate::errors::NetworkError;
use crate::observability::redact_url;
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, Response};
use std::fmt;
use std::time::Duration;
use tracing::{instrument, trace};
use url::Url;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// A fully built request, ready to go on the wire
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL including query string
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Form-encoded body
    pub body: Option<String>,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request without headers or body
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Response body that must be released once consumed
#[async_trait]
pub trait ResponseBody: Send {
    /// Read the remaining body bytes
    async fn read_all(&mut self) -> Result<Bytes, NetworkError>;

    /// Release the body and its connection
    ///
    /// Real transports report failures to release the connection here; the
    /// pipeline hands them to the body-close hook without changing the
    /// request's result.
    async fn close(&mut self) -> Result<(), NetworkError>;
}

/// Status, headers and an unread body
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Body handle
    pub body: Box<dyn ResponseBody>,
}

impl HttpResponse {
    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// HTTP transport trait
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the response with its body unread
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Default HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with the given timeout
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .user_agent(concat!("contextio-lite-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Http(e.to_string()))?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Create a new transport with a pre-built client
    pub fn with_client(client: Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %redact_url(&request.url)))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers)
            .timeout(timeout);

        if let Some(body) = request.body {
            builder = builder
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(body);
        }

        let response = builder.send().await.map_err(NetworkError::from)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        trace!(status, "Received response headers");

        Ok(HttpResponse {
            status,
            headers,
            body: Box::new(ReqwestBody {
                response: Some(response),
            }),
        })
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

struct ReqwestBody {
    response: Option<Response>,
}

#[async_trait]
impl ResponseBody for ReqwestBody {
    async fn read_all(&mut self) -> Result<Bytes, NetworkError> {
        match self.response.take() {
            Some(response) => response.bytes().await.map_err(|e| NetworkError::Body {
                message: e.to_string(),
            }),
            None => Ok(Bytes::new()),
        }
    }

    async fn close(&mut self) -> Result<(), NetworkError> {
        // Dropping an unread response discards the connection instead of
        // returning it to the pool.
        self.response = None;
        Ok(())
    }
}
