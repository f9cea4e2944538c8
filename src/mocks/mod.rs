//! Mock implementations for testing.
//!
//! [`MockHttpTransport`] replays queued responses in order, records every
//! request it receives, and tracks whether each response body was released.

use crate::errors::NetworkError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ResponseBody};
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock response configuration
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Response body
    pub body: Bytes,
    /// HTTP status code
    pub status: u16,
    /// Delay before response
    pub delay_ms: Option<u64>,
    /// Transport error to return instead
    pub error: Option<NetworkError>,
    /// Error to report when the body is read
    pub read_error: Option<NetworkError>,
    /// Error to report when the body is released
    pub close_error: Option<NetworkError>,
}

impl MockResponse {
    /// Create a response with the given status and raw body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self::bytes(status, Bytes::from(body.into()))
    }

    /// Create a response whose body need not be UTF-8
    pub fn bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            status,
            delay_ms: None,
            error: None,
            read_error: None,
            close_error: None,
        }
    }

    /// Create a successful JSON response
    pub fn json<T: Serialize>(data: &T) -> Self {
        Self::new(200, serde_json::to_string(data).unwrap_or_default())
    }

    /// Create a successful response with raw body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// Create a non-2xx response
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body)
    }

    /// Create a `success: false` acknowledgement
    pub fn unsuccessful() -> Self {
        Self::ok(r#"{"success":false}"#)
    }

    /// Fail at the transport instead of answering
    pub fn network_error(error: NetworkError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(0, "")
        }
    }

    /// Fail while reading the body
    pub fn with_read_error(mut self, error: NetworkError) -> Self {
        self.read_error = Some(error);
        self
    }

    /// Fail while releasing the body
    pub fn with_close_error(mut self, error: NetworkError) -> Self {
        self.close_error = Some(error);
        self
    }

    /// Add delay to response
    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }
}

/// Recorded request for verification
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method
    pub method: HttpMethod,
    /// Request URL
    pub url: String,
    /// URL path
    pub path: String,
    /// Decoded query pairs
    pub query: Vec<(String, String)>,
    /// Form body
    pub body: Option<String>,
    /// Request headers
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn from_request(request: &HttpRequest) -> Self {
        Self {
            method: request.method,
            url: request.url.to_string(),
            path: request.url.path().to_string(),
            query: request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            body: request.body.clone(),
            headers: header_pairs(&request.headers),
        }
    }

    /// Value of a request header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Decoded form pairs
    pub fn form(&self) -> Vec<(String, String)> {
        self.body
            .as_deref()
            .map(|body| {
                url::form_urlencoded::parse(body.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect()
}

/// Mock HTTP transport for testing
pub struct MockHttpTransport {
    /// Queue of responses to return
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Recorded requests
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Default response if queue is empty
    default_response: Option<MockResponse>,
    /// Bodies released so far
    closed_bodies: Arc<AtomicUsize>,
}

impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: None,
            closed_bodies: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Add a response to the queue
    pub fn add_response(self, response: MockResponse) -> Self {
        self.responses.lock().push_back(response);
        self
    }

    /// Add multiple responses
    pub fn add_responses(self, responses: impl IntoIterator<Item = MockResponse>) -> Self {
        self.responses.lock().extend(responses);
        self
    }

    /// Add a JSON response
    pub fn add_json_response<T: Serialize>(self, data: &T) -> Self {
        self.add_response(MockResponse::json(data))
    }

    /// Set default response when queue is empty
    pub fn with_default_response(mut self, response: MockResponse) -> Self {
        self.default_response = Some(response);
        self
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Get the last recorded request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of requests sent
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of requests sent with the given method
    pub fn count_method(&self, method: HttpMethod) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    /// Number of response bodies released
    pub fn closed_bodies(&self) -> usize {
        self.closed_bodies.load(Ordering::SeqCst)
    }

    /// Get remaining response count
    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().len()
    }

    fn next_response(&self) -> Option<MockResponse> {
        let mut queue = self.responses.lock();
        queue.pop_front().or_else(|| self.default_response.clone())
    }
}

impl Default for MockHttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        self.requests
            .lock()
            .push(RecordedRequest::from_request(&request));

        let response = self.next_response().ok_or_else(|| NetworkError::ConnectionFailed {
            message: "No mock response configured".to_string(),
        })?;

        if let Some(delay) = response.delay_ms {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        if let Some(error) = response.error {
            return Err(error);
        }

        Ok(HttpResponse {
            status: response.status,
            headers: HeaderMap::new(),
            body: Box::new(MockBody {
                body: Some(response.body),
                read_error: response.read_error,
                close_error: response.close_error,
                closed: self.closed_bodies.clone(),
            }),
        })
    }
}

struct MockBody {
    body: Option<Bytes>,
    read_error: Option<NetworkError>,
    close_error: Option<NetworkError>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl ResponseBody for MockBody {
    async fn read_all(&mut self) -> Result<Bytes, NetworkError> {
        if let Some(error) = self.read_error.take() {
            return Err(error);
        }
        Ok(self.body.take().unwrap_or_default())
    }

    async fn close(&mut self) -> Result<(), NetworkError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        self.body = None;
        match self.close_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
