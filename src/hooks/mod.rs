//! Caller-supplied callbacks around each request.
//!
//! All three hooks are optional. Without a post-request hook a call is
//! attempted exactly once.

use crate::errors::{LiteError, NetworkError};
use crate::transport::HttpMethod;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Called once per call, before the first attempt
pub type PreRequestHook = Arc<dyn Fn(&PreRequestInfo<'_>) + Send + Sync>;

/// Called after every attempt; returning `true` asks for another attempt
pub type PostRequestHook = Arc<dyn Fn(&AttemptRecord<'_>) -> bool + Send + Sync>;

/// Called when releasing a response body fails
pub type BodyCloseErrorHook = Arc<dyn Fn(&BodyCloseFailure<'_>) + Send + Sync>;

/// What a call is about
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// User id, for user-scoped endpoints
    pub user_id: Option<&'a str>,
    /// Email account label, for account-scoped endpoints
    pub account_label: Option<&'a str>,
    /// HTTP method
    pub method: HttpMethod,
    /// Request URL, query string included
    pub url: &'a Url,
}

/// Argument of the pre-request hook
#[derive(Debug, Clone, Copy)]
pub struct PreRequestInfo<'a> {
    /// Request context
    pub context: RequestContext<'a>,
    /// Form values, with secrets replaced by `[REDACTED]`
    pub form: &'a [(String, String)],
}

/// One completed attempt, as seen by the post-request hook
#[derive(Debug, Clone, Copy)]
pub struct AttemptRecord<'a> {
    /// Attempt number, starting at 1
    pub attempt: u32,
    /// Request context
    pub context: RequestContext<'a>,
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Raw response payload, empty if none was read
    pub payload: &'a [u8],
    /// When this attempt started
    pub started_at: DateTime<Utc>,
    /// When the first attempt of the call started
    pub first_started_at: DateTime<Utc>,
    /// Failure of this attempt, if any
    pub error: Option<&'a LiteError>,
}

impl AttemptRecord<'_> {
    /// Whether the attempt produced a decoded result
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Argument of the body-close error hook
#[derive(Debug, Clone, Copy)]
pub struct BodyCloseFailure<'a> {
    /// Request context
    pub context: RequestContext<'a>,
    /// The close error
    pub error: &'a NetworkError,
}

/// Hook set carried by [`LiteConfig`](crate::config::LiteConfig)
#[derive(Clone, Default)]
pub struct RequestHooks {
    pub(crate) pre_request: Option<PreRequestHook>,
    pub(crate) post_request: Option<PostRequestHook>,
    pub(crate) body_close_error: Option<BodyCloseErrorHook>,
}

impl RequestHooks {
    /// Create an empty hook set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pre-request hook
    pub fn on_pre_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PreRequestInfo<'_>) + Send + Sync + 'static,
    {
        self.pre_request = Some(Arc::new(hook));
        self
    }

    /// Set the post-request retry hook
    pub fn on_post_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&AttemptRecord<'_>) -> bool + Send + Sync + 'static,
    {
        self.post_request = Some(Arc::new(hook));
        self
    }

    /// Set the body-close error hook
    pub fn on_body_close_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&BodyCloseFailure<'_>) + Send + Sync + 'static,
    {
        self.body_close_error = Some(Arc::new(hook));
        self
    }

    pub(crate) fn pre_request(&self, info: &PreRequestInfo<'_>) {
        if let Some(hook) = &self.pre_request {
            hook(info);
        }
    }

    /// Retry decision; `false` when no hook is set.
    pub(crate) fn post_request(&self, record: &AttemptRecord<'_>) -> bool {
        match &self.post_request {
            Some(hook) => hook(record),
            None => false,
        }
    }

    pub(crate) fn body_close_error(&self, failure: &BodyCloseFailure<'_>) {
        if let Some(hook) = &self.body_close_error {
            hook(failure);
        }
    }
}

impl fmt::Debug for RequestHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHooks")
            .field("pre_request", &self.pre_request.is_some())
            .field("post_request", &self.post_request.is_some())
            .field("body_close_error", &self.body_close_error.is_some())
            .finish()
    }
}
