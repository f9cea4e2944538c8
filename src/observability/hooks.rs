//! Ready-made hooks that report through `tracing`.

use super::logging::redact_url;
use crate::hooks::{AttemptRecord, BodyCloseFailure, PreRequestInfo, RequestHooks};
use tracing::{debug, warn};

/// Builds a [`RequestHooks`] set that logs every step and retries
/// transient failures (transport errors, 429 and 5xx).
#[derive(Debug, Clone, Copy)]
pub struct TracingHooks {
    retry_transient: bool,
}

impl Default for TracingHooks {
    fn default() -> Self {
        Self {
            retry_transient: true,
        }
    }
}

impl TracingHooks {
    /// Create tracing hooks that retry transient failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Only log, never ask for a retry
    pub fn log_only() -> Self {
        Self {
            retry_transient: false,
        }
    }

    /// Retry decision for one attempt
    pub fn should_retry(&self, record: &AttemptRecord<'_>) -> bool {
        self.retry_transient && record.error.map_or(false, |e| e.is_retryable())
    }

    /// Convert into a hook set
    pub fn into_hooks(self) -> RequestHooks {
        RequestHooks::new()
            .on_pre_request(log_pre_request)
            .on_post_request(move |record| {
                log_attempt(record);
                self.should_retry(record)
            })
            .on_body_close_error(log_body_close_error)
    }
}

fn log_pre_request(info: &PreRequestInfo<'_>) {
    debug!(
        user_id = info.context.user_id,
        account_label = info.context.account_label,
        method = %info.context.method,
        url = %redact_url(info.context.url),
        form = ?info.form,
        "Sending Context.IO request"
    );
}

fn log_attempt(record: &AttemptRecord<'_>) {
    let elapsed_ms = (record.started_at - record.first_started_at).num_milliseconds();
    match record.error {
        None => debug!(
            attempt = record.attempt,
            status = record.status,
            method = %record.context.method,
            url = %redact_url(record.context.url),
            elapsed_ms,
            "Context.IO request succeeded"
        ),
        Some(error) => warn!(
            attempt = record.attempt,
            status = record.status,
            method = %record.context.method,
            url = %redact_url(record.context.url),
            elapsed_ms,
            error = %error,
            "Context.IO request failed"
        ),
    }
}

fn log_body_close_error(failure: &BodyCloseFailure<'_>) {
    warn!(
        user_id = failure.context.user_id,
        account_label = failure.context.account_label,
        method = %failure.context.method,
        url = %redact_url(failure.context.url),
        error = %failure.error,
        "Failed to release response body"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LiteError, NetworkError};
    use crate::hooks::RequestContext;
    use crate::transport::HttpMethod;
    use chrono::Utc;
    use url::Url;

    fn record<'a>(url: &'a Url, error: Option<&'a LiteError>) -> AttemptRecord<'a> {
        let now = Utc::now();
        AttemptRecord {
            attempt: 1,
            context: RequestContext {
                user_id: None,
                account_label: None,
                method: HttpMethod::Get,
                url,
            },
            status: error.and_then(|e| e.status()),
            payload: b"",
            started_at: now,
            first_started_at: now,
            error,
        }
    }

    #[test]
    fn test_retries_transient_failures() {
        let url = Url::parse("https://api.context.io/lite/users").unwrap();
        let hooks = TracingHooks::new();

        let timeout = LiteError::Network(NetworkError::Timeout);
        let unavailable = LiteError::Status {
            status: 503,
            body: String::new(),
        };
        let not_found = LiteError::Status {
            status: 404,
            body: String::new(),
        };

        assert!(hooks.should_retry(&record(&url, Some(&timeout))));
        assert!(hooks.should_retry(&record(&url, Some(&unavailable))));
        assert!(!hooks.should_retry(&record(&url, Some(&not_found))));
        assert!(!hooks.should_retry(&record(&url, None)));
    }

    #[test]
    fn test_log_only_never_retries() {
        let url = Url::parse("https://api.context.io/lite/users").unwrap();
        let timeout = LiteError::Network(NetworkError::Timeout);
        assert!(!TracingHooks::log_only().should_retry(&record(&url, Some(&timeout))));
    }
}
