//! Request execution: build, sign, send, decide, retry, decode.
//!
//! Every facade call goes through [`Pipeline::execute`]. One call may make
//! several attempts; each attempt gets a fresh OAuth nonce and timestamp,
//! always releases its response body, and is reported to the post-request
//! hook, whose answer together with the [`RetryConfig`] budget decides
//! whether another attempt follows.
//!
//! [`RetryConfig`]: crate::resilience::RetryConfig

use crate::auth::OAuthSigner;
use crate::config::LiteConfig;
use crate::errors::{ConfigurationError, LiteError, LiteResult, RequestError};
use crate::hooks::{AttemptRecord, BodyCloseFailure, PreRequestInfo, RequestContext};
use crate::observability::logging::{redact_params, redact_url};
use crate::request::RequestDescriptor;
use crate::response::decode;
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use bytes::Bytes;
use chrono::Utc;
use http::header::{HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Shared request executor
pub struct Pipeline {
    config: LiteConfig,
    signer: Option<OAuthSigner>,
    transport: Arc<dyn HttpTransport>,
}

struct AttemptOutcome<T> {
    status: Option<u16>,
    payload: Bytes,
    result: LiteResult<T>,
}

impl<T> AttemptOutcome<T> {
    fn failed(status: Option<u16>, error: LiteError) -> Self {
        Self {
            status,
            payload: Bytes::new(),
            result: Err(error),
        }
    }
}

impl Pipeline {
    /// Create a pipeline over the given transport
    pub fn new(config: LiteConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let signer = config
            .credential()
            .filter(|c| c.is_complete())
            .map(OAuthSigner::new);
        Self {
            config,
            signer,
            transport,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LiteConfig {
        &self.config
    }

    /// Run one logical call and decode its 2xx body into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> LiteResult<T> {
        self.run(descriptor, |payload| Ok(decode(payload)?)).await
    }

    /// Run one logical call and return its 2xx body untouched.
    ///
    /// For endpoints whose body is not JSON, such as message sources and
    /// attachment downloads.
    pub async fn execute_raw(&self, descriptor: RequestDescriptor) -> LiteResult<Bytes> {
        self.run(descriptor, |payload| Ok(payload.clone())).await
    }

    async fn run<T, F>(&self, descriptor: RequestDescriptor, accept: F) -> LiteResult<T>
    where
        F: Fn(&Bytes) -> LiteResult<T>,
    {
        let signer = self
            .signer
            .as_ref()
            .ok_or(LiteError::Configuration(ConfigurationError::MissingCredential))?;
        let url = descriptor.url(&self.config.base_url)?;
        let body = descriptor.form_body();
        let context = RequestContext {
            user_id: descriptor.user_id.as_deref(),
            account_label: descriptor.account_label.as_deref(),
            method: descriptor.method,
            url: &url,
        };

        let redacted_form = redact_params(&descriptor.form);
        self.config.hooks.pre_request(&PreRequestInfo {
            context,
            form: &redacted_form,
        });

        let first_started_at = Utc::now();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let started_at = Utc::now();
            let outcome = self
                .attempt(signer, &descriptor, &url, body.as_deref(), context, &accept)
                .await;

            let wants_retry = self.config.hooks.post_request(&AttemptRecord {
                attempt,
                context,
                status: outcome.status,
                payload: &outcome.payload,
                started_at,
                first_started_at,
                error: outcome.result.as_ref().err(),
            });

            if !wants_retry {
                return outcome.result;
            }
            if !self.config.retry.allows_another(attempt) {
                debug!(
                    attempt,
                    max_attempts = self.config.retry.max_attempts,
                    url = %redact_url(&url),
                    "Retry budget exhausted"
                );
                return outcome.result;
            }

            let delay = self.config.retry.delay_for_attempt(attempt);
            debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                url = %redact_url(&url),
                "Retrying request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt<T, F>(
        &self,
        signer: &OAuthSigner,
        descriptor: &RequestDescriptor,
        url: &Url,
        body: Option<&str>,
        context: RequestContext<'_>,
        accept: &F,
    ) -> AttemptOutcome<T>
    where
        F: Fn(&Bytes) -> LiteResult<T>,
    {
        let request = match self.build_request(signer, descriptor, url, body) {
            Ok(request) => request,
            Err(e) => return AttemptOutcome::failed(None, e.into()),
        };

        let mut response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::failed(None, e.into()),
        };
        let status = response.status;

        let read = response.body.read_all().await;
        if let Err(error) = response.body.close().await {
            warn!(url = %redact_url(url), error = %error, "Failed to release response body");
            self.config
                .hooks
                .body_close_error(&BodyCloseFailure { context, error: &error });
        }

        let payload = match read {
            Ok(payload) => payload,
            Err(e) => return AttemptOutcome::failed(Some(status), e.into()),
        };

        let result = if (200..300).contains(&status) {
            accept(&payload)
        } else {
            Err(LiteError::Status {
                status,
                body: String::from_utf8_lossy(&payload).into_owned(),
            })
        };

        AttemptOutcome {
            status: Some(status),
            payload,
            result,
        }
    }

    fn build_request(
        &self,
        signer: &OAuthSigner,
        descriptor: &RequestDescriptor,
        url: &Url,
        body: Option<&str>,
    ) -> Result<HttpRequest, RequestError> {
        let authorization = signer.authorization_header(descriptor.method, url, &descriptor.form);

        let mut request =
            HttpRequest::new(descriptor.method, url.clone()).with_timeout(self.config.timeout);
        request
            .headers
            .insert(AUTHORIZATION, header_value(&authorization)?);
        request
            .headers
            .insert(ACCEPT, HeaderValue::from_static("application/json"));
        request
            .headers
            .insert(USER_AGENT, header_value(&self.config.user_agent)?);

        if let Some(body) = body {
            request = request.with_body(body);
        } else if descriptor.method == HttpMethod::Post || descriptor.method == HttpMethod::Put {
            request = request.with_body(String::new());
        }
        Ok(request)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, RequestError> {
    HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader {
        message: e.to_string(),
    })
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}
