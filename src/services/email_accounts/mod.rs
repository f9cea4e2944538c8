//! Email accounts service.
//!
//! Provides methods for linking, inspecting and unlinking the mailboxes of
//! a user.

use crate::errors::{LiteResult, RequestError};
use crate::observability::Redacted;
use crate::pipeline::Pipeline;
use crate::request::{is_false, RequestDescriptor, Segment};
use crate::response::{ensure_success, Acknowledgement};
use crate::services::paths::{account_path, child, user_path};
use crate::types::{EmailAccount, SuccessResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Request to list a user's accounts
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListEmailAccountsRequest {
    /// Only accounts in this status
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    /// `1` for healthy accounts, `0` for the others
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_ok: String,
}

impl ListEmailAccountsRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Filter by health
    pub fn status_ok(mut self, ok: bool) -> Self {
        self.status_ok = if ok { "1" } else { "0" }.to_string();
        self
    }
}

/// Request to link an account to an existing user
#[derive(Clone, Serialize)]
pub struct CreateEmailAccountRequest {
    /// Account address
    pub email: String,
    /// Mail server host
    pub server: String,
    /// Login name
    pub username: String,
    /// Server type, e.g. `IMAP`
    #[serde(rename = "type")]
    pub account_type: String,
    /// Whether to use TLS
    pub use_ssl: bool,
    /// Server port
    pub port: u16,
    /// OAuth refresh token
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_refresh_token: String,
    /// OAuth client key
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_consumer_key: String,
    /// Account password
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Per-account status callback
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_callback_url: String,
}

impl CreateEmailAccountRequest {
    /// Create a new IMAP account request
    pub fn new(
        email: impl Into<String>,
        server: impl Into<String>,
        username: impl Into<String>,
        use_ssl: bool,
        port: u16,
    ) -> Self {
        Self {
            email: email.into(),
            server: server.into(),
            username: username.into(),
            account_type: "IMAP".to_string(),
            use_ssl,
            port,
            provider_refresh_token: String::new(),
            provider_consumer_key: String::new(),
            password: String::new(),
            status_callback_url: String::new(),
        }
    }

    /// Authenticate with a password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Authenticate with OAuth
    pub fn oauth(
        mut self,
        refresh_token: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        self.provider_refresh_token = refresh_token.into();
        self.provider_consumer_key = consumer_key.into();
        self
    }

    /// Set the status callback
    pub fn status_callback_url(mut self, url: impl Into<String>) -> Self {
        self.status_callback_url = url.into();
        self
    }
}

impl fmt::Debug for CreateEmailAccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateEmailAccountRequest")
            .field("email", &self.email)
            .field("server", &self.server)
            .field("username", &self.username)
            .field("account_type", &self.account_type)
            .field("use_ssl", &self.use_ssl)
            .field("port", &self.port)
            .field("provider_refresh_token", &Redacted::new(()))
            .field("provider_consumer_key", &self.provider_consumer_key)
            .field("password", &Redacted::new(()))
            .field("status_callback_url", &self.status_callback_url)
            .finish()
    }
}

/// Response from linking an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateEmailAccountResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// New account label
    #[serde(default)]
    pub label: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// IMAP connection log, on failure
    #[serde(default)]
    pub connection_log: String,
    /// Failure reason code
    #[serde(default)]
    pub feedback_code: String,
}

impl Acknowledgement for CreateEmailAccountResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn failure_message(&self) -> Option<&str> {
        Some(self.feedback_code.as_str()).filter(|s| !s.is_empty())
    }
}

/// Request to update an account's credentials or callback
#[derive(Clone, Default, Serialize)]
pub struct ModifyEmailAccountRequest {
    /// New status callback
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_callback_url: String,
    /// Ask the service to re-check the connection now
    #[serde(skip_serializing_if = "is_false")]
    pub force_status_check: bool,
    /// New password
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// New OAuth refresh token
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_refresh_token: String,
    /// New OAuth client key
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider_consumer_key: String,
}

impl ModifyEmailAccountRequest {
    /// Create an empty modification
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status callback
    pub fn status_callback_url(mut self, url: impl Into<String>) -> Self {
        self.status_callback_url = url.into();
        self
    }

    /// Force a status check
    pub fn force_status_check(mut self) -> Self {
        self.force_status_check = true;
        self
    }

    /// Replace the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Replace the OAuth credentials
    pub fn oauth(
        mut self,
        refresh_token: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        self.provider_refresh_token = refresh_token.into();
        self.provider_consumer_key = consumer_key.into();
        self
    }
}

impl fmt::Debug for ModifyEmailAccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifyEmailAccountRequest")
            .field("status_callback_url", &self.status_callback_url)
            .field("force_status_check", &self.force_status_check)
            .field("password", &Redacted::new(()))
            .field("provider_refresh_token", &Redacted::new(()))
            .field("provider_consumer_key", &self.provider_consumer_key)
            .finish()
    }
}

/// Trait for email accounts service operations
#[async_trait]
pub trait EmailAccountsServiceTrait: Send + Sync {
    /// List a user's accounts
    async fn list(
        &self,
        user_id: &str,
        request: ListEmailAccountsRequest,
    ) -> LiteResult<Vec<EmailAccount>>;

    /// Get one account
    async fn get(&self, user_id: &str, label: &str) -> LiteResult<EmailAccount>;

    /// Link a new account
    async fn create(
        &self,
        user_id: &str,
        request: CreateEmailAccountRequest,
    ) -> LiteResult<CreateEmailAccountResponse>;

    /// Update an account
    async fn modify(
        &self,
        user_id: &str,
        label: &str,
        request: ModifyEmailAccountRequest,
    ) -> LiteResult<SuccessResponse>;

    /// Unlink an account
    async fn delete(&self, user_id: &str, label: &str) -> LiteResult<SuccessResponse>;
}

/// Email accounts service implementation
#[derive(Clone)]
pub struct EmailAccountsService {
    pipeline: Arc<Pipeline>,
}

impl EmailAccountsService {
    /// Create a new email accounts service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    fn accounts_path(user_id: &str) -> Result<String, RequestError> {
        child(user_path(user_id)?, &[Segment::Literal("email_accounts")])
    }
}

#[async_trait]
impl EmailAccountsServiceTrait for EmailAccountsService {
    #[instrument(skip(self))]
    async fn list(
        &self,
        user_id: &str,
        request: ListEmailAccountsRequest,
    ) -> LiteResult<Vec<EmailAccount>> {
        let descriptor = RequestDescriptor::get(Self::accounts_path(user_id)?)
            .query(&request)?
            .user(user_id);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn get(&self, user_id: &str, label: &str) -> LiteResult<EmailAccount> {
        let descriptor = RequestDescriptor::get(account_path(user_id, label)?)
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self, request))]
    async fn create(
        &self,
        user_id: &str,
        request: CreateEmailAccountRequest,
    ) -> LiteResult<CreateEmailAccountResponse> {
        let descriptor = RequestDescriptor::post(Self::accounts_path(user_id)?)
            .form(&request)?
            .user(user_id);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("email_accounts.create", response)
    }

    #[instrument(skip(self, request))]
    async fn modify(
        &self,
        user_id: &str,
        label: &str,
        request: ModifyEmailAccountRequest,
    ) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::post(account_path(user_id, label)?)
            .form(&request)?
            .user(user_id)
            .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("email_accounts.modify", response)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str, label: &str) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::delete(account_path(user_id, label)?)
            .user(user_id)
            .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("email_accounts.delete", response)
    }
}
