//! Connect tokens service.
//!
//! A connect token lets an end user link a mailbox through the Context.IO
//! hosted flow. Tokens exist at three scopes: the application, a user, and
//! a single email account of a user.

use crate::errors::{ConnectTokenError, LiteResult, RequestError};
use crate::pipeline::Pipeline;
use crate::request::{RequestDescriptor, Segment};
use crate::response::{empty_array_as_default, ensure_success, Acknowledgement};
use crate::services::paths::{account_path, child, user_path};
use crate::types::{find_email_account_matching, EmailAccount, SuccessResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

const CONNECT_TOKENS: &str = "connect_tokens";
const APP_CONNECT_TOKENS_PATH: &str = "/lite/connect_tokens";

/// Expiry of a connect token: a Unix time, or `false` once redeemed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenExpiry {
    /// Expires at this Unix time
    At(i64),
    /// No expiry applies
    Flag(bool),
}

/// User a redeemed token was attached to
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectTokenUser {
    /// User id
    #[serde(default)]
    pub id: String,
    /// Addresses known for the user
    #[serde(default)]
    pub email_addresses: Vec<String>,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Creation time (Unix)
    #[serde(default)]
    pub created: i64,
    /// Linked accounts
    #[serde(default)]
    pub email_accounts: Vec<EmailAccount>,
}

/// A connect token
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConnectToken {
    /// Token value
    #[serde(default)]
    pub token: String,
    /// Address the token was created for
    #[serde(default)]
    pub email: String,
    /// Where the end user is sent after the flow
    #[serde(default)]
    pub callback_url: String,
    /// Status callback for the linked account
    #[serde(default)]
    pub status_callback_url: String,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Label of the server the account was linked on
    #[serde(default)]
    pub server_label: String,
    /// Hosted flow URL
    #[serde(default)]
    pub browser_redirect_url: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Redemption time (Unix), zero while unused
    #[serde(default)]
    pub used: i64,
    /// Expiry
    #[serde(default)]
    pub expires: Option<TokenExpiry>,
    /// User the token was redeemed for; `[]` while unused
    #[serde(default, deserialize_with = "empty_array_as_default")]
    pub user: ConnectTokenUser,
}

impl ConnectToken {
    /// Whether the token has been redeemed
    pub fn is_used(&self) -> bool {
        self.used != 0
    }

    /// Check that the token was redeemed for `email` and the resulting
    /// account is healthy.
    pub fn check(&self, email: &str) -> Result<&EmailAccount, ConnectTokenError> {
        if !self.is_used() {
            return Err(ConnectTokenError::NotUsed {
                token: self.token.clone(),
            });
        }

        let account = find_email_account_matching(&self.user.email_accounts, email).ok_or_else(
            || ConnectTokenError::AccountMissing {
                email: email.to_string(),
            },
        )?;

        if !account.is_ok() {
            return Err(ConnectTokenError::AccountNotOk {
                email: email.to_string(),
                status: account.status.clone(),
            });
        }
        Ok(account)
    }
}

/// Request to create a connect token
#[derive(Debug, Clone, Serialize)]
pub struct CreateConnectTokenRequest {
    /// Where the end user is sent after the flow
    pub callback_url: String,
    /// Pre-filled address
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    /// First name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    /// Last name
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    /// Status callback for the linked account
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status_callback_url: String,
}

impl CreateConnectTokenRequest {
    /// Create a new request
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            status_callback_url: String::new(),
        }
    }

    /// Pre-fill the address
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the name
    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Set the status callback
    pub fn status_callback_url(mut self, url: impl Into<String>) -> Self {
        self.status_callback_url = url.into();
        self
    }
}

/// Response from creating a connect token
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateConnectTokenResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// Token value
    #[serde(default)]
    pub token: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Hosted flow URL to send the end user to
    #[serde(default)]
    pub browser_redirect_url: String,
}

impl Acknowledgement for CreateConnectTokenResponse {
    fn success(&self) -> bool {
        self.success
    }
}

/// Trait for connect tokens service operations
#[async_trait]
pub trait ConnectTokensServiceTrait: Send + Sync {
    /// List application tokens
    async fn list(&self) -> LiteResult<Vec<ConnectToken>>;

    /// Get an application token
    async fn get(&self, token: &str) -> LiteResult<ConnectToken>;

    /// Create an application token
    async fn create(
        &self,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse>;

    /// Delete an application token
    async fn delete(&self, token: &str) -> LiteResult<SuccessResponse>;

    /// List a user's tokens
    async fn list_for_user(&self, user_id: &str) -> LiteResult<Vec<ConnectToken>>;

    /// Get a user's token
    async fn get_for_user(&self, user_id: &str, token: &str) -> LiteResult<ConnectToken>;

    /// Create a token for a user
    async fn create_for_user(
        &self,
        user_id: &str,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse>;

    /// Delete a user's token
    async fn delete_for_user(&self, user_id: &str, token: &str) -> LiteResult<SuccessResponse>;

    /// List an account's tokens
    async fn list_for_account(&self, user_id: &str, label: &str) -> LiteResult<Vec<ConnectToken>>;

    /// Get an account's token
    async fn get_for_account(
        &self,
        user_id: &str,
        label: &str,
        token: &str,
    ) -> LiteResult<ConnectToken>;

    /// Create a token for an account
    async fn create_for_account(
        &self,
        user_id: &str,
        label: &str,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse>;

    /// Delete an account's token
    async fn delete_for_account(
        &self,
        user_id: &str,
        label: &str,
        token: &str,
    ) -> LiteResult<SuccessResponse>;
}

/// Connect tokens service implementation
#[derive(Clone)]
pub struct ConnectTokensService {
    pipeline: Arc<Pipeline>,
}

/// Which collection of tokens a call addresses
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    App,
    User(&'a str),
    Account(&'a str, &'a str),
}

impl Scope<'_> {
    fn collection(&self) -> Result<String, RequestError> {
        match self {
            Scope::App => Ok(APP_CONNECT_TOKENS_PATH.to_string()),
            Scope::User(user_id) => child(user_path(user_id)?, &[Segment::Literal(CONNECT_TOKENS)]),
            Scope::Account(user_id, label) => child(
                account_path(user_id, label)?,
                &[Segment::Literal(CONNECT_TOKENS)],
            ),
        }
    }

    fn token(&self, token: &str) -> Result<String, RequestError> {
        child(self.collection()?, &[Segment::Id(token)])
    }

    fn tag(&self, descriptor: RequestDescriptor) -> RequestDescriptor {
        match self {
            Scope::App => descriptor,
            Scope::User(user_id) => descriptor.user(*user_id),
            Scope::Account(user_id, label) => descriptor.user(*user_id).account(*label),
        }
    }
}

impl ConnectTokensService {
    /// Create a new connect tokens service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    /// Verify a fetched token against the address the end user meant to link.
    pub fn check(&self, token: &ConnectToken, email: &str) -> LiteResult<()> {
        let account = token.check(email)?;
        debug!(label = %account.label, "Connect token redeemed for a healthy account");
        Ok(())
    }

    async fn list_in(&self, scope: Scope<'_>) -> LiteResult<Vec<ConnectToken>> {
        let descriptor = scope.tag(RequestDescriptor::get(scope.collection()?));
        self.pipeline.execute(descriptor).await
    }

    async fn get_in(&self, scope: Scope<'_>, token: &str) -> LiteResult<ConnectToken> {
        let descriptor = scope.tag(RequestDescriptor::get(scope.token(token)?));
        self.pipeline.execute(descriptor).await
    }

    async fn create_in(
        &self,
        scope: Scope<'_>,
        request: &CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse> {
        let descriptor = scope.tag(RequestDescriptor::post(scope.collection()?).form(request)?);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("connect_tokens.create", response)
    }

    async fn delete_in(&self, scope: Scope<'_>, token: &str) -> LiteResult<SuccessResponse> {
        let descriptor = scope.tag(RequestDescriptor::delete(scope.token(token)?));
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("connect_tokens.delete", response)
    }
}

#[async_trait]
impl ConnectTokensServiceTrait for ConnectTokensService {
    #[instrument(skip(self))]
    async fn list(&self) -> LiteResult<Vec<ConnectToken>> {
        self.list_in(Scope::App).await
    }

    #[instrument(skip(self, token))]
    async fn get(&self, token: &str) -> LiteResult<ConnectToken> {
        self.get_in(Scope::App, token).await
    }

    #[instrument(skip(self, request))]
    async fn create(
        &self,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse> {
        self.create_in(Scope::App, &request).await
    }

    #[instrument(skip(self, token))]
    async fn delete(&self, token: &str) -> LiteResult<SuccessResponse> {
        self.delete_in(Scope::App, token).await
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: &str) -> LiteResult<Vec<ConnectToken>> {
        self.list_in(Scope::User(user_id)).await
    }

    #[instrument(skip(self, token))]
    async fn get_for_user(&self, user_id: &str, token: &str) -> LiteResult<ConnectToken> {
        self.get_in(Scope::User(user_id), token).await
    }

    #[instrument(skip(self, request))]
    async fn create_for_user(
        &self,
        user_id: &str,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse> {
        self.create_in(Scope::User(user_id), &request).await
    }

    #[instrument(skip(self, token))]
    async fn delete_for_user(&self, user_id: &str, token: &str) -> LiteResult<SuccessResponse> {
        self.delete_in(Scope::User(user_id), token).await
    }

    #[instrument(skip(self))]
    async fn list_for_account(&self, user_id: &str, label: &str) -> LiteResult<Vec<ConnectToken>> {
        self.list_in(Scope::Account(user_id, label)).await
    }

    #[instrument(skip(self, token))]
    async fn get_for_account(
        &self,
        user_id: &str,
        label: &str,
        token: &str,
    ) -> LiteResult<ConnectToken> {
        self.get_in(Scope::Account(user_id, label), token).await
    }

    #[instrument(skip(self, request))]
    async fn create_for_account(
        &self,
        user_id: &str,
        label: &str,
        request: CreateConnectTokenRequest,
    ) -> LiteResult<CreateConnectTokenResponse> {
        self.create_in(Scope::Account(user_id, label), &request).await
    }

    #[instrument(skip(self, token))]
    async fn delete_for_account(
        &self,
        user_id: &str,
        label: &str,
        token: &str,
    ) -> LiteResult<SuccessResponse> {
        self.delete_in(Scope::Account(user_id, label), token).await
    }
}
