//! Context.IO Lite API Client
//!
//! Typed client for the Context.IO Lite email API with:
//! - Users, email accounts, folders, messages, webhooks, connect tokens,
//!   OAuth providers and discovery
//! - Two-legged OAuth 1.0 request signing
//! - A retry loop driven by caller-supplied hooks and bounded by a retry budget
//! - Webhook and account status callback verification
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use contextio_lite::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = contextio_lite::create_client_from_env()?;
//!
//!     let users = client.users().list(ListUsersRequest::new()).await?;
//!     for user in users {
//!         println!("{} has {} accounts", user.id, user.email_accounts.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod hooks;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

// Services
pub mod services;

// Inbound callbacks
pub mod webhooks;

// Resilience
pub mod resilience;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use client::LiteClient;
pub use config::{Credential, LiteConfig, LiteConfigBuilder};
pub use errors::{LiteError, LiteResult};
pub use hooks::RequestHooks;
pub use resilience::RetryConfig;
pub use webhooks::CallbackVerifier;

/// Default base URL for the Context.IO API
pub const DEFAULT_BASE_URL: &str = "https://api.context.io";

/// Default timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per call, the first included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default user agent
pub const DEFAULT_USER_AGENT: &str = concat!("contextio-lite-rust/", env!("CARGO_PKG_VERSION"));

/// Create a client with the given configuration
pub fn create_client(config: LiteConfig) -> LiteResult<LiteClient> {
    config.validate()?;
    LiteClient::new(config)
}

/// Create a client from environment variables
///
/// Reads:
/// - `CONTEXTIO_API_KEY` - API key
/// - `CONTEXTIO_API_SECRET` - API secret
/// - `CONTEXTIO_BASE_URL` - Base URL override
/// - `CONTEXTIO_TIMEOUT` - Timeout in seconds
/// - `CONTEXTIO_MAX_ATTEMPTS` - Attempts per call
pub fn create_client_from_env() -> LiteResult<LiteClient> {
    let config = LiteConfig::from_env()?;
    create_client(config)
}

/// Common imports
pub mod prelude {
    pub use crate::client::LiteClient;
    pub use crate::config::{LiteConfig, LiteConfigBuilder};
    pub use crate::errors::{LiteError, LiteResult};
    pub use crate::hooks::RequestHooks;
    pub use crate::observability::TracingHooks;
    pub use crate::resilience::RetryConfig;
    pub use crate::response::{OneOrMany, Shaped};
    pub use crate::services::app::*;
    pub use crate::services::connect_tokens::{
        ConnectToken, ConnectTokensServiceTrait, CreateConnectTokenRequest,
    };
    pub use crate::services::discovery::{DiscoveryRequest, DiscoveryServiceTrait};
    pub use crate::services::email_accounts::{
        CreateEmailAccountRequest, EmailAccountsServiceTrait, ListEmailAccountsRequest,
        ModifyEmailAccountRequest,
    };
    pub use crate::services::folders::{DelimiterParams, FoldersServiceTrait, ListFoldersRequest};
    pub use crate::services::messages::{
        GetMessageRequest, IncludeHeaders, ListMessagesRequest, MessagesServiceTrait,
        MoveMessageRequest,
    };
    pub use crate::services::oauth_providers::{
        CreateOAuthProviderRequest, OAuthProvidersServiceTrait,
    };
    pub use crate::services::users::{
        CreateUserRequest, ListUsersRequest, ModifyUserRequest, UsersServiceTrait,
    };
    pub use crate::services::webhooks::{
        CreateWebhookRequest, ModifyWebhookRequest, WebhooksServiceTrait,
    };
    pub use crate::types::{EmailAccount, SuccessResponse};
    pub use crate::webhooks::{CallbackVerifier, WebhookCallback};
}
