//! Service implementations for Context.IO Lite endpoints.
//!
//! Each service module provides methods for one group of resources. Every
//! method builds a single request descriptor and runs it through the shared
//! pipeline.

pub mod app;
pub mod connect_tokens;
pub mod discovery;
pub mod email_accounts;
pub mod folders;
pub mod messages;
pub mod oauth_providers;
pub mod users;
pub mod webhooks;

pub(crate) mod paths;

pub use app::{AppService, AppServiceTrait};
pub use connect_tokens::{ConnectTokensService, ConnectTokensServiceTrait};
pub use discovery::{DiscoveryService, DiscoveryServiceTrait};
pub use email_accounts::{EmailAccountsService, EmailAccountsServiceTrait};
pub use folders::{FoldersService, FoldersServiceTrait};
pub use messages::{MessagesService, MessagesServiceTrait};
pub use oauth_providers::{OAuthProvidersService, OAuthProvidersServiceTrait};
pub use users::{UsersService, UsersServiceTrait};
pub use webhooks::{WebhooksService, WebhooksServiceTrait};
