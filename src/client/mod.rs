//! Context.IO Lite client implementation.
//!
//! Provides the main entry point: one client per credential, holding the
//! shared pipeline and one handle per resource group.

use crate::config::LiteConfig;
use crate::errors::LiteResult;
use crate::pipeline::Pipeline;
use crate::services::{
    AppService, ConnectTokensService, DiscoveryService, EmailAccountsService, FoldersService,
    MessagesService, OAuthProvidersService, UsersService, WebhooksService,
};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::webhooks::CallbackVerifier;
use std::sync::Arc;

/// Main Context.IO Lite client
#[derive(Clone)]
pub struct LiteClient {
    pipeline: Arc<Pipeline>,
    verifier: Arc<CallbackVerifier>,
    app_service: AppService,
    connect_tokens_service: ConnectTokensService,
    discovery_service: DiscoveryService,
    email_accounts_service: EmailAccountsService,
    folders_service: FoldersService,
    messages_service: MessagesService,
    oauth_providers_service: OAuthProvidersService,
    users_service: UsersService,
    webhooks_service: WebhooksService,
}

impl LiteClient {
    /// Create a new client with the given configuration
    pub fn new(config: LiteConfig) -> LiteResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a new client with a custom transport
    pub fn with_transport(config: LiteConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let secret = config
            .credential()
            .map(|c| c.expose_secret().to_string())
            .unwrap_or_default();
        let verifier = Arc::new(CallbackVerifier::new(secret));
        let pipeline = Arc::new(Pipeline::new(config, transport));

        Self {
            verifier,
            app_service: AppService::new(pipeline.clone()),
            connect_tokens_service: ConnectTokensService::new(pipeline.clone()),
            discovery_service: DiscoveryService::new(pipeline.clone()),
            email_accounts_service: EmailAccountsService::new(pipeline.clone()),
            folders_service: FoldersService::new(pipeline.clone()),
            messages_service: MessagesService::new(pipeline.clone()),
            oauth_providers_service: OAuthProvidersService::new(pipeline.clone()),
            users_service: UsersService::new(pipeline.clone()),
            webhooks_service: WebhooksService::new(pipeline.clone()),
            pipeline,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &LiteConfig {
        self.pipeline.config()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.config().base_url.as_str()
    }

    /// Check an inbound callback's signature with this client's secret.
    ///
    /// Returns `false` when the client has no secret.
    pub fn validate_callback(&self, token: &str, signature: &str, timestamp: i64) -> bool {
        self.verifier.verify_callback(token, signature, timestamp)
    }

    /// Get the callback verifier
    pub fn callback_verifier(&self) -> &CallbackVerifier {
        &self.verifier
    }

    /// Get the app service
    pub fn app(&self) -> &AppService {
        &self.app_service
    }

    /// Get the connect tokens service
    pub fn connect_tokens(&self) -> &ConnectTokensService {
        &self.connect_tokens_service
    }

    /// Get the discovery service
    pub fn discovery(&self) -> &DiscoveryService {
        &self.discovery_service
    }

    /// Get the email accounts service
    pub fn email_accounts(&self) -> &EmailAccountsService {
        &self.email_accounts_service
    }

    /// Get the folders service
    pub fn folders(&self) -> &FoldersService {
        &self.folders_service
    }

    /// Get the messages service
    pub fn messages(&self) -> &MessagesService {
        &self.messages_service
    }

    /// Get the OAuth providers service
    pub fn oauth_providers(&self) -> &OAuthProvidersService {
        &self.oauth_providers_service
    }

    /// Get the users service
    pub fn users(&self) -> &UsersService {
        &self.users_service
    }

    /// Get the webhooks service
    pub fn webhooks(&self) -> &WebhooksService {
        &self.webhooks_service
    }
}

impl std::fmt::Debug for LiteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiteClient")
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}
