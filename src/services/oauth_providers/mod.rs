//! OAuth providers service.

use crate::errors::{LiteResult, RequestError};
use crate::observability::Redacted;
use crate::pipeline::Pipeline;
use crate::request::{build_path, RequestDescriptor, Segment};
use crate::response::{ensure_success, Acknowledgement};
use crate::types::SuccessResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

const OAUTH_PROVIDERS_PATH: &str = "/lite/oauth_providers";

/// A configured OAuth provider
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OAuthProvider {
    /// Provider type, e.g. `GMAIL_OAUTH2`
    #[serde(default, rename = "type")]
    pub provider_type: String,
    /// Client key registered with the provider
    #[serde(default)]
    pub provider_consumer_key: String,
    /// Client secret registered with the provider
    #[serde(default)]
    pub provider_consumer_secret: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

impl fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthProvider")
            .field("provider_type", &self.provider_type)
            .field("provider_consumer_key", &self.provider_consumer_key)
            .field(
                "provider_consumer_secret",
                &Redacted::new(&self.provider_consumer_secret),
            )
            .field("resource_url", &self.resource_url)
            .finish()
    }
}

/// Request to register an OAuth provider
#[derive(Clone, Serialize)]
pub struct CreateOAuthProviderRequest {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: String,
    /// Client key
    pub provider_consumer_key: String,
    /// Client secret
    pub provider_consumer_secret: String,
}

impl CreateOAuthProviderRequest {
    /// Create a new request
    pub fn new(
        provider_type: impl Into<String>,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            provider_type: provider_type.into(),
            provider_consumer_key: consumer_key.into(),
            provider_consumer_secret: consumer_secret.into(),
        }
    }
}

impl fmt::Debug for CreateOAuthProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateOAuthProviderRequest")
            .field("provider_type", &self.provider_type)
            .field("provider_consumer_key", &self.provider_consumer_key)
            .field("provider_consumer_secret", &Redacted::new(()))
            .finish()
    }
}

/// Response from registering an OAuth provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateOAuthProviderResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// Client key
    #[serde(default)]
    pub provider_consumer_key: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

impl Acknowledgement for CreateOAuthProviderResponse {
    fn success(&self) -> bool {
        self.success
    }
}

/// Trait for OAuth providers service operations
#[async_trait]
pub trait OAuthProvidersServiceTrait: Send + Sync {
    /// List configured providers
    async fn list(&self) -> LiteResult<Vec<OAuthProvider>>;

    /// Get one provider by consumer key
    async fn get(&self, key: &str) -> LiteResult<OAuthProvider>;

    /// Register a provider
    async fn create(
        &self,
        request: CreateOAuthProviderRequest,
    ) -> LiteResult<CreateOAuthProviderResponse>;

    /// Remove a provider
    async fn delete(&self, key: &str) -> LiteResult<SuccessResponse>;
}

/// OAuth providers service implementation
#[derive(Clone)]
pub struct OAuthProvidersService {
    pipeline: Arc<Pipeline>,
}

impl OAuthProvidersService {
    /// Create a new OAuth providers service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    fn provider_path(key: &str) -> Result<String, RequestError> {
        build_path(&[Segment::Literal(OAUTH_PROVIDERS_PATH), Segment::Id(key)])
    }
}

#[async_trait]
impl OAuthProvidersServiceTrait for OAuthProvidersService {
    #[instrument(skip(self))]
    async fn list(&self) -> LiteResult<Vec<OAuthProvider>> {
        self.pipeline
            .execute(RequestDescriptor::get(OAUTH_PROVIDERS_PATH))
            .await
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> LiteResult<OAuthProvider> {
        self.pipeline
            .execute(RequestDescriptor::get(Self::provider_path(key)?))
            .await
    }

    #[instrument(skip(self, request), fields(provider_type = %request.provider_type))]
    async fn create(
        &self,
        request: CreateOAuthProviderRequest,
    ) -> LiteResult<CreateOAuthProviderResponse> {
        let descriptor = RequestDescriptor::post(OAUTH_PROVIDERS_PATH).form(&request)?;
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("oauth_providers.create", response)
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> LiteResult<SuccessResponse> {
        let response = self
            .pipeline
            .execute(RequestDescriptor::delete(Self::provider_path(key)?))
            .await?;
        ensure_success("oauth_providers.delete", response)
    }
}
