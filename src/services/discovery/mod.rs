//! Discovery service: IMAP settings lookup for an email address.

use crate::errors::LiteResult;
use crate::pipeline::Pipeline;
use crate::request::RequestDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Request to discover settings for an address
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryRequest {
    /// Address to look up
    pub email: String,
}

impl DiscoveryRequest {
    /// Create a new request
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Discovered settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DiscoveryResponse {
    /// Address looked up
    #[serde(default)]
    pub email: String,
    /// Provider type
    #[serde(default, rename = "type")]
    pub provider_type: String,
    /// Error message, only present on failure
    #[serde(default)]
    pub value: String,
    /// Provider documentation links
    #[serde(default)]
    pub documentation: Vec<serde_json::Value>,
    /// Whether settings were found
    #[serde(default)]
    pub found: bool,
    /// IMAP settings
    #[serde(default)]
    pub imap: ImapSettings,
}

/// IMAP connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImapSettings {
    /// Server host
    #[serde(default)]
    pub server: String,
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Whether TLS is used
    #[serde(default)]
    pub use_ssl: bool,
    /// Whether the provider supports OAuth
    #[serde(default)]
    pub oauth: bool,
    /// Server port
    #[serde(default)]
    pub port: u16,
}

/// Trait for discovery service operations
#[async_trait]
pub trait DiscoveryServiceTrait: Send + Sync {
    /// Discover connection settings for an address
    async fn get(&self, request: DiscoveryRequest) -> LiteResult<DiscoveryResponse>;
}

/// Discovery service implementation
#[derive(Clone)]
pub struct DiscoveryService {
    pipeline: Arc<Pipeline>,
}

impl DiscoveryService {
    /// Create a new discovery service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl DiscoveryServiceTrait for DiscoveryService {
    #[instrument(skip(self, request))]
    async fn get(&self, request: DiscoveryRequest) -> LiteResult<DiscoveryResponse> {
        let descriptor = RequestDescriptor::get("/lite/discovery").query(&request)?;
        self.pipeline.execute(descriptor).await
    }
}
