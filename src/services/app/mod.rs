//! App service: the application-wide account status callback URL.

use crate::errors::LiteResult;
use crate::pipeline::Pipeline;
use crate::request::RequestDescriptor;
use crate::response::ensure_success;
use crate::types::SuccessResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

const STATUS_CALLBACK_URL_PATH: &str = "/app/status_callback_url";

/// The configured status callback URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusCallbackUrl {
    /// Callback URL
    #[serde(default)]
    pub status_callback_url: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

/// Request to set the status callback URL
#[derive(Debug, Clone, Serialize)]
pub struct CreateStatusCallbackUrlRequest {
    /// Callback URL
    pub status_callback_url: String,
}

impl CreateStatusCallbackUrlRequest {
    /// Create a new request
    pub fn new(status_callback_url: impl Into<String>) -> Self {
        Self {
            status_callback_url: status_callback_url.into(),
        }
    }
}

/// Trait for app service operations
#[async_trait]
pub trait AppServiceTrait: Send + Sync {
    /// Get the status callback URL
    async fn get_status_callback_url(&self) -> LiteResult<StatusCallbackUrl>;

    /// Set the status callback URL
    async fn create_status_callback_url(
        &self,
        request: CreateStatusCallbackUrlRequest,
    ) -> LiteResult<SuccessResponse>;

    /// Remove the status callback URL
    async fn delete_status_callback_url(&self) -> LiteResult<SuccessResponse>;
}

/// App service implementation
#[derive(Clone)]
pub struct AppService {
    pipeline: Arc<Pipeline>,
}

impl AppService {
    /// Create a new app service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl AppServiceTrait for AppService {
    #[instrument(skip(self))]
    async fn get_status_callback_url(&self) -> LiteResult<StatusCallbackUrl> {
        self.pipeline
            .execute(RequestDescriptor::get(STATUS_CALLBACK_URL_PATH))
            .await
    }

    #[instrument(skip(self, request))]
    async fn create_status_callback_url(
        &self,
        request: CreateStatusCallbackUrlRequest,
    ) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::post(STATUS_CALLBACK_URL_PATH).form(&request)?;
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("app.create_status_callback_url", response)
    }

    #[instrument(skip(self))]
    async fn delete_status_callback_url(&self) -> LiteResult<SuccessResponse> {
        let response = self
            .pipeline
            .execute(RequestDescriptor::delete(STATUS_CALLBACK_URL_PATH))
            .await?;
        ensure_success("app.delete_status_callback_url", response)
    }
}
