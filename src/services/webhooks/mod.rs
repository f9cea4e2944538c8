//! Webhooks service.
//!
//! Webhooks exist at two levels: application-wide ones under
//! `/lite/webhooks`, and per-user ones under `/lite/users/{id}/webhooks`.
//! Both take the same parameters and return the same shapes.

use crate::errors::{LiteResult, RequestError};
use crate::pipeline::Pipeline;
use crate::request::{is_false, RequestDescriptor, Segment};
use crate::response::{ensure_success, Acknowledgement};
use crate::services::paths::{child, user_path};
use crate::types::SuccessResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

const APP_WEBHOOKS_PATH: &str = "/lite/webhooks";

/// A registered webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Webhook {
    /// Where events are delivered
    #[serde(default)]
    pub callback_url: String,
    /// Webhook id
    #[serde(default)]
    pub webhook_id: String,
    /// Recipient filter
    #[serde(default)]
    pub filter_to: String,
    /// Sender filter
    #[serde(default)]
    pub filter_from: String,
    /// Cc filter
    #[serde(default)]
    pub filter_cc: String,
    /// Subject filter
    #[serde(default)]
    pub filter_subject: String,
    /// Thread filter
    #[serde(default)]
    pub filter_thread: String,
    /// Importance filter
    #[serde(default)]
    pub filter_new_important: String,
    /// Attachment name filter
    #[serde(default)]
    pub filter_file_name: String,
    /// Folder filter
    #[serde(default)]
    pub filter_folder_added: String,
    /// Recipient domain filter
    #[serde(default)]
    pub filter_to_domain: String,
    /// Sender domain filter
    #[serde(default)]
    pub filter_from_domain: String,
    /// Body MIME type delivered with events
    #[serde(default)]
    pub body_type: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
    /// Whether events are being delivered
    #[serde(default)]
    pub active: bool,
    /// Whether delivery was suspended after failures
    #[serde(default)]
    pub failure: bool,
    /// Deliver bodies
    #[serde(default)]
    pub include_body: bool,
    /// Deliver headers
    #[serde(default)]
    pub include_header: bool,
    /// Fire for drafts
    #[serde(default)]
    pub receive_drafts: bool,
    /// Fire for every change, not only new messages
    #[serde(default)]
    pub receive_all_changes: bool,
    /// Fire for messages that predate the webhook
    #[serde(default)]
    pub receive_historical: bool,
}

/// Request to register a webhook
#[derive(Debug, Clone, Serialize)]
pub struct CreateWebhookRequest {
    /// Where events are delivered
    pub callback_url: String,
    /// Recipient filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_to: String,
    /// Sender filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_from: String,
    /// Cc filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_cc: String,
    /// Subject filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_subject: String,
    /// Thread filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_thread: String,
    /// Importance filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_new_important: String,
    /// Attachment name filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_file_name: String,
    /// Folder filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_folder_added: String,
    /// Recipient domain filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_to_domain: String,
    /// Sender domain filter
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter_from_domain: String,
    /// Body MIME type delivered with events
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body_type: String,
    /// Deliver bodies
    #[serde(skip_serializing_if = "is_false")]
    pub include_body: bool,
    /// Deliver headers
    #[serde(skip_serializing_if = "is_false")]
    pub include_header: bool,
    /// Fire for drafts
    #[serde(skip_serializing_if = "is_false")]
    pub receive_drafts: bool,
    /// Fire for every change
    #[serde(skip_serializing_if = "is_false")]
    pub receive_all_changes: bool,
    /// Fire for existing messages
    #[serde(skip_serializing_if = "is_false")]
    pub receive_historical: bool,
}

impl CreateWebhookRequest {
    /// Create a new request with no filters
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            filter_to: String::new(),
            filter_from: String::new(),
            filter_cc: String::new(),
            filter_subject: String::new(),
            filter_thread: String::new(),
            filter_new_important: String::new(),
            filter_file_name: String::new(),
            filter_folder_added: String::new(),
            filter_to_domain: String::new(),
            filter_from_domain: String::new(),
            body_type: String::new(),
            include_body: false,
            include_header: false,
            receive_drafts: false,
            receive_all_changes: false,
            receive_historical: false,
        }
    }

    /// Only messages sent to this address
    pub fn filter_to(mut self, filter: impl Into<String>) -> Self {
        self.filter_to = filter.into();
        self
    }

    /// Only messages from this address
    pub fn filter_from(mut self, filter: impl Into<String>) -> Self {
        self.filter_from = filter.into();
        self
    }

    /// Only messages whose subject matches
    pub fn filter_subject(mut self, filter: impl Into<String>) -> Self {
        self.filter_subject = filter.into();
        self
    }

    /// Only messages added to this folder
    pub fn filter_folder_added(mut self, folder: impl Into<String>) -> Self {
        self.filter_folder_added = folder.into();
        self
    }

    /// Deliver bodies of this MIME type with each event
    pub fn include_body(mut self, body_type: impl Into<String>) -> Self {
        self.include_body = true;
        self.body_type = body_type.into();
        self
    }

    /// Deliver headers with each event
    pub fn include_header(mut self) -> Self {
        self.include_header = true;
        self
    }

    /// Fire for drafts too
    pub fn receive_drafts(mut self) -> Self {
        self.receive_drafts = true;
        self
    }

    /// Fire for every change
    pub fn receive_all_changes(mut self) -> Self {
        self.receive_all_changes = true;
        self
    }

    /// Fire for existing messages too
    pub fn receive_historical(mut self) -> Self {
        self.receive_historical = true;
        self
    }
}

/// Response from registering a webhook
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateWebhookResponse {
    /// Success indicator
    #[serde(default)]
    pub success: bool,
    /// New webhook id
    #[serde(default)]
    pub webhook_id: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

impl Acknowledgement for CreateWebhookResponse {
    fn success(&self) -> bool {
        self.success
    }
}

/// Request to pause or resume a webhook
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModifyWebhookRequest {
    /// Whether events should be delivered
    pub active: bool,
}

impl ModifyWebhookRequest {
    /// Resume delivery
    pub fn activate() -> Self {
        Self { active: true }
    }

    /// Pause delivery
    pub fn deactivate() -> Self {
        Self { active: false }
    }
}

/// Trait for webhooks service operations
#[async_trait]
pub trait WebhooksServiceTrait: Send + Sync {
    /// List application webhooks
    async fn list(&self) -> LiteResult<Vec<Webhook>>;

    /// Get an application webhook
    async fn get(&self, webhook_id: &str) -> LiteResult<Webhook>;

    /// Register an application webhook
    async fn create(&self, request: CreateWebhookRequest) -> LiteResult<CreateWebhookResponse>;

    /// Pause or resume an application webhook
    async fn modify(
        &self,
        webhook_id: &str,
        request: ModifyWebhookRequest,
    ) -> LiteResult<SuccessResponse>;

    /// Remove an application webhook
    async fn delete(&self, webhook_id: &str) -> LiteResult<SuccessResponse>;

    /// List a user's webhooks
    async fn list_for_user(&self, user_id: &str) -> LiteResult<Vec<Webhook>>;

    /// Get a user's webhook
    async fn get_for_user(&self, user_id: &str, webhook_id: &str) -> LiteResult<Webhook>;

    /// Register a webhook for a user
    async fn create_for_user(
        &self,
        user_id: &str,
        request: CreateWebhookRequest,
    ) -> LiteResult<CreateWebhookResponse>;

    /// Pause or resume a user's webhook
    async fn modify_for_user(
        &self,
        user_id: &str,
        webhook_id: &str,
        request: ModifyWebhookRequest,
    ) -> LiteResult<SuccessResponse>;

    /// Remove a user's webhook
    async fn delete_for_user(&self, user_id: &str, webhook_id: &str)
        -> LiteResult<SuccessResponse>;
}

/// Webhooks service implementation
#[derive(Clone)]
pub struct WebhooksService {
    pipeline: Arc<Pipeline>,
}

impl WebhooksService {
    /// Create a new webhooks service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    fn collection(user_id: Option<&str>) -> Result<String, RequestError> {
        match user_id {
            Some(id) => child(user_path(id)?, &[Segment::Literal("webhooks")]),
            None => Ok(APP_WEBHOOKS_PATH.to_string()),
        }
    }

    fn item(user_id: Option<&str>, webhook_id: &str) -> Result<String, RequestError> {
        child(Self::collection(user_id)?, &[Segment::Id(webhook_id)])
    }

    fn tagged(descriptor: RequestDescriptor, user_id: Option<&str>) -> RequestDescriptor {
        match user_id {
            Some(id) => descriptor.user(id),
            None => descriptor,
        }
    }

    async fn list_at(&self, user_id: Option<&str>) -> LiteResult<Vec<Webhook>> {
        let descriptor = Self::tagged(RequestDescriptor::get(Self::collection(user_id)?), user_id);
        self.pipeline.execute(descriptor).await
    }

    async fn get_at(&self, user_id: Option<&str>, webhook_id: &str) -> LiteResult<Webhook> {
        let descriptor = Self::tagged(
            RequestDescriptor::get(Self::item(user_id, webhook_id)?),
            user_id,
        );
        self.pipeline.execute(descriptor).await
    }

    async fn create_at(
        &self,
        user_id: Option<&str>,
        request: &CreateWebhookRequest,
    ) -> LiteResult<CreateWebhookResponse> {
        let descriptor = Self::tagged(
            RequestDescriptor::post(Self::collection(user_id)?).form(request)?,
            user_id,
        );
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("webhooks.create", response)
    }

    async fn modify_at(
        &self,
        user_id: Option<&str>,
        webhook_id: &str,
        request: &ModifyWebhookRequest,
    ) -> LiteResult<SuccessResponse> {
        let descriptor = Self::tagged(
            RequestDescriptor::post(Self::item(user_id, webhook_id)?).form(request)?,
            user_id,
        );
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("webhooks.modify", response)
    }

    async fn delete_at(
        &self,
        user_id: Option<&str>,
        webhook_id: &str,
    ) -> LiteResult<SuccessResponse> {
        let descriptor = Self::tagged(
            RequestDescriptor::delete(Self::item(user_id, webhook_id)?),
            user_id,
        );
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("webhooks.delete", response)
    }
}

#[async_trait]
impl WebhooksServiceTrait for WebhooksService {
    #[instrument(skip(self))]
    async fn list(&self) -> LiteResult<Vec<Webhook>> {
        self.list_at(None).await
    }

    #[instrument(skip(self))]
    async fn get(&self, webhook_id: &str) -> LiteResult<Webhook> {
        self.get_at(None, webhook_id).await
    }

    #[instrument(skip(self))]
    async fn create(&self, request: CreateWebhookRequest) -> LiteResult<CreateWebhookResponse> {
        self.create_at(None, &request).await
    }

    #[instrument(skip(self))]
    async fn modify(
        &self,
        webhook_id: &str,
        request: ModifyWebhookRequest,
    ) -> LiteResult<SuccessResponse> {
        self.modify_at(None, webhook_id, &request).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, webhook_id: &str) -> LiteResult<SuccessResponse> {
        self.delete_at(None, webhook_id).await
    }

    #[instrument(skip(self))]
    async fn list_for_user(&self, user_id: &str) -> LiteResult<Vec<Webhook>> {
        self.list_at(Some(user_id)).await
    }

    #[instrument(skip(self))]
    async fn get_for_user(&self, user_id: &str, webhook_id: &str) -> LiteResult<Webhook> {
        self.get_at(Some(user_id), webhook_id).await
    }

    #[instrument(skip(self))]
    async fn create_for_user(
        &self,
        user_id: &str,
        request: CreateWebhookRequest,
    ) -> LiteResult<CreateWebhookResponse> {
        self.create_at(Some(user_id), &request).await
    }

    #[instrument(skip(self))]
    async fn modify_for_user(
        &self,
        user_id: &str,
        webhook_id: &str,
        request: ModifyWebhookRequest,
    ) -> LiteResult<SuccessResponse> {
        self.modify_at(Some(user_id), webhook_id, &request).await
    }

    #[instrument(skip(self))]
    async fn delete_for_user(
        &self,
        user_id: &str,
        webhook_id: &str,
    ) -> LiteResult<SuccessResponse> {
        self.delete_at(Some(user_id), webhook_id).await
    }
}
