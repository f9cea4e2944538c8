//! Messages service implementation.

use super::requests::*;
use super::responses::*;
use crate::errors::{LiteResult, RequestError};
use crate::pipeline::Pipeline;
use crate::request::{RequestDescriptor, Segment};
use crate::response::ensure_success;
use crate::services::folders::DelimiterParams;
use crate::services::paths::{account_path, child, folder_message_path, folder_path};
use crate::types::SuccessResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Trait for messages service operations
#[async_trait]
pub trait MessagesServiceTrait: Send + Sync {
    /// List messages across an account
    async fn list(
        &self,
        user_id: &str,
        label: &str,
        request: ListMessagesRequest,
    ) -> LiteResult<Vec<Message>>;

    /// Get one message by id
    async fn get(
        &self,
        user_id: &str,
        label: &str,
        message_id: &str,
        request: GetMessageRequest,
    ) -> LiteResult<Message>;

    /// List messages in one folder
    async fn list_in_folder(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        request: ListMessagesRequest,
    ) -> LiteResult<Vec<Message>>;

    /// Get one message from a folder
    async fn get_in_folder(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: GetMessageRequest,
    ) -> LiteResult<Message>;

    /// Move a message to another folder
    async fn move_message(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MoveMessageRequest,
    ) -> LiteResult<SuccessResponse>;

    /// Get the body parts of a message
    async fn body(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MessageBodyRequest,
    ) -> LiteResult<Vec<MessageBody>>;

    /// Get the IMAP flags of a message
    async fn flags(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<MessageFlagsResponse>;

    /// Get the headers of a message
    async fn headers(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MessageHeadersRequest,
    ) -> LiteResult<MessageHeadersResponse>;

    /// Get the full source of a message
    async fn raw(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<RawMessage>;

    /// Set `\Seen`
    async fn mark_read(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse>;

    /// Clear `\Seen`
    async fn mark_unread(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse>;

    /// List the attachments of a message
    async fn attachments(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<Vec<Attachment>>;

    /// Get one attachment
    async fn attachment(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        attachment_id: &str,
        request: AttachmentRequest,
    ) -> LiteResult<AttachmentContent>;
}

/// Messages service implementation
#[derive(Clone)]
pub struct MessagesService {
    pipeline: Arc<Pipeline>,
}

impl MessagesService {
    /// Create a new messages service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    fn message_child(
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        segments: &[Segment<'_>],
    ) -> Result<String, RequestError> {
        child(folder_message_path(user_id, label, folder, message_id)?, segments)
    }
}

#[async_trait]
impl MessagesServiceTrait for MessagesService {
    #[instrument(skip(self))]
    async fn list(
        &self,
        user_id: &str,
        label: &str,
        request: ListMessagesRequest,
    ) -> LiteResult<Vec<Message>> {
        let path = child(account_path(user_id, label)?, &[Segment::Literal("messages")])?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn get(
        &self,
        user_id: &str,
        label: &str,
        message_id: &str,
        request: GetMessageRequest,
    ) -> LiteResult<Message> {
        let path = child(
            account_path(user_id, label)?,
            &[Segment::Literal("messages"), Segment::Id(message_id)],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn list_in_folder(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        request: ListMessagesRequest,
    ) -> LiteResult<Vec<Message>> {
        let path = child(
            folder_path(user_id, label, folder)?,
            &[Segment::Literal("messages")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn get_in_folder(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: GetMessageRequest,
    ) -> LiteResult<Message> {
        let descriptor =
            RequestDescriptor::get(folder_message_path(user_id, label, folder, message_id)?)
                .query(&request)?
                .user(user_id)
                .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn move_message(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MoveMessageRequest,
    ) -> LiteResult<SuccessResponse> {
        let descriptor =
            RequestDescriptor::put(folder_message_path(user_id, label, folder, message_id)?)
                .query(&request)?
                .user(user_id)
                .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("messages.move", response)
    }

    #[instrument(skip(self))]
    async fn body(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MessageBodyRequest,
    ) -> LiteResult<Vec<MessageBody>> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("body")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn flags(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<MessageFlagsResponse> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("flags")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&params)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn headers(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        request: MessageHeadersRequest,
    ) -> LiteResult<MessageHeadersResponse> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("headers")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn raw(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<RawMessage> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("raw")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&params)?
            .user(user_id)
            .account(label);
        let body = self.pipeline.execute_raw(descriptor).await?;
        Ok(RawMessage::from(body))
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("read")],
        )?;
        let descriptor = RequestDescriptor::post(path)
            .form(&params)?
            .user(user_id)
            .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("messages.mark_read", response)
    }

    #[instrument(skip(self))]
    async fn mark_unread(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("read")],
        )?;
        let descriptor = RequestDescriptor::delete(path)
            .form(&params)?
            .user(user_id)
            .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("messages.mark_unread", response)
    }

    #[instrument(skip(self))]
    async fn attachments(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        params: DelimiterParams,
    ) -> LiteResult<Vec<Attachment>> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("attachments")],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&params)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn attachment(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        message_id: &str,
        attachment_id: &str,
        request: AttachmentRequest,
    ) -> LiteResult<AttachmentContent> {
        let path = Self::message_child(
            user_id,
            label,
            folder,
            message_id,
            &[Segment::Literal("attachments"), Segment::Id(attachment_id)],
        )?;
        let descriptor = RequestDescriptor::get(path)
            .query(&request)?
            .user(user_id)
            .account(label);
        let body = self.pipeline.execute_raw(descriptor).await?;
        Ok(AttachmentContent::from_body(body)?)
    }
}
