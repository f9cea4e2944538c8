//! Folders service.

use crate::errors::LiteResult;
use crate::pipeline::Pipeline;
use crate::request::{is_false, RequestDescriptor, Segment};
use crate::response::ensure_success;
use crate::services::paths::{account_path, child, folder_path};
use crate::types::SuccessResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Request to list folders
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListFoldersRequest {
    /// Return names only, skipping message counts
    #[serde(skip_serializing_if = "is_false")]
    pub include_names_only: bool,
}

impl ListFoldersRequest {
    /// Create a new request
    pub fn new() -> Self {
        Self::default()
    }

    /// Return names only
    pub fn names_only(mut self) -> Self {
        self.include_names_only = true;
        self
    }
}

/// Optional folder delimiter, shared by every folder-scoped endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DelimiterParams {
    /// Folder separator, e.g. `/` or `.`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub delimiter: String,
}

impl DelimiterParams {
    /// Use the account's default delimiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit delimiter
    pub fn delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

/// A mail folder
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Folder {
    /// Full folder name
    #[serde(default)]
    pub name: String,
    /// Special-use name, e.g. `\Sent`
    #[serde(default)]
    pub symbolic_name: String,
    /// Message count
    #[serde(default)]
    pub nb_messages: u64,
    /// Unseen message count
    #[serde(default)]
    pub nb_unseen_messages: u64,
    /// Hierarchy delimiter
    #[serde(default)]
    pub delimiter: String,
    /// Resource URL
    #[serde(default)]
    pub resource_url: String,
}

/// Trait for folders service operations
#[async_trait]
pub trait FoldersServiceTrait: Send + Sync {
    /// List an account's folders
    async fn list(
        &self,
        user_id: &str,
        label: &str,
        request: ListFoldersRequest,
    ) -> LiteResult<Vec<Folder>>;

    /// Get one folder
    async fn get(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<Folder>;

    /// Create a folder; fails if it already exists
    async fn create(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse>;

    /// Create a folder unless it already exists. Returns whether it was
    /// created.
    async fn safe_create(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<bool>;
}

/// Folders service implementation
#[derive(Clone)]
pub struct FoldersService {
    pipeline: Arc<Pipeline>,
}

impl FoldersService {
    /// Create a new folders service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl FoldersServiceTrait for FoldersService {
    #[instrument(skip(self))]
    async fn list(
        &self,
        user_id: &str,
        label: &str,
        request: ListFoldersRequest,
    ) -> LiteResult<Vec<Folder>> {
        let path = child(account_path(user_id, label)?, &[Segment::Literal("folders")])?;
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
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<Folder> {
        let descriptor = RequestDescriptor::get(folder_path(user_id, label, folder)?)
            .query(&params)?
            .user(user_id)
            .account(label);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn create(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::post(folder_path(user_id, label, folder)?)
            .form(&params)?
            .user(user_id)
            .account(label);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("folders.create", response)
    }

    #[instrument(skip(self))]
    async fn safe_create(
        &self,
        user_id: &str,
        label: &str,
        folder: &str,
        params: DelimiterParams,
    ) -> LiteResult<bool> {
        // A folder name that cannot form a path must fail before any lookup.
        folder_path(user_id, label, folder)?;

        match self.get(user_id, label, folder, params.clone()).await {
            Ok(existing) if existing.name == folder => return Ok(false),
            Ok(_) => debug!("Folder lookup returned a different name"),
            Err(e) => debug!(error = %e, "Folder lookup failed"),
        }

        // Single-folder lookups are unreliable upstream, so confirm against
        // the full listing before creating.
        match self
            .list(user_id, label, ListFoldersRequest::new().names_only())
            .await
        {
            Ok(folders) if folders.iter().any(|f| f.name == folder) => return Ok(false),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Folder listing failed"),
        }

        self.create(user_id, label, folder, params).await?;
        Ok(true)
    }
}
