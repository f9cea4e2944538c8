//! Users service implementation.

use super::*;
use crate::errors::LiteResult;
use crate::pipeline::Pipeline;
use crate::request::RequestDescriptor;
use crate::response::ensure_success;
use crate::services::paths::{user_path, USERS_PATH};
use crate::types::SuccessResponse;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Trait for users service operations
#[async_trait]
pub trait UsersServiceTrait: Send + Sync {
    /// List users
    async fn list(&self, request: ListUsersRequest) -> LiteResult<Vec<User>>;

    /// Get one user
    async fn get(&self, user_id: &str) -> LiteResult<User>;

    /// Create a user, optionally linking a first account
    async fn create(&self, request: CreateUserRequest) -> LiteResult<CreateUserResponse>;

    /// Rename a user
    async fn modify(&self, user_id: &str, request: ModifyUserRequest) -> LiteResult<SuccessResponse>;

    /// Delete a user
    async fn delete(&self, user_id: &str) -> LiteResult<SuccessResponse>;
}

/// Users service implementation
#[derive(Clone)]
pub struct UsersService {
    pipeline: Arc<Pipeline>,
}

impl UsersService {
    /// Create a new users service
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl UsersServiceTrait for UsersService {
    #[instrument(skip(self))]
    async fn list(&self, request: ListUsersRequest) -> LiteResult<Vec<User>> {
        let descriptor = RequestDescriptor::get(USERS_PATH).query(&request)?;
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self))]
    async fn get(&self, user_id: &str) -> LiteResult<User> {
        let descriptor = RequestDescriptor::get(user_path(user_id)?).user(user_id);
        self.pipeline.execute(descriptor).await
    }

    #[instrument(skip(self, request))]
    async fn create(&self, request: CreateUserRequest) -> LiteResult<CreateUserResponse> {
        let descriptor = RequestDescriptor::post(USERS_PATH).form(&request)?;
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("users.create", response)
    }

    #[instrument(skip(self, request))]
    async fn modify(&self, user_id: &str, request: ModifyUserRequest) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::post(user_path(user_id)?)
            .form(&request)?
            .user(user_id);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("users.modify", response)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: &str) -> LiteResult<SuccessResponse> {
        let descriptor = RequestDescriptor::delete(user_path(user_id)?).user(user_id);
        let response = self.pipeline.execute(descriptor).await?;
        ensure_success("users.delete", response)
    }
}
