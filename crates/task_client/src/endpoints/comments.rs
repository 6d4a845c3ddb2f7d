use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::request::ApiRequest;
use crate::client_trait::TaskApiDispatch;
use crate::error::ClientError;

/// Comments live under their task for listing and creation, but are
/// addressed directly for edits and deletion.
#[derive(Debug, Clone)]
pub struct CommentsHandler<C> {
    client: Arc<C>,
}

impl<C: TaskApiDispatch> CommentsHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        CommentsHandler { client }
    }

    pub async fn for_task(&self, task_id: u64) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::get(format!("/tasks/{task_id}/comments")))
            .await
    }

    pub async fn create(&self, task_id: u64, content: &str) -> Result<Option<Value>, ClientError> {
        self.client
            .send(
                ApiRequest::post(format!("/tasks/{task_id}/comments"))
                    .json(json!({"content": content})),
            )
            .await
    }

    pub async fn update(
        &self,
        comment_id: u64,
        content: &str,
    ) -> Result<Option<Value>, ClientError> {
        self.client
            .send(
                ApiRequest::put(format!("/comments/{comment_id}"))
                    .json(json!({"content": content})),
            )
            .await
    }

    pub async fn delete(&self, comment_id: u64) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::delete(format!("/comments/{comment_id}")))
            .await
    }
}
