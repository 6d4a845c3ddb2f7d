use std::sync::Arc;

use serde_json::{json, Value};

use crate::api::request::ApiRequest;
use crate::client_trait::TaskApiDispatch;
use crate::error::ClientError;

/// Tag CRUD plus attaching and detaching tags on tasks.
#[derive(Debug, Clone)]
pub struct TagsHandler<C> {
    client: Arc<C>,
}

impl<C: TaskApiDispatch> TagsHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        TagsHandler { client }
    }

    pub async fn list(&self) -> Result<Option<Value>, ClientError> {
        self.client.send(ApiRequest::get("/tags")).await
    }

    pub async fn create(&self, tag: Value) -> Result<Option<Value>, ClientError> {
        self.client.send(ApiRequest::post("/tags").json(tag)).await
    }

    pub async fn update(&self, id: u64, tag: Value) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::put(format!("/tags/{id}")).json(tag))
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::delete(format!("/tags/{id}")))
            .await
    }

    pub async fn add_to_task(&self, task_id: u64, tag_id: u64) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::post(format!("/tasks/{task_id}/tags")).json(json!({"tag_id": tag_id})))
            .await
    }

    pub async fn remove_from_task(
        &self,
        task_id: u64,
        tag_id: u64,
    ) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::delete(format!("/tasks/{task_id}/tags/{tag_id}")))
            .await
    }
}
