use std::sync::Arc;

use serde_json::Value;

use crate::api::request::ApiRequest;
use crate::client_trait::TaskApiDispatch;
use crate::error::ClientError;

/// Task CRUD. Bodies are opaque payloads passed through verbatim; the
/// dispatcher owns authentication and failure classification.
#[derive(Debug, Clone)]
pub struct TasksHandler<C> {
    client: Arc<C>,
}

impl<C: TaskApiDispatch> TasksHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        TasksHandler { client }
    }

    /// List tasks. `filters` are forwarded as query parameters, empty values
    /// skipped, so form state can be passed straight through.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Option<Value>, ClientError> {
        let mut request = ApiRequest::get("/tasks");
        for (key, value) in filters {
            request = request.query_param(*key, *value);
        }
        self.client.send(request).await
    }

    pub async fn get(&self, id: u64) -> Result<Option<Value>, ClientError> {
        self.client.send(ApiRequest::get(format!("/tasks/{id}"))).await
    }

    pub async fn create(&self, task: Value) -> Result<Option<Value>, ClientError> {
        self.client.send(ApiRequest::post("/tasks").json(task)).await
    }

    pub async fn update(&self, id: u64, task: Value) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::put(format!("/tasks/{id}")).json(task))
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<Option<Value>, ClientError> {
        self.client
            .send(ApiRequest::delete(format!("/tasks/{id}")))
            .await
    }

    /// Aggregate completion statistics for the current user.
    pub async fn statistics(&self) -> Result<Option<Value>, ClientError> {
        self.client.send(ApiRequest::get("/tasks/statistics")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_trait::MockTaskApiDispatch;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn list_forwards_non_empty_filters() {
        let mut mock = MockTaskApiDispatch::new();
        mock.expect_send()
            .withf(|request| {
                request.method == Method::GET
                    && request.path == "/tasks"
                    && request.query
                        == vec![
                            ("priority".to_string(), "high".to_string()),
                            ("page".to_string(), "1".to_string()),
                        ]
            })
            .returning(|_| Ok(Some(json!({"tasks": []}))));

        let handler = TasksHandler::new(Arc::new(mock));
        let result = handler
            .list(&[("priority", "high"), ("search", ""), ("page", "1")])
            .await
            .expect("list");
        assert_eq!(result, Some(json!({"tasks": []})));
    }

    #[tokio::test]
    async fn update_puts_the_payload_at_the_task_path() {
        let mut mock = MockTaskApiDispatch::new();
        mock.expect_send()
            .withf(|request| {
                request.method == Method::PUT
                    && request.path == "/tasks/42"
                    && request.body == Some(json!({"completed": true}))
            })
            .returning(|_| Ok(Some(json!({"id": 42, "completed": true}))));

        let handler = TasksHandler::new(Arc::new(mock));
        handler
            .update(42, json!({"completed": true}))
            .await
            .expect("update");
    }

    #[tokio::test]
    async fn delete_propagates_a_no_content_outcome() {
        let mut mock = MockTaskApiDispatch::new();
        mock.expect_send()
            .withf(|request| request.method == Method::DELETE && request.path == "/tasks/7")
            .returning(|_| Ok(None));

        let handler = TasksHandler::new(Arc::new(mock));
        assert_eq!(handler.delete(7).await.expect("delete"), None);
    }

    #[tokio::test]
    async fn statistics_hits_the_dedicated_path() {
        let mut mock = MockTaskApiDispatch::new();
        mock.expect_send()
            .withf(|request| request.path == "/tasks/statistics")
            .returning(|_| Ok(Some(json!({"completed": 3, "pending": 2}))));

        let handler = TasksHandler::new(Arc::new(mock));
        handler.statistics().await.expect("statistics");
    }
}
