use async_trait::async_trait;
use serde_json::Value;

use crate::api::request::ApiRequest;
use crate::error::ClientError;

/// Seam between the endpoint handlers and the request dispatcher.
///
/// `Ok(Some(json))` is a parsed payload, `Ok(None)` a 204 no-content answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApiDispatch: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ClientError>;
}
