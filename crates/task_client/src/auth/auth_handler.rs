use std::sync::Arc;

use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::client::TaskApiClient;
use crate::api::request::ApiRequest;
use crate::auth::validation;
use crate::error::ClientError;

/// Shape shared by the login and registration responses. Extra fields such
/// as the server's message are left in the opaque payload.
#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    refresh_token: String,
    user: Value,
}

/// Authentication operations. Holds the concrete client because login,
/// registration and logout mutate its credential store.
#[derive(Debug, Clone)]
pub struct AuthHandler {
    client: Arc<TaskApiClient>,
}

impl AuthHandler {
    pub fn new(client: Arc<TaskApiClient>) -> Self {
        AuthHandler { client }
    }

    /// Log in and persist the returned session. The full response payload is
    /// handed back so callers can render the server's message.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ClientError> {
        validation::validate_login(email, password)?;
        let request =
            ApiRequest::post("/auth/login").json(json!({"email": email, "password": password}));
        let payload = self
            .client
            .send(request)
            .await?
            .ok_or_else(|| ClientError::Api("Empty response from login".to_string()))?;
        self.store_session(&payload)?;
        Ok(payload)
    }

    /// Register a new account. Field checks run first; nothing is dispatched
    /// when they fail. A successful registration logs the user in.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Value, ClientError> {
        validation::validate_registration(username, email, password)?;
        let request = ApiRequest::post("/auth/register").json(json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        let payload = self
            .client
            .send(request)
            .await?
            .ok_or_else(|| ClientError::Api("Empty response from registration".to_string()))?;
        self.store_session(&payload)?;
        Ok(payload)
    }

    /// Best-effort server-side logout. The local credential slots are
    /// cleared no matter what the server answers; a failed call is logged
    /// and absorbed.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.client.send(ApiRequest::post("/auth/logout")).await;
        self.client.credentials().clear_all();
        match result {
            Ok(_) => info!("Logged out"),
            Err(e) => warn!("Server-side logout failed, local session cleared anyway: {e}"),
        }
        Ok(())
    }

    /// Fetch the authenticated user's profile.
    pub async fn profile(&self) -> Result<Value, ClientError> {
        self.client
            .send(ApiRequest::get("/auth/me"))
            .await?
            .ok_or_else(|| ClientError::Api("Empty response from profile".to_string()))
    }

    fn store_session(&self, payload: &Value) -> Result<(), ClientError> {
        let session: SessionPayload = serde_json::from_value(payload.clone())
            .map_err(|e| ClientError::Api(format!("Malformed authentication response: {e}")))?;
        self.client.credentials().set_session(
            &session.access_token,
            &session.refresh_token,
            session.user,
        );
        info!("Stored session credentials");
        Ok(())
    }
}
