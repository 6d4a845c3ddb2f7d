use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Proxy, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use task_core::Config;
use tokio::sync::Mutex;

use crate::api::request::ApiRequest;
use crate::auth::credential_store::CredentialStore;
use crate::client_trait::TaskApiDispatch;
use crate::error::ClientError;

const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Retry hint on a 429, seconds until the window resets. Falls back to 60
/// when the header is missing or unparseable.
fn retry_after_hint(headers: &HeaderMap) -> u64 {
    headers
        .get(RATE_LIMIT_RESET_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// The upstream contract signals an expired access token with this exact
/// body on a 401. Any other 401 is an ordinary failure, not an expiry.
fn is_expired_token_body(body: &Value) -> bool {
    body.get("error").and_then(Value::as_str) == Some("Token has expired")
}

/// Message for a non-success response, from the body's `error` or `message`
/// field with a generic fallback.
fn error_message(body: &Value) -> String {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("Something went wrong")
        .to_string()
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// One logical send is at most two wire attempts: the initial request, and a
/// single retry after a successful token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Initial,
    Retried,
}

/// Authenticated request client for the task manager API.
///
/// Owns the credential store, attaches bearer credentials, performs the
/// one-shot refresh-and-retry on expired tokens and classifies failures.
#[derive(Debug)]
pub struct TaskApiClient {
    http: Client,
    config: Config,
    credentials: Arc<CredentialStore>,
    // Serializes refresh attempts so concurrent 401s trigger one refresh call.
    refresh_lock: Mutex<()>,
}

impl TaskApiClient {
    /// Client rooted at the default data directory (~/.taskdeck).
    pub fn from_config(config: Config) -> Self {
        Self::new(config, task_core::paths::taskdeck_dir())
    }

    pub fn new(config: Config, data_dir: PathBuf) -> Self {
        let http = Self::build_http_client(&config).expect("task api client");
        let credentials = Arc::new(CredentialStore::load(
            task_core::paths::credentials_json_path(&data_dir),
        ));
        TaskApiClient {
            http,
            config,
            credentials,
            refresh_lock: Mutex::new(()),
        }
    }

    fn build_http_client(config: &Config) -> anyhow::Result<Client> {
        let mut builder = Client::builder().default_headers(Self::default_headers());
        if !config.http_proxy.is_empty() {
            builder = builder.proxy(Proxy::http(&config.http_proxy)?);
        }
        if !config.https_proxy.is_empty() {
            builder = builder.proxy(Proxy::https(&config.https_proxy)?);
        }
        builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("accept", "application/json".parse().expect("header"));
        headers
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send one logical request with authentication.
    ///
    /// A 401 carrying the expired-token body triggers exactly one refresh and
    /// one retry of the original descriptor; the retried response goes
    /// straight through the terminal status handling, so a second 401 or a
    /// 429 on the retry surfaces as an ordinary `Api` failure.
    pub async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ClientError> {
        let mut attempt = Attempt::Initial;
        let mut token = self.credentials.access_token();
        loop {
            let response = self.execute(&request, token.as_deref()).await?;
            if attempt == Attempt::Retried {
                return finish_response(response).await;
            }

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = retry_after_hint(response.headers());
                warn!("Rate limited on {}, retry after {retry_after_secs}s", request.path);
                return Err(ClientError::RateLimited { retry_after_secs });
            }
            if status == StatusCode::UNAUTHORIZED {
                let body = response.json::<Value>().await.unwrap_or(Value::Null);
                if !is_expired_token_body(&body) {
                    return Err(ClientError::Api(error_message(&body)));
                }
                info!("Access token expired, refreshing before retrying {}", request.path);
                token = Some(self.refresh_access_token(token.as_deref()).await?);
                attempt = Attempt::Retried;
                continue;
            }

            return finish_response(response).await;
        }
    }

    /// Build and issue the wire request. Dispatcher defaults first, then
    /// caller headers so they win per key. Transport failures map to
    /// `Network`, never to a panic or a raw reqwest error.
    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.config.api_base, request.path);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!("Stored access token is not a valid header value: {e}"),
            }
        }
        for (name, value) in &request.headers {
            let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
                warn!("Skipping invalid header name {name:?}");
                continue;
            };
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(e) => warn!("Skipping invalid header value for {name}: {e}"),
            }
        }

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ClientError::Api(format!("Failed to encode request body: {e}")))?;
            builder = builder.body(bytes);
        }

        info!("Sending {} request to {}", request.method, url);
        builder.send().await.map_err(|e| {
            error!("Failed HTTP request to {url}: {e}");
            ClientError::Network(e.to_string())
        })
    }

    /// Mint a new access token with the stored refresh token.
    ///
    /// Serialized: the first 401 holding the lock does the wire call, later
    /// ones find the rotated token and reuse it. Any failure here is final
    /// for the session, so the store is torn down before returning.
    async fn refresh_access_token(&self, observed: Option<&str>) -> Result<String, ClientError> {
        let _guard = self.refresh_lock.lock().await;

        // A concurrent request may have refreshed while we waited.
        if let Some(current) = self.credentials.access_token() {
            if observed != Some(current.as_str()) {
                info!("Access token already rotated by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.credentials.refresh_token() else {
            warn!("No refresh token stored, ending session");
            self.credentials.clear_all();
            return Err(ClientError::SessionExpired);
        };

        let url = format!("{}/auth/refresh", self.config.api_base);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {refresh_token}"))
            .send()
            .await
            .map_err(|e| {
                error!("Token refresh request failed: {e}");
                self.credentials.clear_all();
                ClientError::SessionExpired
            })?;

        if !response.status().is_success() {
            error!("Token refresh rejected with status {}", response.status());
            self.credentials.clear_all();
            return Err(ClientError::SessionExpired);
        }

        let refreshed: RefreshResponse = response.json().await.map_err(|e| {
            error!("Token refresh returned an unreadable body: {e}");
            self.credentials.clear_all();
            ClientError::SessionExpired
        })?;

        // The refresh token is not rotated by the server.
        self.credentials.set_access_token(&refreshed.access_token);
        info!("Access token refreshed");
        Ok(refreshed.access_token)
    }
}

/// Terminal handling shared by both attempts: non-success becomes `Api`,
/// 204 is a bodyless success, everything else parses as JSON.
async fn finish_response(response: Response) -> Result<Option<Value>, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        return Err(ClientError::Api(error_message(&body)));
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    response.json::<Value>().await.map(Some).map_err(|e| {
        if e.is_decode() {
            ClientError::Api(format!("Invalid JSON in response: {e}"))
        } else {
            ClientError::Network(e.to_string())
        }
    })
}

#[async_trait]
impl TaskApiDispatch for TaskApiClient {
    async fn send(&self, request: ApiRequest) -> Result<Option<Value>, ClientError> {
        TaskApiClient::send(self, request).await
    }
}
