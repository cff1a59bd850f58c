//! HTTP transport and authenticated session for the Zabbix JSON-RPC API

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;
use zbx_core::{ApiConfig, Credentials, LoginField};

use crate::envelope::{RpcRequest, RpcResponse, JSONRPC_CONTENT_TYPE};
use crate::errors::{ApiError, ApiResult};

const LOGIN_METHOD: &str = "user.login";
const MAX_BODY_IN_ERROR: usize = 512;

/// Issues authorized JSON-RPC calls and returns the `result` member unchanged.
///
/// This is the seam the reconciler and the configuration import are written against.
#[async_trait]
pub trait RpcCaller: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> ApiResult<Value>;
}

/// Unauthenticated JSON-RPC client.
///
/// Requests are numbered from 1 and sent one at a time.
pub struct JsonRpcClient {
    client: Client,
    api_url: Url,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(api_url: Url, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config.api_url().clone(), config.request_timeout)
    }

    /// Send one request and return its `result`.
    ///
    /// Transport failures, unparseable bodies, `error` responses and responses
    /// without a `result` are all returned as errors.
    pub async fn call(&self, method: &str, params: Value, auth: Option<&str>) -> ApiResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(method, &params, id, auth);
        let body = serde_json::to_vec(&request)?;

        debug!("JSON-RPC request: {} (id {})", method, id);

        let response = self
            .client
            .post(self.api_url.clone())
            .header(CONTENT_TYPE, JSONRPC_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: self.api_url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: self.api_url.to_string(),
                source,
            })?;

        let parsed: RpcResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::MalformedResponse {
                method: method.to_string(),
                message: format!(
                    "{} (HTTP {}, body: {})",
                    e,
                    status,
                    truncate_body(&text)
                ),
            })?;

        if let Some(payload) = parsed.error {
            return Err(ApiError::Rpc {
                method: method.to_string(),
                payload,
            });
        }

        parsed.result.ok_or_else(|| ApiError::MalformedResponse {
            method: method.to_string(),
            message: format!(
                "response has neither result nor error (HTTP {}, body: {})",
                status,
                truncate_body(&text)
            ),
        })
    }

    /// Authenticate with `user.login` and return a session holding the token.
    pub async fn login(self, credentials: &Credentials, field: LoginField) -> ApiResult<ApiSession> {
        let mut params = Map::new();
        params.insert(
            field.as_str().to_string(),
            Value::String(credentials.username.clone()),
        );
        params.insert(
            "password".to_string(),
            Value::String(credentials.password.clone()),
        );

        let result = self.call(LOGIN_METHOD, Value::Object(params), None).await?;

        let token = match result.as_str() {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => {
                return Err(ApiError::UnexpectedResult {
                    method: LOGIN_METHOD.to_string(),
                    message: format!("expected a session token, got {}", result),
                })
            }
        };

        info!(
            "Authenticated against {} as {}",
            self.api_url, credentials.username
        );

        Ok(ApiSession {
            client: self,
            token,
        })
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_BODY_IN_ERROR {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(MAX_BODY_IN_ERROR).collect();
    truncated.push_str("...");
    truncated
}

/// An authenticated API session.
///
/// The token is fixed for the lifetime of the session and is never refreshed.
pub struct ApiSession {
    client: JsonRpcClient,
    token: String,
}

impl ApiSession {
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for ApiSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSession")
            .field("api_url", &self.client.api_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl RpcCaller for ApiSession {
    async fn call(&self, method: &str, params: Value) -> ApiResult<Value> {
        self.client.call(method, params, Some(&self.token)).await
    }
}
