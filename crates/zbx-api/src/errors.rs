//! JSON-RPC client error types

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to create HTTP client: {0}")]
    Http(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response to {method}: {message}")]
    MalformedResponse { method: String, message: String },

    #[error("{method} failed: {}", describe_rpc_error(.payload))]
    Rpc { method: String, payload: Value },

    #[error("Unexpected result from {method}: {message}")]
    UnexpectedResult { method: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The `error` member of the API response, exactly as the server sent it
    pub fn rpc_payload(&self) -> Option<&Value> {
        match self {
            ApiError::Rpc { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

fn describe_rpc_error(payload: &Value) -> String {
    let message = payload.get("message").and_then(Value::as_str);
    let data = payload.get("data").and_then(Value::as_str);
    let code = payload.get("code").and_then(Value::as_i64);

    match (message, data, code) {
        (Some(message), Some(data), Some(code)) => format!("{} {} (code {})", message, data, code),
        (Some(message), Some(data), None) => format!("{} {}", message, data),
        (Some(message), None, Some(code)) => format!("{} (code {})", message, code),
        (Some(message), None, None) => message.to_string(),
        _ => payload.to_string(),
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rpc_error_display_uses_message_and_data() {
        let err = ApiError::Rpc {
            method: "user.login".to_string(),
            payload: json!({
                "code": -32602,
                "message": "Invalid params.",
                "data": "Incorrect user name or password or account is temporarily blocked."
            }),
        };

        assert_eq!(
            err.to_string(),
            "user.login failed: Invalid params. Incorrect user name or password or account is temporarily blocked. (code -32602)"
        );
    }

    #[test]
    fn test_rpc_error_display_falls_back_to_raw_payload() {
        let err = ApiError::Rpc {
            method: "host.get".to_string(),
            payload: json!("boom"),
        };
        assert_eq!(err.to_string(), "host.get failed: \"boom\"");
    }

    #[test]
    fn test_rpc_payload_is_kept_verbatim() {
        let payload = json!({"code": 1, "message": "m", "data": {"nested": true}});
        let err = ApiError::Rpc {
            method: "configuration.import".to_string(),
            payload: payload.clone(),
        };
        assert_eq!(err.rpc_payload(), Some(&payload));

        let other = ApiError::Http("x".to_string());
        assert!(other.rpc_payload().is_none());
    }
}
