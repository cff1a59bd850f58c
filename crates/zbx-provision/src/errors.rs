//! Provisioning error types

use std::path::PathBuf;
use thiserror::Error;
use zbx_api::ApiError;
use zbx_core::ConfigError;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("{url} did not become available after {attempts} attempts (last error: {last_error})")]
    Unavailable {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),

    #[error("{kind} '{name}' not found")]
    MissingResource { kind: &'static str, name: String },

    #[error("Template file {} could not be read: {source}", .path.display())]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProvisionError {
    /// The API's `error` payload, when this failure came from an error response
    pub fn rpc_payload(&self) -> Option<&serde_json::Value> {
        match self {
            ProvisionError::Api(err) => err.rpc_payload(),
            _ => None,
        }
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
