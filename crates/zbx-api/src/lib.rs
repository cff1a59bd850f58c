//! Zabbix JSON-RPC API client
//!
//! This crate speaks JSON-RPC 2.0 over HTTP POST to a Zabbix frontend's
//! `api_jsonrpc.php` endpoint.
//!
//! # Usage
//!
//! ```ignore
//! use zbx_api::{JsonRpcClient, RpcCaller};
//!
//! let client = JsonRpcClient::from_config(&config.api)?;
//! let session = client.login(&config.api.credentials, config.api.login_field).await?;
//!
//! let groups = session
//!     .call("hostgroup.get", serde_json::json!({ "filter": { "name": ["Linux servers"] } }))
//!     .await?;
//! ```
//!
//! Every failure is terminal for the caller: there is no retry at this layer.

pub mod client;
pub mod envelope;
pub mod errors;

pub use client::{ApiSession, JsonRpcClient, RpcCaller};
pub use envelope::{RpcRequest, RpcResponse, JSONRPC_CONTENT_TYPE, JSONRPC_VERSION};
pub use errors::{ApiError, ApiResult};
