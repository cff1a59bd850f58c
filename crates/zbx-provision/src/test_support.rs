use serde_json::{json, Value};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zbx_api::{ApiSession, JsonRpcClient};
use zbx_core::{Credentials, LoginField};

pub const TOKEN: &str = "0424bd59b807674191e7d77572075f33";

/// Log in against a mock server that accepts any `user.login`
pub async fn login(mock_server: &MockServer) -> ApiSession {
    Mock::given(method("POST"))
        .and(path("/api_jsonrpc.php"))
        .and(body_partial_json(json!({"method": "user.login"})))
        .respond_with(rpc_result(json!(TOKEN)))
        .mount(mock_server)
        .await;

    let url = Url::parse(&format!("{}/api_jsonrpc.php", mock_server.uri())).unwrap();
    JsonRpcClient::new(url, Duration::from_secs(5))
        .unwrap()
        .login(&Credentials::new("Admin", "zabbix"), LoginField::User)
        .await
        .unwrap()
}

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    }))
}

pub fn rpc_error(error: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "error": error,
        "id": 1
    }))
}

/// Matches an authorized call to `rpc_method`
pub fn rpc_call(rpc_method: &str) -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/api_jsonrpc.php"))
        .and(body_partial_json(json!({"method": rpc_method, "auth": TOKEN})))
}
