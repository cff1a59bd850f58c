use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zbx_api::{ApiError, JsonRpcClient, RpcCaller, JSONRPC_CONTENT_TYPE};
use zbx_core::{ApiConfig, Credentials, LoginField};

const TOKEN: &str = "0424bd59b807674191e7d77572075f33";

#[tokio::test]
async fn test_session_under_a_sub_path() {
    let mock_server = MockServer::start().await;
    let base = format!("{}/zabbix", mock_server.uri());

    Mock::given(method("POST"))
        .and(path("/zabbix/api_jsonrpc.php"))
        .and(header("content-type", JSONRPC_CONTENT_TYPE))
        .and(body_partial_json(json!({
            "method": "user.login",
            "params": {"username": "Admin", "password": "zabbix"},
            "auth": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": TOKEN,
            "id": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/zabbix/api_jsonrpc.php"))
        .and(body_partial_json(json!({
            "method": "hostgroup.get",
            "auth": TOKEN,
            "id": 2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "result": [{"groupid": "2"}],
            "id": 2
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ApiConfig::new(&base, Credentials::new("Admin", "zabbix"))
        .unwrap()
        .with_login_field(LoginField::Username)
        .with_request_timeout(Duration::from_secs(5));

    let session = JsonRpcClient::from_config(&config)
        .unwrap()
        .login(&config.credentials, config.login_field)
        .await
        .unwrap();
    assert_eq!(session.token(), TOKEN);

    let groups = session
        .call("hostgroup.get", json!({"filter": {"name": ["Linux servers"]}}))
        .await
        .unwrap();
    assert_eq!(groups, json!([{"groupid": "2"}]));
}

#[tokio::test]
async fn test_rejected_credentials_keep_the_error_payload() {
    let mock_server = MockServer::start().await;

    let error = json!({
        "code": -32602,
        "message": "Invalid params.",
        "data": "Incorrect user name or password or account is temporarily blocked."
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "error": error,
            "id": 1
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ApiConfig::new(&mock_server.uri(), Credentials::new("Admin", "wrong")).unwrap();
    let err = JsonRpcClient::from_config(&config)
        .unwrap()
        .login(&config.credentials, config.login_field)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Rpc { .. }));
    assert_eq!(err.rpc_payload(), Some(&error));
}
