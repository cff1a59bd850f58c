//! Get-or-create reconciliation of named Zabbix resources
//!
//! Resources are matched on their natural key (the name) only. An existing
//! resource is used as-is even if its other attributes differ from what this
//! tool would have created: there is no update path and nothing is deleted.

use serde_json::Value;
use tracing::{debug, info};
use zbx_api::{ApiError, RpcCaller};
use zbx_core::HostTarget;

use crate::errors::{ProvisionError, ProvisionResult};
use crate::resources::{self, ResourceKind, HOST, HOST_GROUP, TEMPLATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Existing,
    Created,
}

/// A resolved resource and which branch produced its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub kind: &'static str,
    pub name: String,
    pub id: String,
    pub outcome: ReconcileOutcome,
}

impl Reconciled {
    pub fn was_created(&self) -> bool {
        self.outcome == ReconcileOutcome::Created
    }
}

/// Result of the `ensure-host` flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProvisioning {
    pub group: Reconciled,
    pub template_id: String,
    pub host: Reconciled,
}

pub struct Reconciler<'a, C: RpcCaller + ?Sized> {
    caller: &'a C,
}

impl<'a, C: RpcCaller + ?Sized> Reconciler<'a, C> {
    pub fn new(caller: &'a C) -> Self {
        Self { caller }
    }

    /// Look a resource up by name, returning its id if it exists
    pub async fn find(&self, kind: &ResourceKind, name: &str) -> ProvisionResult<Option<String>> {
        debug!("Looking up {} '{}'", kind.label, name);

        let result = self
            .caller
            .call(kind.get_method, kind.lookup_params(name))
            .await?;

        let items = result.as_array().ok_or_else(|| ApiError::UnexpectedResult {
            method: kind.get_method.to_string(),
            message: format!("expected an array, got {}", result),
        })?;

        match items.first() {
            Some(item) => Ok(Some(read_id(kind.get_method, item.get(kind.id_field))?)),
            None => Ok(None),
        }
    }

    /// Resolve a resource that must already exist
    pub async fn require(&self, kind: &ResourceKind, name: &str) -> ProvisionResult<String> {
        match self.find(kind, name).await? {
            Some(id) => {
                info!("Found {} '{}' (id {})", kind.label, name, id);
                Ok(id)
            }
            None => Err(ProvisionError::MissingResource {
                kind: kind.label,
                name: name.to_string(),
            }),
        }
    }

    /// Return the existing resource with this name, or create it with the payload from `build`.
    ///
    /// `build` is only invoked when a create call is actually issued.
    pub async fn ensure<F>(
        &self,
        kind: &ResourceKind,
        name: &str,
        build: F,
    ) -> ProvisionResult<Reconciled>
    where
        F: FnOnce() -> Value + Send,
    {
        if let Some(id) = self.find(kind, name).await? {
            info!("{} '{}' already exists (id {})", kind.label, name, id);
            return Ok(Reconciled {
                kind: kind.label,
                name: name.to_string(),
                id,
                outcome: ReconcileOutcome::Existing,
            });
        }

        let (create_method, ids_field) = match (kind.create_method, kind.created_ids_field) {
            (Some(method), Some(ids_field)) => (method, ids_field),
            _ => {
                return Err(ProvisionError::MissingResource {
                    kind: kind.label,
                    name: name.to_string(),
                })
            }
        };

        let result = self.caller.call(create_method, build()).await?;
        let id = read_id(create_method, result.get(ids_field).and_then(|ids| ids.get(0)))?;

        info!("Created {} '{}' (id {})", kind.label, name, id);
        Ok(Reconciled {
            kind: kind.label,
            name: name.to_string(),
            id,
            outcome: ReconcileOutcome::Created,
        })
    }

    pub async fn ensure_host_group(&self, name: &str) -> ProvisionResult<Reconciled> {
        self.ensure(&HOST_GROUP, name, || resources::host_group_payload(name)).await
    }

    pub async fn require_template(&self, name: &str) -> ProvisionResult<String> {
        self.require(&TEMPLATE, name).await
    }

    /// Ensure the host exists; a new host is placed in `group_id` and linked to `template_id`
    pub async fn ensure_agent_host(
        &self,
        host_name: &str,
        group_id: &str,
        template_id: &str,
    ) -> ProvisionResult<Reconciled> {
        self.ensure(&HOST, host_name, || {
            resources::host_payload(host_name, group_id, template_id)
        })
        .await
    }

    /// Ensure the host group exists, require the template, then ensure the host
    /// linked to both.
    pub async fn ensure_host(&self, target: &HostTarget) -> ProvisionResult<HostProvisioning> {
        let group = self.ensure_host_group(&target.group_name).await?;
        let template_id = self.require_template(&target.template_name).await?;
        let host = self
            .ensure_agent_host(&target.host_name, &group.id, &template_id)
            .await?;

        Ok(HostProvisioning {
            group,
            template_id,
            host,
        })
    }
}

/// Zabbix returns ids as strings; numbers are accepted too.
fn read_id(method: &str, value: Option<&Value>) -> Result<String, ApiError> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        other => Err(ApiError::UnexpectedResult {
            method: method.to_string(),
            message: format!(
                "missing identifier in result (found {})",
                other.map(Value::to_string).unwrap_or_else(|| "nothing".to_string())
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{login, rpc_call, rpc_error, rpc_result};
    use serde_json::json;
    use wiremock::matchers::body_partial_json;
    use wiremock::MockServer;

    fn target() -> HostTarget {
        HostTarget {
            host_name: "fasttech-api".to_string(),
            group_name: "FastTechFood".to_string(),
            template_name: "Linux by Zabbix agent".to_string(),
        }
    }

    #[test]
    fn test_read_id_accepts_strings_and_numbers() {
        assert_eq!(read_id("host.get", Some(&json!("10084"))).unwrap(), "10084");
        assert_eq!(read_id("host.get", Some(&json!(10084))).unwrap(), "10084");
        assert!(read_id("host.get", Some(&json!(""))).is_err());
        assert!(read_id("host.get", Some(&json!(null))).is_err());
        assert!(read_id("host.get", None).is_err());
    }

    #[tokio::test]
    async fn test_existing_group_issues_no_create() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .and(body_partial_json(json!({"params": {"filter": {"name": ["FastTechFood"]}}})))
            .respond_with(rpc_result(json!([{"groupid": "22"}])))
            .expect(1)
            .mount(&mock_server)
            .await;

        rpc_call("hostgroup.create")
            .respond_with(rpc_result(json!({"groupids": ["99"]})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let group = reconciler
            .ensure(&HOST_GROUP, "FastTechFood", || {
                resources::host_group_payload("FastTechFood")
            })
            .await
            .unwrap();

        assert_eq!(group.id, "22");
        assert_eq!(group.outcome, ReconcileOutcome::Existing);
        assert!(!group.was_created());
    }

    #[tokio::test]
    async fn test_absent_group_is_created_once_with_same_name() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .respond_with(rpc_result(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        rpc_call("hostgroup.create")
            .and(body_partial_json(json!({"params": {"name": "FastTechFood"}})))
            .respond_with(rpc_result(json!({"groupids": ["23"]})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let group = reconciler
            .ensure(&HOST_GROUP, "FastTechFood", || {
                resources::host_group_payload("FastTechFood")
            })
            .await
            .unwrap();

        assert_eq!(group.id, "23");
        assert!(group.was_created());
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("template.get")
            .respond_with(rpc_result(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let err = reconciler
            .require(&TEMPLATE, "Template Missing")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::MissingResource { kind: "template", ref name } if name == "Template Missing"
        ));
    }

    #[tokio::test]
    async fn test_ensure_on_lookup_only_kind_never_creates() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("template.get")
            .respond_with(rpc_result(json!([])))
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let err = reconciler
            .ensure(&TEMPLATE, "Template Missing", || json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ProvisionError::MissingResource { .. }));
    }

    #[tokio::test]
    async fn test_ensure_host_creates_everything_missing() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .respond_with(rpc_result(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;
        rpc_call("hostgroup.create")
            .respond_with(rpc_result(json!({"groupids": ["23"]})))
            .expect(1)
            .mount(&mock_server)
            .await;
        rpc_call("template.get")
            .and(body_partial_json(json!({"params": {"filter": {"host": ["Linux by Zabbix agent"]}}})))
            .respond_with(rpc_result(json!([{"templateid": "10001"}])))
            .expect(1)
            .mount(&mock_server)
            .await;
        rpc_call("host.get")
            .respond_with(rpc_result(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;
        rpc_call("host.create")
            .and(body_partial_json(json!({
                "params": {
                    "host": "fasttech-api",
                    "groups": [{"groupid": "23"}],
                    "templates": [{"templateid": "10001"}]
                }
            })))
            .respond_with(rpc_result(json!({"hostids": ["10105"]})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let provisioned = reconciler.ensure_host(&target()).await.unwrap();

        assert_eq!(provisioned.group.id, "23");
        assert!(provisioned.group.was_created());
        assert_eq!(provisioned.template_id, "10001");
        assert_eq!(provisioned.host.id, "10105");
        assert!(provisioned.host.was_created());
    }

    #[tokio::test]
    async fn test_ensure_host_is_idempotent() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .respond_with(rpc_result(json!([{"groupid": "22"}])))
            .mount(&mock_server)
            .await;
        rpc_call("template.get")
            .respond_with(rpc_result(json!([{"templateid": "10001"}])))
            .mount(&mock_server)
            .await;
        rpc_call("host.get")
            .respond_with(rpc_result(json!([{"hostid": "10084"}])))
            .mount(&mock_server)
            .await;
        rpc_call("hostgroup.create")
            .respond_with(rpc_result(json!({"groupids": ["1"]})))
            .expect(0)
            .mount(&mock_server)
            .await;
        rpc_call("host.create")
            .respond_with(rpc_result(json!({"hostids": ["1"]})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let provisioned = reconciler.ensure_host(&target()).await.unwrap();

        assert_eq!(provisioned.group.outcome, ReconcileOutcome::Existing);
        assert_eq!(provisioned.host.outcome, ReconcileOutcome::Existing);
        assert_eq!(provisioned.host.id, "10084");
    }

    #[tokio::test]
    async fn test_api_error_stops_further_calls() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .respond_with(rpc_error(json!({
                "code": -32500,
                "message": "Application error.",
                "data": "No permissions to referred object or it does not exist!"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        rpc_call("hostgroup.create")
            .respond_with(rpc_result(json!({"groupids": ["1"]})))
            .expect(0)
            .mount(&mock_server)
            .await;
        rpc_call("template.get")
            .respond_with(rpc_result(json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;
        rpc_call("host.get")
            .respond_with(rpc_result(json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let err = reconciler.ensure_host(&target()).await.unwrap_err();

        assert_eq!(err.rpc_payload().unwrap()["code"], -32500);
    }

    #[tokio::test]
    async fn test_create_response_without_ids_is_rejected() {
        let mock_server = MockServer::start().await;
        let session = login(&mock_server).await;

        rpc_call("hostgroup.get")
            .respond_with(rpc_result(json!([])))
            .mount(&mock_server)
            .await;
        rpc_call("hostgroup.create")
            .respond_with(rpc_result(json!({})))
            .mount(&mock_server)
            .await;

        let reconciler = Reconciler::new(&session);
        let err = reconciler
            .ensure(&HOST_GROUP, "FastTechFood", || {
                resources::host_group_payload("FastTechFood")
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::Api(ApiError::UnexpectedResult { .. })
        ));
    }
}
