//! Descriptors for the Zabbix objects the reconciler manages

use serde_json::{json, Map, Value};

/// Zabbix agent listen port used for the host's single interface
pub const AGENT_PORT: &str = "10050";

/// Interface type 1 is the Zabbix agent
const AGENT_INTERFACE_TYPE: u8 = 1;

/// How a resource type is looked up by name and, when allowed, created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    pub label: &'static str,
    pub get_method: &'static str,
    /// `None` for resources that must already exist
    pub create_method: Option<&'static str>,
    pub name_field: &'static str,
    pub id_field: &'static str,
    /// Key of the id list in the create response
    pub created_ids_field: Option<&'static str>,
}

pub const HOST_GROUP: ResourceKind = ResourceKind {
    label: "host group",
    get_method: "hostgroup.get",
    create_method: Some("hostgroup.create"),
    name_field: "name",
    id_field: "groupid",
    created_ids_field: Some("groupids"),
};

pub const TEMPLATE: ResourceKind = ResourceKind {
    label: "template",
    get_method: "template.get",
    create_method: None,
    name_field: "host",
    id_field: "templateid",
    created_ids_field: None,
};

pub const HOST: ResourceKind = ResourceKind {
    label: "host",
    get_method: "host.get",
    create_method: Some("host.create"),
    name_field: "host",
    id_field: "hostid",
    created_ids_field: Some("hostids"),
};

impl ResourceKind {
    /// `<kind>.get` parameters matching exactly one name
    pub fn lookup_params(&self, name: &str) -> Value {
        let mut filter = Map::new();
        filter.insert(self.name_field.to_string(), json!([name]));

        json!({
            "output": [self.id_field],
            "filter": filter,
        })
    }
}

pub fn host_group_payload(name: &str) -> Value {
    json!({ "name": name })
}

/// `host.create` payload linking the host to one group and one template.
///
/// The interface is addressed by DNS name, not IP.
pub fn host_payload(host_name: &str, group_id: &str, template_id: &str) -> Value {
    json!({
        "host": host_name,
        "interfaces": [{
            "type": AGENT_INTERFACE_TYPE,
            "main": 1,
            "useip": 0,
            "ip": "",
            "dns": host_name,
            "port": AGENT_PORT,
        }],
        "groups": [{ "groupid": group_id }],
        "templates": [{ "templateid": template_id }],
    })
}
