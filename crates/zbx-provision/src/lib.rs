//! Provisioning flows for a Zabbix server
//!
//! - [`availability`]: fixed-interval polling of the web frontend until it answers
//! - [`reconciler`]: get-or-create of named resources (host groups, hosts) and
//!   lookup of resources that must already exist (templates)
//! - [`import`]: one-shot `configuration.import` of a template document
//! - [`flows`]: the wait / authenticate / provision sequences the CLI runs
//!
//! All flows are sequential: each API call is awaited before the next one is issued.

pub mod availability;
pub mod errors;
pub mod flows;
pub mod import;
pub mod reconciler;
pub mod resources;

#[cfg(test)]
pub(crate) mod test_support;

pub use availability::AvailabilityWait;
pub use errors::{ProvisionError, ProvisionResult};
pub use flows::FlowEvent;
pub use import::{
    default_import_rules, import_configuration, ImportFormat, ImportRule, TemplateDocument,
};
pub use reconciler::{HostProvisioning, ReconcileOutcome, Reconciled, Reconciler};
pub use resources::ResourceKind;
pub use zbx_core::WaitPolicy;
