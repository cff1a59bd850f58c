//! Register the monitored host
//!
//! Ensures the host group exists, requires the template to exist already and
//! ensures the host exists with a DNS-addressed agent interface.

use clap::Args;
use tracing::debug;
use zbx_core::{
    HostTarget, ProvisionConfig, DEFAULT_HOST_GROUP, DEFAULT_HOST_NAME, DEFAULT_TEMPLATE_NAME,
};
use zbx_provision::flows;

use super::output::{print_header, print_info, print_section, render_event};
use super::ConnectionArgs;

#[derive(Args)]
pub struct EnsureHostCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Technical host name, also used as the agent DNS name
    #[arg(long, env = "ZABBIX_HOST_NAME", default_value = DEFAULT_HOST_NAME)]
    host_name: String,

    /// Host group the host is placed in
    #[arg(long, env = "ZABBIX_HOST_GROUP", default_value = DEFAULT_HOST_GROUP)]
    host_group: String,

    /// Template linked to the host; it must already exist
    #[arg(long, env = "ZABBIX_TEMPLATE_NAME", default_value = DEFAULT_TEMPLATE_NAME)]
    template_name: String,
}

impl EnsureHostCommand {
    pub fn provision_config(&self) -> anyhow::Result<ProvisionConfig> {
        let mut config = self.connection.provision_config()?;
        config.host = HostTarget {
            host_name: self.host_name.clone(),
            group_name: self.host_group.clone(),
            template_name: self.template_name.clone(),
        };
        Ok(config)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        print_header("ensure host");

        let config = self.provision_config()?;
        debug!(
            "Ensuring host '{}' in group '{}'",
            config.host.host_name, config.host.group_name
        );

        let rt = super::runtime()?;
        let provisioned = rt.block_on(flows::ensure_host(&config, render_event))?;

        print_section("Summary");
        print_info("Host group id", &provisioned.group.id);
        print_info("Template id", &provisioned.template_id);
        print_info("Host id", &provisioned.host.id);

        Ok(())
    }
}
