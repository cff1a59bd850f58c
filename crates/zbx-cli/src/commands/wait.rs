//! Wait for the Zabbix web frontend to become available

use clap::Args;
use tracing::debug;
use zbx_core::ProvisionConfig;
use zbx_provision::flows;

use super::output::{print_header, render_event};
use super::ConnectionArgs;

#[derive(Args)]
pub struct WaitCommand {
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl WaitCommand {
    pub fn provision_config(&self) -> anyhow::Result<ProvisionConfig> {
        self.connection.provision_config()
    }

    pub fn execute(self) -> anyhow::Result<()> {
        print_header("wait");

        let config = self.provision_config()?;
        debug!("Waiting for {}", config.api.base_url());

        let rt = super::runtime()?;
        let mut on_event = render_event;
        rt.block_on(flows::wait_for_frontend(&config, &mut on_event))?;

        Ok(())
    }
}
