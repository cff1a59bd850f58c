//! Import a template document into Zabbix
//!
//! Waits for the frontend, reads the document, authenticates and sends a
//! single `configuration.import` with the fixed create/update rules.

use clap::Args;
use std::path::PathBuf;
use tracing::debug;
use zbx_core::{ProvisionConfig, DEFAULT_TEMPLATE_PATH};
use zbx_provision::flows;

use super::output::{print_header, print_info, print_section, render_event};
use super::ConnectionArgs;

#[derive(Args)]
pub struct ImportTemplateCommand {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Template document to import (.xml, .json, .yaml or .yml)
    #[arg(long, env = "TEMPLATE_PATH", default_value = DEFAULT_TEMPLATE_PATH)]
    template_path: PathBuf,
}

impl ImportTemplateCommand {
    pub fn provision_config(&self) -> anyhow::Result<ProvisionConfig> {
        let mut config = self.connection.provision_config()?;
        config.template_path = self.template_path.clone();
        Ok(config)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        print_header("import template");

        let config = self.provision_config()?;
        debug!("Importing {}", config.template_path.display());

        let rt = super::runtime()?;
        let result = rt.block_on(flows::import_template(&config, render_event))?;

        print_section("Summary");
        print_info("Template", &config.template_path.display().to_string());
        print_info("API result", &result.to_string());

        Ok(())
    }
}
