//! Connection and polling arguments shared by every subcommand

use clap::Args;
use std::time::Duration;
use zbx_core::{
    ApiConfig, Credentials, LoginField, ProvisionConfig, WaitPolicy, DEFAULT_ZABBIX_PASSWORD,
    DEFAULT_ZABBIX_URL, DEFAULT_ZABBIX_USER,
};

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the Zabbix web frontend
    #[arg(long, env = "ZABBIX_URL", default_value = DEFAULT_ZABBIX_URL)]
    pub url: String,

    /// API user
    #[arg(long, env = "ZABBIX_USER", default_value = DEFAULT_ZABBIX_USER)]
    pub user: String,

    /// API password
    #[arg(
        long,
        env = "ZABBIX_PASS",
        default_value = DEFAULT_ZABBIX_PASSWORD,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Login parameter name: `user` (Zabbix < 5.4) or `username`
    #[arg(long, env = "ZABBIX_LOGIN_FIELD", default_value = "user")]
    pub login_field: LoginField,

    /// Timeout for each API request, in seconds
    #[arg(long, env = "ZABBIX_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Maximum number of frontend availability probes
    #[arg(long, env = "ZABBIX_WAIT_ATTEMPTS", default_value_t = 60)]
    pub max_attempts: u32,

    /// Seconds to sleep between availability probes
    #[arg(long, env = "ZABBIX_WAIT_INTERVAL", default_value_t = 5)]
    pub interval: u64,

    /// Timeout for a single availability probe, in seconds
    #[arg(long, env = "ZABBIX_PROBE_TIMEOUT", default_value_t = 10)]
    pub probe_timeout: u64,
}

impl ConnectionArgs {
    /// Build a validated configuration with default host and template settings
    pub fn provision_config(&self) -> anyhow::Result<ProvisionConfig> {
        let api = ApiConfig::new(&self.url, Credentials::new(&self.user, &self.password))?
            .with_login_field(self.login_field)
            .with_request_timeout(Duration::from_secs(self.request_timeout));

        let mut config = ProvisionConfig::new(api);
        config.wait = WaitPolicy {
            max_attempts: self.max_attempts,
            interval: Duration::from_secs(self.interval),
            probe_timeout: Duration::from_secs(self.probe_timeout),
        };
        config.validate()?;

        Ok(config)
    }
}
