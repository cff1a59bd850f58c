//! Provisioning configuration
//!
//! Everything the tool needs is collected once at start-up into a [`ProvisionConfig`]
//! and handed explicitly to the availability wait, the API session and the reconciler.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_ZABBIX_URL: &str = "http://zabbix-web:8080";
pub const DEFAULT_ZABBIX_USER: &str = "Admin";
pub const DEFAULT_ZABBIX_PASSWORD: &str = "zabbix";
pub const DEFAULT_HOST_NAME: &str = "zabbix-agent";
pub const DEFAULT_HOST_GROUP: &str = "Applications";
pub const DEFAULT_TEMPLATE_NAME: &str = "Linux by Zabbix agent";
pub const DEFAULT_TEMPLATE_PATH: &str = "/template.xml";

/// Path of the JSON-RPC endpoint relative to the frontend base URL
pub const API_ENDPOINT: &str = "api_jsonrpc.php";

/// Parameter key carrying the user name in `user.login`.
///
/// Zabbix releases before 5.4 accept `user`; later releases only accept `username`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginField {
    #[default]
    User,
    Username,
}

impl LoginField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginField::User => "user",
            LoginField::Username => "username",
        }
    }
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoginField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(LoginField::User),
            "username" => Ok(LoginField::Username),
            other => Err(format!(
                "unknown login field '{}' (expected 'user' or 'username')",
                other
            )),
        }
    }
}

/// Admin credentials for `user.login`
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection settings for the Zabbix frontend and its JSON-RPC API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    api_url: Url,
    pub credentials: Credentials,
    pub login_field: LoginField,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str, credentials: Credentials) -> ConfigResult<Self> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_string()));
        }

        // Url::join replaces the last path segment unless the path ends with '/'
        let mut directory = base_url.clone();
        if !directory.path().ends_with('/') {
            let path = format!("{}/", directory.path());
            directory.set_path(&path);
        }
        let api_url = directory
            .join(API_ENDPOINT)
            .map_err(|source| ConfigError::InvalidUrl {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            base_url,
            api_url,
            credentials,
            login_field: LoginField::default(),
            request_timeout: Duration::from_secs(30),
        })
    }

    pub fn with_login_field(mut self, login_field: LoginField) -> Self {
        self.login_field = login_field;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Frontend URL, used as the availability probe target
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// JSON-RPC endpoint
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }
}

/// Fixed-interval polling bounds for the availability wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(10),
        }
    }
}

impl WaitPolicy {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidWaitPolicy(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::InvalidWaitPolicy(
                "probe_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// The host the `ensure-host` flow registers, with the group and template it is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub host_name: String,
    pub group_name: String,
    pub template_name: String,
}

impl Default for HostTarget {
    fn default() -> Self {
        Self {
            host_name: DEFAULT_HOST_NAME.to_string(),
            group_name: DEFAULT_HOST_GROUP.to_string(),
            template_name: DEFAULT_TEMPLATE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    pub api: ApiConfig,
    pub wait: WaitPolicy,
    pub host: HostTarget,
    pub template_path: PathBuf,
}

impl ProvisionConfig {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            api,
            wait: WaitPolicy::default(),
            host: HostTarget::default(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.wait.validate()
    }
}
