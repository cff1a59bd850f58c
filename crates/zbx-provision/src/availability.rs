//! Availability wait for the Zabbix web frontend
//!
//! Probes a URL with `GET` at a fixed interval until it answers with a 2xx status.
//! There is no back-off and no jitter; the attempt bound is the only way out
//! besides success.

use reqwest::Client;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;
use zbx_core::WaitPolicy;

use crate::errors::{ProvisionError, ProvisionResult};

pub struct AvailabilityWait {
    client: Client,
    url: Url,
    policy: WaitPolicy,
}

impl AvailabilityWait {
    pub fn new(url: Url, policy: WaitPolicy) -> ProvisionResult<Self> {
        policy.validate()?;

        let client = Client::builder()
            .timeout(policy.probe_timeout)
            .build()
            .map_err(|e| ProvisionError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            url,
            policy,
        })
    }

    /// Poll until the probe succeeds and return the attempt that succeeded.
    ///
    /// The interval is only slept between attempts, never after the last one.
    pub async fn wait(&self) -> ProvisionResult<u32> {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            match self.probe().await {
                Ok(()) => {
                    info!(
                        "{} is available (attempt {}/{})",
                        self.url, attempt, max_attempts
                    );
                    return Ok(attempt);
                }
                Err(reason) => {
                    warn!(
                        "Attempt {}/{}: {} not available yet: {}",
                        attempt, max_attempts, self.url, reason
                    );
                    last_error = reason;
                }
            }

            if attempt < max_attempts {
                sleep(self.policy.interval).await;
            }
        }

        Err(ProvisionError::Unavailable {
            url: self.url.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }

    async fn probe(&self) -> Result<(), String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("HTTP {}", status))
        }
    }
}
