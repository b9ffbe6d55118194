// Report delivery: one authenticated POST per cycle, retried with
// exponential backoff instead of aborting the cycle loop.

use crate::error::AgentError;
use crate::models::DeviceSnapshot;
use std::time::Duration;
use tracing::instrument;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

pub struct Reporter {
    client: reqwest::Client,
    report_url: String,
    token: String,
    attempts: u32,
}

impl Reporter {
    pub fn new(host: &str, port: u16, token: &str, attempts: u32) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            report_url: format!("http://{}:{}/api/report", host, port),
            token: token.to_string(),
            attempts: attempts.max(1),
        })
    }

    /// Delivers one snapshot batch. Retries transport failures and
    /// non-success statuses with doubling delays; after the last attempt
    /// the error is returned to the cycle loop, which logs and moves on.
    #[instrument(skip(self, devices), fields(operation = "send_report", devices = devices.len()))]
    pub async fn send_report(&self, devices: &[DeviceSnapshot]) -> Result<(), AgentError> {
        let mut backoff = INITIAL_BACKOFF;
        let mut last_reason = String::new();

        for attempt in 1..=self.attempts {
            match self.try_send(devices).await {
                Ok(()) => {
                    tracing::info!(attempt, "report delivered");
                    return Ok(());
                }
                Err(reason) => {
                    tracing::warn!(attempt, max_attempts = self.attempts, reason = %reason, "report attempt failed");
                    last_reason = reason;
                }
            }
            if attempt < self.attempts {
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(AgentError::Transport {
            url: self.report_url.clone(),
            attempts: self.attempts,
            reason: last_reason,
        })
    }

    async fn try_send(&self, devices: &[DeviceSnapshot]) -> Result<(), String> {
        let response = self
            .client
            .post(&self.report_url)
            .header("token", &self.token)
            .json(devices)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("collector returned {}", status))
        }
    }
}
