//! Push transport (agent -> monitor).

use std::time::Duration;

use async_trait::async_trait;

use reqloc_core::error::{Result, ReqlocError};
use reqloc_core::CountRecord;

/// Delivers one record snapshot to the monitor.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn push(&self, record: &CountRecord) -> Result<()>;
}

/// `POST <monitor_url>` with the record as a JSON object.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReqlocError::Internal(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PushTransport for HttpTransport {
    async fn push(&self, record: &CountRecord) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| ReqlocError::Transport(format!("push to {} failed: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReqlocError::Transport(format!(
                "push to {} rejected with {status}",
                self.url
            )));
        }
        Ok(())
    }
}
