//! Coordination-service control
//!
//! The coordination service is a ZooKeeper-like external process holding
//! cluster membership and the naming-cluster leader. The harness owns its
//! lifecycle: stop, namespace wipe, restart, and leader read-back via the
//! `/admin/status` document.

use crate::cluster::{Endpoint, ProcessSet};
use crate::common::{retry_with_backoff, CoordinationConfig, Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub struct CoordinationService {
    config: CoordinationConfig,
    processes: ProcessSet,
}

impl CoordinationService {
    pub fn new(config: CoordinationConfig, log_dir: &Path) -> Self {
        Self {
            config,
            processes: ProcessSet::new("coordination", log_dir),
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.config.endpoint
    }

    /// Launch the coordination service and wait until its status endpoint
    /// answers.
    pub async fn start(&mut self) -> Result<()> {
        let timeout = self.config.startup_timeout()?;
        let extra_args = vec![
            "--bind".to_string(),
            self.config.endpoint.to_string(),
            "--data-dir".to_string(),
            self.config.data_dir.display().to_string(),
        ];
        self.processes
            .spawn(&self.config.endpoint, &self.config.command, &extra_args)?;
        self.processes
            .wait_ready(&self.config.endpoint, "/admin/status", timeout)
            .await
    }

    /// Forcibly stop the coordination service. No-op when not running.
    pub fn stop(&mut self) -> Result<()> {
        self.processes
            .kill(std::slice::from_ref(&self.config.endpoint))
    }

    /// Release the running service so it outlives this handle.
    pub fn detach(&mut self) {
        self.processes.detach();
    }

    /// Wipe the coordination namespace (the service's state directory).
    pub fn clear(&mut self) -> Result<()> {
        if self.config.data_dir.exists() {
            fs::remove_dir_all(&self.config.data_dir)?;
        }
        fs::create_dir_all(&self.config.data_dir)?;
        tracing::info!(
            "Cleared coordination state at {}",
            self.config.data_dir.display()
        );
        Ok(())
    }

    /// Read back the elected naming-cluster leader. Elections are usually
    /// still settling right after bring-up, so the query is retried.
    pub async fn leader(&self) -> Result<String> {
        let client = reqwest::Client::new();
        let url = format!("{}/admin/status", self.config.endpoint.http_url());

        retry_with_backoff(
            || {
                let client = client.clone();
                let url = url.clone();
                async move { fetch_leader(&client, &url).await }
            },
            10,
            Duration::from_millis(200),
        )
        .await
    }
}

async fn fetch_leader(client: &reqwest::Client, url: &str) -> Result<String> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Http(format!("{} returned {}", url, resp.status())));
    }
    let status: Value = resp.json().await?;
    leader_from_status(&status)
        .ok_or_else(|| Error::NoLeader("status document has no leader".into()))
}

/// Extract the leader address from an `/admin/status` document.
fn leader_from_status(status: &Value) -> Option<String> {
    status
        .get("leader")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
