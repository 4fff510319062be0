//! Process supervision for cluster node binaries
//!
//! Each node runs as an external child process with stdout/stderr captured
//! to a per-node log file and its pid recorded in a per-node pid file. Kill
//! is forcible (SIGKILL semantics) and idempotent: cleanup must succeed when
//! nothing is running, and must also reach nodes left behind by a previous
//! harness invocation, which are only known through their pid files.
//!
//! A set owns its children until [`ProcessSet::detach`] releases them: a
//! successful bring-up detaches so the clusters outlive the setup binary,
//! while any error path still reaps everything on drop.

use crate::cluster::Endpoint;
use crate::common::{Error, NodeCommand, Result};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// Observed state of one node process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// No child is tracked for this endpoint.
    NotStarted,
    Running,
    /// Child is tracked but has terminated.
    Exited,
}

/// A set of supervised node processes, keyed by endpoint.
pub struct ProcessSet {
    label: String,
    log_dir: PathBuf,
    children: HashMap<Endpoint, Child>,
}

impl ProcessSet {
    pub fn new(label: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            log_dir: log_dir.into(),
            children: HashMap::new(),
        }
    }

    fn node_path(&self, endpoint: &Endpoint, ext: &str) -> PathBuf {
        self.log_dir.join(format!(
            "{}-{}.{}",
            self.label,
            endpoint.as_str().replace([':', '/'], "_"),
            ext
        ))
    }

    /// Pid recorded for this endpoint, possibly by a previous invocation.
    fn recorded_pid(&self, endpoint: &Endpoint) -> Option<u32> {
        let raw = fs::read_to_string(self.node_path(endpoint, "pid")).ok()?;
        raw.trim().parse().ok()
    }

    /// Launch one node. Any process already running under this endpoint —
    /// tracked here or recorded in a pid file — is killed first, so spawn is
    /// safe to call on a half-torn-down fixture.
    pub fn spawn(
        &mut self,
        endpoint: &Endpoint,
        command: &NodeCommand,
        extra_args: &[String],
    ) -> Result<()> {
        self.kill(std::slice::from_ref(endpoint))?;

        fs::create_dir_all(&self.log_dir)?;
        let log_path = self.node_path(endpoint, "log");
        let log = fs::File::create(&log_path)?;
        let log_err = log.try_clone()?;

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        cmd.args(extra_args);
        cmd.stdout(Stdio::from(log));
        cmd.stderr(Stdio::from(log_err));

        let child = cmd.spawn().map_err(|e| Error::Spawn {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        fs::write(self.node_path(endpoint, "pid"), child.id().to_string())?;
        tracing::info!(
            "Spawned {} node {} (pid {}), log: {}",
            self.label,
            endpoint,
            child.id(),
            log_path.display()
        );
        self.children.insert(endpoint.clone(), child);
        Ok(())
    }

    /// Forcibly terminate and reap the given nodes. Endpoints with neither a
    /// tracked child nor a pid file are skipped.
    pub fn kill(&mut self, endpoints: &[Endpoint]) -> Result<()> {
        for endpoint in endpoints {
            if let Some(mut child) = self.children.remove(endpoint) {
                let _ = child.kill();
                let _ = child.wait();
                let _ = fs::remove_file(self.node_path(endpoint, "pid"));
                tracing::info!("Killed {} node {}", self.label, endpoint);
            } else if let Some(pid) = self.recorded_pid(endpoint) {
                kill_pid(pid);
                let _ = fs::remove_file(self.node_path(endpoint, "pid"));
                tracing::info!(
                    "Killed {} node {} from pid file (pid {})",
                    self.label,
                    endpoint,
                    pid
                );
            }
        }
        Ok(())
    }

    /// Release ownership of the running children without terminating them.
    /// Pid files stay behind so a later invocation can still clean up.
    pub fn detach(&mut self) {
        for endpoint in self.children.keys() {
            tracing::debug!("Detaching {} node {}", self.label, endpoint);
        }
        self.children.clear();
    }

    /// Current state of one node.
    pub fn state(&mut self, endpoint: &Endpoint) -> NodeState {
        match self.children.get_mut(endpoint) {
            None => NodeState::NotStarted,
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => NodeState::Exited,
                Ok(None) => NodeState::Running,
                Err(_) => NodeState::Exited,
            },
        }
    }

    /// Poll an HTTP path on the node until it answers, the child dies, or
    /// the window elapses.
    pub async fn wait_ready(
        &mut self,
        endpoint: &Endpoint,
        path: &str,
        timeout: Duration,
    ) -> Result<()> {
        let url = format!("{}{}", endpoint.http_url(), path);
        let client = reqwest::Client::new();
        let start = Instant::now();

        loop {
            if let Some(child) = self.children.get_mut(endpoint) {
                if let Ok(Some(status)) = child.try_wait() {
                    return Err(Error::NodeExited {
                        endpoint: endpoint.to_string(),
                        status: status.to_string(),
                    });
                }
            } else {
                return Err(Error::Spawn {
                    endpoint: endpoint.to_string(),
                    reason: "no process tracked for endpoint".into(),
                });
            }

            if start.elapsed() > timeout {
                return Err(Error::Timeout(format!("{} not ready at {}", endpoint, url)));
            }

            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    tracing::info!("{} node {} ready", self.label, endpoint);
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// SIGKILL an arbitrary pid, e.g. one recorded by a previous invocation.
fn kill_pid(pid: u32) {
    let _ = Command::new("kill")
        .args(["-9", &pid.to_string()])
        .status();
}

// Error-path reaper only: a successful bring-up detaches its children first.
impl Drop for ProcessSet {
    fn drop(&mut self) {
        for (endpoint, child) in self.children.iter_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                tracing::debug!("Reaping leftover {} node {}", self.label, endpoint);
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}
