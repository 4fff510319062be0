//! Naming-service cluster client
//!
//! Supervises the nameserver nodes and, because the nameservers register
//! leadership in it, also controls the coordination service.

use crate::cluster::{node_args, CoordinationService, Endpoint, NamingCluster, ProcessSet};
use crate::common::{ClusterConfig, CoordinationConfig, Error, Result};
use std::path::Path;

pub struct NsCluster {
    config: ClusterConfig,
    coordination: CoordinationService,
    processes: ProcessSet,
}

impl NsCluster {
    pub fn new(coordination: CoordinationConfig, config: ClusterConfig, log_dir: &Path) -> Self {
        Self {
            coordination: CoordinationService::new(coordination, log_dir),
            processes: ProcessSet::new("nameserver", log_dir),
            config,
        }
    }

    /// Release the coordination service and the running nameservers so they
    /// outlive this client. Called after a successful bring-up; until then,
    /// dropping the client reaps whatever it started.
    pub fn detach(&mut self) {
        self.coordination.detach();
        self.processes.detach();
    }
}

impl NamingCluster for NsCluster {
    fn endpoints(&self) -> &[Endpoint] {
        &self.config.endpoints
    }

    async fn stop_coordination(&mut self) -> Result<()> {
        self.coordination.stop()
    }

    async fn clear_coordination(&mut self) -> Result<()> {
        self.coordination.clear()
    }

    async fn start_coordination(&mut self) -> Result<()> {
        self.coordination.start().await
    }

    async fn kill(&mut self, endpoints: &[Endpoint]) -> Result<()> {
        self.processes.kill(endpoints)
    }

    async fn start_node(&mut self, endpoint: &Endpoint) -> Result<()> {
        let timeout = self.config.startup_timeout()?;
        let extra_args = node_args(endpoint, self.coordination.endpoint());
        self.processes
            .spawn(endpoint, &self.config.command, &extra_args)?;
        self.processes.wait_ready(endpoint, "/health", timeout).await
    }

    async fn leader(&mut self) -> Result<Endpoint> {
        let addr = self.coordination.leader().await?;
        self.config
            .endpoints
            .iter()
            .find(|e| e.as_str() == addr)
            .cloned()
            .ok_or(Error::UnknownEndpoint(addr))
    }
}
