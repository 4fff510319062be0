//! Table-service cluster client
//!
//! Supervises the tablet nodes. Start is batch-wise: every node is launched
//! before the first readiness probe, since tablets only settle once their
//! peers are registered in the coordination service.

use crate::cluster::{node_args, Endpoint, ProcessSet, TableCluster};
use crate::common::{ClusterConfig, Result};
use std::path::Path;

pub struct TbCluster {
    config: ClusterConfig,
    coordination_endpoint: Endpoint,
    processes: ProcessSet,
}

impl TbCluster {
    pub fn new(
        coordination_endpoint: Endpoint,
        config: ClusterConfig,
        log_dir: &Path,
    ) -> Self {
        Self {
            processes: ProcessSet::new("tablet", log_dir),
            coordination_endpoint,
            config,
        }
    }

    /// Release the running tablets so they outlive this client.
    pub fn detach(&mut self) {
        self.processes.detach();
    }
}

impl TableCluster for TbCluster {
    fn endpoints(&self) -> &[Endpoint] {
        &self.config.endpoints
    }

    async fn kill(&mut self, endpoints: &[Endpoint]) -> Result<()> {
        self.processes.kill(endpoints)
    }

    async fn start(&mut self, endpoints: &[Endpoint]) -> Result<()> {
        let timeout = self.config.startup_timeout()?;
        for endpoint in endpoints {
            let extra_args = node_args(endpoint, &self.coordination_endpoint);
            self.processes
                .spawn(endpoint, &self.config.command, &extra_args)?;
        }
        for endpoint in endpoints {
            self.processes.wait_ready(endpoint, "/health", timeout).await?;
        }
        Ok(())
    }
}
