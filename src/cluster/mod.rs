//! Cluster clients for the tabkv integration harness
//!
//! Two concrete clients mirror the two node kinds of a tabkv deployment:
//! - [`NsCluster`] supervises nameserver nodes and controls the coordination
//!   service they register in.
//! - [`TbCluster`] supervises tablet nodes.
//!
//! The [`NamingCluster`] and [`TableCluster`] traits sit at the orchestration
//! seam so the setup sequence can be driven against recorded fakes in tests.

pub mod coordination;
pub mod naming;
pub mod process;
pub mod table;

pub use coordination::CoordinationService;
pub use naming::NsCluster;
pub use process::{NodeState, ProcessSet};
pub use table::TbCluster;

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A `host:port` address identifying one cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(addr: impl Into<String>) -> Result<Self> {
        let addr = addr.into();
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidConfig(format!("endpoint missing port: {}", addr)))?;
        if host.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "endpoint missing host: {}",
                addr
            )));
        }
        port.parse::<u16>()
            .map_err(|_| Error::InvalidConfig(format!("endpoint has invalid port: {}", addr)))?;
        Ok(Endpoint(addr))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base URL for HTTP probes against this node.
    pub fn http_url(&self) -> String {
        format!("http://{}", self.0)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::new(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Endpoint::new(s)
    }
}

impl From<Endpoint> for String {
    fn from(e: Endpoint) -> String {
        e.0
    }
}

/// Arguments appended to every node invocation.
pub(crate) fn node_args(bind: &Endpoint, coordination: &Endpoint) -> Vec<String> {
    vec![
        "--bind".to_string(),
        bind.to_string(),
        "--coordination".to_string(),
        coordination.to_string(),
    ]
}

/// Lifecycle surface of the naming-service cluster.
///
/// The coordination service is controlled through the naming client, which is
/// the side that registers leadership state in it. Nodes start one at a time
/// (`start_node`), each awaited to readiness before the next.
#[allow(async_fn_in_trait)]
pub trait NamingCluster {
    fn endpoints(&self) -> &[Endpoint];

    async fn stop_coordination(&mut self) -> Result<()>;

    async fn clear_coordination(&mut self) -> Result<()>;

    async fn start_coordination(&mut self) -> Result<()>;

    /// Forcibly terminate the given nodes. Idempotent: endpoints with no
    /// running process are skipped.
    async fn kill(&mut self, endpoints: &[Endpoint]) -> Result<()>;

    async fn start_node(&mut self, endpoint: &Endpoint) -> Result<()>;

    /// The currently elected naming-cluster leader.
    async fn leader(&mut self) -> Result<Endpoint>;
}

/// Lifecycle surface of the table-service cluster.
///
/// Unlike the naming side, `start` launches the whole batch before waiting
/// for any readiness probe.
#[allow(async_fn_in_trait)]
pub trait TableCluster {
    fn endpoints(&self) -> &[Endpoint];

    /// Forcibly terminate the given nodes. Idempotent.
    async fn kill(&mut self, endpoints: &[Endpoint]) -> Result<()>;

    async fn start(&mut self, endpoints: &[Endpoint]) -> Result<()>;
}
