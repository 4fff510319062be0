//! Fixture setup: teardown and bring-up of both clusters
//!
//! The sequence is fixed. Cleanup always runs first and must be idempotent;
//! bring-up only happens outside teardown mode. Any collaborator failure
//! propagates immediately: the harness performs no retries and no rollback,
//! a broken fixture fails the whole test run.

use crate::cluster::{Endpoint, NamingCluster, TableCluster};
use crate::common::Result;

/// What the setup run should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupMode {
    /// Cleanup only.
    Teardown,
    /// Cleanup, then restart everything.
    BringUp,
}

impl SetupMode {
    /// Mode from the optional CLI argument: exactly `teardown` selects
    /// teardown, anything else (or nothing) selects full bring-up.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some("teardown") => SetupMode::Teardown,
            _ => SetupMode::BringUp,
        }
    }
}

/// Run the fixture setup sequence.
///
/// Always: stop the coordination service, then forcibly kill every known
/// node of both clusters. In bring-up mode, additionally: wipe coordination
/// state, restart the coordination service, start the naming nodes one at a
/// time, start the tablet nodes as one batch, and read back the elected
/// naming-cluster leader.
///
/// Returns the leader after a bring-up, `None` after a teardown.
pub async fn run_setup<N, T>(mode: SetupMode, ns: &mut N, tb: &mut T) -> Result<Option<Endpoint>>
where
    N: NamingCluster,
    T: TableCluster,
{
    tracing::info!("Fixture setup ({:?})", mode);

    ns.stop_coordination().await?;

    let ns_endpoints = ns.endpoints().to_vec();
    ns.kill(&ns_endpoints).await?;

    let tb_endpoints = tb.endpoints().to_vec();
    tb.kill(&tb_endpoints).await?;

    if mode == SetupMode::Teardown {
        tracing::info!("Teardown complete");
        return Ok(None);
    }

    ns.clear_coordination().await?;
    ns.start_coordination().await?;

    for endpoint in &ns_endpoints {
        ns.start_node(endpoint).await?;
    }
    tb.start(&tb_endpoints).await?;

    let leader = ns.leader().await?;
    tracing::info!("Bring-up complete, naming-cluster leader: {}", leader);
    Ok(Some(leader))
}
