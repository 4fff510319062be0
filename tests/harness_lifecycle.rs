//! Lifecycle tests against the real process-backed clients
//!
//! Bring-up needs actual node binaries, but the cleanup half of the fixture
//! contract is exercisable for real: teardown on cold clusters must be an
//! idempotent no-op, and clearing coordination state must wipe and recreate
//! the state directory.

use std::fs;
use std::path::PathBuf;
use tabkv_harness::common::{ClusterConfig, CoordinationConfig, NodeCommand};
use tabkv_harness::{run_setup, Endpoint, NamingCluster, NsCluster, SetupMode, TbCluster};
use tempfile::TempDir;
use uuid::Uuid;

fn node_command(program: &str) -> NodeCommand {
    NodeCommand {
        program: PathBuf::from(program),
        args: vec![],
    }
}

fn build_clusters(dir: &TempDir) -> (NsCluster, TbCluster, PathBuf) {
    let data_dir = dir.path().join(format!("coord-{}", Uuid::new_v4()));
    let log_dir = dir.path().join("logs");

    let coordination = CoordinationConfig {
        endpoint: Endpoint::new("127.0.0.1:2181").unwrap(),
        command: node_command("bin/coordd"),
        data_dir: data_dir.clone(),
        startup_timeout: "5s".to_string(),
    };
    let naming = ClusterConfig {
        endpoints: vec![
            Endpoint::new("127.0.0.1:6527").unwrap(),
            Endpoint::new("127.0.0.1:6528").unwrap(),
        ],
        command: node_command("bin/nameserver"),
        startup_timeout: "5s".to_string(),
    };
    let table = ClusterConfig {
        endpoints: vec![
            Endpoint::new("127.0.0.1:9520").unwrap(),
            Endpoint::new("127.0.0.1:9521").unwrap(),
        ],
        command: node_command("bin/tablet"),
        startup_timeout: "5s".to_string(),
    };

    let coordination_endpoint = coordination.endpoint.clone();
    let ns = NsCluster::new(coordination, naming, &log_dir);
    let tb = TbCluster::new(coordination_endpoint, table, &log_dir);
    (ns, tb, data_dir)
}

#[tokio::test]
async fn teardown_on_cold_clusters_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let (mut ns, mut tb, _) = build_clusters(&dir);

    // nothing is running; cleanup must still succeed
    let leader = run_setup(SetupMode::Teardown, &mut ns, &mut tb)
        .await
        .unwrap();
    assert!(leader.is_none());

    // and stay idempotent on a second run
    let leader = run_setup(SetupMode::Teardown, &mut ns, &mut tb)
        .await
        .unwrap();
    assert!(leader.is_none());
}

#[tokio::test]
async fn clear_coordination_wipes_state_dir() {
    let dir = TempDir::new().unwrap();
    let (mut ns, _tb, data_dir) = build_clusters(&dir);

    assert!(!data_dir.exists());
    ns.clear_coordination().await.unwrap();
    assert!(data_dir.is_dir());

    let stale = data_dir.join("members");
    fs::write(&stale, b"e1,e2").unwrap();
    ns.clear_coordination().await.unwrap();
    assert!(data_dir.is_dir());
    assert!(!stale.exists());
}
