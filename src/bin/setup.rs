//! Fixture setup binary
//!
//! Run with no argument for full teardown + bring-up, or with the literal
//! argument `teardown` to clean up only.

use clap::Parser;
use std::path::PathBuf;
use tabkv_harness::{run_setup, HarnessConfig, NsCluster, SetupMode, TbCluster};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tabkv-setup")]
#[command(about = "tabkv integration-test cluster setup")]
#[command(version)]
struct Cli {
    /// Optional mode; the exact value `teardown` skips bring-up
    mode: Option<String>,

    /// Config file (default: $TABKV_HARNESS_CONFIG, then ./harness.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HarnessConfig::load_from(path)?,
        None => HarnessConfig::load()?,
    };

    let log_dir = config.log_dir.clone();
    let coordination_endpoint = config.coordination.endpoint.clone();
    let mut ns = NsCluster::new(config.coordination, config.naming, &log_dir);
    let mut tb = TbCluster::new(coordination_endpoint, config.table, &log_dir);

    let mode = SetupMode::from_arg(cli.mode.as_deref());
    if let Some(leader) = run_setup(mode, &mut ns, &mut tb).await? {
        // the clusters must outlive this binary; on any error above the
        // clients reap whatever they started
        ns.detach();
        tb.detach();
        println!("naming-cluster leader: {}", leader);
    }

    Ok(())
}
