//! # tabkv-harness
//!
//! Integration-test cluster harness for tabkv with:
//! - Deterministic teardown and bring-up of the naming and tablet clusters
//! - Process supervision of node binaries with captured logs
//! - Control of the coordination service (stop / clear / restart)
//! - HTTP readiness probes and leader read-back after bring-up
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │         Coordination Service             │
//! │  (membership + naming-cluster leader)    │
//! └───────────┬──────────────────────────────┘
//!             │ HTTP status
//!    ┌────────┴─────────┬──────────────────┐
//!    │                  │                  │
//! ┌──▼──────────────┐ ┌─▼──────────────┐ ┌─▼──────────────┐
//! │ Nameserver 1..n │ │ Tablet 1..m    │ │ tabkv-setup    │
//! │ (naming cluster)│ │ (table cluster)│ │ (this harness) │
//! └─────────────────┘ └────────────────┘ └────────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Full teardown + bring-up (before a test-suite run)
//! ```bash
//! tabkv-setup --config harness.toml
//! ```
//!
//! ### Teardown only
//! ```bash
//! tabkv-setup teardown
//! ```
//!
//! Any failure in a lifecycle step aborts the run with a non-zero exit:
//! the harness is a test fixture, and a broken fixture must fail loudly.

pub mod cluster;
pub mod common;
pub mod ops;

// Re-export commonly used types
pub use cluster::{Endpoint, NamingCluster, NsCluster, TableCluster, TbCluster};
pub use common::{Error, HarnessConfig, Result};
pub use ops::{run_setup, SetupMode};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
