//! Common utilities and types shared across the harness

pub mod config;
pub mod error;
pub mod utils;

pub use config::{ClusterConfig, CoordinationConfig, HarnessConfig, NodeCommand, CONFIG_ENV};
pub use error::{Error, Result};
pub use utils::{parse_duration, retry_with_backoff};
