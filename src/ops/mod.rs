//! Harness operations

pub mod setup;

pub use setup::{run_setup, SetupMode};
