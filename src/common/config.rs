//! Configuration for the tabkv harness
//!
//! Configuration is loaded once in `main` and passed explicitly into the
//! cluster clients. There is no ambient config singleton.

use crate::cluster::Endpoint;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TABKV_HARNESS_CONFIG";

/// Global harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Coordination service (ZooKeeper-like membership/leader store)
    pub coordination: CoordinationConfig,

    /// Naming-service cluster (nameserver nodes)
    pub naming: ClusterConfig,

    /// Table-service cluster (tablet nodes)
    pub table: ClusterConfig,

    /// Directory for captured child stdout/stderr
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./harness-logs")
}

/// Coordination-service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// Address the coordination service listens on
    pub endpoint: Endpoint,

    /// Command used to launch the coordination service
    pub command: NodeCommand,

    /// State directory cleared by `clear()`
    pub data_dir: PathBuf,

    /// Readiness window after start (e.g. "20s")
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout: String,
}

/// Per-cluster configuration (naming or table)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Ordered node endpoints
    pub endpoints: Vec<Endpoint>,

    /// Command used to launch one node
    pub command: NodeCommand,

    /// Readiness window per node (e.g. "20s")
    #[serde(default = "default_startup_timeout")]
    pub startup_timeout: String,
}

fn default_startup_timeout() -> String {
    "20s".to_string()
}

/// Program plus base arguments; the harness appends `--bind` and
/// `--coordination` per node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeCommand {
    pub program: PathBuf,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CoordinationConfig {
    pub fn startup_timeout(&self) -> Result<Duration> {
        crate::common::parse_duration(&self.startup_timeout)
    }
}

impl ClusterConfig {
    pub fn startup_timeout(&self) -> Result<Duration> {
        crate::common::parse_duration(&self.startup_timeout)
    }
}

impl HarnessConfig {
    /// Load from the file named by `TABKV_HARNESS_CONFIG` (default
    /// `harness.toml`), with `TABKV_HARNESS__*` environment overrides.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| "harness.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("TABKV_HARNESS").separator("__"))
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        let config: HarnessConfig = raw
            .try_deserialize()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.naming.endpoints.is_empty() {
            return Err(Error::InvalidConfig(
                "naming.endpoints cannot be empty".into(),
            ));
        }
        if self.table.endpoints.is_empty() {
            return Err(Error::InvalidConfig(
                "table.endpoints cannot be empty".into(),
            ));
        }
        for command in [
            &self.coordination.command,
            &self.naming.command,
            &self.table.command,
        ] {
            if command.program.as_os_str().is_empty() {
                return Err(Error::InvalidConfig("command.program cannot be empty".into()));
            }
        }
        self.coordination.startup_timeout()?;
        self.naming.startup_timeout()?;
        self.table.startup_timeout()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[coordination]
endpoint = "127.0.0.1:2181"
command = { program = "bin/coordd", args = ["--quorum", "1"] }
data_dir = "/tmp/tabkv-coord"

[naming]
endpoints = ["127.0.0.1:6527", "127.0.0.1:6528"]
command = { program = "bin/nameserver" }

[table]
endpoints = ["127.0.0.1:9520", "127.0.0.1:9521"]
command = { program = "bin/tablet" }
startup_timeout = "45s"
"#;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("harness.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_sample() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, SAMPLE);

        let config = HarnessConfig::load_from(&path).unwrap();
        assert_eq!(config.coordination.endpoint.to_string(), "127.0.0.1:2181");
        assert_eq!(config.naming.endpoints.len(), 2);
        assert_eq!(config.table.endpoints.len(), 2);
        assert_eq!(config.coordination.command.args, vec!["--quorum", "1"]);

        // defaults
        assert_eq!(config.log_dir, PathBuf::from("./harness-logs"));
        assert_eq!(
            config.naming.startup_timeout().unwrap(),
            Duration::from_secs(20)
        );
        // explicit override
        assert_eq!(
            config.table.startup_timeout().unwrap(),
            Duration::from_secs(45)
        );
    }

    #[test]
    fn test_empty_endpoints_rejected() {
        let dir = TempDir::new().unwrap();
        let body = SAMPLE.replace(
            "endpoints = [\"127.0.0.1:9520\", \"127.0.0.1:9521\"]",
            "endpoints = []",
        );
        let path = write_config(&dir, &body);
        assert!(HarnessConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let dir = TempDir::new().unwrap();
        let body = SAMPLE.replace("127.0.0.1:2181", "not-an-endpoint");
        let path = write_config(&dir, &body);
        assert!(HarnessConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let dir = TempDir::new().unwrap();
        let body = SAMPLE.replace("45s", "45parsecs");
        let path = write_config(&dir, &body);
        assert!(HarnessConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(HarnessConfig::load_from(Path::new("/nonexistent/harness.toml")).is_err());
    }
}
