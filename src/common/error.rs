//! Error types for tabkv-harness

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Process Errors ===
    #[error("Failed to spawn node {endpoint}: {reason}")]
    Spawn { endpoint: String, reason: String },

    #[error("Node {endpoint} exited before becoming ready (status {status})")]
    NodeExited { endpoint: String, status: String },

    // === Coordination Errors ===
    #[error("No leader elected: {0}")]
    NoLeader(String),

    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    // === Network Errors ===
    #[error("HTTP error: {0}")]
    Http(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Operation timeout: {0}")]
    Timeout(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Is this a retryable error?
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_) | Error::Http(_) | Error::NoLeader(_)
        )
    }
}

// Implement From for common error types
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
