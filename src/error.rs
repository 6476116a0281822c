//! Error handling for the baas scanner
//!
//! Fatal errors (bad target, unreadable wordlist, bad configuration) are
//! `ScanError`s and abort the run before any request is sent. Failures of a
//! single probe are `ProbeError`s: they travel as data inside a
//! [`ProbeOutcome`](crate::probe::ProbeOutcome) and never stop the scan.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanning operations
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Cannot read wordlist {path}: {source}")]
    Wordlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("Scan task failed: {0}")]
    TaskFailed(String),
}

impl ScanError {
    /// Wrap an IO failure on the given wordlist path
    pub fn wordlist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Wordlist {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised by input validation, before any network activity
    pub fn is_pre_run(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidTarget(_) | ScanError::Wordlist { .. } | ScanError::ConfigError(_)
        )
    }
}

/// Result type alias for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Why a single probe produced no status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_connect() {
            ProbeError::Connect(err.to_string())
        } else {
            ProbeError::Request(err.to_string())
        }
    }
}
