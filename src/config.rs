//! Configuration module for the baas scanner

use crate::output::OutputFormat;
use crate::probe::NegativeStatusSet;
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of concurrent workers
pub const DEFAULT_THREADS: usize = 100;

/// Default per-request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Main configuration structure for scanning operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Base URL, must start with http:// or https://
    pub target: String,

    /// Wordlist file, one candidate per line
    pub wordlist: PathBuf,

    /// Status codes treated as "not found"
    pub negative_codes: NegativeStatusSet,

    /// Maximum number of probes in flight
    pub threads: usize,

    /// Timeout for each request in milliseconds
    pub timeout: u64,

    /// Report per-probe transport errors
    pub verbose: bool,

    /// User-Agent header sent with every probe
    pub user_agent: String,

    /// Accept invalid TLS certificates
    pub insecure: bool,

    /// Write the final report to this file
    pub output_file: Option<PathBuf>,

    /// Format of the report file
    pub output_format: OutputFormat,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            wordlist: PathBuf::new(),
            negative_codes: NegativeStatusSet::default(),
            threads: DEFAULT_THREADS,
            timeout: DEFAULT_TIMEOUT_MS,
            verbose: false,
            user_agent: format!("baas/{}", env!("CARGO_PKG_VERSION")),
            insecure: false,
            output_file: None,
            output_format: OutputFormat::Text,
        }
    }
}

impl ScanConfig {
    /// Create a new scan configuration
    pub fn new(target: impl Into<String>, wordlist: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            wordlist: wordlist.into(),
            ..Default::default()
        }
    }

    /// Set the negative status codes
    pub fn with_negative_codes(mut self, codes: NegativeStatusSet) -> Self {
        self.negative_codes = codes;
        self
    }

    /// Set the number of workers
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the timeout in milliseconds
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Load configuration from TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            crate::ScanError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: ScanConfig = toml::from_str(&content)
            .map_err(|e| crate::ScanError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        Ok(config)
    }

    /// Load configuration from ~/.baas.toml, falling back to defaults
    pub fn load_default_config() -> Self {
        let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let config_path = home_dir.join(".baas.toml");

        if config_path.exists() {
            match Self::from_toml_file(&config_path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }

        Self::default()
    }

    /// Validate the configuration and return the parsed target
    pub fn validate(&self) -> crate::Result<Target> {
        let target = Target::parse(&self.target)?;

        if self.threads == 0 {
            return Err(crate::ScanError::ConfigError(
                "Thread count must be greater than 0".to_string(),
            ));
        }

        if self.timeout == 0 {
            return Err(crate::ScanError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(target)
    }
}
