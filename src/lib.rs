//! BAAS - directory and path enumeration
//!
//! Probes `<url>/<word>` for every word of a wordlist with a bounded pool of
//! concurrent requests and reports the paths whose status code is not in the
//! negative set.

pub mod config;
pub mod error;
pub mod output;
pub mod probe;
pub mod scanner;
pub mod target;
pub mod utils;

// Re-export commonly used types
pub use config::ScanConfig;
pub use error::{ProbeError, ScanError, ScanResult};
pub use probe::{HttpProber, NegativeStatusSet, ProbeOutcome, Prober};
pub use scanner::{ScanEngine, ScanEvent, ScanReport};
pub use target::Target;
pub use utils::wordlist::WordSource;

pub type Result<T> = std::result::Result<T, ScanError>;
