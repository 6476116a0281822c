//! Utility modules for the scanner

pub mod wordlist;

use std::time::Duration;

/// Logging utilities
pub struct Logger;

impl Logger {
    /// Initialize logger with specified level
    ///
    /// `RUST_LOG` still wins over `level` when it is set.
    pub fn init(level: log::LevelFilter) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(level).format_timestamp_secs();
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
        // A second init (tests, embedding) is harmless
        let _ = builder.try_init();
    }

    /// Log scan start
    pub fn log_scan_start(target: &str, words: usize, threads: usize) {
        log::info!("Starting scan of {} ({} words) with {} workers", target, words, threads);
    }

    /// Log scan completion
    pub fn log_scan_complete(duration: Duration, found: usize, checked: usize) {
        log::info!(
            "Scan completed in {:.2}s - {} paths found, {} checked",
            duration.as_secs_f64(),
            found,
            checked
        );
    }
}

/// Requests per second over a duration
pub fn rate(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate() {
        assert_eq!(rate(10, Duration::from_secs(2)), 5.0);
        assert_eq!(rate(10, Duration::from_secs(0)), 0.0);
    }

    #[test]
    fn test_logger_init_twice() {
        Logger::init(log::LevelFilter::Warn);
        Logger::init(log::LevelFilter::Debug);
    }
}
