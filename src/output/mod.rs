//! Output formatting and management

pub mod reporter;

use crate::error::{ScanError, ScanResult};
use crate::scanner::ScanReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

pub use reporter::Reporter;

/// Output format options for the report file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// One full URL per line
    Greppable,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "greppable" | "grep" => Ok(OutputFormat::Greppable),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
    pub verbose: bool,
    pub progress_bar: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            file: None,
            verbose: false,
            progress_bar: true,
        }
    }
}

/// Writes the final report
pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Render the report and write it to the configured file, if any
    pub fn write_report(&self, report: &ScanReport) -> ScanResult<()> {
        let Some(path) = &self.config.file else {
            return Ok(());
        };

        let output = self.render(report)?;
        let mut file = File::create(path)
            .map_err(|e| ScanError::OutputError(format!("{}: {}", path.display(), e)))?;
        file.write_all(output.as_bytes())?;
        log::info!("Report written to {}", path.display());
        Ok(())
    }

    /// Render the report in the configured format
    pub fn render(&self, report: &ScanReport) -> ScanResult<String> {
        match self.config.format {
            OutputFormat::Text => Ok(self.format_text(report)),
            OutputFormat::Json => self.format_json(report),
            OutputFormat::Greppable => Ok(self.format_greppable(report)),
        }
    }

    fn format_text(&self, report: &ScanReport) -> String {
        let mut output = String::new();
        output.push_str(&format!("# baas scan report for {}\n", report.target));
        output.push_str(&format!(
            "# Started {}, {} of {} words checked in {:.2}s\n",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.checked,
            report.total,
            report.duration.as_secs_f64()
        ));
        if report.interrupted {
            output.push_str("# Scan was interrupted\n");
        }
        output.push('\n');

        for (path, status) in &report.found {
            output.push_str(&format!("/{} [{}]\n", path, status));
        }
        output
    }

    fn format_json(&self, report: &ScanReport) -> ScanResult<String> {
        serde_json::to_string_pretty(report).map_err(|e| ScanError::OutputError(e.to_string()))
    }

    fn format_greppable(&self, report: &ScanReport) -> String {
        report
            .found
            .keys()
            .map(|path| format!("{}/{}\n", report.target, path))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn sample_report() -> ScanReport {
        let mut found = BTreeMap::new();
        found.insert("admin".to_string(), 200);
        found.insert("backup".to_string(), 301);
        ScanReport {
            target: "http://example.com".to_string(),
            found,
            total: 5,
            checked: 5,
            errors: 1,
            interrupted: false,
            started_at: Utc::now(),
            duration: Duration::from_millis(1500),
        }
    }

    fn manager(format: OutputFormat) -> OutputManager {
        OutputManager::new(OutputConfig {
            format,
            ..Default::default()
        })
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("grep".parse::<OutputFormat>(), Ok(OutputFormat::Greppable));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_report() {
        let text = manager(OutputFormat::Text).render(&sample_report()).unwrap();
        assert!(text.contains("http://example.com"));
        assert!(text.contains("/admin [200]"));
        assert!(text.contains("/backup [301]"));
        assert!(!text.contains("interrupted"));
    }

    #[test]
    fn test_json_report() {
        let json = manager(OutputFormat::Json).render(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["found"]["admin"], 200);
        assert_eq!(value["checked"], 5);
        assert_eq!(value["interrupted"], false);
    }

    #[test]
    fn test_greppable_report() {
        let out = manager(OutputFormat::Greppable).render(&sample_report()).unwrap();
        assert_eq!(out, "http://example.com/admin\nhttp://example.com/backup\n");
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let manager = OutputManager::new(OutputConfig {
            file: Some(path.clone()),
            ..Default::default()
        });

        manager.write_report(&sample_report()).unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("/admin [200]"));
    }

    #[test]
    fn test_write_report_without_file_is_noop() {
        assert!(manager(OutputFormat::Text).write_report(&sample_report()).is_ok());
    }
}
