//! Live terminal reporting of scan events

use crate::output::OutputConfig;
use crate::scanner::ScanEvent;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;

/// Renders scan events as they arrive
///
/// Found paths (and errors, in verbose mode) are printed above a progress
/// bar. After an interrupt the reporter prints one shutdown notice and
/// ignores anything else it is sent.
pub struct Reporter {
    verbose: bool,
    progress: ProgressBar,
    stopped: bool,
}

impl Reporter {
    pub fn new(config: &OutputConfig, total: usize) -> Self {
        let progress = if config.progress_bar {
            let bar = ProgressBar::new(total as u64);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} words checked",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉░");
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            verbose: config.verbose,
            progress,
            stopped: false,
        }
    }

    /// Consume events until the scan side hangs up
    pub async fn run(mut self, mut events: UnboundedReceiver<ScanEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(&event);
        }
        self.progress.finish_and_clear();
    }

    /// Render one event, returning the lines printed
    pub fn handle(&mut self, event: &ScanEvent) -> Vec<String> {
        if self.stopped {
            return Vec::new();
        }

        let lines = match event {
            ScanEvent::Found { path, status, checked, total } => {
                self.progress.set_position(*checked as u64);
                vec![format_found(path, *status, *checked, *total)]
            }
            ScanEvent::Progress { checked, .. } => {
                self.progress.set_position(*checked as u64);
                Vec::new()
            }
            ScanEvent::Error { candidate, cause, checked, .. } => {
                self.progress.set_position(*checked as u64);
                if self.verbose {
                    vec![format_error(candidate, cause)]
                } else {
                    Vec::new()
                }
            }
            ScanEvent::Finished { found, .. } => {
                self.progress.finish_and_clear();
                self.stopped = true;
                vec![format_summary(*found)]
            }
            ScanEvent::Interrupted { .. } => {
                self.progress.abandon();
                self.stopped = true;
                vec![shutdown_notice()]
            }
        };

        // println on a hidden bar is a no-op, suspend always prints
        for line in &lines {
            self.progress.suspend(|| println!("{}", line));
        }
        lines
    }
}

/// `[+] Found: /admin [200]   Checked 3/10 words`
pub fn format_found(path: &str, status: u16, checked: usize, total: usize) -> String {
    let shown = format!("/{} [{}]", path, status);
    format!(
        "{} {} {} Checked {}/{} words",
        "Progress:".bright_cyan(),
        "[+] Found:".bright_green(),
        format!("{:<50}", shown).white().bold(),
        checked,
        total
    )
}

pub fn format_error(candidate: &str, cause: &str) -> String {
    format!(
        "{} {} /{}: {}",
        "Progress:".bright_cyan(),
        "[!] Error:".bright_red(),
        candidate,
        cause
    )
}

pub fn format_summary(found: usize) -> String {
    format!(
        "\n{}{}{} Finished. Total {} directories found.",
        "[".bright_cyan(),
        "*".bright_green(),
        "]".bright_cyan(),
        found.to_string().bold()
    )
}

pub fn shutdown_notice() -> String {
    format!(
        "\n{}",
        "Interrupted: stopping the directory enumeration process...".bright_yellow()
    )
}
