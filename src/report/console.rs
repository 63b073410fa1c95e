//! Colored console output for audit results.

use crate::audit::{Advisory, AuditFinding};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Console output handler with colors and formatting.
pub struct ConsoleOutput {
    verbose: bool,
    json_mode: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, json_mode: bool) -> Self {
        Self { verbose, json_mode }
    }

    /// Print progress (only in verbose mode).
    pub fn print_progress(&self, message: &str) {
        if self.json_mode || !self.verbose {
            return;
        }

        eprintln!("{} {}", "[.]".dimmed(), message.dimmed());
    }

    /// Print one audit finding.
    pub fn print_finding(&self, finding: &AuditFinding) {
        if self.json_mode {
            return;
        }

        println!("------");
        println!(
            "[{}] {}: {}",
            format_severity(&finding.severity),
            finding.name.bright_white().bold(),
            finding.version
        );

        for (i, advisory) in finding.cause.iter().enumerate() {
            if i != 0 {
                println!("    ------");
            }
            print_advisory(advisory);
        }

        if !finding.caused_by.is_empty() {
            println!("    via: {}", finding.caused_by.join(", ").dimmed());
        }
    }

    /// Print all findings followed by a summary line.
    pub fn print_audit(&self, findings: &[AuditFinding], module_count: usize) {
        if self.json_mode {
            return;
        }

        for finding in findings {
            self.print_finding(finding);
        }

        println!();
        if findings.is_empty() {
            println!(
                "{}",
                format!("No known vulnerabilities in {} linked packages.", module_count).green()
            );
        } else {
            println!(
                "{}",
                format!(
                    "{} of {} linked packages have known vulnerabilities.",
                    findings.len(),
                    module_count
                )
                .red()
                .bold()
            );
        }
    }

    /// Create a progress bar on stderr.
    pub fn create_progress_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if self.json_mode || !self.verbose {
            return None;
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(message.to_string());
        Some(pb)
    }
}

fn print_advisory(advisory: &Advisory) {
    println!(
        "    [{}] {} @ {}",
        format_severity(&advisory.severity),
        advisory.name,
        advisory.range
    );
    println!("    {}", advisory.title);
    println!("    {}", advisory.url.dimmed());
}

/// Format an npm severity with color.
fn format_severity(severity: &str) -> colored::ColoredString {
    match severity {
        "critical" => severity.on_red().white().bold(),
        "high" => severity.red().bold(),
        "moderate" => severity.yellow().bold(),
        "low" => severity.blue(),
        _ => severity.dimmed(),
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_output_creation() {
        let output = ConsoleOutput::new(true, false);
        assert!(output.verbose);
        assert!(!output.json_mode);
    }

    #[test]
    fn test_no_progress_bar_when_quiet() {
        assert!(ConsoleOutput::new(false, false)
            .create_progress_bar(3, "Resolving")
            .is_none());
        assert!(ConsoleOutput::new(true, true)
            .create_progress_bar(3, "Resolving")
            .is_none());
        assert!(ConsoleOutput::new(true, false)
            .create_progress_bar(3, "Resolving")
            .is_some());
    }

    #[test]
    fn test_format_severity() {
        colored::control::set_override(false);
        assert_eq!(format_severity("high").to_string(), "high");
        assert_eq!(format_severity("unknown").to_string(), "unknown");
    }
}
