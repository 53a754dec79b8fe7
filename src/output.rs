//! Simple Output and Reporting
//!
//! This module provides output formatting for audit reports.

use atty;
use std::time::Duration;

use crate::cli::{OutputFormat, VerbosityLevel};
use crate::report::{AuditReport, FileReport, Severity, Violation};

/// Simple output formatter for audit reports
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    #[cfg(test)]
    fn without_colors(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Render a report in the requested format
    pub fn render(&self, report: &AuditReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&report.results).unwrap_or_default()
            }
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Human => self.format_human(report),
        }
    }

    fn format_human(&self, report: &AuditReport) -> String {
        let mut output = String::new();

        match self.verbosity {
            VerbosityLevel::Quiet => {
                if report.has_failures() {
                    output.push_str(&format!(
                        "Errors: {} Warnings: {}\n",
                        report.error_count(),
                        report.warning_count()
                    ));
                }
            }
            VerbosityLevel::Normal | VerbosityLevel::Verbose => {
                for file_report in &report.results {
                    output.push_str(&self.format_file_report(file_report));
                    output.push('\n');
                }
                output.push_str(&self.format_summary(report));
            }
        }

        output
    }

    pub fn format_file_report(&self, report: &FileReport) -> String {
        let mut output = format!("{} {}", self.colorize("✖", "31"), report.file);
        for violation in &report.errors {
            output.push_str(&format!("\n  {}", self.format_violation(violation)));
        }
        output.push('\n');
        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let severity_color = match violation.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
        };
        let mut line = String::new();

        if let Some(row) = violation.line {
            line.push_str(&self.colorize(
                &format!("{}:{} ", row, violation.column.unwrap_or(0)),
                "90",
            ));
        }
        line.push_str(&self.colorize(&violation.severity.to_string(), severity_color));
        line.push_str(&format!(": {}", violation.message));
        if let Some(rule_id) = &violation.rule_id {
            line.push_str(&self.colorize(&format!(" ({})", rule_id), "90"));
        }

        line
    }

    fn format_summary(&self, report: &AuditReport) -> String {
        let mut output = String::new();
        output.push_str("Audit Summary:\n");
        output.push_str(&format!("  Files scanned: {}\n", report.files_scanned));

        if report.has_failures() {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Failing:", "31"),
                report.results.len()
            ));
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Errors:", "31"),
                report.error_count()
            ));
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Warnings:", "33"),
                report.warning_count()
            ));
        } else {
            output.push_str(&format!("  {}\n", self.colorize("All checks passed", "32")));
        }

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Duration: {}\n",
                format_duration(report.duration)
            ));
        }

        output
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
