//! Validation report shapes shared by every checker.
//!
//! External prose and link checkers populate the same `FileReport`/`Violation`
//! JSON shape, so the field names here are the wire contract, not just an
//! internal convenience.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Rule identifiers attached to violations
pub mod rules {
    pub const FRONTMATTER_SCHEMA: &str = "frontmatter-schema";
    pub const TAG_TAXONOMY: &str = "tag-taxonomy";
    pub const PARSE_ERROR: &str = "parse-error";
    pub const STRUCTURE_ANTORA_NAV: &str = "structure-antora-nav";
    pub const STRUCTURE_REQUIRED: &str = "structure-required";
}

/// Severity of a single violation. Fixed per rule, not configurable per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One violation found in a file or structural check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Violation {
    /// Create an error-severity violation with a rule id
    pub fn error(message: impl Into<String>, rule_id: &str) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            rule_id: Some(rule_id.to_string()),
            line: None,
            column: None,
        }
    }

    /// Create a warning-severity violation with a rule id
    pub fn warning(message: impl Into<String>, rule_id: &str) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            rule_id: Some(rule_id.to_string()),
            line: None,
            column: None,
        }
    }

    /// Attach a source location
    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Validation outcome for one file (or one synthetic check such as "Structure").
///
/// Files with zero violations are never wrapped in a `FileReport`; only failing
/// entries appear in the aggregated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub valid: bool,
    pub errors: Vec<Violation>,
}

impl FileReport {
    /// Create a failing report for a file
    pub fn invalid(file: impl Into<String>, errors: Vec<Violation>) -> Self {
        Self {
            file: file.into(),
            valid: false,
            errors,
        }
    }
}

/// Aggregated results of auditing a documentation tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Failing files/checks, in walk order (structural check first)
    pub results: Vec<FileReport>,
    /// Total number of files matched by the walk, failing or not
    pub files_scanned: usize,
    /// Total duration of the audit
    pub duration: Duration,
}

impl AuditReport {
    /// Aggregate individual file reports into a summary
    pub fn aggregate(results: Vec<FileReport>, files_scanned: usize, duration: Duration) -> Self {
        Self {
            results,
            files_scanned,
            duration,
        }
    }

    /// Whether any result is invalid (drives the non-zero exit status)
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| !r.valid)
    }

    /// Number of error-severity violations across all results
    pub fn error_count(&self) -> usize {
        self.violations_at(Severity::Error)
    }

    /// Number of warning-severity violations across all results
    pub fn warning_count(&self) -> usize {
        self.violations_at(Severity::Warning)
    }

    fn violations_at(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .flat_map(|r| r.errors.iter())
            .filter(|v| v.severity == severity)
            .count()
    }
}
