//! Audit Orchestrator
//!
//! Walks a documentation tree and aggregates every failing check into one
//! report: the structural audit first, then per-file front-matter schema and
//! tag-taxonomy validation in stable walk order. Failure isolation is
//! per-file: a document that cannot be parsed contributes a single
//! `parse-error` violation and the walk carries on.

use std::path::Path;
use std::time::Instant;

use tokio::fs;

use crate::error::Result;
use crate::file_discovery::FileDiscovery;
use crate::metadata::{Document, validate_metadata};
use crate::report::{AuditReport, FileReport, Violation, rules};
use crate::structure::check_structure;
use crate::taxonomy::{TAGS_FILE_NAME, TagRegistry};

/// Audit engine for a documentation tree.
///
/// Owns the immutable tag registry for the session; the registry is loaded
/// once by the caller and shared by every per-file check.
pub struct Auditor {
    registry: TagRegistry,
    discovery: FileDiscovery,
}

impl Auditor {
    /// Create an auditor over a loaded (possibly empty) tag registry
    pub fn new(registry: TagRegistry) -> Self {
        Self {
            registry,
            discovery: FileDiscovery::new(),
        }
    }

    /// Replace the default file walker
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// The tag registry backing this auditor
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Audit a documentation root.
    ///
    /// Only failing files appear in the report; a clean tree produces an
    /// empty result list.
    pub async fn audit(&self, root: &Path) -> Result<AuditReport> {
        let started = Instant::now();
        let mut results = Vec::new();

        if let Some(structural) = check_structure(root).await {
            results.push(structural);
        }

        let files = self.discovery.discover_files(root).await?;
        for file in &files {
            let relative = file
                .strip_prefix(root)
                .unwrap_or(file)
                .display()
                .to_string();
            if let Some(report) = self.audit_file(file, &relative).await {
                results.push(report);
            }
        }

        Ok(AuditReport::aggregate(results, files.len(), started.elapsed()))
    }

    /// Audit a single file, returning a report only when it fails
    async fn audit_file(&self, path: &Path, relative: &str) -> Option<FileReport> {
        // TODO: AsciiDoc front matter validation
        if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
            return None;
        }

        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) => {
                return Some(FileReport::invalid(
                    relative,
                    vec![Violation::error(
                        format!("Failed to read file: {err}"),
                        rules::PARSE_ERROR,
                    )],
                ));
            }
        };

        let errors = self.check_markdown(&content);
        if errors.is_empty() {
            None
        } else {
            Some(FileReport::invalid(relative, errors))
        }
    }

    /// Schema and tag checks for one markdown document
    fn check_markdown(&self, content: &str) -> Vec<Violation> {
        let document = match Document::parse(content) {
            Ok(document) => document,
            Err(err) => {
                return vec![Violation::error(
                    format!("Failed to parse file: {err}"),
                    rules::PARSE_ERROR,
                )];
            }
        };

        let mut errors = validate_metadata(&document.metadata);

        if let Some(tags) = document.tags() {
            let invalid = self.registry.invalid_tags(&tags);
            if !invalid.is_empty() {
                errors.push(Violation::error(
                    format!(
                        "Invalid tags: {}. Allowed tags are defined in {}",
                        invalid.join(", "),
                        TAGS_FILE_NAME
                    ),
                    rules::TAG_TAXONOMY,
                ));
            }
        }

        errors
    }
}
