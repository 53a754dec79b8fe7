//! Repository-level structural conventions.

use std::path::Path;

use tokio::fs;

use crate::report::{FileReport, Violation, rules};

/// Synthetic file identifier for structural violations
pub const STRUCTURE_FILE_ID: &str = "Structure";

/// Files that must exist at the root of every documentation tree
const REQUIRED_FILES: [&str; 1] = ["README.md"];

/// Check repository layout conventions for a documentation root.
///
/// An Antora component (marked by `antora.yml`) must carry its navigation
/// file; a missing required top-level file is only a warning. Returns `None`
/// when everything passes.
pub async fn check_structure(root: &Path) -> Option<FileReport> {
    let mut errors = Vec::new();

    if exists(&root.join("antora.yml")).await
        && !exists(&root.join("modules/ROOT/nav.adoc")).await
    {
        errors.push(Violation::error(
            "Antora component missing modules/ROOT/nav.adoc",
            rules::STRUCTURE_ANTORA_NAV,
        ));
    }

    for required in REQUIRED_FILES {
        if !exists(&root.join(required)).await {
            errors.push(Violation::warning(
                format!("Missing required file: {required}"),
                rules::STRUCTURE_REQUIRED,
            ));
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(FileReport::invalid(STRUCTURE_FILE_ID, errors))
    }
}

async fn exists(path: &Path) -> bool {
    matches!(fs::try_exists(path).await, Ok(true))
}
