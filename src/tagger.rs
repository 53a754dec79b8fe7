//! Keyword-based auto-tagger.
//!
//! Scans a markdown document's body, title and path for taxonomy keywords and
//! unions the matching tags into the declared tag list. Pure: returns the
//! rewritten content, callers decide whether to persist it.

use std::path::Path;

use crate::error::MetadataError;
use crate::metadata::Document;
use crate::taxonomy::TagRegistry;

/// Add taxonomy tags matched by keyword scan to a document's tag list.
///
/// Only markdown is supported; other files are returned unchanged, as is any
/// input when the registry carries no keywords. Existing tags are never
/// removed, so re-running on already-tagged output is a no-op (idempotent).
pub fn auto_tag(
    content: &str,
    path: &Path,
    registry: &TagRegistry,
) -> Result<String, MetadataError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
        return Ok(content.to_string());
    }
    if registry.alias_map().is_empty() {
        return Ok(content.to_string());
    }

    let mut document = Document::parse(content)?;

    // Existing tags first, de-duplicated, first-occurrence order
    let mut tags: Vec<String> = Vec::new();
    if let Some(existing) = document.tags() {
        for tag in existing {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    let scan = format!(
        "{} {} {}",
        document.body,
        document.title().unwrap_or(""),
        path.display()
    )
    .to_lowercase();

    for (tag, keywords) in registry.alias_map() {
        if keywords.iter().any(|keyword| scan.contains(keyword.as_str()))
            && !tags.contains(tag)
        {
            tags.push(tag.clone());
        }
    }

    document.set_tags(&tags);
    document.to_markdown()
}
