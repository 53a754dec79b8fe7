//! # curate-docs Library
//!
//! Curates a documentation tree: validates document front matter against a
//! fixed metadata schema, audits repository layout conventions, resolves
//! declared tags against a governed hierarchical tag taxonomy, and suggests
//! tags from document content using the same taxonomy.

pub mod audit;
pub mod cli;
pub mod error;
pub mod file_discovery;
pub mod metadata;
pub mod output;
pub mod report;
pub mod structure;
pub mod tagger;
pub mod taxonomy;

pub use audit::Auditor;
pub use cli::{AuditArgs, Cli, Command, Config, FixTagsArgs, OutputFormat, VerbosityLevel};
pub use error::{AuditError, MetadataError, Result, TaxonomyError};
pub use file_discovery::FileDiscovery;
pub use metadata::{DocStatus, DocType, Document, validate_metadata};
pub use output::Output;
pub use report::{AuditReport, FileReport, Severity, Violation, rules};
pub use structure::{STRUCTURE_FILE_ID, check_structure};
pub use tagger::auto_tag;
pub use taxonomy::{
    TAGS_FILE_NAME, TAGS_PATH_ENV, TagNode, TagRegistry, TaxonomyLoader, parse_taxonomy,
};
