use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Tag-registry-specific error types
#[derive(Error, Debug)]
pub enum TaxonomyError {
    #[error("tag registry not found; searched: {searched}")]
    NotFound { searched: String },

    #[error("failed to parse tag registry {path}: {details}")]
    Parse { path: PathBuf, details: String },

    #[error("failed to read tag registry {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Front-matter-specific error types
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("invalid front matter: {details}")]
    FrontMatter { details: String },

    #[error("front matter is not a mapping")]
    NotAMapping,

    #[error("failed to serialize front matter: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_error_display() {
        let io_error = AuditError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        assert!(io_error.to_string().contains("IO error"));

        let config_error = AuditError::Config("bad glob".to_string());
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("bad glob"));
    }

    #[test]
    fn test_taxonomy_error_display() {
        let not_found = TaxonomyError::NotFound {
            searched: "/a/project-tags.yaml, /b/project-tags.yaml".to_string(),
        };
        assert!(not_found.to_string().contains("not found"));
        assert!(not_found.to_string().contains("/a/project-tags.yaml"));

        let parse = TaxonomyError::Parse {
            path: PathBuf::from("project-tags.yaml"),
            details: "missing top-level `hierarchy` key".to_string(),
        };
        assert!(parse.to_string().contains("project-tags.yaml"));
        assert!(parse.to_string().contains("hierarchy"));
    }

    #[test]
    fn test_metadata_error_display() {
        let front_matter = MetadataError::FrontMatter {
            details: "mapping values are not allowed".to_string(),
        };
        assert!(front_matter.to_string().contains("invalid front matter"));
    }

    #[test]
    fn test_taxonomy_error_conversion() {
        let taxonomy_error = TaxonomyError::NotFound {
            searched: String::new(),
        };
        let audit_error: AuditError = taxonomy_error.into();

        match audit_error {
            AuditError::Taxonomy(_) => (),
            _ => panic!("Expected AuditError::Taxonomy"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let audit_error = AuditError::Io(io_error);

        assert!(audit_error.source().is_some());
        assert_eq!(audit_error.source().unwrap().to_string(), "File not found");
    }
}
