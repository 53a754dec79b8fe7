//! Document metadata: front-matter parsing and schema validation.
//!
//! The front matter is kept as an order-preserving YAML mapping so unknown
//! fields survive a parse/serialize round trip untouched. The schema itself
//! is a small ordered table of field checks evaluated directly against the
//! mapping.

use gray_matter::{Matter, engine::YAML};
use serde_yaml::{Mapping, Value};

use crate::error::MetadataError;
use crate::report::{Violation, rules};

/// Permitted values of the optional `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Concept,
    Guide,
    Reference,
    Tutorial,
    Policy,
    Adr,
}

impl DocType {
    pub const NAMES: [&'static str; 6] =
        ["concept", "guide", "reference", "tutorial", "policy", "adr"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "concept" => Some(Self::Concept),
            "guide" => Some(Self::Guide),
            "reference" => Some(Self::Reference),
            "tutorial" => Some(Self::Tutorial),
            "policy" => Some(Self::Policy),
            "adr" => Some(Self::Adr),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Guide => "guide",
            Self::Reference => "reference",
            Self::Tutorial => "tutorial",
            Self::Policy => "policy",
            Self::Adr => "adr",
        }
    }
}

/// Permitted values of the optional `status` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStatus {
    Draft,
    Review,
    Stable,
    Deprecated,
}

impl DocStatus {
    pub const NAMES: [&'static str; 4] = ["draft", "review", "stable", "deprecated"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "draft" => Some(Self::Draft),
            "review" => Some(Self::Review),
            "stable" => Some(Self::Stable),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Stable => "stable",
            Self::Deprecated => "deprecated",
        }
    }
}

/// A document split into its front matter mapping and body text
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Mapping,
    pub body: String,
}

impl Document {
    /// Split a document into front matter and body.
    ///
    /// A document without front matter parses to an empty mapping; the whole
    /// text becomes the body.
    pub fn parse(content: &str) -> Result<Self, MetadataError> {
        let matter = Matter::<YAML>::new();
        let entity = matter.parse(content);

        let metadata = if entity.matter.trim().is_empty() {
            Mapping::new()
        } else {
            let value: Value = serde_yaml::from_str(&entity.matter).map_err(|e| {
                MetadataError::FrontMatter {
                    details: e.to_string(),
                }
            })?;
            value
                .as_mapping()
                .cloned()
                .ok_or(MetadataError::NotAMapping)?
        };

        Ok(Self {
            metadata,
            body: entity.content,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    pub fn doc_type(&self) -> Option<DocType> {
        self.metadata
            .get("type")
            .and_then(Value::as_str)
            .and_then(DocType::from_name)
    }

    pub fn status(&self) -> Option<DocStatus> {
        self.metadata
            .get("status")
            .and_then(Value::as_str)
            .and_then(DocStatus::from_name)
    }

    pub fn owner(&self) -> Option<&str> {
        self.metadata.get("owner").and_then(Value::as_str)
    }

    /// The declared tag list, if the `tags` field is a sequence.
    ///
    /// Non-string entries are skipped here; the schema validator reports them.
    pub fn tags(&self) -> Option<Vec<String>> {
        self.metadata
            .get("tags")
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
    }

    /// Replace the tag list. An existing `tags` key keeps its position in the
    /// front matter; a new one is appended.
    pub fn set_tags(&mut self, tags: &[String]) {
        let sequence = Value::Sequence(
            tags.iter()
                .map(|tag| Value::String(tag.clone()))
                .collect(),
        );
        self.metadata
            .insert(Value::String("tags".to_string()), sequence);
    }

    /// Re-serialize front matter and body into markdown
    pub fn to_markdown(&self) -> Result<String, MetadataError> {
        let front_matter = serde_yaml::to_string(&self.metadata)?;
        Ok(format!("---\n{front_matter}---\n{}", self.body))
    }
}

type FieldCheck = fn(&Mapping) -> Option<String>;

/// The metadata schema, as an ordered list of field checks.
const FIELD_CHECKS: [(&str, FieldCheck); 5] = [
    ("title", check_title),
    ("type", check_type),
    ("status", check_status),
    ("owner", check_owner),
    ("tags", check_tags),
];

/// Validate a front matter mapping against the document metadata schema.
///
/// Unknown fields never produce violations; the schema is extensible.
pub fn validate_metadata(metadata: &Mapping) -> Vec<Violation> {
    FIELD_CHECKS
        .iter()
        .filter_map(|(field, check)| {
            check(metadata).map(|reason| {
                Violation::error(
                    format!("Frontmatter: /{field} {reason}"),
                    rules::FRONTMATTER_SCHEMA,
                )
            })
        })
        .collect()
}

fn check_title(metadata: &Mapping) -> Option<String> {
    match metadata.get("title") {
        None => Some("is required".to_string()),
        Some(Value::String(title)) if title.trim().is_empty() => {
            Some("must be a non-empty string".to_string())
        }
        Some(Value::String(_)) => None,
        Some(_) => Some("must be a string".to_string()),
    }
}

fn check_type(metadata: &Mapping) -> Option<String> {
    check_enum(metadata, "type", &DocType::NAMES)
}

fn check_status(metadata: &Mapping) -> Option<String> {
    check_enum(metadata, "status", &DocStatus::NAMES)
}

fn check_enum(metadata: &Mapping, field: &str, allowed: &[&str]) -> Option<String> {
    match metadata.get(field) {
        None => None,
        Some(Value::String(value)) if allowed.contains(&value.as_str()) => None,
        Some(Value::String(_)) => Some(format!("must be one of {}", allowed.join(", "))),
        Some(_) => Some("must be a string".to_string()),
    }
}

fn check_owner(metadata: &Mapping) -> Option<String> {
    match metadata.get("owner") {
        None | Some(Value::String(_)) => None,
        Some(_) => Some("must be a string".to_string()),
    }
}

fn check_tags(metadata: &Mapping) -> Option<String> {
    match metadata.get("tags") {
        None => None,
        Some(Value::Sequence(tags)) => {
            if tags.iter().all(|tag| tag.is_string()) {
                None
            } else {
                Some("must be a sequence of strings".to_string())
            }
        }
        Some(_) => Some("must be a sequence of strings".to_string()),
    }
}
