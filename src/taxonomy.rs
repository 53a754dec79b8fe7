//! Tag Taxonomy Registry
//!
//! Loads the governed tag hierarchy from `project-tags.yaml`, parses it into a
//! typed tree, and flattens it into a fast-lookup registry: the set of valid
//! tag identifiers plus a keyword list per tag used by the auto-tagger.
//!
//! Registry absence is never fatal: callers degrade to an empty registry,
//! which disables tag validation and auto-tagging but leaves schema checks
//! fully functional.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tokio::fs;

use crate::error::TaxonomyError;

/// Conventional file name of the tag registry
pub const TAGS_FILE_NAME: &str = "project-tags.yaml";

/// Environment variable overriding the registry location
pub const TAGS_PATH_ENV: &str = "PROJECT_TAGS_PATH";

/// Keys that carry node attributes rather than child tags
const RESERVED_KEYS: [&str; 2] = ["description", "aliases"];

/// One node of the parsed tag hierarchy.
///
/// Any key of a taxonomy mapping that is not in `RESERVED_KEYS` is a child
/// tag; that rule is applied once here, at parse time, so the flatten pass
/// below walks an explicit tree instead of re-inspecting raw YAML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: String,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub children: Vec<TagNode>,
    /// Declared without a mapping body (`name:` with a null or scalar value).
    /// Such a node is a valid tag but contributes no matching keywords.
    pub bare: bool,
}

/// Parse a taxonomy document into its tag tree.
///
/// The document must carry a top-level `hierarchy` mapping; everything under
/// it is tag nodes.
pub fn parse_taxonomy(path: &Path, source: &str) -> Result<Vec<TagNode>, TaxonomyError> {
    let document: Value =
        serde_yaml::from_str(source).map_err(|e| TaxonomyError::Parse {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    let hierarchy = document
        .get("hierarchy")
        .and_then(Value::as_mapping)
        .ok_or_else(|| TaxonomyError::Parse {
            path: path.to_path_buf(),
            details: "missing top-level `hierarchy` mapping".to_string(),
        })?;

    Ok(parse_nodes(hierarchy))
}

fn parse_nodes(mapping: &Mapping) -> Vec<TagNode> {
    mapping
        .iter()
        .filter_map(|(key, value)| {
            let name = key.as_str()?;
            if RESERVED_KEYS.contains(&name) {
                return None;
            }
            Some(parse_node(name, value))
        })
        .collect()
}

fn parse_node(name: &str, value: &Value) -> TagNode {
    match value.as_mapping() {
        Some(body) => TagNode {
            name: name.to_string(),
            description: body
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            aliases: body
                .get("aliases")
                .and_then(Value::as_sequence)
                .map(|seq| {
                    seq.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            children: parse_nodes(body),
            bare: false,
        },
        None => TagNode {
            name: name.to_string(),
            description: None,
            aliases: Vec::new(),
            children: Vec::new(),
            bare: true,
        },
    }
}

/// Flattened view of the tag hierarchy.
///
/// Built once per session and passed by reference to every consumer; there is
/// no hidden process-wide cache to invalidate.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    valid_tags: HashSet<String>,
    alias_map: Vec<(String, Vec<String>)>,
}

impl TagRegistry {
    /// Create an empty registry ("no taxonomy available")
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a parsed tag tree into a registry.
    ///
    /// Depth-first in declaration order. Every node is valid under its bare
    /// name, and additionally under its full `ancestor/name` path when nested.
    pub fn from_nodes(nodes: &[TagNode]) -> Self {
        let mut registry = Self::default();
        for node in nodes {
            registry.insert_node(node, "");
        }
        registry
    }

    fn insert_node(&mut self, node: &TagNode, prefix: &str) {
        self.valid_tags.insert(node.name.clone());
        if !prefix.is_empty() {
            self.valid_tags.insert(format!("{prefix}/{}", node.name));
        }

        if node.bare {
            return;
        }

        let mut keywords = vec![node.name.to_lowercase()];
        keywords.extend(node.aliases.iter().map(|alias| alias.to_lowercase()));

        // Keyword lists are keyed by bare name: a duplicate bare name at
        // another nesting depth overwrites the earlier list (last writer
        // wins) while keeping its original position. Namespaced validity
        // still distinguishes the two occurrences.
        match self.alias_map.iter_mut().find(|(tag, _)| *tag == node.name) {
            Some(entry) => entry.1 = keywords,
            None => self.alias_map.push((node.name.clone(), keywords)),
        }

        let child_prefix = if prefix.is_empty() {
            node.name.clone()
        } else {
            format!("{prefix}/{}", node.name)
        };
        for child in &node.children {
            self.insert_node(child, &child_prefix);
        }
    }

    /// Whether the registry holds no tags at all
    pub fn is_empty(&self) -> bool {
        self.valid_tags.is_empty()
    }

    /// Whether a tag identifier (bare or namespaced) is in the taxonomy
    pub fn contains(&self, tag: &str) -> bool {
        self.valid_tags.contains(tag)
    }

    /// The full set of valid tag identifiers
    pub fn valid_tags(&self) -> &HashSet<String> {
        &self.valid_tags
    }

    /// `(tag, keywords)` pairs in declaration order; keywords are lowercased
    pub fn alias_map(&self) -> &[(String, Vec<String>)] {
        &self.alias_map
    }

    /// Tag Validator: the subset of `tags` not present in the taxonomy, in
    /// document order.
    ///
    /// An empty registry disables the check entirely: no taxonomy means no
    /// tag is reported invalid.
    pub fn invalid_tags(&self, tags: &[String]) -> Vec<String> {
        if self.valid_tags.is_empty() {
            return Vec::new();
        }
        tags.iter()
            .filter(|tag| !self.valid_tags.contains(tag.as_str()))
            .cloned()
            .collect()
    }
}

/// Locates and loads the tag registry for a documentation root.
///
/// Resolution precedence: the explicit override (CLI flag or the
/// `PROJECT_TAGS_PATH` environment variable), then `<root>/project-tags.yaml`,
/// then the sibling `<root>/../project-tags.yaml`. The first existing
/// candidate wins.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyLoader {
    override_path: Option<PathBuf>,
}

impl TaxonomyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit registry path before the conventional locations
    pub fn with_override(override_path: Option<PathBuf>) -> Self {
        Self { override_path }
    }

    /// Candidate locations in precedence order
    pub fn candidates(&self, root: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.override_path {
            candidates.push(path.clone());
        }
        candidates.push(root.join(TAGS_FILE_NAME));
        if let Some(parent) = root.parent() {
            candidates.push(parent.join(TAGS_FILE_NAME));
        }
        candidates
    }

    /// Resolve the registry path, or fail with the searched locations
    pub async fn resolve(&self, root: &Path) -> Result<PathBuf, TaxonomyError> {
        let candidates = self.candidates(root);
        for candidate in &candidates {
            if matches!(fs::try_exists(candidate).await, Ok(true)) {
                return Ok(candidate.clone());
            }
        }
        Err(TaxonomyError::NotFound {
            searched: candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Load and flatten the registry
    pub async fn load(&self, root: &Path) -> Result<TagRegistry, TaxonomyError> {
        let path = self.resolve(root).await?;
        let source = fs::read_to_string(&path)
            .await
            .map_err(|source| TaxonomyError::Read {
                path: path.clone(),
                source,
            })?;
        let nodes = parse_taxonomy(&path, &source)?;
        Ok(TagRegistry::from_nodes(&nodes))
    }

    /// Load the registry, degrading to an empty one on any failure.
    ///
    /// A missing registry is an expected configuration, so it degrades
    /// silently; read and parse failures are reported on stderr first.
    pub async fn load_or_empty(&self, root: &Path) -> TagRegistry {
        match self.load(root).await {
            Ok(registry) => registry,
            Err(TaxonomyError::NotFound { .. }) => TagRegistry::new(),
            Err(err) => {
                eprintln!("Warning: {}", err);
                TagRegistry::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_from(source: &str) -> TagRegistry {
        let nodes = parse_taxonomy(Path::new("project-tags.yaml"), source).unwrap();
        TagRegistry::from_nodes(&nodes)
    }

    const SAMPLE: &str = r#"
hierarchy:
  security:
    description: Security topics
    aliases: [auth, rbac]
    identity:
      aliases: [oidc, sso]
  platform:
    aliases: [infrastructure]
  guide:
"#;

    #[test]
    fn test_every_key_is_valid_including_namespaced() {
        let registry = registry_from(SAMPLE);

        for tag in ["security", "identity", "platform", "guide"] {
            assert!(registry.contains(tag), "missing bare tag {tag}");
        }
        assert!(registry.contains("security/identity"));
        assert!(!registry.contains("security/platform"));
    }

    #[test]
    fn test_alias_map_order_and_keywords() {
        let registry = registry_from(SAMPLE);
        let alias_map = registry.alias_map();

        assert_eq!(alias_map[0].0, "security");
        assert_eq!(alias_map[0].1, vec!["security", "auth", "rbac"]);
        assert_eq!(alias_map[1].0, "identity");
        assert_eq!(alias_map[1].1, vec!["identity", "oidc", "sso"]);
        assert_eq!(alias_map[2].0, "platform");
    }

    #[test]
    fn test_bare_node_is_valid_but_has_no_keywords() {
        let registry = registry_from(SAMPLE);

        assert!(registry.contains("guide"));
        assert!(!registry.alias_map().iter().any(|(tag, _)| tag == "guide"));
    }

    #[test]
    fn test_keywords_are_case_folded() {
        let registry = registry_from(
            "hierarchy:\n  Security:\n    aliases: [RBAC]\n",
        );

        assert_eq!(registry.alias_map()[0].1, vec!["security", "rbac"]);
        // Validity keeps the declared casing
        assert!(registry.contains("Security"));
        assert!(!registry.contains("security"));
    }

    #[test]
    fn test_duplicate_bare_name_last_writer_wins_in_place() {
        let registry = registry_from(
            r#"
hierarchy:
  api:
    aliases: [rest]
  platform:
    api:
      aliases: [grpc]
"#,
        );

        let alias_map = registry.alias_map();
        // First-insertion position kept, most-recently-visited keywords kept
        assert_eq!(alias_map[0].0, "api");
        assert_eq!(alias_map[0].1, vec!["api", "grpc"]);
        // Both occurrences stay addressable through the valid-tag set
        assert!(registry.contains("api"));
        assert!(registry.contains("platform/api"));
    }

    #[test]
    fn test_deeply_nested_namespaced_paths() {
        let registry = registry_from(
            "hierarchy:\n  a:\n    b:\n      c:\n        aliases: [deep]\n",
        );

        assert!(registry.contains("a/b"));
        assert!(registry.contains("a/b/c"));
        assert!(registry.contains("c"));
    }

    #[test]
    fn test_invalid_tags_subset() {
        let registry = registry_from(SAMPLE);

        let tags = vec![
            "security".to_string(),
            "bogus".to_string(),
            "security/identity".to_string(),
            "unknown".to_string(),
        ];
        assert_eq!(registry.invalid_tags(&tags), vec!["bogus", "unknown"]);

        let all_valid = vec!["security".to_string(), "guide".to_string()];
        assert!(registry.invalid_tags(&all_valid).is_empty());
    }

    #[test]
    fn test_empty_registry_reports_no_invalid_tags() {
        let registry = TagRegistry::new();
        let tags = vec!["anything".to_string(), "goes".to_string()];
        assert!(registry.invalid_tags(&tags).is_empty());
    }

    #[test]
    fn test_aliases_are_keywords_not_valid_tags() {
        let registry = registry_from(SAMPLE);
        assert!(!registry.contains("rbac"));
        assert!(!registry.contains("auth"));
    }

    #[test]
    fn test_missing_hierarchy_key_is_a_parse_error() {
        let result = parse_taxonomy(Path::new("project-tags.yaml"), "tags:\n  a:\n");
        match result {
            Err(TaxonomyError::Parse { details, .. }) => {
                assert!(details.contains("hierarchy"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let result = parse_taxonomy(Path::new("project-tags.yaml"), "hierarchy: [unclosed");
        assert!(matches!(result, Err(TaxonomyError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_resolve_prefers_override() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("docs");
        tokio::fs::create_dir_all(&root).await.unwrap();

        let override_path = temp_dir.path().join("custom-tags.yaml");
        tokio::fs::write(&override_path, "hierarchy:\n  a:\n")
            .await
            .unwrap();
        tokio::fs::write(root.join(TAGS_FILE_NAME), "hierarchy:\n  b:\n")
            .await
            .unwrap();

        let loader = TaxonomyLoader::with_override(Some(override_path.clone()));
        assert_eq!(loader.resolve(&root).await.unwrap(), override_path);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_root_then_sibling() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("docs");
        tokio::fs::create_dir_all(&root).await.unwrap();
        tokio::fs::write(temp_dir.path().join(TAGS_FILE_NAME), "hierarchy:\n  a:\n")
            .await
            .unwrap();

        let loader = TaxonomyLoader::new();
        assert_eq!(
            loader.resolve(&root).await.unwrap(),
            temp_dir.path().join(TAGS_FILE_NAME)
        );
    }

    #[tokio::test]
    async fn test_missing_registry_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();

        let loader = TaxonomyLoader::new();
        let result = loader.load(temp_dir.path()).await;
        assert!(matches!(result, Err(TaxonomyError::NotFound { .. })));

        let registry = loader.load_or_empty(temp_dir.path()).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_registry_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(
            temp_dir.path().join(TAGS_FILE_NAME),
            "not a registry at all",
        )
        .await
        .unwrap();

        let loader = TaxonomyLoader::new();
        let registry = loader.load_or_empty(temp_dir.path()).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_load_builds_registry() {
        let temp_dir = TempDir::new().unwrap();
        tokio::fs::write(temp_dir.path().join(TAGS_FILE_NAME), SAMPLE)
            .await
            .unwrap();

        let loader = TaxonomyLoader::new();
        let registry = loader.load(temp_dir.path()).await.unwrap();
        assert!(registry.contains("security/identity"));
    }
}
