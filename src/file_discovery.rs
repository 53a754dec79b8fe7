use crate::error::{AuditError, Result};
use globset::{GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directories never descended into: dependency and build output trees
const EXCLUDED_DIRS: [&str; 4] = ["node_modules", "dist", "target", "build"];

/// File names excluded from metadata auditing even when the extension matches.
/// README files are covered by the structural check instead.
const EXCLUDED_FILES: [&str; 1] = ["README.md"];

/// Async walker that enumerates candidate documents under a root.
///
/// Results are sorted lexicographically so reports are reproducible across
/// runs and platforms.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include (e.g., ["md", "adoc"])
    extensions: Vec<String>,
    /// Include patterns set
    include_set: Option<GlobSet>,
    /// Exclude patterns set
    exclude_set: Option<GlobSet>,
    /// Maximum depth for directory traversal (None = unlimited)
    max_depth: Option<usize>,
    /// Follow symbolic links
    follow_symlinks: bool,
}

impl FileDiscovery {
    /// Create a new FileDiscovery instance for documentation files
    pub fn new() -> Self {
        Self {
            extensions: vec!["md".to_string(), "adoc".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Set file extensions to discover
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add include patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = Self::build_glob_set(patterns, "include")?;
        Ok(self)
    }

    /// Add exclude patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = Self::build_glob_set(patterns, "exclude")?;
        Ok(self)
    }

    fn build_glob_set(patterns: Vec<String>, kind: &str) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = globset::GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| {
                    AuditError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
                })?;
            builder.add(glob);
        }

        Ok(Some(builder.build().map_err(|e| {
            AuditError::Config(format!("Failed to build {} glob set: {}", kind, e))
        })?))
    }

    /// Set maximum traversal depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Discover files in the given path (file or directory), sorted
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path).await.map_err(AuditError::from)?;

        if metadata.is_file() {
            if self.should_process(path) {
                return Ok(vec![path.to_path_buf()]);
            } else {
                return Ok(Vec::new());
            }
        }

        let mut files = Vec::new();
        let mut read_dir = fs::read_dir(path).await.map_err(AuditError::from)?;

        while let Some(entry) = read_dir.next_entry().await.map_err(AuditError::from)? {
            let entry_path = entry.path();

            if entry_path.is_symlink() && !self.follow_symlinks {
                continue;
            }

            if let Err(e) = self
                .discover_files_recursive(&entry_path, 0, &mut files)
                .await
            {
                // Log error but continue processing other files
                eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
            }
        }

        // Stable lexicographic order for reproducible reports
        files.sort();
        Ok(files)
    }

    /// Recursive helper for discovering files
    fn discover_files_recursive<'a>(
        &'a self,
        path: &'a Path,
        depth: usize,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                return Ok(());
            }

            let metadata = fs::metadata(path).await.map_err(AuditError::from)?;

            if metadata.is_file() {
                if self.should_process(path) {
                    files.push(path.to_path_buf());
                }
            } else if metadata.is_dir() {
                if !self.should_descend(path) {
                    return Ok(());
                }

                if let Some(max_depth) = self.max_depth
                    && depth >= max_depth
                {
                    return Ok(());
                }

                let mut read_dir = fs::read_dir(path).await.map_err(AuditError::from)?;

                while let Some(entry) = read_dir.next_entry().await.map_err(AuditError::from)? {
                    let entry_path = entry.path();

                    if entry_path.is_symlink() && !self.follow_symlinks {
                        continue;
                    }

                    if let Err(e) = self
                        .discover_files_recursive(&entry_path, depth + 1, files)
                        .await
                    {
                        // Log error but continue processing other files
                        eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
                    }
                }
            }

            Ok(())
        })
    }

    /// Check whether a directory should be walked into
    fn should_descend(&self, path: &Path) -> bool {
        match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => !name.starts_with('.') && !EXCLUDED_DIRS.contains(&name),
            None => true,
        }
    }

    /// Check if a file should be processed based on extensions and patterns
    pub fn should_process(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            if name.starts_with('.') || EXCLUDED_FILES.contains(&name) {
                return false;
            }
        }

        // Check extension
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            if !self.extensions.contains(&extension.to_lowercase()) {
                return false;
            }
        } else {
            return false;
        }

        // Check exclude patterns first
        if let Some(exclude_set) = &self.exclude_set
            && exclude_set.is_match(path)
        {
            return false;
        }

        // Check include patterns (if any are specified, at least one must match)
        if let Some(include_set) = &self.include_set {
            return include_set.is_match(path);
        }

        true
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::fs;

    async fn create_test_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("guides")).await.unwrap();
        fs::create_dir_all(root.join("reference/deep")).await.unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).await.unwrap();
        fs::create_dir_all(root.join(".hidden")).await.unwrap();

        fs::write(root.join("index.md"), "# Index").await.unwrap();
        fs::write(root.join("README.md"), "# Readme").await.unwrap();
        fs::write(root.join("notes.txt"), "text").await.unwrap();
        fs::write(root.join("guides/setup.md"), "# Setup").await.unwrap();
        fs::write(root.join("reference/api.adoc"), "= API").await.unwrap();
        fs::write(root.join("reference/deep/internals.md"), "# Internals")
            .await
            .unwrap();
        fs::write(root.join("node_modules/pkg/README.md"), "dep")
            .await
            .unwrap();
        fs::write(root.join("node_modules/pkg/doc.md"), "dep doc")
            .await
            .unwrap();
        fs::write(root.join(".hidden/secret.md"), "hidden").await.unwrap();

        temp_dir
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_discovers_doc_files_only() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        let found = names(&files);

        assert!(found.contains(&"index.md".to_string()));
        assert!(found.contains(&"setup.md".to_string()));
        assert!(found.contains(&"api.adoc".to_string()));
        assert!(found.contains(&"internals.md".to_string()));
        assert!(!found.contains(&"notes.txt".to_string()));
        assert_eq!(files.len(), 4);
    }

    #[tokio::test]
    async fn test_skips_dependency_and_hidden_directories() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();

        assert!(!files.iter().any(|p| p.components().any(|c| {
            matches!(c.as_os_str().to_str(), Some("node_modules") | Some(".hidden"))
        })));
    }

    #[tokio::test]
    async fn test_skips_readme_files() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        assert!(!names(&files).contains(&"README.md".to_string()));
    }

    #[tokio::test]
    async fn test_results_are_sorted() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[tokio::test]
    async fn test_single_extension_filter() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new().with_extensions(vec!["adoc".to_string()]);

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        assert_eq!(names(&files), vec!["api.adoc"]);
    }

    #[tokio::test]
    async fn test_max_depth_limit() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new().with_max_depth(Some(1));

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        let found = names(&files);

        assert!(found.contains(&"index.md".to_string()));
        assert!(found.contains(&"setup.md".to_string()));
        assert!(!found.contains(&"internals.md".to_string())); // Too deep
    }

    #[tokio::test]
    async fn test_exclude_patterns() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new()
            .with_exclude_patterns(vec!["**/reference/**".to_string()])
            .unwrap();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        let found = names(&files);

        assert!(!found.contains(&"api.adoc".to_string()));
        assert!(!found.contains(&"internals.md".to_string()));
        assert!(found.contains(&"index.md".to_string()));
    }

    #[tokio::test]
    async fn test_include_patterns() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new()
            .with_include_patterns(vec!["**/guides/*".to_string()])
            .unwrap();

        let files = discovery.discover_files(temp_dir.path()).await.unwrap();
        assert_eq!(names(&files), vec!["setup.md"]);
    }

    #[tokio::test]
    async fn test_invalid_glob_pattern_is_a_config_error() {
        let result = FileDiscovery::new().with_exclude_patterns(vec!["[".to_string()]);
        assert!(matches!(result, Err(AuditError::Config(_))));
    }

    #[tokio::test]
    async fn test_single_file_path() {
        let temp_dir = create_test_tree().await;
        let discovery = FileDiscovery::new();

        let file = temp_dir.path().join("index.md");
        let files = discovery.discover_files(&file).await.unwrap();
        assert_eq!(files, vec![file]);

        let other = temp_dir.path().join("notes.txt");
        let files = discovery.discover_files(&other).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_should_process() {
        let discovery = FileDiscovery::new();

        assert!(discovery.should_process(Path::new("doc.md")));
        assert!(discovery.should_process(Path::new("doc.adoc")));
        assert!(!discovery.should_process(Path::new("doc.txt")));
        assert!(!discovery.should_process(Path::new("doc"))); // No extension
        assert!(!discovery.should_process(Path::new("README.md")));
        assert!(!discovery.should_process(Path::new(".draft.md")));
    }

    #[tokio::test]
    async fn test_nonexistent_directory() {
        let discovery = FileDiscovery::new();
        let result = discovery.discover_files(Path::new("/nonexistent/path")).await;

        assert!(result.is_err());
        match result.unwrap_err() {
            AuditError::Io(_) => {} // Expected
            _ => panic!("Expected IO error"),
        }
    }
}
