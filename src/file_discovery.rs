use crate::error::{Result, ValidationError};
use globset::{GlobSet, GlobSetBuilder};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;

/// Async discovery of markup documents under a directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include, lowercase, without the dot
    extensions: Vec<String>,
    /// Include patterns, matched against the path relative to the scan root
    include_set: Option<GlobSet>,
    /// Exclude patterns, matched against the path relative to the scan root
    exclude_set: Option<GlobSet>,
    /// Maximum depth for directory traversal (None = unlimited)
    max_depth: Option<usize>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["html".to_string(), "htm".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
        }
    }

    /// Set file extensions to discover
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Add include patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = build_glob_set(&patterns, "include")?;
        Ok(self)
    }

    /// Add exclude patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = build_glob_set(&patterns, "exclude")?;
        Ok(self)
    }

    /// Set maximum traversal depth
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Discover documents under `path`, sorted.
    ///
    /// A file given directly is always returned, whatever its extension.
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| ValidationError::FileSystemTraversal {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if metadata.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = Vec::new();
        self.walk(path, path, 0, &mut files).await?;
        files.sort();
        Ok(files)
    }

    fn walk<'a>(
        &'a self,
        root: &'a Path,
        dir: &'a Path,
        depth: usize,
        files: &'a mut Vec<PathBuf>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut read_dir = fs::read_dir(dir).await?;

            while let Some(entry) = read_dir.next_entry().await? {
                let entry_path = entry.path();

                // Symbolic links are never followed
                match entry.file_type().await {
                    Ok(file_type) if file_type.is_symlink() => continue,
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
                        continue;
                    }
                }

                let metadata = match fs::metadata(&entry_path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
                        continue;
                    }
                };

                if metadata.is_file() {
                    if self.should_process(root, &entry_path) {
                        files.push(entry_path);
                    }
                } else if metadata.is_dir() {
                    if let Some(max_depth) = self.max_depth
                        && depth >= max_depth
                    {
                        continue;
                    }
                    if let Err(e) = self.walk(root, &entry_path, depth + 1, files).await {
                        eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
                    }
                }
            }

            Ok(())
        })
    }

    /// Check if a file under `root` should be processed based on extensions
    /// and patterns
    pub fn should_process(&self, root: &Path, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        if !self.extensions.contains(&extension.to_lowercase()) {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);

        if let Some(exclude_set) = &self.exclude_set
            && exclude_set.is_match(relative)
        {
            return false;
        }

        // If include patterns are given, at least one must match
        if let Some(include_set) = &self.include_set {
            return include_set.is_match(relative);
        }

        true
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn build_glob_set(patterns: &[String], kind: &str) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                ValidationError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }

    let set = builder.build().map_err(|e| {
        ValidationError::Config(format!("Failed to build {} glob set: {}", kind, e))
    })?;
    Ok(Some(set))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_site() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("blog/2024")).await.unwrap();
        fs::create_dir_all(root.join("vendor")).await.unwrap();

        for file in [
            "index.html",
            "about.HTM",
            "notes.txt",
            "blog/post.html",
            "blog/2024/deep.html",
            "vendor/lib.html",
        ] {
            fs::write(root.join(file), "<p></p>").await.unwrap();
        }
        temp_dir
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[tokio::test]
    async fn test_discovers_markup_sorted() {
        let site = create_site().await;
        let files = FileDiscovery::new().discover_files(site.path()).await.unwrap();

        assert_eq!(
            relative(site.path(), &files),
            vec![
                "about.HTM",
                "blog/2024/deep.html",
                "blog/post.html",
                "index.html",
                "vendor/lib.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_max_depth() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .with_max_depth(Some(1))
            .discover_files(site.path())
            .await
            .unwrap();
        assert!(!relative(site.path(), &files).contains(&"blog/2024/deep.html".to_string()));
        assert!(relative(site.path(), &files).contains(&"blog/post.html".to_string()));

        let files = FileDiscovery::new()
            .with_max_depth(Some(0))
            .discover_files(site.path())
            .await
            .unwrap();
        assert_eq!(relative(site.path(), &files), vec!["about.HTM", "index.html"]);
    }

    #[tokio::test]
    async fn test_include_and_exclude_patterns() {
        let site = create_site().await;
        let files = FileDiscovery::new()
            .with_exclude_patterns(vec!["vendor/**".to_string()])
            .unwrap()
            .with_include_patterns(vec!["blog/**".to_string(), "*.html".to_string()])
            .unwrap()
            .discover_files(site.path())
            .await
            .unwrap();

        assert_eq!(
            relative(site.path(), &files),
            vec!["blog/2024/deep.html", "blog/post.html", "index.html"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_are_skipped_without_losing_siblings() {
        let site = create_site().await;
        let root = site.path();
        std::os::unix::fs::symlink(root, root.join("blog/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("missing.html"), root.join("dangling.html")).unwrap();
        std::os::unix::fs::symlink(root.join("index.html"), root.join("alias.html")).unwrap();

        let files = FileDiscovery::new().discover_files(root).await.unwrap();
        assert_eq!(
            relative(root, &files),
            vec![
                "about.HTM",
                "blog/2024/deep.html",
                "blog/post.html",
                "index.html",
                "vendor/lib.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_explicit_file_ignores_extension() {
        let site = create_site().await;
        let notes = site.path().join("notes.txt");
        let files = FileDiscovery::new().discover_files(&notes).await.unwrap();
        assert_eq!(files, vec![notes]);
    }

    #[tokio::test]
    async fn test_missing_path_is_error() {
        let result = FileDiscovery::new()
            .discover_files(Path::new("/nonexistent/site"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ValidationError::FileSystemTraversal { .. }
        ));
    }

    #[test]
    fn test_invalid_glob() {
        let result = FileDiscovery::new().with_include_patterns(vec!["a[".to_string()]);
        assert!(matches!(result.unwrap_err(), ValidationError::Config(_)));
    }

    #[test]
    fn test_custom_extensions() {
        let discovery = FileDiscovery::new().with_extensions(vec!["XHTML".to_string()]);
        let root = Path::new("/site");
        assert!(discovery.should_process(root, Path::new("/site/a.xhtml")));
        assert!(!discovery.should_process(root, Path::new("/site/a.html")));
        assert!(!discovery.should_process(root, Path::new("/site/README")));
    }
}
