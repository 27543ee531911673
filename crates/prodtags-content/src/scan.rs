//! Recursive search for documents that carry a tag.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_walkdir::WalkDir;
use futures::StreamExt;
use prodtags_core::util::paths::is_hidden_below;
use prodtags_core::{Error, Result, Tag};

use crate::document::{DEFAULT_TAGS_HEADING, list_tags_in_document};

/// Walks a directory tree and reads the tags line of each candidate file.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use prodtags_content::DocumentScanner;
/// use prodtags_core::Tag;
///
/// # async fn example() -> prodtags_core::Result<()> {
/// let scanner = DocumentScanner::new("# Tags").with_extensions(["md", "txt"]);
/// let tag: Tag = "work::meetings".parse()?;
/// for path in scanner.list_documents_with_tag(Path::new("notes"), &tag).await? {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    heading: String,
    extensions: HashSet<String>,
    include_hidden: bool,
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new(DEFAULT_TAGS_HEADING)
    }
}

impl DocumentScanner {
    /// Scanner for documents using `heading`; every file is a candidate.
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            extensions: HashSet::new(),
            include_hidden: false,
        }
    }

    /// Only consider files with these extensions (case-insensitive, with or
    /// without the leading dot). An empty list means every file.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        self
    }

    /// Also descend into, and read, entries whose name starts with a dot.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Heading this scanner looks for.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// Candidate files below `root`, sorted.
    pub async fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::metadata(root)
            .await
            .map_err(|e| Error::io_with_path(e, root))?;

        let mut files = Vec::new();
        let mut walker = WalkDir::new(root);

        while let Some(entry) = walker.next().await {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("Walk error: {}", e);
                    continue;
                }
            };

            let path = entry.path();

            // Skip directories
            if path.is_dir() {
                continue;
            }

            if !self.include_hidden && is_hidden_below(root, &path) {
                continue;
            }

            if self.matches_extension(&path) {
                files.push(path);
            }
        }

        // Sort for deterministic ordering
        files.sort();

        Ok(files)
    }

    /// Files below `root` whose tags line contains `tag`, sorted.
    pub async fn list_documents_with_tag(&self, root: &Path, tag: &Tag) -> Result<Vec<PathBuf>> {
        let mut matches = Vec::new();

        for path in self.find_files(root).await? {
            match list_tags_in_document(&path, &self.heading).await {
                Ok(tags) if tags.contains(tag) => matches.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("Failed to read {:?}: {}", path, e),
            }
        }

        log::debug!(
            "Found {} document(s) tagged {tag} below {}",
            matches.len(),
            root.display()
        );
        Ok(matches)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .map(|ext| self.extensions.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }
}

// ============================================================================
// Tests
// ============================================================================
