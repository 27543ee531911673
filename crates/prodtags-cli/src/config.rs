//! Configuration for the `tags` tool.

use std::path::PathBuf;

use prodtags_content::{DEFAULT_TAGS_HEADING, DocumentScanner};
use prodtags_core::traits::ConfigManager;
use prodtags_core::util::paths::expand_tilde;
use serde::{Deserialize, Serialize};

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Hierarchy file used when `--tag-file` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_file: Option<String>,

    /// Directory searched by `list-documents-with-tag` when no path is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<String>,

    /// Heading line that introduces a document's tags.
    pub tags_heading: String,

    /// File extensions considered documents; empty means every file.
    pub extensions: Vec<String>,

    /// Also search hidden files and directories.
    pub include_hidden: bool,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when neither `RUST_LOG` nor `-v` is given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            tag_file: None,
            documents_dir: None,
            tags_heading: DEFAULT_TAGS_HEADING.to_string(),
            extensions: vec!["md".to_string()],
            include_hidden: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl ConfigManager for TagsConfig {
    fn project_name() -> &'static str {
        "prodtags"
    }
}

impl TagsConfig {
    /// Configured hierarchy file with `~` expanded.
    pub fn tag_file_path(&self) -> Option<PathBuf> {
        self.tag_file.as_deref().map(expand_tilde)
    }

    /// Configured documents directory with `~` expanded.
    pub fn documents_dir_path(&self) -> Option<PathBuf> {
        self.documents_dir.as_deref().map(expand_tilde)
    }

    /// Scanner set up with this config's heading, extensions and hidden-file rule.
    pub fn scanner(&self) -> DocumentScanner {
        DocumentScanner::new(self.tags_heading.clone())
            .with_extensions(&self.extensions)
            .include_hidden(self.include_hidden)
    }
}
