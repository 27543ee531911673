//! Error types for prodtags-core.

use std::path::{Path, PathBuf};

/// Errors that can occur while working with tags, hierarchies and documents.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error without a known path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific file or directory
    #[error("I/O error on {}: {source}", path.display())]
    IoWithPath {
        /// Path that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed YAML, TOML or document content
    #[error("Parse error: {message}")]
    Parse {
        /// What could not be parsed
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// A string that does not have the `foo::bar` tag format
    #[error("Invalid tag '{tag}': expected components of [a-zA-Z0-9_-] joined by '::'")]
    InvalidTag {
        /// The rejected input
        tag: String,
    },

    /// A tag hierarchy file without a `.yml` or `.yaml` extension
    #[error("Not a YAML tag file: {}", path.display())]
    InvalidTagFile {
        /// The rejected path
        path: PathBuf,
    },

    /// Tag (or one of its ancestors) missing from the hierarchy
    #[error("Tag not found: {tag}")]
    TagNotFound {
        /// Tag that was looked up
        tag: String,
    },

    /// Tag already present in the hierarchy
    #[error("Tag already exists: {tag}")]
    TagExists {
        /// Tag that collided
        tag: String,
    },

    /// Rename that would move a tag below itself
    #[error("Cannot move {from} below itself ({to})")]
    InvalidMove {
        /// Tag being moved
        from: String,
        /// Requested destination
        to: String,
    },

    /// Document has no tags heading to attach tags to
    #[error("No tags section in {}", path.display())]
    MissingTagsSection {
        /// Document path
        path: PathBuf,
    },
}

/// Convenience `Result` type alias for prodtags operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it happened on.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::IoWithPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an invalid tag error.
    pub fn invalid_tag<S: Into<String>>(tag: S) -> Self {
        Error::InvalidTag { tag: tag.into() }
    }

    /// Creates a tag-not-found error.
    pub fn not_found(tag: impl ToString) -> Self {
        Error::TagNotFound {
            tag: tag.to_string(),
        }
    }

    /// Creates a tag-exists error.
    pub fn exists(tag: impl ToString) -> Self {
        Error::TagExists {
            tag: tag.to_string(),
        }
    }

    /// Returns whether this error reports a missing tag or file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::TagNotFound { .. } => true,
            Error::Io(e) | Error::IoWithPath { source: e, .. } => {
                e.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }

    /// Returns whether this error was caused by user input rather than the
    /// environment (bad tag, bad file name, conflicting edit).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidTag { .. }
                | Error::InvalidTagFile { .. }
                | Error::TagNotFound { .. }
                | Error::TagExists { .. }
                | Error::InvalidMove { .. }
                | Error::MissingTagsSection { .. }
        )
    }
}
