//! Reading and editing the tags line of a document.
//!
//! The tags line is the line right after the tags heading. Entries are
//! separated by commas; whitespace around an entry is kept when the line is
//! edited, and entries that are not valid tags are left alone.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use prodtags_core::{Error, Result, Tag};

/// Heading that introduces the tags line unless configured otherwise.
pub const DEFAULT_TAGS_HEADING: &str = "# Tags";

/// A text document split into lines, with its tags line located on demand.
///
/// [`render`](Self::render) returns the input byte for byte until an edit
/// changes something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedDocument {
    path: Option<PathBuf>,
    heading: String,
    lines: Vec<String>,
    trailing_newline: bool,
}

impl TaggedDocument {
    /// Split `text` into lines, remembering whether it ended with a newline.
    pub fn parse(text: &str, heading: &str) -> Self {
        let trailing_newline = text.ends_with('\n');
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            text.strip_suffix('\n')
                .unwrap_or(text)
                .split('\n')
                .map(str::to_string)
                .collect()
        };

        Self {
            path: None,
            heading: heading.trim_end().to_string(),
            lines,
            trailing_newline,
        }
    }

    /// Attach the file the text came from; used in error messages.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// File the document was read from, if known.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Index of the tags heading.
    pub fn heading_line(&self) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.trim_end() == self.heading)
    }

    /// Index of the tags line.
    ///
    /// `None` if there is no heading or nothing follows it.
    pub fn tags_line(&self) -> Option<usize> {
        let heading = self.heading_line()?;
        (heading + 1 < self.lines.len()).then_some(heading + 1)
    }

    /// Valid tags on the tags line, in order.
    pub fn tags(&self) -> Vec<Tag> {
        let Some(idx) = self.tags_line() else {
            return Vec::new();
        };
        let (body, _) = split_eol(&self.lines[idx]);
        body.split(',')
            .filter_map(|entry| Tag::parse(entry.trim()).ok())
            .collect()
    }

    /// True if `tag` is on the tags line.
    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags().contains(tag)
    }

    /// Append `tag` to the tags line.
    ///
    /// Returns `false` if the tag is already there. When the heading is the
    /// last line, a tags line is created below it.
    pub fn add_tag(&mut self, tag: &Tag) -> Result<bool> {
        let heading = self
            .heading_line()
            .ok_or_else(|| Error::MissingTagsSection {
                path: self.path.clone().unwrap_or_default(),
            })?;

        if self.has_tag(tag) {
            return Ok(false);
        }

        match self.tags_line() {
            Some(idx) => {
                let (body, eol) = split_eol(&self.lines[idx]);
                let body = body.trim_end();
                let body = body.strip_suffix(',').unwrap_or(body).trim_end();
                let line = if body.trim().is_empty() {
                    format!("{tag}{eol}")
                } else {
                    format!("{body},{tag}{eol}")
                };
                self.lines[idx] = line;
            }
            None => {
                let (_, eol) = split_eol(&self.lines[heading]);
                let line = format!("{tag}{eol}");
                self.lines.push(line);
            }
        }
        Ok(true)
    }

    /// Drop `tag` and every tag below it from the tags line.
    ///
    /// Returns whether the line changed.
    pub fn remove_tag(&mut self, tag: &Tag) -> bool {
        self.edit_tags_line(|entries| {
            entries
                .into_iter()
                .filter(|entry| {
                    !Tag::parse(entry.trim())
                        .map(|t| &t == tag || tag.is_ancestor_of(&t))
                        .unwrap_or(false)
                })
                .collect()
        })
    }

    /// Replace `old` with `new`, carrying tags below `old` along
    /// (`old::x` becomes `new::x`).
    ///
    /// An entry that would duplicate a tag already on the line is dropped.
    /// Returns whether the line changed.
    pub fn rename_tag(&mut self, old: &Tag, new: &Tag) -> bool {
        self.edit_tags_line(|entries| {
            let mut seen: HashSet<Tag> = entries
                .iter()
                .filter_map(|entry| Tag::parse(entry.trim()).ok())
                .filter(|t| t.replace_prefix(old, new).is_none())
                .collect();

            let mut out = Vec::with_capacity(entries.len());
            for entry in entries {
                let renamed = Tag::parse(entry.trim())
                    .ok()
                    .and_then(|t| t.replace_prefix(old, new));
                match renamed {
                    Some(t) => {
                        if seen.insert(t.clone()) {
                            out.push(replace_trimmed(&entry, &t.to_string()));
                        }
                    }
                    None => out.push(entry),
                }
            }
            out
        })
    }

    /// The document text.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }

    fn edit_tags_line<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(Vec<String>) -> Vec<String>,
    {
        let Some(idx) = self.tags_line() else {
            return false;
        };

        let (body, eol) = split_eol(&self.lines[idx]);
        let entries = body.split(',').map(str::to_string).collect();
        let line = format!("{}{eol}", edit(entries).join(","));

        if line == self.lines[idx] {
            return false;
        }
        self.lines[idx] = line;
        true
    }
}

/// Separate a trailing `\r` so CRLF files keep their line endings.
fn split_eol(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    }
}

/// Swap the non-whitespace part of `entry`, keeping its padding.
fn replace_trimmed(entry: &str, with: &str) -> String {
    let start = entry.len() - entry.trim_start().len();
    let end = entry.trim_end().len();
    format!("{}{with}{}", &entry[..start], &entry[end..])
}

// ============================================================================
// File helpers
// ============================================================================

/// Outcome of editing a document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEdit {
    /// The edited file.
    pub path: PathBuf,
    /// The new document text.
    pub content: String,
    /// False for dry runs.
    pub written: bool,
}

/// Read a document; `None` if it is not valid UTF-8.
async fn read_document(path: &Path, heading: &str) -> Result<Option<TaggedDocument>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io_with_path(e, path))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(TaggedDocument::parse(&text, heading).with_path(path))),
        Err(_) => {
            log::debug!("Treating non-UTF-8 file {} as untagged", path.display());
            Ok(None)
        }
    }
}

async fn finish_edit(
    path: &Path,
    document: &TaggedDocument,
    dry_run: bool,
) -> Result<DocumentEdit> {
    let content = document.render();
    if !dry_run {
        tokio::fs::write(path, &content)
            .await
            .map_err(|e| Error::io_with_path(e, path))?;
        log::info!("Updated tags in {}", path.display());
    }
    Ok(DocumentEdit {
        path: path.to_path_buf(),
        content,
        written: !dry_run,
    })
}

/// Tags on the tags line of the document at `path`.
pub async fn list_tags_in_document(path: &Path, heading: &str) -> Result<Vec<Tag>> {
    Ok(read_document(path, heading)
        .await?
        .map(|doc| doc.tags())
        .unwrap_or_default())
}

/// Add `tag` to the document at `path`.
///
/// Returns `None` when the tag is already present.
pub async fn add_tag_to_document(
    path: &Path,
    heading: &str,
    tag: &Tag,
    dry_run: bool,
) -> Result<Option<DocumentEdit>> {
    let Some(mut document) = read_document(path, heading).await? else {
        return Err(Error::MissingTagsSection {
            path: path.to_path_buf(),
        });
    };

    if !document.add_tag(tag)? {
        log::debug!("{} already carries {tag}", path.display());
        return Ok(None);
    }
    finish_edit(path, &document, dry_run).await.map(Some)
}

/// Remove `tag` (and tags below it) from the document at `path`.
///
/// Returns `None` when nothing was removed.
pub async fn remove_tag_from_document(
    path: &Path,
    heading: &str,
    tag: &Tag,
    dry_run: bool,
) -> Result<Option<DocumentEdit>> {
    let Some(mut document) = read_document(path, heading).await? else {
        return Ok(None);
    };

    if !document.remove_tag(tag) {
        return Ok(None);
    }
    finish_edit(path, &document, dry_run).await.map(Some)
}

/// Rename `old` to `new` in the document at `path`.
///
/// Returns `None` when nothing was renamed.
pub async fn rename_tag_in_document(
    path: &Path,
    heading: &str,
    old: &Tag,
    new: &Tag,
    dry_run: bool,
) -> Result<Option<DocumentEdit>> {
    let Some(mut document) = read_document(path, heading).await? else {
        return Ok(None);
    };

    if !document.rename_tag(old, new) {
        return Ok(None);
    }
    finish_edit(path, &document, dry_run).await.map(Some)
}

// ============================================================================
// Tests
// ============================================================================
