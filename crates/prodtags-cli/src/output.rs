//! Rendering command results as plain text or JSON.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use prodtags_content::DocumentEdit;
use prodtags_core::Tag;
use serde::Serialize;

/// One file touched (or, in a dry run, that would be touched) by a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// The file.
    pub path: PathBuf,
    /// New content; only kept for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileChange {
    /// Change record for `path`; the content is kept only for dry runs.
    pub fn new(path: impl AsRef<Path>, content: &str, dry_run: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            content: dry_run.then(|| content.to_string()),
        }
    }
}

impl From<DocumentEdit> for FileChange {
    fn from(edit: DocumentEdit) -> Self {
        Self {
            path: edit.path,
            content: (!edit.written).then_some(edit.content),
        }
    }
}

/// Everything an editing command changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditReport {
    /// True if nothing was written.
    pub dry_run: bool,
    /// Files in the order they were edited.
    pub changes: Vec<FileChange>,
}

impl EditReport {
    /// Empty report.
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            changes: Vec::new(),
        }
    }

    /// Record a change.
    pub fn push(&mut self, change: FileChange) {
        self.changes.push(change);
    }
}

/// Writes results to stdout (or any writer) in the selected format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Plain text unless `json` is set.
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// A list of tags, one per line.
    pub fn tags<W: Write>(&self, out: &mut W, tags: &[Tag]) -> io::Result<()> {
        if self.json {
            return self.write_json(out, &tags);
        }
        for tag in tags {
            writeln!(out, "{tag}")?;
        }
        Ok(())
    }

    /// A single tag.
    pub fn tag<W: Write>(&self, out: &mut W, tag: &Tag) -> io::Result<()> {
        if self.json {
            return self.write_json(out, tag);
        }
        writeln!(out, "{tag}")
    }

    /// `true` or `false`.
    pub fn boolean<W: Write>(&self, out: &mut W, value: bool) -> io::Result<()> {
        if self.json {
            return self.write_json(out, &value);
        }
        writeln!(out, "{value}")
    }

    /// A list of paths, one per line.
    pub fn paths<W: Write>(&self, out: &mut W, paths: &[PathBuf]) -> io::Result<()> {
        if self.json {
            return self.write_json(out, &paths);
        }
        for path in paths {
            writeln!(out, "{}", path.display())?;
        }
        Ok(())
    }

    /// A single path.
    pub fn path<W: Write>(&self, out: &mut W, path: &Path) -> io::Result<()> {
        if self.json {
            return self.write_json(out, path);
        }
        writeln!(out, "{}", path.display())
    }

    /// A configuration value; lists print as `a,b`, sections as `key = value` lines.
    pub fn config_value<W: Write>(&self, out: &mut W, value: &toml::Value) -> io::Result<()> {
        if self.json {
            return self.write_json(out, value);
        }
        writeln!(out, "{}", display_value(value))
    }

    /// Result of an editing command.
    ///
    /// Dry runs print the new content; with several files each one gets a
    /// `==> path <==` header.
    pub fn edits<W: Write>(&self, out: &mut W, report: &EditReport) -> io::Result<()> {
        if self.json {
            return self.write_json(out, report);
        }

        if report.changes.is_empty() {
            return writeln!(out, "No changes");
        }

        let headers = report.changes.len() > 1;
        for (i, change) in report.changes.iter().enumerate() {
            match &change.content {
                Some(content) => {
                    if headers {
                        if i > 0 {
                            writeln!(out)?;
                        }
                        writeln!(out, "==> {} <==", change.path.display())?;
                    }
                    write!(out, "{content}")?;
                }
                None => writeln!(out, "Updated {}", change.path.display())?,
            }
        }
        Ok(())
    }

    fn write_json<W: Write, T: Serialize + ?Sized>(&self, out: &mut W, value: &T) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)
    }
}

fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(","),
        toml::Value::Table(table) => table
            .iter()
            .map(|(key, value)| format!("{key} = {}", display_value(value)))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
