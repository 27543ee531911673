//! Shared fixtures for `tags` command tests.

use std::path::{Path, PathBuf};

use prodtags_cli::commands::{self, Context};
use prodtags_cli::output::Output;
use prodtags_cli::TagsConfig;
use tempfile::TempDir;

pub const HIERARCHY: &str = "tags:\n- inbox\n- work:\n  - meetings\n  - projects:\n    - prodtags\n- home:\n  - garden\n  - projects\n";

/// A temp dir holding `tags.yaml` and a few tagged notes.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let ws = Self { dir };
        ws.write("tags.yaml", HIERARCHY);
        ws.write("notes/standup.md", "# Standup\n\n# Tags\nwork::meetings,inbox\n");
        ws.write("notes/garden.md", "# Garden\n# Tags\nhome::garden\n");
        ws.write("notes/plan.md", "# Plan\n# Tags\nwork::projects::prodtags, work::projects\n");
        ws
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    /// Config pointing `tag_file` and `documents_dir` into the workspace.
    pub fn config(&self) -> TagsConfig {
        TagsConfig {
            tag_file: Some(path_str(&self.path("tags.yaml"))),
            documents_dir: Some(path_str(&self.path("notes"))),
            ..TagsConfig::default()
        }
    }

    pub fn context(&self, json: bool) -> Context {
        Context::new(None, self.config(), Output::new(json))
    }

    /// Run a command line (without the program name) and return stdout.
    pub async fn run(&self, line: &[&str]) -> anyhow::Result<String> {
        self.run_with(self.context(false), line).await
    }

    pub async fn run_with(&self, ctx: Context, line: &[&str]) -> anyhow::Result<String> {
        use clap::Parser;

        let argv = std::iter::once("tags").chain(line.iter().copied());
        let args = prodtags_cli::Args::try_parse_from(argv)?;
        let mut out = Vec::new();
        commands::run(args.command, &ctx, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
