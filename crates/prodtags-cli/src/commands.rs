//! Command dispatch for `tags`.
//!
//! Every command resolves its target (a hierarchy file or a document),
//! performs the operation, and hands the result to [`Output`].

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use prodtags_content::{
    add_tag_to_document, list_tags_in_document, remove_tag_from_document, rename_tag_in_document,
};
use prodtags_core::{Error, Tag};
use prodtags_hierarchy::TagHierarchy;

use crate::cli::{Command, Target};
use crate::config::TagsConfig;
use crate::config_handlers::handle_config_command;
use crate::output::{EditReport, FileChange, Output};

/// Everything a command needs besides its own arguments.
#[derive(Debug, Clone)]
pub struct Context {
    /// `--config` as given on the command line.
    pub config_path: Option<String>,
    /// The loaded configuration.
    pub config: TagsConfig,
    /// Output format.
    pub output: Output,
}

impl Context {
    /// Bundle the loaded config with the output format.
    pub fn new(config_path: Option<String>, config: TagsConfig, output: Output) -> Self {
        Self {
            config_path,
            config,
            output,
        }
    }

    fn heading(&self) -> &str {
        &self.config.tags_heading
    }

    /// `--tag-file` if given, else `tag_file` from the config.
    fn hierarchy_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config.tag_file_path())
            .ok_or_else(|| {
                Error::config("No tag file: pass --tag-file or set `tag_file` in the config").into()
            })
    }

    fn load_hierarchy(&self, explicit: Option<&Path>) -> Result<TagHierarchy> {
        let path = self.hierarchy_path(explicit)?;
        TagHierarchy::load(&path)
            .with_context(|| format!("Failed to load tag hierarchy {}", path.display()))
    }
}

/// Run one command, writing its result to `out`.
pub async fn run<W: Write>(command: Command, ctx: &Context, out: &mut W) -> Result<()> {
    match command {
        Command::ListTags {
            fully_qualified,
            target,
        } => {
            let tags = match &target.document {
                Some(doc) => list_tags_in_document(doc, ctx.heading()).await?,
                None => {
                    let hierarchy = ctx.load_hierarchy(target.tag_file.as_deref())?;
                    if fully_qualified {
                        hierarchy.tags()
                    } else {
                        hierarchy.list_tags_short_paths()
                    }
                }
            };
            ctx.output.tags(out, &tags)?;
        }

        Command::ListChildTags { tag, hierarchy } => {
            let hierarchy = ctx.load_hierarchy(hierarchy.tag_file.as_deref())?;
            let children = hierarchy.list_child_tags(&tag)?;
            ctx.output.tags(out, &children)?;
        }

        Command::IsLeafTagAmbiguous { tag, hierarchy } => {
            let hierarchy = ctx.load_hierarchy(hierarchy.tag_file.as_deref())?;
            ctx.output.boolean(out, hierarchy.is_leaf_tag_ambiguous(&tag))?;
        }

        Command::TryShortenTagPath { tag, hierarchy } => {
            let hierarchy = ctx.load_hierarchy(hierarchy.tag_file.as_deref())?;
            ctx.output.tag(out, &hierarchy.try_shorten_tag_path(&tag))?;
        }

        Command::ListDocumentsWithTag { tag, path } => {
            let root = path
                .or_else(|| ctx.config.documents_dir_path())
                .unwrap_or_else(|| PathBuf::from("."));
            let documents = ctx
                .config
                .scanner()
                .list_documents_with_tag(&root, &tag)
                .await
                .with_context(|| format!("Failed to search {}", root.display()))?;
            ctx.output.paths(out, &documents)?;
        }

        Command::Lint { dry_run, hierarchy } => {
            let mut hierarchy = ctx.load_hierarchy(hierarchy.tag_file.as_deref())?;
            hierarchy.lint()?;
            let mut report = EditReport::new(dry_run);
            report.push(finish_hierarchy(&hierarchy, dry_run)?);
            ctx.output.edits(out, &report)?;
        }

        Command::AddTag {
            tag,
            dry_run,
            target,
        } => {
            let report = add_tag(ctx, &tag, dry_run, &target).await?;
            ctx.output.edits(out, &report)?;
        }

        Command::RemoveTag {
            tag,
            dry_run,
            cascade,
            target,
        } => {
            let report = remove_tag(ctx, &tag, dry_run, cascade.as_deref(), &target).await?;
            ctx.output.edits(out, &report)?;
        }

        Command::RenameTag {
            old,
            new,
            dry_run,
            cascade,
            target,
        } => {
            let report = rename_tag(ctx, &old, &new, dry_run, cascade.as_deref(), &target).await?;
            ctx.output.edits(out, &report)?;
        }

        Command::Config { action } => {
            handle_config_command(ctx.config_path.as_deref(), action, &ctx.output, out)?;
        }
    }

    Ok(())
}

// ============================================================================
// Editing commands
// ============================================================================

async fn add_tag(ctx: &Context, tag: &Tag, dry_run: bool, target: &Target) -> Result<EditReport> {
    let mut report = EditReport::new(dry_run);

    match &target.document {
        Some(doc) => match add_tag_to_document(doc, ctx.heading(), tag, dry_run).await? {
            Some(edit) => report.push(edit.into()),
            None => log::info!("{} already carries {tag}", doc.display()),
        },
        None => {
            let mut hierarchy = ctx.load_hierarchy(target.tag_file.as_deref())?;
            hierarchy.add_tag(tag)?;
            report.push(finish_hierarchy(&hierarchy, dry_run)?);
        }
    }

    Ok(report)
}

async fn remove_tag(
    ctx: &Context,
    tag: &Tag,
    dry_run: bool,
    cascade: Option<&Path>,
    target: &Target,
) -> Result<EditReport> {
    let mut report = EditReport::new(dry_run);

    match &target.document {
        Some(doc) => {
            if let Some(edit) = remove_tag_from_document(doc, ctx.heading(), tag, dry_run).await? {
                report.push(edit.into());
            }
        }
        None => {
            let mut hierarchy = ctx.load_hierarchy(target.tag_file.as_deref())?;
            hierarchy.remove_tag(tag)?;
            report.push(finish_hierarchy(&hierarchy, dry_run)?);
        }
    }

    if let Some(dir) = cascade {
        for path in cascade_candidates(ctx, dir, target).await? {
            match remove_tag_from_document(&path, ctx.heading(), tag, dry_run).await {
                Ok(Some(edit)) => report.push(edit.into()),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping {}: {e}", path.display()),
            }
        }
    }

    Ok(report)
}

async fn rename_tag(
    ctx: &Context,
    old: &Tag,
    new: &Tag,
    dry_run: bool,
    cascade: Option<&Path>,
    target: &Target,
) -> Result<EditReport> {
    let mut report = EditReport::new(dry_run);
    let destination = old.rename_target(new);

    match &target.document {
        Some(doc) => {
            if let Some(edit) =
                rename_tag_in_document(doc, ctx.heading(), old, &destination, dry_run).await?
            {
                report.push(edit.into());
            }
        }
        None => {
            let mut hierarchy = ctx.load_hierarchy(target.tag_file.as_deref())?;
            hierarchy.rename_tag(old, new)?;
            report.push(finish_hierarchy(&hierarchy, dry_run)?);
        }
    }

    if let Some(dir) = cascade {
        for path in cascade_candidates(ctx, dir, target).await? {
            match rename_tag_in_document(&path, ctx.heading(), old, &destination, dry_run).await {
                Ok(Some(edit)) => report.push(edit.into()),
                Ok(None) => {}
                Err(e) => log::warn!("Skipping {}: {e}", path.display()),
            }
        }
    }

    Ok(report)
}

/// Documents under `dir`, minus the `--document` target edited already.
///
/// Callers warn about and skip a candidate that cannot be read.
async fn cascade_candidates(ctx: &Context, dir: &Path, target: &Target) -> Result<Vec<PathBuf>> {
    let mut files = ctx
        .config
        .scanner()
        .find_files(dir)
        .await
        .with_context(|| format!("Failed to search {}", dir.display()))?;

    if let Some(doc) = &target.document {
        files.retain(|path| !same_file(path, doc));
    }
    log::debug!("Cascading over {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Save the hierarchy, or keep its text for a dry run.
fn finish_hierarchy(hierarchy: &TagHierarchy, dry_run: bool) -> Result<FileChange> {
    if !dry_run {
        hierarchy.save()?;
        log::info!("Saved {}", hierarchy.path().display());
    }
    Ok(FileChange::new(hierarchy.path(), hierarchy.contents(), dry_run))
}
