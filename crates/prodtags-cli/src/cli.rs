//! Command-line arguments for `tags`.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use prodtags_core::Tag;

/// Manage a YAML tag hierarchy and the tags of your documents
#[derive(Parser, Debug)]
#[command(name = "tags", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where a tag command reads and writes: a hierarchy file or a document.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct Target {
    /// Tag hierarchy file (defaults to `tag_file` from the config)
    #[arg(short = 't', long = "tag-file", value_name = "FILE")]
    pub tag_file: Option<PathBuf>,

    /// Work on the tags line of this document instead of the hierarchy
    #[arg(short = 'd', long = "document", value_name = "DOC")]
    pub document: Option<PathBuf>,
}

/// Hierarchy file for commands that only make sense on a hierarchy.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyFile {
    /// Tag hierarchy file (defaults to `tag_file` from the config)
    #[arg(short = 't', long = "tag-file", value_name = "FILE")]
    pub tag_file: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tags of the hierarchy or of a document
    ListTags {
        /// Print full paths instead of unambiguous short forms
        #[arg(long)]
        fully_qualified: bool,

        /// Where to read or write tags
        #[command(flatten)]
        target: Target,
    },

    /// List every tag below a tag
    ListChildTags {
        /// Parent tag
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Hierarchy file to use
        #[command(flatten)]
        hierarchy: HierarchyFile,
    },

    /// Tell whether a tag's leaf also occurs in an unrelated tag
    IsLeafTagAmbiguous {
        /// Tag to check
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Hierarchy file to use
        #[command(flatten)]
        hierarchy: HierarchyFile,
    },

    /// Shorten a tag to its leaf when that is unambiguous
    TryShortenTagPath {
        /// Tag to shorten
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Hierarchy file to use
        #[command(flatten)]
        hierarchy: HierarchyFile,
    },

    /// Find documents carrying a tag
    ListDocumentsWithTag {
        /// Tag to search for
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Directory to search (defaults to `documents_dir`, then `.`)
        path: Option<PathBuf>,
    },

    /// Put leaves first and separate nested blocks in the hierarchy file
    Lint {
        /// Print the result instead of writing it
        #[arg(short = 'D', long)]
        dry_run: bool,

        /// Hierarchy file to use
        #[command(flatten)]
        hierarchy: HierarchyFile,
    },

    /// Add a tag to the hierarchy or to a document
    AddTag {
        /// Tag to add
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Print the result instead of writing it
        #[arg(short = 'D', long)]
        dry_run: bool,

        /// Where to read or write tags
        #[command(flatten)]
        target: Target,
    },

    /// Remove a tag (and the tags below it)
    RemoveTag {
        /// Tag to remove
        #[arg(value_parser = parse_tag)]
        tag: Tag,

        /// Print the result instead of writing it
        #[arg(short = 'D', long)]
        dry_run: bool,

        /// Also remove the tag from every document under this directory
        #[arg(long, value_name = "DIR")]
        cascade: Option<PathBuf>,

        /// Where to read or write tags
        #[command(flatten)]
        target: Target,
    },

    /// Rename or move a tag
    RenameTag {
        /// Current tag
        #[arg(value_parser = parse_tag)]
        old: Tag,

        /// New name (single component) or new full path
        #[arg(value_parser = parse_tag)]
        new: Tag,

        /// Print the result instead of writing it
        #[arg(short = 'D', long)]
        dry_run: bool,

        /// Also rename the tag in every document under this directory
        #[arg(long, value_name = "DIR")]
        cascade: Option<PathBuf>,

        /// Where to read or write tags
        #[command(flatten)]
        target: Target,
    },

    /// Manage the configuration file
    Config {
        /// Config operation to run
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `tags config` subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Print a value by dotted key
    Get {
        /// Key such as `tags_heading` or `logging.level`
        key: String,
    },

    /// Set a value by dotted key
    Set {
        /// Key such as `tag_file` or `logging.level`
        key: String,
        /// New value (bool, number, or string)
        value: String,
    },

    /// Write a default config file
    Init {
        /// Write here instead of the default location
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_tag(s: &str) -> Result<Tag, String> {
    s.parse::<Tag>().map_err(|e| e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
