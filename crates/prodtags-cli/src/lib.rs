//! # prodtags-cli
//!
//! The `tags` command-line tool.
//!
//! - [`cli`]: Argument definitions
//! - [`commands`]: Command dispatch against hierarchies and documents
//! - [`config`]: The `TagsConfig` file
//! - [`config_handlers`]: `tags config` subcommands
//! - [`logging`]: Subscriber setup
//! - [`output`]: Plain and JSON rendering of results

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod logging;
pub mod output;

pub use cli::{Args, Command, ConfigAction};
pub use config::TagsConfig;
