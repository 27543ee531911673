//! `tags` CLI
//!
//! Manage a YAML tag hierarchy and the tags line of your documents.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use prodtags_cli::commands::{self, Context};
use prodtags_cli::output::Output;
use prodtags_cli::{Args, Command, TagsConfig, logging};
use prodtags_core::traits::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = TagsConfig::load(args.config.as_deref());
    let level = match &loaded {
        Ok(config) => config.logging.level.as_str(),
        Err(_) => "warn",
    };
    logging::init(args.verbose, level);

    let config = match (loaded, &args.command) {
        (Ok(config), _) => config,
        // `tags config ...` must stay usable to repair a broken file
        (Err(e), Command::Config { .. }) => {
            tracing::warn!("Ignoring unreadable configuration: {e}");
            TagsConfig::default()
        }
        (Err(e), _) => {
            return Err(anyhow::Error::new(e).context("Failed to load configuration"));
        }
    };

    tracing::debug!(command = ?args.command, "Running");

    let ctx = Context::new(args.config, config, Output::new(args.json));
    let mut stdout = std::io::stdout().lock();
    commands::run(args.command, &ctx, &mut stdout).await
}
