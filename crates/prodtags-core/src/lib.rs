//! prodtags core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all prodtags
//! crates. It has no internal prodtags dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`tag`]: The `Tag` type and tag validation
//! - [`traits`]: `ConfigManager` for TOML config files
//! - [`util`]: Path utilities

pub mod error;
pub mod tag;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use tag::{Tag, is_tag};
pub use traits::ConfigManager;
