//! Utility modules.
//!
//! - [`paths`]: Path helpers (tilde expansion, YAML extension checks)

pub mod paths;
