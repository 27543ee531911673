//! YAML tag hierarchy handling.
//!
//! The tag hierarchy is the tree of tags a user allows in their documents,
//! stored as YAML:
//!
//! ```yaml
//! tags:
//! - inbox
//! - reading: books
//! - work:
//!   - meetings
//!   - projects
//! ```
//!
//! # Modules
//!
//! - [`hierarchy`]: Load, query, edit and save a hierarchy file
//! - [`node`]: The tree model and its YAML mapping
//! - [`lint`]: Reordering and blank-line formatting passes

pub mod hierarchy;
pub mod lint;
pub mod node;

pub use hierarchy::{TAGS_KEY, TagHierarchy};
pub use node::TagNode;
