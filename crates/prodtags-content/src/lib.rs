//! Tagged documents: reading and editing the tags line, and finding the
//! documents that carry a tag.
//!
//! A document is any UTF-8 text file. Its tags sit on the line right after
//! the tags heading:
//!
//! ```text
//! # Meeting notes
//!
//! # Tags
//! work::meetings,inbox
//! ```
//!
//! # Modules
//!
//! - [`document`]: The in-memory document and async file helpers
//! - [`scan`]: Recursive search for documents carrying a tag

pub mod document;
pub mod scan;

pub use document::{
    DEFAULT_TAGS_HEADING, DocumentEdit, TaggedDocument, add_tag_to_document,
    list_tags_in_document, remove_tag_from_document, rename_tag_in_document,
};
pub use scan::DocumentScanner;
