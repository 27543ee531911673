//! The YAML encoded tag hierarchy.
//!
//! A [`TagHierarchy`] keeps three things in sync: the parsed tree, the
//! remaining top-level keys of the file, and the text that will be written
//! back. Every edit re-renders the text from the tree; [`TagHierarchy::lint`]
//! post-processes that text.
//!
//! # Example
//!
//! ```
//! use prodtags_core::Tag;
//! use prodtags_hierarchy::TagHierarchy;
//!
//! let mut hierarchy = TagHierarchy::parse("tags.yaml", "tags:\n- work\n- home\n").unwrap();
//! hierarchy.add_tag(&"work::meetings".parse().unwrap()).unwrap();
//!
//! let tags: Vec<String> = hierarchy.tags().iter().map(Tag::to_string).collect();
//! assert_eq!(tags, ["work", "work::meetings", "home"]);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use prodtags_core::util::paths::has_yaml_extension;
use prodtags_core::{Error, Result, Tag};
use serde_yaml::{Mapping, Value};

use crate::lint;
use crate::node::{TagNode, nodes_from_value};

/// Top-level key holding the tag tree.
pub const TAGS_KEY: &str = "tags";

/// A tag hierarchy loaded from (and saved to) a YAML file.
#[derive(Debug, Clone)]
pub struct TagHierarchy {
    path: PathBuf,
    document: Mapping,
    roots: Vec<TagNode>,
    contents: String,
}

impl TagHierarchy {
    /// Load a hierarchy from a `.yml` or `.yaml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !has_yaml_extension(path) {
            return Err(Error::InvalidTagFile {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        log::debug!("Loaded tag hierarchy from {}", path.display());
        Self::parse(path, &contents)
    }

    /// Build a hierarchy from YAML text that belongs to `path`.
    ///
    /// Nothing is read from disk; `contents()` returns `contents` verbatim
    /// until the first edit.
    pub fn parse(path: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let (document, roots) = parse_document(contents)?;
        Ok(Self {
            path: path.into(),
            document,
            roots,
            contents: contents.to_string(),
        })
    }

    /// Re-read the hierarchy from disk, discarding unsaved edits.
    pub fn reload(&mut self) -> Result<()> {
        *self = Self::load(&self.path)?;
        Ok(())
    }

    /// Write the current text to disk.
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, &self.contents).map_err(|e| Error::io_with_path(e, &self.path))?;
        log::debug!("Saved tag hierarchy to {}", self.path.display());
        Ok(())
    }

    /// File this hierarchy belongs to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text that `save` would write.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Top-level nodes of the tree.
    pub fn roots(&self) -> &[TagNode] {
        &self.roots
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Every tag in the hierarchy, depth-first, each tag once.
    pub fn tags(&self) -> Vec<Tag> {
        let mut out = Vec::new();
        collect_tags(&self.roots, &mut Vec::new(), &mut out, &mut HashSet::new());
        out
    }

    /// True if the tag names a node of the hierarchy.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.find(tag).is_some()
    }

    /// Every tag below `parent`, depth-first.
    pub fn list_child_tags(&self, parent: &Tag) -> Result<Vec<Tag>> {
        let node = self.find(parent).ok_or_else(|| Error::not_found(parent))?;
        let mut prefix = parent.components().to_vec();
        let mut out = Vec::new();
        collect_tags(node.children(), &mut prefix, &mut out, &mut HashSet::new());
        Ok(out)
    }

    /// True if the leaf of `tag` occurs in any unrelated tag.
    ///
    /// Ancestors and descendants of `tag` do not count: `foo::bar` is not
    /// made ambiguous by `foo::bar::baz`, but it is by `qux::bar`.
    pub fn is_leaf_tag_ambiguous(&self, tag: &Tag) -> bool {
        is_ambiguous_among(&self.tags(), tag)
    }

    /// The leaf of `tag` alone when that is unambiguous, `tag` otherwise.
    pub fn try_shorten_tag_path(&self, tag: &Tag) -> Tag {
        shorten_among(&self.tags(), tag)
    }

    /// All tags, shortened to their leaf wherever that stays unambiguous.
    pub fn list_tags_short_paths(&self) -> Vec<Tag> {
        let tags = self.tags();
        tags.iter().map(|tag| shorten_among(&tags, tag)).collect()
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Insert `tag`, creating missing ancestors.
    pub fn add_tag(&mut self, tag: &Tag) -> Result<()> {
        if self.contains(tag) {
            return Err(Error::exists(tag));
        }
        self.attach(tag.parents(), TagNode::Leaf(tag.leaf().to_string()))?;
        log::debug!("Added tag {tag}");
        self.render()
    }

    /// Remove `tag` and everything below it.
    pub fn remove_tag(&mut self, tag: &Tag) -> Result<()> {
        self.detach(tag)?;
        log::debug!("Removed tag {tag}");
        self.render()
    }

    /// Rename or move `old` to `new`.
    ///
    /// A single-component `new`, or one with the same parents as `old`,
    /// renames the node in place. Anything else moves the subtree below
    /// `new`'s parents.
    pub fn rename_tag(&mut self, old: &Tag, new: &Tag) -> Result<()> {
        if !self.contains(old) {
            return Err(Error::not_found(old));
        }

        let target = old.rename_target(new);

        if &target == old {
            return Ok(());
        }
        if old.is_ancestor_of(&target) {
            return Err(Error::InvalidMove {
                from: old.to_string(),
                to: target.to_string(),
            });
        }
        if self.contains(&target) {
            return Err(Error::exists(&target));
        }

        if target.parents() == old.parents() {
            let node = descend_mut(&mut self.roots, old.components(), false)
                .ok_or_else(|| Error::not_found(old))?;
            node.set_name(target.leaf());
            log::debug!("Renamed tag {old} to {target}");
        } else {
            let mut node = self.detach(old)?;
            node.set_name(target.leaf());
            self.attach(target.parents(), node)?;
            log::debug!("Moved tag {old} to {target}");
        }

        self.render()
    }

    // ------------------------------------------------------------------------
    // Lint
    // ------------------------------------------------------------------------

    /// Put leaves before parents in every list, then re-render.
    pub fn reorder_list_items(&mut self) -> Result<()> {
        lint::reorder_list_items(&mut self.roots);
        self.render()
    }

    /// Separate nested blocks in the rendered text with blank lines.
    pub fn add_blank_lines(&mut self) {
        self.contents = lint::add_blank_lines(&self.contents);
    }

    /// Reorder list items and add blank lines.
    pub fn lint(&mut self) -> Result<()> {
        self.reorder_list_items()?;
        self.add_blank_lines();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn find(&self, tag: &Tag) -> Option<&TagNode> {
        let mut nodes = self.roots.as_slice();
        let mut found = None;
        for component in tag.components() {
            let node = nodes.iter().find(|n| n.name() == component.as_str())?;
            nodes = node.children();
            found = Some(node);
        }
        found
    }

    fn attach(&mut self, parents: &[String], node: TagNode) -> Result<()> {
        if parents.is_empty() {
            self.roots.push(node);
            return Ok(());
        }
        let parent = descend_mut(&mut self.roots, parents, true)
            .ok_or_else(|| Error::parse("could not create parent tags"))?;
        parent.push_child(node);
        Ok(())
    }

    fn detach(&mut self, tag: &Tag) -> Result<TagNode> {
        if tag.depth() == 1 {
            let idx = self
                .roots
                .iter()
                .position(|n| n.name() == tag.leaf())
                .ok_or_else(|| Error::not_found(tag))?;
            return Ok(self.roots.remove(idx));
        }

        descend_mut(&mut self.roots, tag.parents(), false)
            .and_then(|parent| parent.take_child(tag.leaf()))
            .ok_or_else(|| Error::not_found(tag))
    }

    fn render(&mut self) -> Result<()> {
        let mut document = self.document.clone();
        let tags = Value::Sequence(self.roots.iter().map(TagNode::to_value).collect());
        document.insert(Value::String(TAGS_KEY.to_string()), tags);

        self.contents = serde_yaml::to_string(&Value::Mapping(document))
            .map_err(|e| Error::parse(format!("Failed to render tag hierarchy: {e}")))?;
        Ok(())
    }
}

fn parse_document(contents: &str) -> Result<(Mapping, Vec<TagNode>)> {
    if contents.trim().is_empty() {
        return Ok((Mapping::new(), Vec::new()));
    }

    let value: Value = serde_yaml::from_str(contents)
        .map_err(|e| Error::parse(format!("Invalid tag hierarchy YAML: {e}")))?;

    match value {
        Value::Null => Ok((Mapping::new(), Vec::new())),
        Value::Mapping(document) => {
            let roots = match document.get(TAGS_KEY) {
                Some(tags) => nodes_from_value(tags)?,
                None => Vec::new(),
            };
            Ok((document, roots))
        }
        _ => Err(Error::parse(format!(
            "tag hierarchy must be a mapping with a '{TAGS_KEY}' key"
        ))),
    }
}

/// Walk (and with `create`, build) the path of names below `nodes`.
fn descend_mut<'a>(
    nodes: &'a mut Vec<TagNode>,
    path: &[String],
    create: bool,
) -> Option<&'a mut TagNode> {
    let (first, rest) = path.split_first()?;

    let idx = match nodes.iter().position(|n| n.name() == first.as_str()) {
        Some(idx) => idx,
        None if create => {
            nodes.push(TagNode::Leaf(first.clone()));
            nodes.len() - 1
        }
        None => return None,
    };

    let node = &mut nodes[idx];
    if rest.is_empty() {
        return Some(node);
    }
    if create {
        descend_mut(node.make_parent(), rest, create)
    } else {
        descend_mut(node.children_mut()?, rest, create)
    }
}

fn collect_tags(
    nodes: &[TagNode],
    prefix: &mut Vec<String>,
    out: &mut Vec<Tag>,
    seen: &mut HashSet<Tag>,
) {
    for node in nodes {
        prefix.push(node.name().to_string());
        match Tag::from_components(prefix.iter().cloned()) {
            Ok(tag) => {
                if seen.insert(tag.clone()) {
                    out.push(tag);
                }
                collect_tags(node.children(), prefix, out, seen);
            }
            Err(e) => log::warn!("Skipping '{}' and its children: {e}", node.name()),
        }
        prefix.pop();
    }
}

fn is_ambiguous_among(tags: &[Tag], tag: &Tag) -> bool {
    let leaf = tag.leaf();
    tags.iter()
        .any(|other| !other.is_related_to(tag) && other.contains_component(leaf))
}

fn shorten_among(tags: &[Tag], tag: &Tag) -> Tag {
    if is_ambiguous_among(tags, tag) {
        tag.clone()
    } else {
        tag.leaf_tag()
    }
}

// ============================================================================
// Tests
// ============================================================================
