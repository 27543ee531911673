//! In-memory model of the tag tree and its YAML mapping.
//!
//! A hierarchy file stores nodes in one of three shapes:
//!
//! ```yaml
//! tags:
//! - inbox                 # leaf
//! - reading: books        # parent with a single leaf child (compact form)
//! - work:                 # parent with a child list
//!   - meetings
//!   - projects:
//!     - prodtags
//! ```

use std::mem;

use prodtags_core::{Error, Result};
use serde_yaml::{Mapping, Value};

/// One node of the tag tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagNode {
    /// A tag without children.
    Leaf(String),
    /// A tag with children.
    Parent {
        /// Component name.
        name: String,
        /// Child nodes, in file order.
        children: Vec<TagNode>,
        /// Render a single leaf child as `name: child` instead of a list.
        compact: bool,
    },
}

impl TagNode {
    /// Component name of this node.
    pub fn name(&self) -> &str {
        match self {
            TagNode::Leaf(name) | TagNode::Parent { name, .. } => name,
        }
    }

    /// Rename this node, keeping its children.
    pub fn set_name(&mut self, new_name: &str) {
        match self {
            TagNode::Leaf(name) | TagNode::Parent { name, .. } => *name = new_name.to_string(),
        }
    }

    /// True for nodes rendered as a mapping.
    pub fn is_parent(&self) -> bool {
        matches!(self, TagNode::Parent { .. })
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[TagNode] {
        match self {
            TagNode::Leaf(_) => &[],
            TagNode::Parent { children, .. } => children,
        }
    }

    /// Mutable child list, `None` for leaves.
    pub fn children_mut(&mut self) -> Option<&mut Vec<TagNode>> {
        match self {
            TagNode::Leaf(_) => None,
            TagNode::Parent { children, .. } => Some(children),
        }
    }

    /// Turn a leaf into an (empty, compact) parent and return its children.
    pub fn make_parent(&mut self) -> &mut Vec<TagNode> {
        match self {
            TagNode::Parent { children, .. } => children,
            TagNode::Leaf(name) => {
                let name = mem::take(name);
                *self = TagNode::Parent {
                    name,
                    children: Vec::new(),
                    compact: true,
                };
                self.make_parent()
            }
        }
    }

    /// Append a child.
    ///
    /// A leaf's first child is stored compactly; a parent that already has
    /// children switches to the list form.
    pub fn push_child(&mut self, child: TagNode) {
        let had_children = !self.children().is_empty();
        self.make_parent().push(child);
        if had_children {
            if let TagNode::Parent { compact, .. } = self {
                *compact = false;
            }
        }
    }

    /// Remove the first child called `name`.
    ///
    /// A parent left without children becomes a leaf again.
    pub fn take_child(&mut self, name: &str) -> Option<TagNode> {
        let children = self.children_mut()?;
        let idx = children.iter().position(|c| c.name() == name)?;
        let removed = children.remove(idx);
        if children.is_empty() {
            self.make_leaf();
        }
        Some(removed)
    }

    /// Fold a same-named sibling into this node.
    ///
    /// Children are appended and merged in turn; a leaf adds nothing.
    fn absorb(&mut self, other: TagNode) {
        let TagNode::Parent { children: extra, .. } = other else {
            return;
        };
        let children = self.make_parent();
        let mut all = mem::take(children);
        all.extend(extra);
        *children = merge_siblings(all);

        if let TagNode::Parent {
            children, compact, ..
        } = self
        {
            *compact = *compact && children.len() == 1;
        }
    }

    fn make_leaf(&mut self) {
        if let TagNode::Parent { name, .. } = self {
            let name = mem::take(name);
            *self = TagNode::Leaf(name);
        }
    }

    /// Convert back to the YAML shape it is stored in.
    pub fn to_value(&self) -> Value {
        match self {
            TagNode::Leaf(name) => Value::String(name.clone()),
            TagNode::Parent {
                name,
                children,
                compact,
            } => {
                let child_value = match children.as_slice() {
                    [TagNode::Leaf(only)] if *compact => Value::String(only.clone()),
                    _ => Value::Sequence(children.iter().map(TagNode::to_value).collect()),
                };
                let mut mapping = Mapping::new();
                mapping.insert(Value::String(name.clone()), child_value);
                Value::Mapping(mapping)
            }
        }
    }
}

/// Read the nodes stored under a key of the hierarchy file.
///
/// Accepts a sequence of items, a bare mapping (treated as a list of
/// parents), a single scalar, or null (no nodes). Siblings sharing a name
/// are merged into the first of them, so every tag has exactly one node.
pub fn nodes_from_value(value: &Value) -> Result<Vec<TagNode>> {
    let nodes = match value {
        Value::Null => Vec::new(),
        Value::Sequence(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                nodes.extend(item_from_value(item)?);
            }
            nodes
        }
        other => item_from_value(other)?,
    };
    Ok(merge_siblings(nodes))
}

fn merge_siblings(nodes: Vec<TagNode>) -> Vec<TagNode> {
    let mut merged: Vec<TagNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match merged.iter_mut().find(|m| m.name() == node.name()) {
            Some(first) => {
                log::debug!("Merging duplicate tag '{}'", node.name());
                first.absorb(node);
            }
            None => merged.push(node),
        }
    }
    merged
}

/// Read one list item; a multi-key mapping yields one parent per key.
fn item_from_value(value: &Value) -> Result<Vec<TagNode>> {
    if let Some(name) = scalar_name(value) {
        return Ok(vec![TagNode::Leaf(name)]);
    }

    let Value::Mapping(mapping) = value else {
        return Err(Error::parse(format!(
            "expected a tag name or a 'name: children' mapping, found {}",
            describe(value)
        )));
    };

    let mut nodes = Vec::with_capacity(mapping.len());
    for (key, child) in mapping {
        let name = scalar_name(key).ok_or_else(|| {
            Error::parse(format!("tag names must be scalars, found {}", describe(key)))
        })?;

        let node = match child {
            Value::Null => TagNode::Leaf(name),
            _ => match scalar_name(child) {
                Some(only) => TagNode::Parent {
                    name,
                    children: vec![TagNode::Leaf(only)],
                    compact: true,
                },
                None => TagNode::Parent {
                    name,
                    children: nodes_from_value(child)?,
                    compact: false,
                },
            },
        };
        nodes.push(node);
    }
    Ok(nodes)
}

fn scalar_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        _ => "a tagged value",
    }
}

// ============================================================================
// Tests
// ============================================================================
