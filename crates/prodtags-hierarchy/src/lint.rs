//! Formatting passes applied by `tags lint`.
//!
//! - [`reorder_list_items`]: leaves before parents in every list
//! - [`add_blank_lines`]: visual separation when a nested block ends

use crate::node::TagNode;

/// Move leaf items in front of parent items, recursively.
///
/// The sort is stable, so leaves keep their relative order and so do
/// parents.
///
/// ```
/// use prodtags_hierarchy::lint::reorder_list_items;
/// use prodtags_hierarchy::TagNode;
///
/// let mut nodes = vec![
///     TagNode::Parent { name: "foo".into(), children: vec![TagNode::Leaf("foo2".into())], compact: true },
///     TagNode::Leaf("baz".into()),
/// ];
/// reorder_list_items(&mut nodes);
/// assert_eq!(nodes[0].name(), "baz");
/// ```
pub fn reorder_list_items(nodes: &mut [TagNode]) {
    for node in nodes.iter_mut() {
        if let Some(children) = node.children_mut() {
            reorder_list_items(children);
        }
    }
    nodes.sort_by_key(TagNode::is_parent);
}

/// Insert an empty line before every list item that is indented less than
/// the list item on the previous line.
///
/// Lines that are not list items (keys, comments, blank lines) never
/// trigger an insertion, so running the pass twice changes nothing.
pub fn add_blank_lines(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut previous: Option<usize> = None;

    for line in text.split('\n') {
        let current = bullet_column(line);
        if let (Some(cur), Some(prev)) = (current, previous) {
            if cur < prev {
                out.push("");
            }
        }
        out.push(line);
        previous = current;
    }

    out.join("\n")
}

/// Column of the `-` bullet if the line is a YAML list item.
fn bullet_column(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    if trimmed == "-" || trimmed.starts_with("- ") {
        Some(line.len() - trimmed.len())
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
