//! The `Tag` type: a `::`-separated path through the tag hierarchy.
//!
//! A tag like `work::projects::prodtags` names the `prodtags` node below
//! `projects` below `work`. Components are non-empty runs of ASCII letters,
//! digits, `_` and `-`.
//!
//! # Example
//!
//! ```
//! use prodtags_core::Tag;
//!
//! let tag: Tag = "work::projects::prodtags".parse().unwrap();
//! assert_eq!(tag.root(), "work");
//! assert_eq!(tag.leaf(), "prodtags");
//! assert_eq!(tag.direct_parent(), Some("projects"));
//! assert_eq!(tag.to_string(), "work::projects::prodtags");
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between tag components.
pub const SEPARATOR: &str = "::";

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[a-zA-Z0-9_-]+(?:::[a-zA-Z0-9_-]+)*\s*$").expect("Invalid tag regex")
});

static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid tag component regex"));

/// Check whether a string is a valid tag.
///
/// Leading and trailing whitespace is allowed, whitespace between
/// components is not.
///
/// ```
/// use prodtags_core::tag::is_tag;
///
/// assert!(is_tag("foo_bar::baz-123"));
/// assert!(is_tag("  foo  "));
/// assert!(!is_tag("foo+bar::baz"));
/// assert!(!is_tag("::foo"));
/// assert!(!is_tag(""));
/// ```
pub fn is_tag(s: &str) -> bool {
    TAG_RE.is_match(s)
}

/// Check whether a string is a single valid tag component.
pub fn is_tag_component(s: &str) -> bool {
    COMPONENT_RE.is_match(s)
}

/// A validated, non-empty sequence of tag components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag {
    components: Vec<String>,
}

impl Tag {
    /// Parse a tag from its `foo::bar` string form.
    pub fn parse(s: &str) -> Result<Self> {
        if !is_tag(s) {
            return Err(Error::invalid_tag(s));
        }
        Ok(Self {
            components: s.trim().split(SEPARATOR).map(String::from).collect(),
        })
    }

    /// Build a tag from individual components.
    ///
    /// Fails if there are no components or any component is invalid.
    pub fn from_components<I, S>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        if components.is_empty() {
            return Err(Error::invalid_tag(""));
        }
        if let Some(bad) = components.iter().find(|c| !is_tag_component(c)) {
            return Err(Error::invalid_tag(bad.clone()));
        }
        Ok(Self { components })
    }

    /// All components, root first.
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// First component.
    pub fn root(&self) -> &str {
        &self.components[0]
    }

    /// Last component.
    pub fn leaf(&self) -> &str {
        &self.components[self.components.len() - 1]
    }

    /// The leaf component as a single-component tag.
    pub fn leaf_tag(&self) -> Tag {
        Self {
            components: vec![self.leaf().to_string()],
        }
    }

    /// Every component except the leaf.
    pub fn parents(&self) -> &[String] {
        &self.components[..self.components.len() - 1]
    }

    /// Name of the component right above the leaf.
    pub fn direct_parent(&self) -> Option<&str> {
        self.parents().last().map(String::as_str)
    }

    /// The tag naming the direct parent, `None` for a root tag.
    pub fn parent(&self) -> Option<Tag> {
        if self.depth() == 1 {
            return None;
        }
        Some(Self {
            components: self.parents().to_vec(),
        })
    }

    /// This tag with its root component removed, `None` if nothing remains.
    pub fn without_root(&self) -> Option<Tag> {
        if self.depth() == 1 {
            return None;
        }
        Some(Self {
            components: self.components[1..].to_vec(),
        })
    }

    /// Extend this tag by one component.
    pub fn child(&self, name: &str) -> Result<Tag> {
        if !is_tag_component(name) {
            return Err(Error::invalid_tag(name));
        }
        let mut components = self.components.clone();
        components.push(name.to_string());
        Ok(Self { components })
    }

    /// Replace the leaf component.
    pub fn with_leaf(&self, name: &str) -> Result<Tag> {
        if !is_tag_component(name) {
            return Err(Error::invalid_tag(name));
        }
        let mut components = self.components.clone();
        let last = components.len() - 1;
        components[last] = name.to_string();
        Ok(Self { components })
    }

    /// True if `other` lies strictly below this tag.
    pub fn is_ancestor_of(&self, other: &Tag) -> bool {
        self.depth() < other.depth() && other.components.starts_with(&self.components)
    }

    /// True if the tags are equal or one lies below the other.
    pub fn is_related_to(&self, other: &Tag) -> bool {
        self == other || self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }

    /// True if any component equals `name`.
    pub fn contains_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    /// Swap the `old` prefix of this tag for `new`.
    ///
    /// Returns `None` when this tag is neither `old` nor below it.
    ///
    /// ```
    /// use prodtags_core::Tag;
    ///
    /// let tag: Tag = "foo::bar::baz".parse().unwrap();
    /// let old: Tag = "foo::bar".parse().unwrap();
    /// let new: Tag = "qux".parse().unwrap();
    /// assert_eq!(tag.replace_prefix(&old, &new).unwrap().to_string(), "qux::baz");
    /// ```
    pub fn replace_prefix(&self, old: &Tag, new: &Tag) -> Option<Tag> {
        if self != old && !old.is_ancestor_of(self) {
            return None;
        }
        let mut components = new.components.clone();
        components.extend_from_slice(&self.components[old.depth()..]);
        Some(Self { components })
    }

    /// Tag that `self` becomes when renamed to `new`.
    ///
    /// A single-component `new` keeps the parents of `self`; anything else
    /// is taken as the full destination.
    ///
    /// ```
    /// use prodtags_core::Tag;
    ///
    /// let old: Tag = "work::meet".parse().unwrap();
    /// assert_eq!(old.rename_target(&"meetings".parse().unwrap()).to_string(), "work::meetings");
    /// assert_eq!(old.rename_target(&"home::meet".parse().unwrap()).to_string(), "home::meet");
    /// ```
    pub fn rename_target(&self, new: &Tag) -> Tag {
        if new.depth() > 1 {
            return new.clone();
        }
        let mut components = self.components.clone();
        let last = components.len() - 1;
        components[last] = new.leaf().to_string();
        Self { components }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join(SEPARATOR))
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Tag {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tag(s: &str) -> Tag {
        Tag::parse(s).unwrap()
    }

    // ------------------------------------------------------------------------
    // is_tag tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_is_tag_single_component() {
        assert!(is_tag("foo"));
    }

    #[test]
    fn test_is_tag_double_component() {
        assert!(is_tag("foo::bar"));
    }

    #[test]
    fn test_is_tag_alnum_underscore_dash() {
        assert!(is_tag("foo_bar::baz-123"));
    }

    #[test]
    fn test_is_tag_rejects_other_characters() {
        assert!(!is_tag("foo+bar::baz"));
        assert!(!is_tag("foo bar"));
        assert!(!is_tag("foo :: bar"));
    }

    #[test]
    fn test_is_tag_empty() {
        assert!(!is_tag(""));
        assert!(!is_tag("   "));
    }

    #[test]
    fn test_is_tag_separator_edges() {
        assert!(!is_tag("::foo"));
        assert!(!is_tag("foo::"));
        assert!(!is_tag("foo:::bar"));
    }

    #[test]
    fn test_is_tag_surrounding_whitespace() {
        assert!(is_tag(" foo::bar \n"));
    }

    // ------------------------------------------------------------------------
    // Construction tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_components() {
        assert_eq!(tag("foo_bar::baz-123").components(), ["foo_bar", "baz-123"]);
        assert_eq!(tag("  foo  ").components(), ["foo"]);
    }

    #[test]
    fn test_parse_invalid() {
        let err = Tag::parse("foo_bar::baz+123").unwrap_err();
        assert!(matches!(err, Error::InvalidTag { .. }));
        assert!(Tag::parse("").is_err());
    }

    #[test]
    fn test_from_components() {
        let t = Tag::from_components(["foo_bar", "baz-123"]).unwrap();
        assert_eq!(t, tag("foo_bar::baz-123"));
    }

    #[test]
    fn test_from_components_rejects_empty_and_invalid() {
        assert!(Tag::from_components(Vec::<String>::new()).is_err());
        assert!(Tag::from_components(["foo", "a::b"]).is_err());
        assert!(Tag::from_components(["foo", ""]).is_err());
    }

    // ------------------------------------------------------------------------
    // Accessor tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_display() {
        assert_eq!(tag("foo_bar").to_string(), "foo_bar");
        assert_eq!(tag("foo::bar").to_string(), "foo::bar");
    }

    #[test]
    fn test_parents() {
        assert!(tag("foo").parents().is_empty());
        assert_eq!(tag("foo::bar").parents(), ["foo"]);
        assert_eq!(tag("foo::bar::baz").parents(), ["foo", "bar"]);
    }

    #[test]
    fn test_direct_parent() {
        assert_eq!(tag("foo").direct_parent(), None);
        assert_eq!(tag("foo::bar").direct_parent(), Some("foo"));
        assert_eq!(tag("foo::bar::baz").direct_parent(), Some("bar"));
    }

    #[test]
    fn test_leaf_and_root() {
        assert_eq!(tag("foo").leaf(), "foo");
        assert_eq!(tag("foo::bar::baz").leaf(), "baz");
        assert_eq!(tag("foo::bar::baz").root(), "foo");
    }

    #[test]
    fn test_leaf_tag() {
        assert_eq!(tag("foo::bar::baz").leaf_tag(), tag("baz"));
        assert_eq!(tag("foo").leaf_tag(), tag("foo"));
    }

    #[test]
    fn test_without_root() {
        assert_eq!(tag("foo").without_root(), None);
        assert_eq!(tag("foo::bar").without_root(), Some(tag("bar")));
        assert_eq!(tag("foo::bar::baz").without_root(), Some(tag("bar::baz")));
    }

    #[test]
    fn test_parent() {
        assert_eq!(tag("foo").parent(), None);
        assert_eq!(tag("foo::bar::baz").parent(), Some(tag("foo::bar")));
    }

    #[test]
    fn test_child_and_with_leaf() {
        assert_eq!(tag("foo").child("bar").unwrap(), tag("foo::bar"));
        assert_eq!(tag("foo::bar").with_leaf("baz").unwrap(), tag("foo::baz"));
        assert!(tag("foo").child("b+r").is_err());
    }

    // ------------------------------------------------------------------------
    // Relation tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_is_ancestor_of() {
        assert!(tag("foo").is_ancestor_of(&tag("foo::bar")));
        assert!(tag("foo").is_ancestor_of(&tag("foo::bar::baz")));
        assert!(!tag("foo").is_ancestor_of(&tag("foo")));
        assert!(!tag("foo").is_ancestor_of(&tag("foobar::baz")));
        assert!(!tag("foo::bar").is_ancestor_of(&tag("foo")));
    }

    #[test]
    fn test_is_related_to() {
        assert!(tag("foo::bar").is_related_to(&tag("foo")));
        assert!(tag("foo").is_related_to(&tag("foo")));
        assert!(!tag("foo::bar").is_related_to(&tag("foo::baz")));
    }

    #[test]
    fn test_replace_prefix() {
        let old = tag("foo");
        let new = tag("qux::quux");
        assert_eq!(tag("foo").replace_prefix(&old, &new), Some(tag("qux::quux")));
        assert_eq!(
            tag("foo::bar").replace_prefix(&old, &new),
            Some(tag("qux::quux::bar"))
        );
        assert_eq!(tag("foobar").replace_prefix(&old, &new), None);
    }

    #[test]
    fn test_rename_target() {
        let old = tag("foo::bar");
        assert_eq!(old.rename_target(&tag("baz")), tag("foo::baz"));
        assert_eq!(old.rename_target(&tag("qux::baz")), tag("qux::baz"));
        assert_eq!(tag("foo").rename_target(&tag("bar")), tag("bar"));
    }

    // ------------------------------------------------------------------------
    // Serde tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&tag("foo::bar")).unwrap();
        assert_eq!(json, "\"foo::bar\"");
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tag("foo::bar"));
        assert!(serde_json::from_str::<Tag>("\"foo+bar\"").is_err());
    }

    // ------------------------------------------------------------------------
    // Property tests
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_valid_components_always_parse(
            parts in proptest::collection::vec("[a-zA-Z0-9_-]{1,8}", 1..5)
        ) {
            let joined = parts.join(SEPARATOR);
            prop_assert!(is_tag(&joined));
            let parsed = Tag::parse(&joined).unwrap();
            prop_assert_eq!(parsed.depth(), parts.len());
            prop_assert_eq!(parsed.to_string(), joined);
        }

        #[test]
        fn prop_separator_never_inside_component(s in "[a-z]{1,4}:[a-z]{1,4}") {
            prop_assert!(!is_tag(&s));
        }
    }
}
