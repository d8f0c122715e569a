//! Closed table of constructible node kinds.
//!
//! The interpreter never creates anything that is not listed here: each tag
//! maps to a factory function, a structural kind and a fixed set of typed
//! properties. Lookups are exact and case-sensitive.

use std::collections::HashMap;

use crate::node::Node;
use crate::value::ValueKind;

/// Child containment policy of a node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Structure {
    /// Panels: any number of element children, no text.
    ManyChildren,
    /// Content controls: one element child or one text run.
    SingleChild,
    /// Text blocks: text runs only, concatenated in document order.
    TextLeaf,
}

/// Declared property and its semantic type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyDecl {
    pub name: &'static str,
    pub kind: ValueKind,
}

impl PropertyDecl {
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self { name, kind }
    }
}

/// Kind-specific validation run when an element ends (`endInit`).
pub type Finalizer = fn(&mut Node) -> Result<(), String>;

/// One constructible tag.
#[derive(Debug)]
pub struct AllowlistEntry {
    tag: &'static str,
    node_kind: &'static str,
    structure: Structure,
    factory: fn() -> Node,
    properties: Vec<PropertyDecl>,
    attached: Vec<PropertyDecl>,
    grid_definitions: bool,
    finalizer: Option<Finalizer>,
}

impl AllowlistEntry {
    /// Start describing an entry for `tag`.
    pub fn builder(
        tag: &'static str,
        structure: Structure,
        factory: fn() -> Node,
    ) -> AllowlistEntryBuilder {
        AllowlistEntryBuilder {
            entry: Self {
                tag,
                node_kind: factory().kind(),
                structure,
                factory,
                properties: Vec::new(),
                attached: Vec::new(),
                grid_definitions: false,
                finalizer: None,
            },
        }
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Kind of the nodes the factory produces (`H1` produces `TextBlock`).
    #[must_use]
    pub fn node_kind(&self) -> &'static str {
        self.node_kind
    }

    #[must_use]
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Create an empty node.
    #[must_use]
    pub fn create(&self) -> Node {
        (self.factory)()
    }

    /// Property declared by this type for its own instances.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDecl> {
        self.properties.iter().find(|decl| decl.name == name)
    }

    /// Attached property this type declares for other nodes (`Grid.Row`).
    #[must_use]
    pub fn attached_property(&self, name: &str) -> Option<&PropertyDecl> {
        self.attached.iter().find(|decl| decl.name == name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyDecl> {
        self.properties.iter()
    }

    /// Whether `RowDefinitions`/`ColumnDefinitions` are accepted.
    #[must_use]
    pub fn accepts_grid_definitions(&self) -> bool {
        self.grid_definitions
    }

    pub(crate) fn finalize(&self, node: &mut Node) -> Result<(), String> {
        match self.finalizer {
            Some(finalizer) => finalizer(node),
            None => Ok(()),
        }
    }
}

/// Builder for [`AllowlistEntry`].
#[derive(Debug)]
pub struct AllowlistEntryBuilder {
    entry: AllowlistEntry,
}

impl AllowlistEntryBuilder {
    /// Declare properties for the node's own instances.
    #[must_use]
    pub fn properties(mut self, decls: &[PropertyDecl]) -> Self {
        self.entry.properties.extend_from_slice(decls);
        self
    }

    /// Declare attached properties other nodes may set as `Tag.Name`.
    #[must_use]
    pub fn attached(mut self, decls: &[PropertyDecl]) -> Self {
        self.entry.attached.extend_from_slice(decls);
        self
    }

    /// Accept the dedicated `RowDefinitions`/`ColumnDefinitions` attributes.
    #[must_use]
    pub fn grid_definitions(mut self) -> Self {
        self.entry.grid_definitions = true;
        self
    }

    #[must_use]
    pub fn finalizer(mut self, finalizer: Finalizer) -> Self {
        self.entry.finalizer = Some(finalizer);
        self
    }

    #[must_use]
    pub fn build(self) -> AllowlistEntry {
        self.entry
    }
}

/// Error while assembling an [`Allowlist`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AllowlistError {
    #[error("tag '{0}' is registered twice")]
    DuplicateTag(&'static str),
    #[error("tag '{0}' contains '.', which is reserved for attached properties")]
    DottedTag(&'static str),
}

/// Immutable tag table consulted by the interpreter.
#[derive(Debug, Default)]
pub struct Allowlist {
    entries: HashMap<&'static str, AllowlistEntry>,
}

impl Allowlist {
    /// Build a table from entries.
    ///
    /// # Errors
    ///
    /// Returns [`AllowlistError`] if a tag is listed twice or contains a dot.
    pub fn new(entries: impl IntoIterator<Item = AllowlistEntry>) -> Result<Self, AllowlistError> {
        let mut table = HashMap::new();
        for entry in entries {
            let tag = entry.tag;
            if tag.contains('.') {
                return Err(AllowlistError::DottedTag(tag));
            }
            if table.insert(tag, entry).is_some() {
                return Err(AllowlistError::DuplicateTag(tag));
            }
        }
        Ok(Self { entries: table })
    }

    #[must_use]
    pub fn lookup(&self, tag: &str) -> Option<&AllowlistEntry> {
        self.entries.get(tag)
    }

    /// Resolve `property` on `owner_tag`, own properties first, then attached ones.
    #[must_use]
    pub fn lookup_property(&self, owner_tag: &str, property: &str) -> Option<&PropertyDecl> {
        let entry = self.lookup(owner_tag)?;
        entry
            .property(property)
            .or_else(|| entry.attached_property(property))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tags in alphabetical order.
    #[must_use]
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> Node {
        Node::new("Stack")
    }

    fn heading() -> Node {
        Node::new("Text").with_class("Heading")
    }

    fn sample() -> Allowlist {
        Allowlist::new([
            AllowlistEntry::builder("Stack", Structure::ManyChildren, stack)
                .properties(&[PropertyDecl::new("Spacing", ValueKind::Double)])
                .attached(&[PropertyDecl::new("Order", ValueKind::Int)])
                .build(),
            AllowlistEntry::builder("Heading", Structure::TextLeaf, heading).build(),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_is_exact() {
        let allowlist = sample();
        assert!(allowlist.lookup("Stack").is_some());
        assert!(allowlist.lookup("stack").is_none());
        assert!(allowlist.lookup("Stac").is_none());
    }

    #[test]
    fn test_lookup_property() {
        let allowlist = sample();
        assert_eq!(
            allowlist.lookup_property("Stack", "Spacing").map(|d| d.kind),
            Some(ValueKind::Double)
        );
        assert_eq!(
            allowlist.lookup_property("Stack", "Order").map(|d| d.kind),
            Some(ValueKind::Int)
        );
        assert!(allowlist.lookup_property("Stack", "spacing").is_none());
        assert!(allowlist.lookup_property("Missing", "Spacing").is_none());
    }

    #[test]
    fn test_factory_defines_node_kind() {
        let allowlist = sample();
        let entry = allowlist.lookup("Heading").unwrap();
        assert_eq!(entry.node_kind(), "Text");
        assert_eq!(entry.create().classes(), &["Heading"]);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let result = Allowlist::new([
            AllowlistEntry::builder("Stack", Structure::ManyChildren, stack).build(),
            AllowlistEntry::builder("Stack", Structure::TextLeaf, stack).build(),
        ]);
        assert_eq!(result.unwrap_err(), AllowlistError::DuplicateTag("Stack"));
    }

    #[test]
    fn test_dotted_tag_rejected() {
        let result = Allowlist::new([
            AllowlistEntry::builder("Grid.Row", Structure::ManyChildren, stack).build(),
        ]);
        assert_eq!(result.unwrap_err(), AllowlistError::DottedTag("Grid.Row"));
    }

    #[test]
    fn test_tags_sorted() {
        assert_eq!(sample().tags(), vec!["Heading", "Stack"]);
    }
}
