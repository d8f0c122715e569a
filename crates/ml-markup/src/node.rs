//! Constructed node tree.
//!
//! A [`Node`] owns its children exclusively. Nodes are only handed out after
//! [`NodeBuilder::finish`] has validated them, so a tree returned by the
//! interpreter always satisfies the structural rules of its allowlist.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::allowlist::{AllowlistEntry, Structure};
use crate::value::Value;

/// Property slot on a node: either declared by the node's own type or
/// attached by an owner type (`Grid.Row`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyKey {
    pub owner: Option<&'static str>,
    pub name: &'static str,
}

impl PropertyKey {
    #[must_use]
    pub const fn own(name: &'static str) -> Self {
        Self { owner: None, name }
    }

    #[must_use]
    pub const fn attached(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner: Some(owner),
            name,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{owner}.{}", self.name),
            None => f.write_str(self.name),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for PropertyKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a node contains besides its properties.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Content {
    #[default]
    Empty,
    Children(Vec<Node>),
    Child(Box<Node>),
    Text(String),
}

/// Validated UI-agnostic node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Node {
    kind: &'static str,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    classes: Vec<&'static str>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    properties: BTreeMap<PropertyKey, Value>,
    content: Content,
}

impl Node {
    /// Create an empty node of the given kind. Used by allowlist factories.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            name: None,
            classes: Vec::new(),
            properties: BTreeMap::new(),
            content: Content::Empty,
        }
    }

    /// Add a style class.
    #[must_use]
    pub fn with_class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    /// Node kind identifier (e.g. `"TextBlock"` for both `TextBlock` and `H1`).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Name bound with `x:Name`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }

    /// Value of a property declared by the node's own type.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key.owner.is_none() && key.name == name)
            .map(|(_, value)| value)
    }

    /// Value of an attached property such as `Grid.Row`.
    #[must_use]
    pub fn attached(&self, owner: &str, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(key, _)| key.owner == Some(owner) && key.name == name)
            .map(|(_, value)| value)
    }

    /// All property values in key order.
    pub fn properties(&self) -> impl Iterator<Item = (&PropertyKey, &Value)> {
        self.properties.iter()
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Element children in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Children(children) => children,
            Content::Child(child) => std::slice::from_ref(child.as_ref()),
            Content::Empty | Content::Text(_) => &[],
        }
    }

    /// Text content, if the node holds text instead of elements.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Replace the text content. Used by node-kind finalizers.
    pub fn set_text(&mut self, text: String) {
        self.content = Content::Text(text);
    }

    /// Replace a property value. Used by node-kind finalizers.
    pub fn set_property(&mut self, key: PropertyKey, value: Value) {
        self.properties.insert(key, value);
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children().iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// Node under construction (between `beginInit` and `endInit`).
///
/// Accepts property writes, a name, children and text according to the
/// structural kind of its allowlist entry. [`finish`](Self::finish) runs the
/// entry's finalizer and releases the node.
#[derive(Debug)]
pub(crate) struct NodeBuilder<'a> {
    entry: &'a AllowlistEntry,
    node: Node,
}

impl<'a> NodeBuilder<'a> {
    /// Create the node through the entry's factory.
    pub(crate) fn begin(entry: &'a AllowlistEntry) -> Self {
        Self {
            entry,
            node: entry.create(),
        }
    }

    pub(crate) fn entry(&self) -> &'a AllowlistEntry {
        self.entry
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.node.name = Some(name.to_owned());
    }

    pub(crate) fn set_property(&mut self, key: PropertyKey, value: Value) {
        self.node.properties.insert(key, value);
    }

    /// Check that one more element child may be attached.
    pub(crate) fn check_child_slot(&self) -> Result<(), String> {
        let tag = self.entry.tag();
        match (self.entry.structure(), &self.node.content) {
            (Structure::ManyChildren, _) | (Structure::SingleChild, Content::Empty) => Ok(()),
            (Structure::SingleChild, Content::Text(_)) => {
                Err(format!("'{tag}' already has text content; cannot add a child"))
            }
            (Structure::SingleChild, _) => Err(format!("'{tag}' can only have one child")),
            (Structure::TextLeaf, _) => Err(format!("'{tag}' cannot contain child elements")),
        }
    }

    /// Attach a finished child.
    pub(crate) fn attach(&mut self, child: Node) -> Result<(), String> {
        self.check_child_slot()?;
        let tag = self.entry.tag();
        match (self.entry.structure(), &mut self.node.content) {
            (Structure::ManyChildren, Content::Children(children)) => children.push(child),
            (Structure::ManyChildren, content) => *content = Content::Children(vec![child]),
            (Structure::SingleChild, content) => *content = Content::Child(Box::new(child)),
            (Structure::TextLeaf, _) => {
                return Err(format!("'{tag}' cannot contain child elements"));
            }
        }
        Ok(())
    }

    /// Route a non-blank text run according to the structural kind.
    pub(crate) fn append_text(&mut self, text: &str) -> Result<(), String> {
        let tag = self.entry.tag();
        match (self.entry.structure(), &mut self.node.content) {
            (Structure::TextLeaf, Content::Text(existing)) => {
                existing.push_str(text);
                Ok(())
            }
            (Structure::TextLeaf | Structure::SingleChild, content @ Content::Empty) => {
                *content = Content::Text(text.to_owned());
                Ok(())
            }
            (Structure::SingleChild, _) => Err(format!(
                "'{tag}' already has content; cannot add a text node"
            )),
            (Structure::ManyChildren, _) => {
                Err(format!("text content is not supported for '{tag}'"))
            }
            (Structure::TextLeaf, _) => Err(format!(
                "'{tag}' holds child elements; cannot add a text node"
            )),
        }
    }

    /// Run the entry's finalizer (`endInit`) and release the node.
    pub(crate) fn finish(mut self) -> Result<Node, String> {
        self.entry.finalize(&mut self.node)?;
        Ok(self.node)
    }
}
