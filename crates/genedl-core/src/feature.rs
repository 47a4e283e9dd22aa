//! Feature tree types
//!
//! A GenICam description is a flat list of named nodes. Categories refer to
//! their children by name, so the tree is really a graph addressed through
//! the name index kept here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside its [`FeatureTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node type, taken from the GenICam element name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Category,
    Integer,
    Float,
    String,
    Enumeration,
    Boolean,
    Command,
    Converter,
    IntConverter,
    SwissKnife,
    IntSwissKnife,
    StructReg,
    /// Any other element (registers, ports, ...), keeping its element name
    Unknown(std::string::String),
}

impl FeatureKind {
    pub fn from_element(element: &str) -> Self {
        match element {
            "Category" => Self::Category,
            "Integer" => Self::Integer,
            "Float" => Self::Float,
            "String" | "StringReg" => Self::String,
            "Enumeration" => Self::Enumeration,
            "Boolean" => Self::Boolean,
            "Command" => Self::Command,
            "Converter" => Self::Converter,
            "IntConverter" => Self::IntConverter,
            "SwissKnife" => Self::SwissKnife,
            "IntSwissKnife" => Self::IntSwissKnife,
            "StructReg" => Self::StructReg,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self, Self::Category)
    }

    /// Kinds that carry a numeric value a user can type in
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Float
                | Self::Converter
                | Self::IntConverter
                | Self::SwissKnife
                | Self::IntSwissKnife
        )
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(element) => write!(f, "{}", element),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Access mode declared by the `<AccessMode>` child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    #[default]
    Unknown,
}

impl AccessMode {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "RO" => Self::ReadOnly,
            "RW" => Self::ReadWrite,
            _ => Self::Unknown,
        }
    }

    /// Anything not declared read-only is treated as writable
    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// One node of the description: a category or a typed property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureNode {
    /// Value of the `Name` attribute, absent on some anonymous nodes
    pub name: Option<String>,
    pub kind: FeatureKind,
    #[serde(default)]
    pub access_mode: AccessMode,
    #[serde(default)]
    pub description: String,
    /// Child references by name (`<pFeature>`), categories only
    #[serde(default)]
    pub children: Vec<String>,
}

impl FeatureNode {
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: Some(name.into()),
            kind,
            access_mode: AccessMode::Unknown,
            description: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_access(mut self, access_mode: AccessMode) -> Self {
        self.access_mode = access_mode;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Name for labels and log messages, empty for anonymous nodes
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Result of inserting a node into a [`FeatureTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Added(NodeId),
    /// Node has no name and cannot be referenced
    Unnamed(NodeId),
    /// A node with this name already exists; the new one replaces it in the index
    Duplicate { replaced: NodeId, id: NodeId },
}

/// All nodes of one description, in document order
#[derive(Debug, Clone, Default)]
pub struct FeatureTree {
    nodes: Vec<FeatureNode>,
    /// Name index, last definition wins
    index: HashMap<String, NodeId>,
    categories: Vec<NodeId>,
}

impl FeatureTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, indexing it by name
    pub fn insert(&mut self, node: FeatureNode) -> Insert {
        let id = NodeId(self.nodes.len());
        let result = match node.name.as_deref() {
            None => Insert::Unnamed(id),
            Some(name) => match self.index.insert(name.to_string(), id) {
                Some(replaced) => {
                    self.categories.retain(|&c| c != replaced);
                    Insert::Duplicate { replaced, id }
                }
                None => Insert::Added(id),
            },
        };
        if node.name.is_some() && node.kind.is_category() {
            self.categories.push(id);
        }
        self.nodes.push(node);
        result
    }

    pub fn node(&self, id: NodeId) -> &FeatureNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&FeatureNode> {
        self.nodes.get(id.0)
    }

    /// Resolve a node by name
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// All nodes with their ids, in document order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FeatureNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Named, indexed nodes in document order
    pub fn named(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.nodes().filter_map(move |(id, n)| match n.name.as_deref() {
            Some(name) if self.index.get(name) == Some(&id) => Some((id, name)),
            _ => None,
        })
    }

    /// Every category in document order
    pub fn categories(&self) -> &[NodeId] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<FeatureNode> for FeatureTree {
    fn from_iter<T: IntoIterator<Item = FeatureNode>>(iter: T) -> Self {
        let mut tree = Self::new();
        for node in iter {
            tree.insert(node);
        }
        tree
    }
}
