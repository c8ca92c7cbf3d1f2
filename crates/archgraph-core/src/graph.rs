//! Flat node/edge graph produced from an architecture description.
//!
//! The graph is a plain value: an ordered list of [`Node`]s and an ordered list
//! of [`Edge`]s, serialized in the vocabulary force-layout network renderers
//! expect (`id`/`label`/`shape`/`group` nodes, `from`/`to`/`arrows` edges).
//!
//! Edges are not validated against nodes. A relation that names an unknown
//! entity yields a dangling edge, which [`Graph::dangling_edges`] can report
//! but which is left in place for the renderer to handle.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::schema::Level;

/// Visual shape of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// A labelled box.
    #[default]
    Box,
}

/// Perspective from which a relation was declared.
///
/// A `To` edge was declared by its `from` endpoint; a `From` edge was declared
/// by its `to` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    To,
    From,
}

/// A graph node for a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: String,
    label: String,
    shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Node {
    /// Creates a box node with no group.
    pub fn new(id: impl Into<String>, label: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            shape: Shape::Box,
            group: None,
            level,
            caption: None,
            description: None,
        }
    }

    /// Sets the visual group.
    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    /// Sets the caption.
    pub fn with_caption(mut self, caption: Option<&str>) -> Self {
        self.caption = caption.map(str::to_string);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(str::to_string);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// The level the entity was declared at.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A directed edge for a single relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    from: String,
    to: String,
    #[serde(rename = "arrows")]
    direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl Edge {
    /// Creates an unlabelled edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>, direction: Direction) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            direction,
            label: None,
        }
    }

    /// Sets the relation-kind label.
    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The relation kind, if the relation named one.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The endpoint whose entity declared this relation.
    pub fn owner(&self) -> &str {
        match self.direction {
            Direction::To => &self.from,
            Direction::From => &self.to,
        }
    }
}

/// Ordered nodes and edges of an architecture description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node. Nodes with an already used id are kept as well.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends an edge. Endpoints are not checked.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the first node with the given id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has neither nodes nor edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Returns the edges with at least one endpoint that matches no node id.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();
        self.edges
            .iter()
            .filter(move |edge| !ids.contains(edge.from.as_str()) || !ids.contains(edge.to.as_str()))
    }

    /// Returns every node id used more than once, in order of first occurrence.
    pub fn duplicate_node_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for node in &self.nodes {
            let id = node.id.as_str();
            if !seen.insert(id) && reported.insert(id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}
