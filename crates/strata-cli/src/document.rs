//! TOML graph documents.
//!
//! A [`GraphDocument`] declares a viewport, nodes with their sizes and an
//! optional containment parent, and the edges between them. After layout a
//! [`LayoutDocument`] records the node bounds and the routed edge segments.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use strata::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    model::{GraphModel, LayoutTarget},
    structure::{BasicGraph, EdgeId},
};

use crate::error::CliError;

/// Input document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    viewport: ViewportSpec,
    #[serde(default)]
    nodes: Vec<NodeSpec>,
    #[serde(default)]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ViewportSpec {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

fn default_width() -> f32 {
    40.0
}

fn default_height() -> f32 {
    30.0
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct NodeSpec {
    id: String,
    #[serde(default = "default_width")]
    width: f32,
    #[serde(default = "default_height")]
    height: f32,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default = "default_visible")]
    visible: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct EdgeSpec {
    tail: String,
    head: String,
    #[serde(default = "default_visible")]
    visible: bool,
}

/// A graph built from a [`GraphDocument`], with the document order of its
/// nodes and edges.
#[derive(Debug)]
pub struct DocumentGraph {
    graph: BasicGraph,
    nodes: Vec<Id>,
    edges: Vec<EdgeId>,
}

impl GraphDocument {
    /// Parse a document from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Document`] for malformed TOML or missing keys.
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the in-memory graph.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate node ids, references to undeclared
    /// nodes, and containment cycles.
    pub fn build(&self) -> Result<DocumentGraph, CliError> {
        let viewport = Bounds::new_from_top_left(
            Point::new(self.viewport.x, self.viewport.y),
            Size::new(self.viewport.width, self.viewport.height),
        );
        let mut graph = BasicGraph::new(viewport);
        let mut declared = HashSet::new();
        let mut nodes = Vec::with_capacity(self.nodes.len());

        for spec in &self.nodes {
            if !declared.insert(spec.id.as_str()) {
                return Err(CliError::DuplicateNode(spec.id.clone()));
            }
            let id = Id::new(&spec.id);
            let bounds = Bounds::new_from_top_left(
                Point::new(spec.x, spec.y),
                Size::new(spec.width, spec.height),
            );
            graph.add_node(id, bounds);
            graph.set_node_visible(id, spec.visible);
            nodes.push(id);
        }

        for spec in &self.nodes {
            let Some(parent) = &spec.parent else {
                continue;
            };
            let parent_id = lookup(&declared, parent, "parent")?;
            if !graph.set_parent(Id::new(&spec.id), Some(parent_id)) {
                return Err(CliError::ParentCycle {
                    node: spec.id.clone(),
                    parent: parent.clone(),
                });
            }
        }

        let mut edges = Vec::with_capacity(self.edges.len());
        for spec in &self.edges {
            let tail = lookup(&declared, &spec.tail, "edge tail")?;
            let head = lookup(&declared, &spec.head, "edge head")?;
            let Some(edge) = graph.add_edge(tail, head) else {
                return Err(CliError::UnknownNode {
                    id: spec.tail.clone(),
                    role: "edge tail",
                });
            };
            graph.set_edge_visible(edge, spec.visible);
            edges.push(edge);
        }

        debug!(nodes = graph.total_nodes(), edges = graph.total_edges(); "Graph document loaded");
        Ok(DocumentGraph {
            graph,
            nodes,
            edges,
        })
    }
}

fn lookup(declared: &HashSet<&str>, name: &str, role: &'static str) -> Result<Id, CliError> {
    if declared.contains(name) {
        Ok(name.into())
    } else {
        Err(CliError::UnknownNode {
            id: name.to_string(),
            role,
        })
    }
}

impl DocumentGraph {
    pub fn graph(&self) -> &BasicGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut BasicGraph {
        &mut self.graph
    }

    /// Returns the scopes to lay out, parents before their children.
    ///
    /// The root scope comes first, followed by every node with children in
    /// order of depth, then declaration.
    pub fn scopes(&self) -> Vec<Option<Id>> {
        let mut depth: HashMap<Id, usize> = HashMap::new();
        for &node in &self.nodes {
            let mut d = 0;
            let mut current = self.graph.parent(node);
            while let Some(parent) = current {
                d += 1;
                current = self.graph.parent(parent);
            }
            depth.insert(node, d);
        }

        let mut containers: Vec<Id> = self
            .nodes
            .iter()
            .copied()
            .filter(|&node| self.graph.node_count(Some(node)) > 0)
            .collect();
        containers.sort_by_key(|node| depth.get(node).copied().unwrap_or(0));

        std::iter::once(None)
            .chain(containers.into_iter().map(Some))
            .collect()
    }

    /// Snapshot the current node bounds and edge routes.
    pub fn to_layout(&self) -> LayoutDocument {
        let nodes = self
            .nodes
            .iter()
            .map(|&node| {
                let bounds = self.graph.bounds(node);
                NodeLayout {
                    id: node.to_string(),
                    x: bounds.min_x(),
                    y: bounds.min_y(),
                    width: bounds.width(),
                    height: bounds.height(),
                }
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .filter_map(|&edge| {
                let (from, to) = self.graph.edge_path(edge)?;
                Some(EdgeLayout {
                    tail: self.graph.tail(edge).to_string(),
                    head: self.graph.head(edge).to_string(),
                    from_x: from.x(),
                    from_y: from.y(),
                    to_x: to.x(),
                    to_y: to.y(),
                })
            })
            .collect();

        LayoutDocument { nodes, edges }
    }
}

/// Output document.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDocument {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nodes: Vec<NodeLayout>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    edges: Vec<EdgeLayout>,
}

#[derive(Debug, Clone, Serialize)]
struct NodeLayout {
    id: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Debug, Clone, Serialize)]
struct EdgeLayout {
    tail: String,
    head: String,
    from_x: f32,
    from_y: f32,
    to_x: f32,
    to_y: f32,
}

impl LayoutDocument {
    /// Encode as TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Encode`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string(self)?)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
