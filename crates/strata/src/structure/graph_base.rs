//! Low-level graph storage.
//!
//! This module provides the storage used by [`BasicGraph`](super::BasicGraph).
//! It keeps nodes in insertion order and tracks both incoming and outgoing
//! edges per node so that the graph can answer every traversal query a
//! layout engine issues without scanning the edge list.
//!
//! # Architecture
//!
//! - [`EdgeIndex`]: Dense index of an edge in insertion order
//! - [`Edge`]: Edge structure storing source, target, and associated data
//! - [`GraphInternal`]: Node map plus edge vector with adjacency lists
//!
//! Nodes live in an [`IndexMap`] so iteration order is the order in which
//! nodes were added, which keeps downstream layouts reproducible.

use std::collections::HashMap;

use indexmap::IndexMap;

use strata_core::identifier::Id;

/// Dense index of an edge in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    /// Creates a new edge index with the given numeric index.
    pub(crate) fn new(index: usize) -> Self {
        EdgeIndex(index)
    }

    /// Returns the position of the edge in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge in the graph.
///
/// Stores the source and target node IDs along with an associated value
/// of generic type `E`.
#[derive(Debug, Clone)]
pub(super) struct Edge<E> {
    source: Id,
    target: Id,
    value: E,
}

impl<E> Edge<E> {
    pub(super) fn source(&self) -> Id {
        self.source
    }

    pub(super) fn target(&self) -> Id {
        self.target
    }

    pub(super) fn value(&self) -> &E {
        &self.value
    }
}

/// Core graph data structure.
///
/// The graph is directed and allows self-loops and multiple edges between
/// nodes. Edges are never removed, so an [`EdgeIndex`] stays valid for the
/// lifetime of the graph.
#[derive(Debug, Clone)]
pub(super) struct GraphInternal<N, E> {
    nodes: IndexMap<Id, N>,
    edges: Vec<Edge<E>>,
    income_edges: HashMap<Id, Vec<EdgeIndex>>,
    outgoing_edges: HashMap<Id, Vec<EdgeIndex>>,
}

impl<N, E> GraphInternal<N, E> {
    /// Creates a new empty graph.
    pub(super) fn new() -> Self {
        GraphInternal {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            income_edges: HashMap::new(),
            outgoing_edges: HashMap::new(),
        }
    }

    /// Returns the node data for the given ID, if it exists.
    pub(super) fn node(&self, id: Id) -> Option<&N> {
        self.nodes.get(&id)
    }

    /// Returns mutable node data for the given ID, if it exists.
    pub(super) fn node_mut(&mut self, id: Id) -> Option<&mut N> {
        self.nodes.get_mut(&id)
    }

    /// Returns an iterator over all nodes in insertion order.
    pub(super) fn nodes(&self) -> impl Iterator<Item = (Id, &N)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Returns the total number of nodes in the graph.
    pub(super) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if a node with the given ID exists in the graph.
    pub(super) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns the edge at the given index, if it exists.
    pub(super) fn edge(&self, idx: EdgeIndex) -> Option<&Edge<E>> {
        self.edges.get(idx.0)
    }

    /// Returns the `(source, target)` pair of an edge.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was not returned by [`add_edge`](Self::add_edge) on
    /// this graph.
    pub(super) fn endpoints(&self, idx: EdgeIndex) -> (Id, Id) {
        let edge = &self.edges[idx.0];
        (edge.source, edge.target)
    }

    /// Returns mutable edge data at the given index, if it exists.
    pub(super) fn edge_value_mut(&mut self, idx: EdgeIndex) -> Option<&mut E> {
        self.edges.get_mut(idx.0).map(|edge| &mut edge.value)
    }

    /// Returns an iterator over all edges with their indices.
    pub(super) fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge<E>)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(idx, edge)| (EdgeIndex::new(idx), edge))
    }

    /// Returns the total number of edges in the graph.
    pub(super) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the indices of edges pointing into the given node.
    pub(super) fn incoming(&self, id: Id) -> impl Iterator<Item = EdgeIndex> {
        self.income_edges.get(&id).into_iter().flatten().copied()
    }

    /// Returns the indices of edges leaving the given node.
    pub(super) fn outgoing(&self, id: Id) -> impl Iterator<Item = EdgeIndex> {
        self.outgoing_edges.get(&id).into_iter().flatten().copied()
    }

    /// Adds a node to the graph with the given ID and data.
    ///
    /// If a node with the same ID already exists, its data is replaced and it
    /// keeps its original position in iteration order.
    pub(super) fn add_node(&mut self, id: Id, node: N) {
        self.nodes.insert(id, node);
    }

    /// Adds a directed edge to the graph between two existing nodes.
    ///
    /// Returns `None` without modifying the graph when either endpoint is
    /// missing.
    pub(super) fn add_edge(&mut self, source_id: Id, target_id: Id, edge: E) -> Option<EdgeIndex> {
        if !self.contains_node(source_id) || !self.contains_node(target_id) {
            return None;
        }

        self.edges.push(Edge {
            source: source_id,
            target: target_id,
            value: edge,
        });

        let idx = EdgeIndex::new(self.edges.len() - 1);
        self.outgoing_edges.entry(source_id).or_default().push(idx);
        self.income_edges.entry(target_id).or_default().push(idx);
        Some(idx)
    }
}
