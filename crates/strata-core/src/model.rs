//! Graph and view interfaces consumed by the layout engines.
//!
//! The engines never own a graph. They read topology through [`GraphModel`]
//! and read or mutate geometry through [`LayoutTarget`]. Anything that can
//! answer these queries (an editor's scene graph, a diagram model, the
//! in-memory `BasicGraph` shipped with the `strata` crate) can be laid out.
//!
//! # Scopes
//!
//! A scope is a container in the containment hierarchy: the root of a
//! graph, or a composite node whose children are laid out inside it. Every
//! query that enumerates elements is relative to a scope.
//!
//! # Determinism
//!
//! Implementations must enumerate nodes and edges in a stable order for an
//! unchanged model. The layered engine assigns levels from this order, so an
//! unstable order makes level assignment unstable as well.

use std::{fmt::Debug, hash::Hash};

use crate::geometry::{Bounds, Point};

/// Read-only traversal of nodes, edges and containment.
pub trait GraphModel {
    /// Opaque node handle.
    type Node: Copy + Eq + Hash + Debug;

    /// Opaque edge handle.
    type Edge: Copy + Eq + Hash + Debug;

    /// Opaque container handle.
    type Scope: Copy + Debug;

    /// Returns the nodes directly contained in `scope`.
    fn nodes(&self, scope: Self::Scope) -> impl Iterator<Item = Self::Node>;

    /// Returns the edges whose endpoints both lie at or below `scope`.
    fn edges(&self, scope: Self::Scope) -> impl Iterator<Item = Self::Edge>;

    /// Returns the edges whose head is `node`.
    fn in_edges(&self, node: Self::Node) -> impl Iterator<Item = Self::Edge>;

    /// Returns the edges whose tail is `node`.
    fn out_edges(&self, node: Self::Node) -> impl Iterator<Item = Self::Edge>;

    /// Returns the node an edge points to.
    fn head(&self, edge: Self::Edge) -> Self::Node;

    /// Returns the node an edge starts from.
    fn tail(&self, edge: Self::Edge) -> Self::Node;

    /// Returns the node containing `node`, or `None` for a top-level node.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Returns true if `node` is directly contained in `scope`.
    fn contains(&self, scope: Self::Scope, node: Self::Node) -> bool;

    /// Returns the number of nodes directly contained in `scope`.
    fn node_count(&self, scope: Self::Scope) -> usize {
        self.nodes(scope).count()
    }
}

/// Geometry queries and mutations on the view of a [`GraphModel`].
///
/// Layout engines only mutate the view through [`translate`](Self::translate)
/// and [`route`](Self::route), and only after all computation for a call
/// has finished.
pub trait LayoutTarget: GraphModel {
    /// Returns the current bounding rectangle of a node.
    fn bounds(&self, node: Self::Node) -> Bounds;

    /// Returns the region available for laying out the contents of `scope`.
    fn viewport(&self, scope: Self::Scope) -> Bounds;

    /// Returns true if the node is shown and should take part in layout.
    fn is_node_visible(&self, node: Self::Node) -> bool;

    /// Returns true if the edge is shown and should be routed.
    fn is_edge_visible(&self, edge: Self::Edge) -> bool;

    /// Returns the nodes whose bounds intersect `region`.
    fn nodes_in(&self, region: Bounds) -> impl Iterator<Item = Self::Node>;

    /// Returns the edges whose routed path intersects `region`.
    fn edges_in(&self, region: Bounds) -> impl Iterator<Item = Self::Edge>;

    /// Moves a node by `offset`.
    fn translate(&mut self, node: Self::Node, offset: Point);

    /// Recomputes the visual path of an edge from its endpoints' current bounds.
    fn route(&mut self, edge: Self::Edge);
}
