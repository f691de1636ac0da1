//! An in-memory graph with geometry.
//!
//! [`BasicGraph`] implements both [`GraphModel`] and [`LayoutTarget`] on top
//! of [`GraphInternal`]. Nodes are named by [`Id`], may be nested inside
//! other nodes, and carry a bounding box and a visibility flag. Edges carry
//! a visibility flag and the straight path computed the last time they were
//! routed.
//!
//! Scopes are `Option<Id>`: `None` is the top level of the graph, whose
//! viewport is set on construction, and `Some(id)` is the interior of node
//! `id`, whose viewport is that node's bounds.

use strata_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    model::{GraphModel, LayoutTarget},
};

use super::graph_base::{EdgeIndex, GraphInternal};

/// Handle of an edge in a [`BasicGraph`].
pub type EdgeId = EdgeIndex;

#[derive(Debug, Clone)]
struct NodeData {
    bounds: Bounds,
    parent: Option<Id>,
    visible: bool,
}

#[derive(Debug, Clone)]
struct EdgeData {
    visible: bool,
    path: Option<(Point, Point)>,
    route_count: usize,
}

/// A directed graph with containment and per-node bounds.
///
/// # Examples
///
/// ```
/// use strata::structure::BasicGraph;
/// use strata::geometry::{Bounds, Point, Size};
/// use strata::identifier::Id;
/// use strata::model::{GraphModel, LayoutTarget};
///
/// let viewport = Bounds::new_from_top_left(Point::default(), Size::new(200.0, 100.0));
/// let mut graph = BasicGraph::new(viewport);
///
/// let a = Id::new("a");
/// let b = Id::new("b");
/// graph.add_node(a, Bounds::new_from_top_left(Point::default(), Size::new(20.0, 10.0)));
/// graph.add_node(b, Bounds::new_from_top_left(Point::new(100.0, 50.0), Size::new(20.0, 10.0)));
/// let edge = graph.add_edge(a, b).expect("both endpoints exist");
///
/// assert_eq!(graph.node_count(None), 2);
/// assert_eq!(graph.tail(edge), a);
///
/// graph.translate(a, Point::new(5.0, 5.0));
/// assert_eq!(graph.bounds(a).min_point(), Point::new(5.0, 5.0));
/// ```
#[derive(Debug, Clone)]
pub struct BasicGraph {
    graph: GraphInternal<NodeData, EdgeData>,
    viewport: Bounds,
}

impl BasicGraph {
    /// Creates an empty graph whose top-level scope spans `viewport`.
    pub fn new(viewport: Bounds) -> Self {
        Self {
            graph: GraphInternal::new(),
            viewport,
        }
    }

    /// Replaces the viewport of the top-level scope.
    pub fn set_viewport(&mut self, viewport: Bounds) -> &mut Self {
        self.viewport = viewport;
        self
    }

    /// Adds a visible top-level node, or replaces the bounds of an existing one.
    ///
    /// Replacing a node keeps its parent and visibility.
    pub fn add_node(&mut self, id: Id, bounds: Bounds) -> &mut Self {
        match self.graph.node_mut(id) {
            Some(node) => node.bounds = bounds,
            None => self.graph.add_node(
                id,
                NodeData {
                    bounds,
                    parent: None,
                    visible: true,
                },
            ),
        }
        self
    }

    /// Nests `node` inside `parent`, or moves it to the top level for `None`.
    ///
    /// Returns false and leaves the graph unchanged when either node is
    /// missing or when the change would make a node contain itself.
    pub fn set_parent(&mut self, node: Id, parent: Option<Id>) -> bool {
        if !self.graph.contains_node(node) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.graph.contains_node(parent) || self.is_within(parent, node) {
                return false;
            }
        }
        if let Some(data) = self.graph.node_mut(node) {
            data.parent = parent;
        }
        true
    }

    /// Shows or hides a node. Returns false if the node does not exist.
    pub fn set_node_visible(&mut self, node: Id, visible: bool) -> bool {
        match self.graph.node_mut(node) {
            Some(data) => {
                data.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Adds a visible edge from `tail` to `head`.
    ///
    /// Returns `None` if either endpoint is missing. Self-loops and parallel
    /// edges are allowed.
    pub fn add_edge(&mut self, tail: Id, head: Id) -> Option<EdgeId> {
        self.graph.add_edge(
            tail,
            head,
            EdgeData {
                visible: true,
                path: None,
                route_count: 0,
            },
        )
    }

    /// Shows or hides an edge. Returns false if the edge does not exist.
    pub fn set_edge_visible(&mut self, edge: EdgeId, visible: bool) -> bool {
        match self.graph.edge_value_mut(edge) {
            Some(data) => {
                data.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Returns true if the graph has a node with this ID.
    pub fn contains_node(&self, node: Id) -> bool {
        self.graph.contains_node(node)
    }

    /// Number of nodes at any depth.
    pub fn total_nodes(&self) -> usize {
        self.graph.nodes_count()
    }

    pub fn total_edges(&self) -> usize {
        self.graph.edges_count()
    }

    /// Returns every node in insertion order, regardless of nesting.
    pub fn all_nodes(&self) -> impl Iterator<Item = Id> {
        self.graph.nodes().map(|(id, _)| id)
    }

    /// Returns every edge in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = EdgeId> {
        self.graph.edges().map(|(idx, _)| idx)
    }

    /// Returns the path computed by the last [`route`](LayoutTarget::route)
    /// of this edge, as `(from, to)`.
    pub fn edge_path(&self, edge: EdgeId) -> Option<(Point, Point)> {
        self.graph.edge(edge).and_then(|e| e.value().path)
    }

    /// Returns how many times an edge has been routed.
    pub fn route_count(&self, edge: EdgeId) -> usize {
        self.graph
            .edge(edge)
            .map_or(0, |e| e.value().route_count)
    }

    /// Returns true if `ancestor` is `node` itself or contains it at any depth.
    fn is_within(&self, node: Id, ancestor: Id) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.graph.node(id).and_then(|data| data.parent);
        }
        false
    }

    /// Returns true if `node` lies strictly below `scope`.
    fn is_below(&self, node: Id, scope: Option<Id>) -> bool {
        match scope {
            None => self.graph.contains_node(node),
            Some(scope) => node != scope && self.is_within(node, scope),
        }
    }
}

/// Returns the point where the ray from the center of `bounds` toward
/// `toward` leaves the box, or `toward` itself when it lies inside.
fn boundary_point(bounds: Bounds, toward: Point) -> Point {
    let center = bounds.center();
    let delta = toward.sub_point(center);
    if delta.is_zero() {
        return center;
    }

    let half_width = bounds.width() / 2.0;
    let half_height = bounds.height() / 2.0;
    let tx = if delta.x() == 0.0 {
        f32::INFINITY
    } else {
        half_width / delta.x().abs()
    };
    let ty = if delta.y() == 0.0 {
        f32::INFINITY
    } else {
        half_height / delta.y().abs()
    };

    center.add_point(delta.scale(tx.min(ty).min(1.0)))
}

impl GraphModel for BasicGraph {
    type Node = Id;
    type Edge = EdgeId;
    type Scope = Option<Id>;

    fn nodes(&self, scope: Option<Id>) -> impl Iterator<Item = Id> {
        self.graph
            .nodes()
            .filter(move |(_, data)| data.parent == scope)
            .map(|(id, _)| id)
    }

    fn edges(&self, scope: Option<Id>) -> impl Iterator<Item = EdgeId> {
        self.graph
            .edges()
            .filter(move |(_, edge)| {
                self.is_below(edge.source(), scope) && self.is_below(edge.target(), scope)
            })
            .map(|(idx, _)| idx)
    }

    fn in_edges(&self, node: Id) -> impl Iterator<Item = EdgeId> {
        self.graph.incoming(node)
    }

    fn out_edges(&self, node: Id) -> impl Iterator<Item = EdgeId> {
        self.graph.outgoing(node)
    }

    fn head(&self, edge: EdgeId) -> Id {
        self.graph.endpoints(edge).1
    }

    fn tail(&self, edge: EdgeId) -> Id {
        self.graph.endpoints(edge).0
    }

    fn parent(&self, node: Id) -> Option<Id> {
        self.graph.node(node).and_then(|data| data.parent)
    }

    fn contains(&self, scope: Option<Id>, node: Id) -> bool {
        self.graph
            .node(node)
            .is_some_and(|data| data.parent == scope)
    }
}

impl LayoutTarget for BasicGraph {
    fn bounds(&self, node: Id) -> Bounds {
        self.graph
            .node(node)
            .map(|data| data.bounds)
            .unwrap_or_default()
    }

    fn viewport(&self, scope: Option<Id>) -> Bounds {
        match scope {
            None => self.viewport,
            Some(node) => self.bounds(node),
        }
    }

    fn is_node_visible(&self, node: Id) -> bool {
        self.graph.node(node).is_some_and(|data| data.visible)
    }

    fn is_edge_visible(&self, edge: EdgeId) -> bool {
        let Some(data) = self.graph.edge(edge) else {
            return false;
        };
        data.value().visible
            && self.is_node_visible(data.source())
            && self.is_node_visible(data.target())
    }

    fn nodes_in(&self, region: Bounds) -> impl Iterator<Item = Id> {
        self.graph
            .nodes()
            .filter(move |(_, data)| data.bounds.intersects(region))
            .map(|(id, _)| id)
    }

    fn edges_in(&self, region: Bounds) -> impl Iterator<Item = EdgeId> {
        self.graph
            .edges()
            .filter(move |(_, edge)| {
                edge.value()
                    .path
                    .is_some_and(|(from, to)| region.intersects_segment(from, to))
            })
            .map(|(idx, _)| idx)
    }

    fn translate(&mut self, node: Id, offset: Point) {
        if offset.is_zero() {
            return;
        }
        // Nested nodes move with their container.
        let moved: Vec<Id> = self
            .graph
            .nodes()
            .map(|(id, _)| id)
            .filter(|&id| self.is_within(id, node))
            .collect();
        for id in moved {
            if let Some(data) = self.graph.node_mut(id) {
                data.bounds = data.bounds.translate(offset);
            }
        }
    }

    fn route(&mut self, edge: EdgeId) {
        let Some(data) = self.graph.edge(edge) else {
            return;
        };
        let tail = self.bounds(data.source());
        let head = self.bounds(data.target());
        let from = boundary_point(tail, head.center());
        let to = boundary_point(head, tail.center());

        if let Some(value) = self.graph.edge_value_mut(edge) {
            value.path = Some((from, to));
            value.route_count += 1;
        }
    }
}
