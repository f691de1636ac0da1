//! Working graph and level results of the layered layout.
//!
//! The working graph is a dense arena: every working node is a small
//! integer and its per-run fields live in parallel vectors. Dummy nodes and
//! the temporary meta node are appended after the copied nodes.

use strata_core::geometry::Bounds;

/// A working edge. Either endpoint is `None` once the edge is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct WorkEdge {
    pub(super) tail: Option<usize>,
    pub(super) head: Option<usize>,
}

/// Private copy of a scope, augmented during leveling.
#[derive(Debug, Clone)]
pub(super) struct WorkingGraph<N> {
    /// Node of the caller's graph, or `None` for dummy and meta nodes.
    pub(super) origin: Vec<Option<N>>,
    pub(super) level: Vec<usize>,
    pub(super) usage: Vec<usize>,
    pub(super) visited: Vec<bool>,
    pub(super) width: Vec<f32>,
    pub(super) height: Vec<f32>,
    edges: Vec<WorkEdge>,
    in_edges: Vec<Vec<usize>>,
    out_edges: Vec<Vec<usize>>,
}

/// Marker returned by [`WorkingGraph::push_meta`], consumed by
/// [`WorkingGraph::pop_meta`].
#[derive(Debug, Clone, Copy)]
pub(super) struct MetaNode {
    pub(super) node: usize,
    first_edge: usize,
}

impl<N: Copy> WorkingGraph<N> {
    pub(super) fn new() -> Self {
        Self {
            origin: Vec::new(),
            level: Vec::new(),
            usage: Vec::new(),
            visited: Vec::new(),
            width: Vec::new(),
            height: Vec::new(),
            edges: Vec::new(),
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }

    fn push_node(&mut self, origin: Option<N>, level: usize, width: f32, height: f32) -> usize {
        self.origin.push(origin);
        self.level.push(level);
        self.usage.push(usize::MAX);
        self.visited.push(false);
        self.width.push(width);
        self.height.push(height);
        self.in_edges.push(Vec::new());
        self.out_edges.push(Vec::new());
        self.origin.len() - 1
    }

    /// Adds a working node standing for `origin`.
    pub(super) fn add_origin(&mut self, origin: N, bounds: Bounds) -> usize {
        self.push_node(Some(origin), 0, bounds.width(), bounds.height())
    }

    /// Adds a zero-sized routing node at `level`.
    pub(super) fn add_dummy(&mut self, level: usize) -> usize {
        self.push_node(None, level, 0.0, 0.0)
    }

    pub(super) fn add_edge(&mut self, tail: usize, head: usize) -> usize {
        self.edges.push(WorkEdge {
            tail: Some(tail),
            head: Some(head),
        });
        let edge = self.edges.len() - 1;
        self.out_edges[tail].push(edge);
        self.in_edges[head].push(edge);
        edge
    }

    pub(super) fn node_count(&self) -> usize {
        self.origin.len()
    }

    pub(super) fn is_dummy(&self, node: usize) -> bool {
        self.origin[node].is_none()
    }

    pub(super) fn edge(&self, edge: usize) -> WorkEdge {
        self.edges[edge]
    }

    /// Edges that still connect two nodes.
    pub(super) fn live_edges(&self) -> impl Iterator<Item = (usize, usize)> {
        self.edges
            .iter()
            .filter_map(|edge| Some((edge.tail?, edge.head?)))
    }

    pub(super) fn in_edges(&self, node: usize) -> &[usize] {
        &self.in_edges[node]
    }

    pub(super) fn out_edges(&self, node: usize) -> &[usize] {
        &self.out_edges[node]
    }

    /// Tails of the edges entering `node`.
    pub(super) fn in_nodes(&self, node: usize) -> impl Iterator<Item = usize> {
        self.in_edges[node]
            .iter()
            .filter_map(|&edge| self.edges[edge].tail)
    }

    /// Heads of the edges leaving `node`.
    pub(super) fn out_nodes(&self, node: usize) -> impl Iterator<Item = usize> {
        self.out_edges[node]
            .iter()
            .filter_map(|&edge| self.edges[edge].head)
    }

    fn detach(&mut self, edge: usize) {
        let WorkEdge { tail, head } = self.edges[edge];
        if let Some(tail) = tail {
            self.out_edges[tail].retain(|&e| e != edge);
        }
        if let Some(head) = head {
            self.in_edges[head].retain(|&e| e != edge);
        }
    }

    /// Swaps the endpoints of `edge`.
    pub(super) fn reverse_edge(&mut self, edge: usize) {
        self.detach(edge);
        let WorkEdge { tail, head } = self.edges[edge];
        self.edges[edge] = WorkEdge {
            tail: head,
            head: tail,
        };
        if let Some(new_tail) = head {
            self.out_edges[new_tail].push(edge);
        }
        if let Some(new_head) = tail {
            self.in_edges[new_head].push(edge);
        }
    }

    /// Clears both endpoints of `edge`, removing it from the topology.
    pub(super) fn destroy_edge(&mut self, edge: usize) {
        self.detach(edge);
        self.edges[edge] = WorkEdge {
            tail: None,
            head: None,
        };
    }

    /// Points `edge` at a new head.
    pub(super) fn set_head(&mut self, edge: usize, head: usize) {
        if let Some(old) = self.edges[edge].head {
            self.in_edges[old].retain(|&e| e != edge);
        }
        self.edges[edge].head = Some(head);
        self.in_edges[head].push(edge);
    }

    /// Adds a sink with an edge from every current node.
    pub(super) fn push_meta(&mut self) -> MetaNode {
        let first_edge = self.edges.len();
        let count = self.node_count();
        let node = self.push_node(None, 0, 0.0, 0.0);
        for tail in 0..count {
            self.add_edge(tail, node);
        }
        MetaNode { node, first_edge }
    }

    /// Removes the meta node and its edges.
    ///
    /// Nothing may be added to the graph between `push_meta` and `pop_meta`.
    pub(super) fn pop_meta(&mut self, meta: MetaNode) {
        for tail in 0..meta.node {
            self.out_edges[tail].retain(|&e| e < meta.first_edge);
        }
        self.edges.truncate(meta.first_edge);
        for field in [&mut self.in_edges, &mut self.out_edges] {
            field.truncate(meta.node);
        }
        self.origin.truncate(meta.node);
        self.level.truncate(meta.node);
        self.usage.truncate(meta.node);
        self.visited.truncate(meta.node);
        self.width.truncate(meta.node);
        self.height.truncate(meta.node);
    }

    pub(super) fn clear_visited(&mut self) {
        self.visited.fill(false);
    }
}

/// A slot in a level: a node of the caller's graph, or a routing dummy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelNode<N> {
    Origin(N),
    Dummy,
}

/// Result of [`LevelLayout::calculate_layout`](super::LevelLayout::calculate_layout).
///
/// Holds the leveled working copy of a scope. It can be inspected to size
/// a viewport before applying, and applied any number of times.
#[derive(Debug, Clone)]
pub struct LevelData<N> {
    pub(super) graph: WorkingGraph<N>,
    pub(super) levels: Vec<Vec<usize>>,
    pub(super) reversed_edges: usize,
    pub(super) destroyed_edges: usize,
}

impl<N: Copy + PartialEq> LevelData<N> {
    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Largest number of nodes in any level.
    ///
    /// With `with_dummies` false only nodes of the caller's graph count.
    pub fn max_level_width(&self, with_dummies: bool) -> usize {
        self.levels
            .iter()
            .map(|level| {
                if with_dummies {
                    level.len()
                } else {
                    level.iter().filter(|&&v| !self.graph.is_dummy(v)).count()
                }
            })
            .max()
            .unwrap_or(0)
    }

    /// Returns the level of a node of the caller's graph.
    ///
    /// `None` if the node was not laid out, e.g. because it is hidden.
    pub fn level_of(&self, node: N) -> Option<usize> {
        self.graph
            .origin
            .iter()
            .position(|origin| *origin == Some(node))
            .map(|idx| self.graph.level[idx])
    }

    /// Number of routing dummies inserted into long edges.
    pub fn dummy_count(&self) -> usize {
        self.graph.origin.iter().filter(|o| o.is_none()).count()
    }

    /// Number of edges reversed to break cycles.
    pub fn reversed_edges(&self) -> usize {
        self.reversed_edges
    }

    /// Number of self-loops removed to break cycles.
    pub fn destroyed_edges(&self) -> usize {
        self.destroyed_edges
    }

    /// Returns the levels in order, each in placement order.
    pub fn levels(&self) -> impl Iterator<Item = Vec<LevelNode<N>>> {
        self.levels.iter().map(|level| {
            level
                .iter()
                .map(|&v| match self.graph.origin[v] {
                    Some(node) => LevelNode::Origin(node),
                    None => LevelNode::Dummy,
                })
                .collect()
        })
    }
}
