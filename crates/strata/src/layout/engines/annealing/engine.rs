//! Simulated-annealing placement on a grid.
//!
//! The engine scatters the nodes of a scope over a grid sized from the
//! viewport, then repeatedly swaps the contents of two random cells. Moves
//! that lower the cost are kept. Moves that raise it are kept with a
//! probability that decays geometrically with every proposal. The best grid
//! seen at any point is remembered and is what gets placed.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, info, trace};
use rand::Rng;

use strata_core::{geometry::Point, model::LayoutTarget};

use super::{
    cost::{CostModel, CostWeights, GridEdge},
    grid::Grid,
};
use crate::{
    error::ConfigError,
    layout::support::{place_centered, resolve_in_scope, route_visible_edges},
};

/// The outcome of an annealing run, before it is applied to a view.
#[derive(Debug, Clone)]
pub struct GridPlacement<N> {
    width: usize,
    height: usize,
    cells: IndexMap<N, (usize, usize)>,
    initial_cost: f32,
    best_cost: f32,
    steps: usize,
}

impl<N: Copy + Eq + std::hash::Hash> GridPlacement<N> {
    /// Number of grid columns.
    pub fn grid_width(&self) -> usize {
        self.width
    }

    /// Number of grid rows.
    pub fn grid_height(&self) -> usize {
        self.height
    }

    /// Returns the `(column, row)` assigned to `node`.
    pub fn cell_of(&self, node: N) -> Option<(usize, usize)> {
        self.cells.get(&node).copied()
    }

    /// Returns every node with its cell, in scope enumeration order.
    pub fn cells(&self) -> impl Iterator<Item = (N, (usize, usize))> {
        self.cells.iter().map(|(node, cell)| (*node, *cell))
    }

    /// Number of placed nodes.
    pub fn node_count(&self) -> usize {
        self.cells.len()
    }

    /// Cost of the random starting grid.
    pub fn initial_cost(&self) -> f32 {
        self.initial_cost
    }

    /// Cost of the returned grid. Never greater than
    /// [`initial_cost`](Self::initial_cost).
    pub fn best_cost(&self) -> f32 {
        self.best_cost
    }

    /// Number of proposal steps evaluated.
    pub fn steps_evaluated(&self) -> usize {
        self.steps
    }
}

/// Grid annealing layout engine.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use strata::geometry::{Bounds, Point, Size};
/// use strata::identifier::Id;
/// use strata::layout::engines::annealing::GridAnnealingLayout;
/// use strata::structure::BasicGraph;
///
/// let viewport = Bounds::new_from_top_left(Point::default(), Size::new(300.0, 300.0));
/// let mut graph = BasicGraph::new(viewport);
/// let size = Size::new(20.0, 20.0);
/// for name in ["a", "b", "c", "d"] {
///     graph.add_node(Id::new(name), Bounds::new_from_top_left(Point::default(), size));
/// }
/// graph.add_edge(Id::new("a"), Id::new("b"));
/// graph.add_edge(Id::new("b"), Id::new("c"));
///
/// let mut engine = GridAnnealingLayout::new();
/// engine.set_iteration_count(5)?.set_move_count(20)?;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let placement = engine
///     .calculate_layout(&graph, None, &mut rng)
///     .expect("non-empty graph");
/// assert!(placement.best_cost() <= placement.initial_cost());
///
/// engine.apply_layout(&placement, &mut graph, None);
/// # Ok::<(), strata::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GridAnnealingLayout {
    sparseness: f32,
    cooling_factor: f32,
    iteration_count: usize,
    move_count: usize,
    weights: CostWeights,
}

impl Default for GridAnnealingLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GridAnnealingLayout {
    /// Create a new engine with default parameters.
    pub fn new() -> Self {
        Self {
            sparseness: 1.0,
            cooling_factor: 0.95,
            iteration_count: 10,
            move_count: 100,
            weights: CostWeights::default(),
        }
    }

    /// Set the grid sparseness; values above 1 leave more empty cells.
    ///
    /// # Errors
    ///
    /// Rejects values below 1.0 or non-finite values.
    pub fn set_sparseness(&mut self, sparseness: f32) -> Result<&mut Self, ConfigError> {
        if !sparseness.is_finite() || sparseness < 1.0 {
            return Err(ConfigError::Sparseness(sparseness));
        }
        self.sparseness = sparseness;
        Ok(self)
    }

    /// Set the factor applied to the acceptance probability after every step.
    ///
    /// # Errors
    ///
    /// Rejects values outside `(0, 1]`.
    pub fn set_cooling_factor(&mut self, factor: f32) -> Result<&mut Self, ConfigError> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ConfigError::CoolingFactor(factor));
        }
        self.cooling_factor = factor;
        Ok(self)
    }

    /// Set the number of outer iterations.
    pub fn set_iteration_count(&mut self, count: usize) -> Result<&mut Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::IterationCount);
        }
        self.iteration_count = count;
        Ok(self)
    }

    /// Set the number of proposal steps per iteration.
    pub fn set_move_count(&mut self, count: usize) -> Result<&mut Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::MoveCount);
        }
        self.move_count = count;
        Ok(self)
    }

    /// Set the cost weights.
    pub fn set_cost_weights(&mut self, weights: CostWeights) -> Result<&mut Self, ConfigError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    /// Returns the grid sparseness factor.
    pub fn sparseness(&self) -> f32 {
        self.sparseness
    }

    /// Returns the per-iteration temperature multiplier.
    pub fn cooling_factor(&self) -> f32 {
        self.cooling_factor
    }

    /// Returns the number of cooling iterations.
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Returns the number of proposals per iteration.
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Returns the cost term weights.
    pub fn cost_weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Lay out the nodes of `scope`: [`calculate_layout`](Self::calculate_layout)
    /// followed by [`apply_layout`](Self::apply_layout).
    ///
    /// An empty scope or a degenerate viewport leaves the view untouched.
    pub fn layout<T, R>(&self, target: &mut T, scope: T::Scope, rng: &mut R)
    where
        T: LayoutTarget,
        R: Rng + ?Sized,
    {
        if let Some(placement) = self.calculate_layout(target, scope, rng) {
            self.apply_layout(&placement, target, scope);
        }
    }

    /// Run the annealing search without touching the view.
    ///
    /// Returns `None` when the scope has no nodes or its viewport has no
    /// area.
    pub fn calculate_layout<T, R>(
        &self,
        target: &T,
        scope: T::Scope,
        rng: &mut R,
    ) -> Option<GridPlacement<T::Node>>
    where
        T: LayoutTarget,
        R: Rng + ?Sized,
    {
        let nodes: Vec<T::Node> = target.nodes(scope).collect();
        if nodes.is_empty() {
            debug!(scope:? = scope; "No nodes to place");
            return None;
        }

        let viewport = target.viewport(scope);
        let Some((width, height)) = Grid::dimensions(nodes.len(), viewport, self.sparseness)
        else {
            debug!(scope:? = scope, viewport:? = viewport; "Degenerate viewport, skipping layout");
            return None;
        };

        info!(nodes = nodes.len(), width, height; "Annealing grid layout");

        let model = self.cost_model(target, scope, &nodes);
        let mut grid = Grid::scatter(width, height, nodes.len(), rng);
        let (best, initial_cost, best_cost, steps) = self.anneal(&model, &mut grid, rng);

        info!(initial_cost, best_cost, steps; "Annealing finished");

        let cells = nodes
            .iter()
            .zip(best.positions().iter())
            .map(|(node, cell)| (*node, *cell))
            .collect();
        Some(GridPlacement {
            width,
            height,
            cells,
            initial_cost,
            best_cost,
            steps,
        })
    }

    /// Center every node of `placement` in its cell of the viewport of
    /// `scope`, then reroute the visible edges of the scope.
    pub fn apply_layout<T: LayoutTarget>(
        &self,
        placement: &GridPlacement<T::Node>,
        target: &mut T,
        scope: T::Scope,
    ) {
        let viewport = target.viewport(scope);
        let cell_width = viewport.width() / placement.width as f32;
        let cell_height = viewport.height() / placement.height as f32;

        for (node, (gx, gy)) in placement.cells() {
            let center = Point::new(
                viewport.min_x() + (gx as f32 + 0.5) * cell_width,
                viewport.min_y() + (gy as f32 + 0.5) * cell_height,
            );
            place_centered(target, node, center);
        }
        route_visible_edges(target, scope);
    }

    /// Collects the edges of `scope` between distinct members, resolving
    /// nested endpoints to their ancestor in the scope.
    fn cost_model<T: LayoutTarget>(
        &self,
        target: &T,
        scope: T::Scope,
        nodes: &[T::Node],
    ) -> CostModel {
        let index: HashMap<T::Node, usize> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (*node, idx))
            .collect();

        let edges: Vec<GridEdge> = target
            .edges(scope)
            .filter_map(|edge| {
                let tail = resolve_in_scope(target, scope, target.tail(edge))?;
                let head = resolve_in_scope(target, scope, target.head(edge))?;
                let tail = *index.get(&tail)?;
                let head = *index.get(&head)?;
                (tail != head).then_some(GridEdge { tail, head })
            })
            .collect();

        debug!(nodes = nodes.len(), edges = edges.len(); "Built annealing cost model");
        CostModel::new(self.weights, nodes.len(), edges)
    }

    /// Runs the proposal loop on `grid` and returns the best grid seen with
    /// the initial cost, its cost and the number of steps evaluated.
    fn anneal<R: Rng + ?Sized>(
        &self,
        model: &CostModel,
        grid: &mut Grid,
        rng: &mut R,
    ) -> (Grid, f32, f32, usize) {
        let initial_cost = model.total_cost(grid);
        let mut current = initial_cost;
        let mut best = grid.clone();
        let mut best_cost = initial_cost;
        let mut prob = 1.0_f32;
        let mut steps = 0;
        let cell_count = grid.cell_count();

        for iteration in 0..self.iteration_count {
            for _ in 0..self.move_count {
                steps += 1;
                let a = rng.random_range(0..cell_count);
                let b = rng.random_range(0..cell_count);

                if a != b {
                    let occupants: Vec<usize> = [grid.occupant(a), grid.occupant(b)]
                        .into_iter()
                        .flatten()
                        .collect();
                    let touched = model.touched_edges(&occupants);
                    let before = model.contribution(grid, &occupants, &touched);
                    grid.swap_cells(a, b);
                    let after = model.contribution(grid, &occupants, &touched);
                    let delta = after - before;

                    if delta > 0.0 && rng.random::<f32>() > prob {
                        grid.swap_cells(a, b);
                    } else {
                        current += delta;
                        if current < best_cost {
                            best_cost = current;
                            best = grid.clone();
                        }
                    }
                }
                prob *= self.cooling_factor;
            }
            trace!(iteration, cost = current, best_cost, prob; "Annealing iteration finished");
        }

        (best, initial_cost, best_cost, steps)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use strata_core::{
        geometry::{Bounds, Size},
        identifier::Id,
        model::GraphModel,
    };

    use super::*;
    use crate::{layout::engines::annealing::grid::MAX_GRID_CELLS, structure::BasicGraph};

    fn square_graph(names: &[&str], edges: &[(&str, &str)]) -> BasicGraph {
        let viewport = Bounds::new_from_top_left(Point::default(), Size::new(400.0, 400.0));
        let mut graph = BasicGraph::new(viewport);
        for name in names {
            graph.add_node(
                Id::new(name),
                Bounds::new_from_top_left(Point::default(), Size::new(10.0, 10.0)),
            );
        }
        for (tail, head) in edges {
            graph.add_edge(Id::new(tail), Id::new(head));
        }
        graph
    }

    #[test]
    fn test_setters_reject_out_of_range() {
        let mut engine = GridAnnealingLayout::new();

        assert_eq!(
            engine.set_sparseness(0.5).map(|_| ()),
            Err(ConfigError::Sparseness(0.5))
        );
        assert!(engine.set_cooling_factor(0.0).is_err());
        assert!(engine.set_cooling_factor(1.01).is_err());
        assert!(engine.set_cooling_factor(f32::NAN).is_err());
        assert_eq!(
            engine.set_iteration_count(0).map(|_| ()),
            Err(ConfigError::IterationCount)
        );
        assert_eq!(engine.set_move_count(0).map(|_| ()), Err(ConfigError::MoveCount));

        // Rejected values leave the engine untouched.
        assert_approx_eq!(f32, engine.sparseness(), 1.0);
        assert_approx_eq!(f32, engine.cooling_factor(), 0.95);
        assert_eq!(engine.iteration_count(), 10);
        assert_eq!(engine.move_count(), 100);
    }

    #[test]
    fn test_setters_accept_bounds() {
        let mut engine = GridAnnealingLayout::new();

        assert!(engine.set_sparseness(1.0).is_ok());
        assert!(engine.set_cooling_factor(1.0).is_ok());
        assert!(engine.set_iteration_count(1).is_ok());
        assert!(engine.set_move_count(1).is_ok());
    }

    #[test]
    fn test_empty_scope_is_noop() {
        let graph = square_graph(&[], &[]);
        let engine = GridAnnealingLayout::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(engine.calculate_layout(&graph, None, &mut rng).is_none());
    }

    #[test]
    fn test_zero_area_viewport_is_noop() {
        let mut graph = square_graph(&["zv_a", "zv_b"], &[("zv_a", "zv_b")]);
        graph.set_viewport(Bounds::new_from_top_left(Point::default(), Size::new(100.0, 0.0)));
        let before: Vec<Bounds> = graph.all_nodes().map(|n| graph.bounds(n)).collect();
        let engine = GridAnnealingLayout::new();
        let mut rng = StdRng::seed_from_u64(1);

        engine.layout(&mut graph, None, &mut rng);

        let after: Vec<Bounds> = graph.all_nodes().map(|n| graph.bounds(n)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_huge_sparseness_is_clamped() {
        let mut graph = square_graph(&["hs_a", "hs_b"], &[("hs_a", "hs_b")]);
        let mut engine = GridAnnealingLayout::new();
        let Ok(engine) = engine
            .set_sparseness(1e30)
            .and_then(|e| e.set_iteration_count(1))
            .and_then(|e| e.set_move_count(4))
        else {
            panic!("parameters are valid");
        };
        let mut rng = StdRng::seed_from_u64(3);

        let Some(placement) = engine.calculate_layout(&graph, None, &mut rng) else {
            panic!("graph has nodes");
        };
        assert_eq!(placement.grid_width(), 1);
        assert_eq!(placement.grid_height(), MAX_GRID_CELLS);

        engine.apply_layout(&placement, &mut graph, None);
        let viewport = graph.viewport(None);
        for node in graph.all_nodes() {
            assert!(viewport.contains_point(graph.bounds(node).center()));
        }
    }

    #[test]
    fn test_running_cost_tracks_best_grid() {
        let graph = square_graph(
            &["rc_a", "rc_b", "rc_c", "rc_d", "rc_e", "rc_f"],
            &[
                ("rc_a", "rc_b"),
                ("rc_b", "rc_c"),
                ("rc_c", "rc_d"),
                ("rc_d", "rc_a"),
                ("rc_a", "rc_e"),
                ("rc_e", "rc_f"),
                ("rc_f", "rc_c"),
            ],
        );
        let engine = GridAnnealingLayout::new();
        let nodes: Vec<Id> = graph.nodes(None).collect();
        let model = engine.cost_model(&graph, None, &nodes);
        let mut rng = StdRng::seed_from_u64(42);
        let mut grid = Grid::scatter(3, 2, nodes.len(), &mut rng);

        let (best, initial, best_cost, steps) = engine.anneal(&model, &mut grid, &mut rng);

        assert_eq!(steps, 10 * 100);
        assert!(best_cost <= initial);
        assert_approx_eq!(f32, model.total_cost(&best), best_cost, epsilon = 1e-3);
    }

    #[test]
    fn test_edges_leaving_scope_are_ignored() {
        let mut graph = square_graph(&["ls_group", "ls_inner", "ls_outer"], &[]);
        graph.set_parent(Id::new("ls_inner"), Some(Id::new("ls_group")));
        graph.add_edge(Id::new("ls_inner"), Id::new("ls_outer"));
        graph.add_edge(Id::new("ls_group"), Id::new("ls_group"));

        let engine = GridAnnealingLayout::new();
        let nodes: Vec<Id> = graph.nodes(None).collect();
        let model = engine.cost_model(&graph, None, &nodes);

        // inner -> outer resolves to group -> outer; the self-loop is dropped.
        assert_eq!(model.edge_count(), 1);

        let group_nodes: Vec<Id> = graph.nodes(Some(Id::new("ls_group"))).collect();
        let inner_model = engine.cost_model(&graph, Some(Id::new("ls_group")), &group_nodes);
        assert_eq!(inner_model.edge_count(), 0);
    }

    #[test]
    fn test_apply_centers_nodes_in_cells() {
        let mut graph = square_graph(&["ap_a", "ap_b"], &[("ap_a", "ap_b")]);
        let engine = GridAnnealingLayout::new();
        let mut rng = StdRng::seed_from_u64(3);
        let Some(placement) = engine.calculate_layout(&graph, None, &mut rng) else {
            panic!("two nodes in a square viewport");
        };
        // sqrt(2) rounds up to 2 rows, 1 column.
        assert_eq!((placement.grid_width(), placement.grid_height()), (1, 2));

        engine.apply_layout(&placement, &mut graph, None);

        for (node, (gx, gy)) in placement.cells() {
            let center = graph.bounds(node).center();
            assert_approx_eq!(f32, center.x(), 200.0 * (2 * gx + 1) as f32);
            assert_approx_eq!(f32, center.y(), 100.0 * (2 * gy + 1) as f32);
        }
        assert!(graph.all_edges().all(|edge| graph.route_count(edge) == 1));
    }
}
