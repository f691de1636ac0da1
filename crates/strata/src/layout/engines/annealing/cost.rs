//! Cost function for grid placements.
//!
//! An edge between two cells pays for its horizontal and vertical extent,
//! for bending (an elbow) when it is neither horizontal nor vertical, for
//! lying on the same row or column as another straight edge, and for
//! crossing other edges.
//!
//! The overlap and crossing terms are pairwise. The full cost of a grid
//! counts every pair from both sides, so the contribution of a moved set of
//! edges weighs pairs with untouched edges twice. See
//! [`CostModel::contribution`].

use serde::Deserialize;

use strata_core::geometry::{Point, segments_intersect};

use super::grid::Grid;
use crate::error::ConfigError;

/// Weights of the terms in the placement cost.
///
/// # Examples
///
/// ```
/// use strata::layout::engines::annealing::CostWeights;
///
/// let weights = CostWeights::default().with_crossing(50.0)?;
/// assert_eq!(weights.crossing(), 50.0);
/// assert!(CostWeights::default().with_elbow(-1.0).is_err());
/// # Ok::<(), strata::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    horizontal: f32,
    vertical: f32,
    elbow: f32,
    overlap: f32,
    crossing: f32,
    tee: f32,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.0,
            elbow: 5.0,
            overlap: 10.0,
            crossing: 20.0,
            tee: 10.0,
        }
    }
}

fn check_weight(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Weight { name, value })
    }
}

impl CostWeights {
    /// Cost per column of horizontal distance.
    pub fn horizontal(&self) -> f32 {
        self.horizontal
    }

    /// Cost per row of vertical distance.
    pub fn vertical(&self) -> f32 {
        self.vertical
    }

    /// Penalty for an edge that is neither horizontal nor vertical.
    pub fn elbow(&self) -> f32 {
        self.elbow
    }

    /// Penalty per other straight edge on the same row or column.
    pub fn overlap(&self) -> f32 {
        self.overlap
    }

    /// Penalty per crossing edge.
    pub fn crossing(&self) -> f32 {
        self.crossing
    }

    /// Penalty per node sitting on an unrelated edge.
    pub fn tee(&self) -> f32 {
        self.tee
    }

    pub fn with_horizontal(mut self, value: f32) -> Result<Self, ConfigError> {
        self.horizontal = check_weight("horizontal", value)?;
        Ok(self)
    }

    pub fn with_vertical(mut self, value: f32) -> Result<Self, ConfigError> {
        self.vertical = check_weight("vertical", value)?;
        Ok(self)
    }

    pub fn with_elbow(mut self, value: f32) -> Result<Self, ConfigError> {
        self.elbow = check_weight("elbow", value)?;
        Ok(self)
    }

    pub fn with_overlap(mut self, value: f32) -> Result<Self, ConfigError> {
        self.overlap = check_weight("overlap", value)?;
        Ok(self)
    }

    pub fn with_crossing(mut self, value: f32) -> Result<Self, ConfigError> {
        self.crossing = check_weight("crossing", value)?;
        Ok(self)
    }

    pub fn with_tee(mut self, value: f32) -> Result<Self, ConfigError> {
        self.tee = check_weight("tee", value)?;
        Ok(self)
    }

    /// Checks every weight, as done for weights loaded from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Weight`] for the first negative or non-finite
    /// weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_weight("horizontal", self.horizontal)?;
        check_weight("vertical", self.vertical)?;
        check_weight("elbow", self.elbow)?;
        check_weight("overlap", self.overlap)?;
        check_weight("crossing", self.crossing)?;
        check_weight("tee", self.tee)?;
        Ok(())
    }
}

/// An edge between two distinct dense node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct GridEdge {
    pub(super) tail: usize,
    pub(super) head: usize,
}

impl GridEdge {
    fn shares_endpoint(self, other: GridEdge) -> bool {
        self.tail == other.tail
            || self.tail == other.head
            || self.head == other.tail
            || self.head == other.head
    }
}

/// Evaluates placement costs for a fixed set of edges.
#[derive(Debug)]
pub(super) struct CostModel {
    weights: CostWeights,
    edges: Vec<GridEdge>,
    incident: Vec<Vec<usize>>,
}

impl CostModel {
    pub(super) fn new(weights: CostWeights, node_count: usize, edges: Vec<GridEdge>) -> Self {
        let mut incident = vec![Vec::new(); node_count];
        for (idx, edge) in edges.iter().enumerate() {
            incident[edge.tail].push(idx);
            incident[edge.head].push(idx);
        }
        Self {
            weights,
            edges,
            incident,
        }
    }

    pub(super) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Cost of the whole grid: every edge with all of its pairwise terms.
    pub(super) fn total_cost(&self, grid: &Grid) -> f32 {
        (0..self.edges.len())
            .map(|edge| self.edge_cost(grid, edge))
            .sum()
    }

    /// Cost of one edge, including its interactions with every other edge.
    pub(super) fn edge_cost(&self, grid: &Grid, edge: usize) -> f32 {
        let pairs: f32 = (0..self.edges.len())
            .filter(|&other| other != edge)
            .map(|other| self.pair_cost(grid, edge, other))
            .sum();
        self.linear_cost(grid, edge) + pairs
    }

    /// Sorted, deduplicated edges incident to any of `nodes`.
    pub(super) fn touched_edges(&self, nodes: &[usize]) -> Vec<usize> {
        let mut touched: Vec<usize> = nodes
            .iter()
            .flat_map(|&node| self.incident[node].iter().copied())
            .collect();
        touched.sort_unstable();
        touched.dedup();
        touched
    }

    /// The part of [`total_cost`](Self::total_cost) that depends on the
    /// positions of `nodes`, whose incident edges are `touched`.
    ///
    /// Pairs inside `touched` appear twice in the outer sum already; pairs
    /// with an untouched edge appear once and are weighed twice. The
    /// difference of two contributions around a move is therefore exactly
    /// the change of the total cost.
    pub(super) fn contribution(&self, grid: &Grid, nodes: &[usize], touched: &[usize]) -> f32 {
        let mut cost = 0.0;
        for &edge in touched {
            cost += self.linear_cost(grid, edge);
            for other in 0..self.edges.len() {
                if other == edge {
                    continue;
                }
                let weight = if touched.binary_search(&other).is_ok() {
                    1.0
                } else {
                    2.0
                };
                cost += weight * self.pair_cost(grid, edge, other);
            }
        }
        let tees: usize = nodes.iter().map(|&node| self.tee_count(grid, node)).sum();
        cost + self.weights.tee * tees as f32
    }

    /// Number of unrelated edges passing through the cell of `node`.
    ///
    /// Always zero: tee detection is not implemented, so the tee weight has
    /// no effect on placements.
    fn tee_count(&self, _grid: &Grid, _node: usize) -> usize {
        0
    }

    fn endpoints(&self, grid: &Grid, edge: usize) -> ((usize, usize), (usize, usize)) {
        let GridEdge { tail, head } = self.edges[edge];
        (grid.position(tail), grid.position(head))
    }

    /// Distance and elbow terms of a single edge.
    fn linear_cost(&self, grid: &Grid, edge: usize) -> f32 {
        let ((x1, y1), (x2, y2)) = self.endpoints(grid, edge);
        let dx = x1.abs_diff(x2);
        let dy = y1.abs_diff(y2);

        let mut cost = self.weights.horizontal * dx as f32 + self.weights.vertical * dy as f32;
        if dx != 0 && dy != 0 {
            cost += self.weights.elbow;
        }
        cost
    }

    /// Overlap and crossing terms between two distinct edges.
    ///
    /// Symmetric in its arguments.
    fn pair_cost(&self, grid: &Grid, edge: usize, other: usize) -> f32 {
        let ((ax1, ay1), (ax2, ay2)) = self.endpoints(grid, edge);
        let ((bx1, by1), (bx2, by2)) = self.endpoints(grid, other);

        let mut cost = 0.0;

        let a_vertical = ax1 == ax2;
        let a_horizontal = ay1 == ay2;
        let b_vertical = bx1 == bx2;
        let b_horizontal = by1 == by2;
        if (a_vertical && b_vertical && ax1 == bx1) || (a_horizontal && b_horizontal && ay1 == by1)
        {
            cost += self.weights.overlap;
        }

        if !self.edges[edge].shares_endpoint(self.edges[other])
            && segments_intersect(
                cell_point(ax1, ay1),
                cell_point(ax2, ay2),
                cell_point(bx1, by1),
                cell_point(bx2, by2),
            )
        {
            cost += self.weights.crossing;
        }

        cost
    }
}

fn cell_point(x: usize, y: usize) -> Point {
    Point::new(x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    /// Places node `i` at `cells[i]` on a grid large enough to hold them.
    fn grid_with(width: usize, height: usize, cells: &[(usize, usize)]) -> Grid {
        Grid::from_positions(width, height, cells.to_vec())
    }

    fn edge(tail: usize, head: usize) -> GridEdge {
        GridEdge { tail, head }
    }

    #[test]
    fn test_linear_terms() {
        let grid = grid_with(3, 3, &[(0, 0), (2, 0), (2, 1)]);
        let model = CostModel::new(CostWeights::default(), 3, vec![edge(0, 1), edge(0, 2)]);

        // Straight: 2 columns, no elbow.
        assert_approx_eq!(f32, model.linear_cost(&grid, 0), 2.0);
        // Diagonal: 2 columns, 1 row, elbow.
        assert_approx_eq!(f32, model.linear_cost(&grid, 1), 8.0);
    }

    #[test]
    fn test_overlap_on_same_row() {
        // 0-1 and 2-3 are both horizontal on row 0.
        let grid = grid_with(4, 2, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
        let model = CostModel::new(CostWeights::default(), 4, vec![edge(0, 1), edge(2, 3)]);

        assert_approx_eq!(f32, model.pair_cost(&grid, 0, 1), 10.0);
        assert_approx_eq!(f32, model.pair_cost(&grid, 1, 0), 10.0);
        assert_approx_eq!(f32, model.total_cost(&grid), 1.0 + 1.0 + 2.0 * 10.0);
    }

    #[test]
    fn test_crossing_ignores_shared_endpoints() {
        // An X between 0-3 and 1-2, plus 0-1 sharing node 0 with 0-3.
        let grid = grid_with(2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        let model = CostModel::new(
            CostWeights::default(),
            4,
            vec![edge(0, 3), edge(1, 2), edge(0, 1)],
        );

        assert_approx_eq!(f32, model.pair_cost(&grid, 0, 1), 20.0);
        assert_approx_eq!(f32, model.pair_cost(&grid, 0, 2), 0.0);
    }

    #[test]
    fn test_contribution_delta_matches_total() {
        let mut grid = grid_with(3, 3, &[(0, 0), (1, 0), (0, 1), (1, 1), (2, 2)]);
        let model = CostModel::new(
            CostWeights::default(),
            5,
            vec![edge(0, 3), edge(1, 2), edge(0, 1), edge(2, 4), edge(3, 4)],
        );

        let before_total = model.total_cost(&grid);
        let moved = [0, 4];
        let touched = model.touched_edges(&moved);
        let before = model.contribution(&grid, &moved, &touched);

        grid.swap_cells(grid.cell_index(0, 0), grid.cell_index(2, 2));

        let after = model.contribution(&grid, &moved, &touched);
        let after_total = model.total_cost(&grid);
        assert_approx_eq!(f32, after_total - before_total, after - before, epsilon = 1e-3);
    }

    #[test]
    fn test_touched_edges_dedup() {
        let model = CostModel::new(
            CostWeights::default(),
            3,
            vec![edge(0, 1), edge(1, 2), edge(2, 0)],
        );

        assert_eq!(model.touched_edges(&[0, 1]), vec![0, 1, 2]);
        assert_eq!(model.touched_edges(&[]), Vec::<usize>::new());
        assert_eq!(model.edge_count(), 3);
    }

    #[test]
    fn test_weights_validation() {
        assert!(CostWeights::default().validate().is_ok());
        assert_eq!(
            CostWeights::default().with_overlap(f32::NAN).map(|_| ()).map_err(|e| e.to_string()),
            Err("cost weight `overlap` must be finite and non-negative, got NaN".to_string())
        );
        let Ok(weights) = CostWeights::default().with_horizontal(0.0) else {
            panic!("zero is a valid weight");
        };
        assert_approx_eq!(f32, weights.horizontal(), 0.0);
    }
}
