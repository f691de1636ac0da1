//! Discrete placement grid.

use log::{trace, warn};
use rand::{Rng, seq::SliceRandom};

use strata_core::geometry::Bounds;

/// Upper bound on the cells of a placement grid.
pub(super) const MAX_GRID_CELLS: usize = 1 << 20;

/// A `width × height` array of cells holding dense node indices.
///
/// Each cell holds at most one node and each node occupies exactly one cell.
/// Both directions of the mapping are kept in sync by every mutation.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Grid {
    width: usize,
    cells: Vec<Option<usize>>,
    positions: Vec<(usize, usize)>,
}

impl Grid {
    /// Computes grid dimensions for `node_count` nodes in `viewport`.
    ///
    /// The height follows the viewport's aspect ratio scaled by
    /// `sparseness`, clamped to [`MAX_GRID_CELLS`]; the width is the smallest
    /// that fits every node. Returns `None` for an empty node set, a
    /// degenerate viewport or more nodes than the grid can hold.
    pub(super) fn dimensions(
        node_count: usize,
        viewport: Bounds,
        sparseness: f32,
    ) -> Option<(usize, usize)> {
        if node_count == 0 {
            return None;
        }
        if node_count > MAX_GRID_CELLS {
            warn!(
                nodes = node_count, max_cells = MAX_GRID_CELLS;
                "Too many nodes for a placement grid"
            );
            return None;
        }
        let aspect = viewport.height() / viewport.width();
        if !aspect.is_finite() || aspect <= 0.0 {
            return None;
        }

        let rows = ((node_count as f32 * aspect).sqrt() * sparseness).ceil();
        if rows.is_nan() || rows < 1.0 {
            return None;
        }
        let height = if rows >= MAX_GRID_CELLS as f32 {
            MAX_GRID_CELLS
        } else {
            rows as usize
        };
        let width = node_count.div_ceil(height);
        Some((width, height))
    }

    /// Scatters nodes `0..node_count` over distinct random cells.
    pub(super) fn scatter<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        node_count: usize,
        rng: &mut R,
    ) -> Self {
        let mut cells: Vec<usize> = (0..width * height).collect();
        cells.shuffle(rng);

        let positions = cells
            .into_iter()
            .take(node_count)
            .map(|cell| (cell % width, cell / width))
            .collect();
        let grid = Self::from_positions(width, height, positions);
        trace!(width, height, nodes = node_count; "Scattered nodes over grid");
        grid
    }

    /// Builds a grid with node `i` at `positions[i]`.
    ///
    /// Positions must be distinct and inside the grid.
    pub(super) fn from_positions(
        width: usize,
        height: usize,
        positions: Vec<(usize, usize)>,
    ) -> Self {
        let mut grid = Self {
            width,
            cells: vec![None; width * height],
            positions,
        };
        for node in 0..grid.positions.len() {
            let (x, y) = grid.positions[node];
            let cell = grid.cell_index(x, y);
            grid.cells[cell] = Some(node);
        }
        grid
    }

    pub(super) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub(super) fn cell_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Returns the node in `cell`, if any.
    pub(super) fn occupant(&self, cell: usize) -> Option<usize> {
        self.cells[cell]
    }

    /// Returns the `(column, row)` of `node`.
    pub(super) fn position(&self, node: usize) -> (usize, usize) {
        self.positions[node]
    }

    /// Returns the position of every node, indexed by node.
    pub(super) fn positions(&self) -> &[(usize, usize)] {
        &self.positions
    }

    /// Exchanges the contents of two cells; either may be empty.
    ///
    /// Swapping twice restores the original grid.
    pub(super) fn swap_cells(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
        for cell in [a, b] {
            if let Some(node) = self.cells[cell] {
                self.positions[node] = (cell % self.width, cell / self.width);
            }
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn check_scatter_is_injective(
        width: usize,
        height: usize,
        fill: usize,
        seed: u64,
    ) -> Result<(), TestCaseError> {
        let node_count = fill.min(width * height);
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::scatter(width, height, node_count, &mut rng);

        let distinct: HashSet<(usize, usize)> = grid.positions().iter().copied().collect();
        prop_assert_eq!(distinct.len(), node_count);
        for (node, &(x, y)) in grid.positions().iter().enumerate() {
            prop_assert!(x < width && y < height);
            prop_assert_eq!(grid.occupant(grid.cell_index(x, y)), Some(node));
        }
        let occupied = (0..grid.cell_count())
            .filter(|&cell| grid.occupant(cell).is_some())
            .count();
        prop_assert_eq!(occupied, node_count);
        Ok(())
    }

    proptest! {
        #[test]
        fn scatter_is_injective(
            width in 1usize..8,
            height in 1usize..8,
            fill in 0usize..64,
            seed in any::<u64>(),
        ) {
            check_scatter_is_injective(width, height, fill, seed)?;
        }
    }
}
