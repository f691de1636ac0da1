//! Grid annealing layout.
//!
//! This engine places nodes on the cells of a discrete grid and searches for
//! a low-cost arrangement with simulated annealing. It suits small graphs
//! without an obvious direction, where a layered layout would be lopsided.
//!
//! The search is randomized; pass a seeded generator for reproducible
//! results.

mod cost;
mod engine;
mod grid;

pub use cost::CostWeights;
pub use engine::{GridAnnealingLayout, GridPlacement};
