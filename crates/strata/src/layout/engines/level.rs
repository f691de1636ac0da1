//! Layered layout.
//!
//! Levels a scope in four passes over a private copy: break cycles, assign
//! levels as late as possible, split long edges with dummy nodes and bucket
//! the nodes per level. Placement spreads the buckets over the viewport.
//!
//! Levels depend only on the graph topology and enumeration order. Placement
//! adds a small random offset per node unless disabled.

mod data;
mod engine;
mod passes;

pub use data::{LevelData, LevelNode};
pub use engine::{LevelLayout, Orientation};
