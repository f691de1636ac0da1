//! Strata - automatic layout for directed graphs.
//!
//! Two engines position the nodes of one scope of a graph inside that
//! scope's viewport and reroute the edges between them:
//!
//! - [`GridAnnealingLayout`](layout::engines::annealing::GridAnnealingLayout)
//!   assigns nodes to the cells of a grid and improves the arrangement with
//!   simulated annealing.
//! - [`LevelLayout`](layout::engines::level::LevelLayout) breaks cycles,
//!   assigns nodes to levels and spreads each level across the viewport.
//!
//! Engines read and write the graph only through the
//! [`GraphModel`](model::GraphModel) and [`LayoutTarget`](model::LayoutTarget)
//! traits. [`BasicGraph`](structure::BasicGraph) is a ready-made in-memory
//! implementation of both.
//!
//! # Examples
//!
//! ```
//! use rand::{SeedableRng, rngs::StdRng};
//! use strata::geometry::{Bounds, Point, Size};
//! use strata::identifier::Id;
//! use strata::layout::engines::{EngineBuilder, LayoutEngine};
//! use strata::model::LayoutTarget;
//! use strata::structure::BasicGraph;
//!
//! let mut graph = BasicGraph::new(Bounds::new_from_top_left(Point::default(), Size::new(400.0, 300.0)));
//! let (a, b) = (Id::new("client"), Id::new("server"));
//! graph.add_node(a, Bounds::new_from_top_left(Point::default(), Size::new(40.0, 30.0)));
//! graph.add_node(b, Bounds::new_from_top_left(Point::default(), Size::new(40.0, 30.0)));
//! graph.add_edge(a, b);
//!
//! let engine = EngineBuilder::new().build::<BasicGraph>(LayoutEngine::Level);
//! engine.layout(&mut graph, None, &mut StdRng::seed_from_u64(7))?;
//! assert!(graph.bounds(a).center().y() < graph.bounds(b).center().y());
//! # Ok::<(), strata::StrataError>(())
//! ```

pub mod config;
pub mod layout;
pub mod structure;

mod error;

pub use strata_core::{geometry, identifier, model};

pub use error::{ConfigError, StrataError};
