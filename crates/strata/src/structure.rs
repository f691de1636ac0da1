//! Concrete graph storage.
//!
//! The layout engines work against the traits in
//! [`model`](crate::model); this module ships one implementation of them,
//! [`BasicGraph`], used by the command-line front end and by tests.

mod basic;
mod graph_base;

pub use basic::{BasicGraph, EdgeId};
