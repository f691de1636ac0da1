//! Strata Core Types and Interfaces
//!
//! This crate provides the foundational types shared by the Strata layout
//! engines. It includes:
//!
//! - **Geometry**: Points, sizes, bounding boxes and segment tests ([`geometry`] module)
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Model**: The graph query and view interfaces a layout consumes ([`model`] module)

pub mod geometry;
pub mod identifier;
pub mod model;
