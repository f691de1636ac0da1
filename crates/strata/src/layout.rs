//! Layout engines and the helpers they share.

pub mod engines;
pub mod support;
