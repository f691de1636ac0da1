//! Configuration types for the layout engines.
//!
//! All types implement [`serde::Deserialize`] and fill missing fields with
//! the engine defaults. Values are not validated here; use
//! [`EngineBuilder::from_config`](crate::layout::engines::EngineBuilder::from_config)
//! to turn a configuration into engines.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`LayoutConfig`] - Selected [`LayoutEngine`] and per-engine settings.
//! - [`AnnealingConfig`] - Grid annealing parameters and cost weights.
//! - [`LevelConfig`] - Layered layout options.
//!
//! # Example
//!
//! ```
//! # use strata::config::AppConfig;
//! # use strata::layout::engines::LayoutEngine;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().engine(), LayoutEngine::Level);
//! assert_eq!(config.layout().annealing().move_count(), 100);
//! ```

use serde::Deserialize;

use crate::layout::engines::{LayoutEngine, annealing::CostWeights, level::Orientation};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given layout section.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Engine selection and per-engine settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutConfig {
    /// Engine used when none is requested explicitly.
    #[serde(default)]
    engine: LayoutEngine,

    #[serde(default)]
    annealing: AnnealingConfig,

    #[serde(default)]
    level: LevelConfig,
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    ///
    /// # Arguments
    ///
    /// * `engine` - Default engine.
    /// * `annealing` - Grid annealing settings.
    /// * `level` - Layered layout settings.
    pub fn new(engine: LayoutEngine, annealing: AnnealingConfig, level: LevelConfig) -> Self {
        Self {
            engine,
            annealing,
            level,
        }
    }

    /// Returns the default [`LayoutEngine`].
    pub fn engine(&self) -> LayoutEngine {
        self.engine
    }

    /// Returns the grid annealing settings.
    pub fn annealing(&self) -> &AnnealingConfig {
        &self.annealing
    }

    /// Returns the layered layout settings.
    pub fn level(&self) -> &LevelConfig {
        &self.level
    }
}

/// Grid annealing parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    sparseness: f32,
    cooling_factor: f32,
    iteration_count: usize,
    move_count: usize,
    weights: CostWeights,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            sparseness: 1.0,
            cooling_factor: 0.95,
            iteration_count: 10,
            move_count: 100,
            weights: CostWeights::default(),
        }
    }
}

impl AnnealingConfig {
    /// Grid cells per node, at least 1.
    pub fn sparseness(&self) -> f32 {
        self.sparseness
    }

    /// Factor applied to the acceptance probability after every step.
    pub fn cooling_factor(&self) -> f32 {
        self.cooling_factor
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    pub fn move_count(&self) -> usize {
        self.move_count
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }
}

/// Layered layout options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    orientation: Orientation,
    randomized_placement: bool,
    use_dummies: bool,
    /// `None` keeps the build default: on in debug builds.
    check_invariants: Option<bool>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            randomized_placement: true,
            use_dummies: true,
            check_invariants: None,
        }
    }
}

impl LevelConfig {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn randomized_placement(&self) -> bool {
        self.randomized_placement
    }

    pub fn use_dummies(&self) -> bool {
        self.use_dummies
    }

    pub fn check_invariants(&self) -> Option<bool> {
        self.check_invariants
    }
}
