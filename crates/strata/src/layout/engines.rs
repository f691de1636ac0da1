//! Layout engine selection.
//!
//! Both engines expose inherent, generic `layout` methods. This module adds
//! [`LayoutEngine`] to name an engine, the object-safe [`GraphEngine`] trait
//! and an [`EngineBuilder`] that produces a configured engine by kind.

pub mod annealing;
pub mod level;

use std::{fmt, str::FromStr};

use log::debug;
use rand::RngCore;
use serde::Deserialize;

use strata_core::model::LayoutTarget;

use crate::{
    config::LayoutConfig,
    error::{ConfigError, StrataError},
};
use annealing::GridAnnealingLayout;
use level::LevelLayout;

/// Available layout engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Layered layout (default)
    #[default]
    Level,
    /// Grid annealing layout
    Annealing,
}

impl FromStr for LayoutEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "level" => Ok(Self::Level),
            "annealing" => Ok(Self::Annealing),
            _ => Err(ConfigError::Engine(s.to_string())),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Level => "level",
            LayoutEngine::Annealing => "annealing",
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Object-safe interface over the layout engines.
pub trait GraphEngine<T: LayoutTarget> {
    /// Lay out the nodes of `scope` and reroute its visible edges.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Consistency`] if the engine detects an internal
    /// inconsistency. The view is untouched then.
    fn layout(
        &self,
        target: &mut T,
        scope: T::Scope,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrataError>;
}

impl<T: LayoutTarget> GraphEngine<T> for GridAnnealingLayout {
    fn layout(
        &self,
        target: &mut T,
        scope: T::Scope,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrataError> {
        GridAnnealingLayout::layout(self, target, scope, rng);
        Ok(())
    }
}

impl<T: LayoutTarget> GraphEngine<T> for LevelLayout {
    fn layout(
        &self,
        target: &mut T,
        scope: T::Scope,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrataError> {
        LevelLayout::layout(self, target, scope, rng)
    }
}

/// Builder for configured layout engines.
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    annealing: GridAnnealingLayout,
    level: LevelLayout,
}

impl EngineBuilder {
    /// Create a builder with default engine settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from configuration, validating every value.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Config`] for the first out-of-range value.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, StrataError> {
        let annealing_config = config.annealing();
        let mut annealing = GridAnnealingLayout::new();
        annealing
            .set_sparseness(annealing_config.sparseness())?
            .set_cooling_factor(annealing_config.cooling_factor())?
            .set_iteration_count(annealing_config.iteration_count())?
            .set_move_count(annealing_config.move_count())?
            .set_cost_weights(annealing_config.weights())?;

        let level_config = config.level();
        let mut level = LevelLayout::new();
        level
            .set_orientation(level_config.orientation())
            .set_randomized_placement(level_config.randomized_placement())
            .set_use_dummies(level_config.use_dummies());
        if let Some(check) = level_config.check_invariants() {
            level.set_check_invariants(check);
        }

        debug!(engine:? = config.engine(); "Engine configuration validated");
        Ok(Self { annealing, level })
    }

    /// Replace the annealing engine settings
    pub fn with_annealing(mut self, annealing: GridAnnealingLayout) -> Self {
        self.annealing = annealing;
        self
    }

    /// Replace the layered engine settings
    pub fn with_level(mut self, level: LevelLayout) -> Self {
        self.level = level;
        self
    }

    pub fn annealing(&self) -> &GridAnnealingLayout {
        &self.annealing
    }

    pub fn level(&self) -> &LevelLayout {
        &self.level
    }

    /// Returns an engine of the given kind with the configured settings.
    pub fn build<T: LayoutTarget>(&self, kind: LayoutEngine) -> Box<dyn GraphEngine<T>> {
        match kind {
            LayoutEngine::Level => Box::new(self.level.clone()),
            LayoutEngine::Annealing => Box::new(self.annealing.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use strata_core::{
        geometry::{Bounds, Point, Size},
        identifier::Id,
    };

    use super::*;
    use crate::structure::BasicGraph;

    #[test]
    fn test_layout_engine_parsing() {
        assert_eq!("level".parse::<LayoutEngine>(), Ok(LayoutEngine::Level));
        assert_eq!("annealing".parse::<LayoutEngine>(), Ok(LayoutEngine::Annealing));
        assert_eq!(
            "force".parse::<LayoutEngine>(),
            Err(ConfigError::Engine("force".to_string()))
        );
        assert_eq!(LayoutEngine::default(), LayoutEngine::Level);
        assert_eq!(LayoutEngine::Annealing.to_string(), "annealing");
    }

    #[test]
    fn test_from_default_config() {
        let Ok(builder) = EngineBuilder::from_config(&LayoutConfig::default()) else {
            panic!("default configuration is valid");
        };

        assert_eq!(builder.annealing().iteration_count(), 10);
        assert_eq!(builder.annealing().move_count(), 100);
        assert!(builder.level().use_dummies());
        assert!(builder.level().randomized_placement());
    }

    #[test]
    fn test_from_config_rejects_bad_cooling() {
        let config: LayoutConfig = match toml::from_str("[annealing]\ncooling_factor = 1.5\n") {
            Ok(config) => config,
            Err(err) => panic!("config parses: {err}"),
        };

        let result = EngineBuilder::from_config(&config);

        assert!(matches!(
            result,
            Err(StrataError::Config(ConfigError::CoolingFactor(_)))
        ));
    }

    #[test]
    fn test_built_engines_lay_out() {
        let mut graph = BasicGraph::new(Bounds::new_from_top_left(
            Point::default(),
            Size::new(200.0, 200.0),
        ));
        let a = Id::new("engines_a");
        let b = Id::new("engines_b");
        for id in [a, b] {
            graph.add_node(id, Bounds::new_from_top_left(Point::default(), Size::new(10.0, 10.0)));
        }
        let Some(edge) = graph.add_edge(a, b) else {
            panic!("both endpoints exist");
        };

        let builder = EngineBuilder::new();
        let mut rng = StdRng::seed_from_u64(3);
        for kind in [LayoutEngine::Level, LayoutEngine::Annealing] {
            let engine = builder.build::<BasicGraph>(kind);
            assert!(engine.layout(&mut graph, None, &mut rng).is_ok());
        }

        assert_eq!(graph.route_count(edge), 2);
        assert_ne!(graph.bounds(a).center(), graph.bounds(b).center());
    }
}
