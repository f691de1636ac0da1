//! Layered layout engine.

use std::{collections::HashMap, fmt, str::FromStr};

use log::{debug, info};
use rand::Rng;
use serde::Deserialize;

use strata_core::{
    geometry::{Bounds, Point},
    model::LayoutTarget,
};

use super::{
    data::{LevelData, WorkingGraph},
    passes,
};
use crate::{
    error::{ConfigError, StrataError},
    layout::support::{check_consistency, route_visible_edges},
};

/// Direction in which levels are stacked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Levels are rows, top to bottom.
    #[default]
    Vertical,
    /// Levels are columns, left to right.
    Horizontal,
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(Self::Vertical),
            "horizontal" => Ok(Self::Horizontal),
            _ => Err(ConfigError::Orientation(s.to_string())),
        }
    }
}

impl From<Orientation> for &'static str {
    fn from(val: Orientation) -> Self {
        match val {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Layered layout engine.
///
/// Nodes are assigned to levels so that every edge points from a lower level
/// to a higher one, cycles being broken first. Levels are spread evenly over
/// the viewport along the orientation axis, and the nodes of a level evenly
/// across it.
///
/// # Examples
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use strata::geometry::{Bounds, Point, Size};
/// use strata::identifier::Id;
/// use strata::layout::engines::level::LevelLayout;
/// use strata::structure::BasicGraph;
///
/// let viewport = Bounds::new_from_top_left(Point::default(), Size::new(300.0, 300.0));
/// let mut graph = BasicGraph::new(viewport);
/// let [a, b, c] = [Id::new("a"), Id::new("b"), Id::new("c")];
/// for id in [a, b, c] {
///     graph.add_node(id, Bounds::new_from_top_left(Point::default(), Size::new(20.0, 20.0)));
/// }
/// graph.add_edge(a, b);
/// graph.add_edge(b, c);
/// graph.add_edge(a, c);
///
/// let engine = LevelLayout::new();
/// let data = engine.calculate_layout(&graph, None)?.expect("non-empty graph");
/// assert_eq!(data.level_count(), 3);
/// assert_eq!(data.level_of(c), Some(2));
/// assert_eq!(data.dummy_count(), 1);
///
/// let mut rng = StdRng::seed_from_u64(1);
/// engine.apply_layout(&data, &mut graph, None, &mut rng);
/// # Ok::<(), strata::StrataError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LevelLayout {
    orientation: Orientation,
    randomized_placement: bool,
    use_dummies: bool,
    check_invariants: bool,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelLayout {
    /// Create a new vertical engine with randomized placement.
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Vertical,
            randomized_placement: true,
            use_dummies: true,
            check_invariants: cfg!(debug_assertions),
        }
    }

    /// Set the direction in which levels are stacked.
    pub fn set_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    /// Set whether nodes are nudged by up to a quarter of their size.
    pub fn set_randomized_placement(&mut self, randomized: bool) -> &mut Self {
        self.randomized_placement = randomized;
        self
    }

    /// Set whether routing dummies take a slot in their level.
    ///
    /// Without dummies levels are more compact, but edges may run over
    /// nodes.
    pub fn set_use_dummies(&mut self, use_dummies: bool) -> &mut Self {
        self.use_dummies = use_dummies;
        self
    }

    /// Set whether the post-conditions of every phase are verified.
    pub fn set_check_invariants(&mut self, check: bool) -> &mut Self {
        self.check_invariants = check;
        self
    }

    /// Returns the axis levels are stacked along.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns whether placed nodes are jittered.
    pub fn randomized_placement(&self) -> bool {
        self.randomized_placement
    }

    /// Returns whether dummy nodes take a slot in their level.
    pub fn use_dummies(&self) -> bool {
        self.use_dummies
    }

    /// Returns whether phase post-conditions are verified.
    pub fn check_invariants(&self) -> bool {
        self.check_invariants
    }

    /// Lay out the visible nodes of `scope` in levels.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Consistency`] if a phase post-condition fails
    /// while invariant checks are enabled. The view is untouched then.
    pub fn layout<T, R>(&self, target: &mut T, scope: T::Scope, rng: &mut R) -> Result<(), StrataError>
    where
        T: LayoutTarget,
        R: Rng + ?Sized,
    {
        if let Some(data) = self.calculate_layout(target, scope)? {
            self.apply_layout(&data, target, scope, rng);
        }
        Ok(())
    }

    /// Compute levels for the visible nodes of `scope` without touching the
    /// view.
    ///
    /// Returns `None` when the scope has no visible nodes.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Consistency`] if a phase post-condition fails
    /// while invariant checks are enabled.
    pub fn calculate_layout<T: LayoutTarget>(
        &self,
        target: &T,
        scope: T::Scope,
    ) -> Result<Option<LevelData<T::Node>>, StrataError> {
        if self.check_invariants {
            check_consistency(target, scope)?;
        }

        let mut graph = copy_scope(target, scope);
        if graph.node_count() == 0 {
            debug!(scope:? = scope; "No visible nodes to level");
            return Ok(None);
        }
        info!(nodes = graph.node_count(); "Calculating level layout");

        let breaks = passes::break_cycles(&mut graph)?;

        passes::compute_levels(&mut graph);
        if self.check_invariants {
            passes::check_levels_increase(&graph)?;
        }

        passes::add_dummies(&mut graph);
        if self.check_invariants {
            passes::check_unit_spans(&graph)?;
        }

        let levels = passes::make_levels(&mut graph);
        if self.check_invariants {
            passes::check_buckets(&graph, &levels)?;
        }

        let data = LevelData {
            graph,
            levels,
            reversed_edges: breaks.reversed,
            destroyed_edges: breaks.destroyed,
        };
        info!(
            levels = data.level_count(),
            dummies = data.dummy_count(),
            widest = data.max_level_width(true);
            "Level layout calculated"
        );
        Ok(Some(data))
    }

    /// Place the nodes of `data` in the viewport of `scope` and reroute its
    /// visible edges, using the engine's dummy setting.
    pub fn apply_layout<T, R>(
        &self,
        data: &LevelData<T::Node>,
        target: &mut T,
        scope: T::Scope,
        rng: &mut R,
    ) where
        T: LayoutTarget,
        R: Rng + ?Sized,
    {
        self.apply_layout_with(data, target, scope, self.use_dummies, rng);
    }

    /// Like [`apply_layout`](Self::apply_layout) with an explicit dummy
    /// setting.
    pub fn apply_layout_with<T, R>(
        &self,
        data: &LevelData<T::Node>,
        target: &mut T,
        scope: T::Scope,
        use_dummies: bool,
        rng: &mut R,
    ) where
        T: LayoutTarget,
        R: Rng + ?Sized,
    {
        let viewport = target.viewport(scope);
        let placements = self.place_nodes(data, viewport, use_dummies, rng);

        for (idx, top_left) in placements {
            let Some(node) = data.graph.origin[idx] else {
                continue;
            };
            let offset = top_left.sub_point(target.bounds(node).min_point());
            target.translate(node, offset);
        }
        route_visible_edges(target, scope);
    }

    /// Computes the top-left corner of every non-dummy working node.
    fn place_nodes<N: Copy + PartialEq, R: Rng + ?Sized>(
        &self,
        data: &LevelData<N>,
        viewport: Bounds,
        use_dummies: bool,
        rng: &mut R,
    ) -> Vec<(usize, Point)> {
        let graph = &data.graph;
        let non_empty = data
            .levels
            .iter()
            .filter(|level| !level.is_empty())
            .count()
            .max(1);

        let (primary_min, primary_extent, cross_min, cross_extent) = match self.orientation {
            Orientation::Vertical => (
                viewport.min_y(),
                viewport.height(),
                viewport.min_x(),
                viewport.width(),
            ),
            Orientation::Horizontal => (
                viewport.min_x(),
                viewport.width(),
                viewport.min_y(),
                viewport.height(),
            ),
        };

        let step = primary_extent / non_empty as f32;
        let mut primary = primary_min + step / 2.0;
        let mut placements = Vec::with_capacity(graph.node_count());

        for level in &data.levels {
            if level.is_empty() {
                continue;
            }
            let slots = if use_dummies {
                level.len()
            } else {
                level.iter().filter(|&&v| !graph.is_dummy(v)).count()
            };

            if slots > 0 {
                let cross_step = cross_extent / slots as f32;
                let mut cross = cross_min + cross_step / 2.0;
                for &node in level {
                    if graph.is_dummy(node) {
                        if use_dummies {
                            cross += cross_step;
                        }
                        continue;
                    }
                    let center = match self.orientation {
                        Orientation::Vertical => Point::new(cross, primary),
                        Orientation::Horizontal => Point::new(primary, cross),
                    };
                    placements.push((node, self.place_node(graph, node, center, rng)));
                    cross += cross_step;
                }
            }
            primary += step;
        }

        placements
    }

    /// Returns the top-left corner for `node` centered near `center`.
    fn place_node<N: Copy, R: Rng + ?Sized>(
        &self,
        graph: &WorkingGraph<N>,
        node: usize,
        center: Point,
        rng: &mut R,
    ) -> Point {
        let width = graph.width[node];
        let height = graph.height[node];
        let mut center = center;
        if self.randomized_placement {
            let jitter = Point::new(
                rng.random::<f32>() * 0.25 * width,
                rng.random::<f32>() * 0.25 * height,
            );
            center = center.add_point(jitter);
        }
        Point::new(center.x() - width / 2.0, center.y() - height / 2.0)
    }
}

/// Copies the visible nodes of `scope` and the edges between them.
fn copy_scope<T: LayoutTarget>(target: &T, scope: T::Scope) -> WorkingGraph<T::Node> {
    let mut graph = WorkingGraph::new();
    let mut index = HashMap::new();

    let nodes: Vec<T::Node> = target
        .nodes(scope)
        .filter(|&node| target.is_node_visible(node))
        .collect();
    for &node in &nodes {
        let idx = graph.add_origin(node, target.bounds(node));
        index.insert(node, idx);
    }

    for &tail in &nodes {
        for edge in target.out_edges(tail) {
            if let (Some(&t), Some(&h)) = (index.get(&tail), index.get(&target.head(edge))) {
                graph.add_edge(t, h);
            }
        }
    }
    graph
}
