//! Property tests for both engines on random graphs.

use std::collections::HashSet;

use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use strata::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    layout::engines::{annealing::GridAnnealingLayout, level::LevelLayout},
    model::LayoutTarget,
    structure::BasicGraph,
};

fn build_graph(tag: &str, node_count: usize, edges: &[(usize, usize)]) -> (BasicGraph, Vec<Id>) {
    let mut graph = BasicGraph::new(Bounds::new_from_top_left(
        Point::default(),
        Size::new(500.0, 300.0),
    ));
    let ids: Vec<Id> = (0..node_count)
        .map(|i| Id::new(&format!("prop_{tag}_{i}")))
        .collect();
    for id in &ids {
        graph.add_node(*id, Bounds::new_from_top_left(Point::default(), Size::new(12.0, 8.0)));
    }
    for &(tail, head) in edges {
        graph.add_edge(ids[tail % node_count], ids[head % node_count]);
    }
    (graph, ids)
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..14).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..(n * 3));
        (Just(n), edges)
    })
}

fn check_annealing_invariants(
    n: usize,
    edges: Vec<(usize, usize)>,
    seed: u64,
) -> Result<(), TestCaseError> {
    let (mut graph, ids) = build_graph("ann", n, &edges);
    let mut engine = GridAnnealingLayout::new();
    let configured = engine.set_iteration_count(3).and_then(|e| e.set_move_count(20));
    prop_assert!(configured.is_ok());
    let mut rng = StdRng::seed_from_u64(seed);

    let placement = engine.calculate_layout(&graph, None, &mut rng);
    prop_assert!(placement.is_some());
    let Some(placement) = placement else {
        return Ok(());
    };

    prop_assert_eq!(placement.node_count(), n);
    prop_assert!(placement.steps_evaluated() <= 3 * 20);
    prop_assert!(placement.best_cost() <= placement.initial_cost() + 1e-3);

    let cells: HashSet<_> = placement.cells().map(|(_, cell)| cell).collect();
    prop_assert_eq!(cells.len(), n);

    engine.apply_layout(&placement, &mut graph, None);
    let viewport = graph.viewport(None);
    for id in ids {
        prop_assert!(viewport.contains_point(graph.bounds(id).center()));
    }
    Ok(())
}

fn check_level_invariants(
    n: usize,
    edges: Vec<(usize, usize)>,
    seed: u64,
) -> Result<(), TestCaseError> {
    let (mut graph, ids) = build_graph("lvl", n, &edges);
    let mut engine = LevelLayout::new();
    engine.set_check_invariants(true);
    let mut rng = StdRng::seed_from_u64(seed);

    let first = engine.calculate_layout(&graph, None);
    prop_assert!(first.is_ok());
    let Ok(Some(first)) = first else {
        return Err(TestCaseError::fail("non-empty graph produced no levels"));
    };

    engine.apply_layout(&first, &mut graph, None, &mut rng);
    let Ok(Some(second)) = engine.calculate_layout(&graph, None) else {
        return Err(TestCaseError::fail("second run produced no levels"));
    };

    for id in &ids {
        prop_assert!(first.level_of(*id).is_some());
        prop_assert_eq!(first.level_of(*id), second.level_of(*id));
    }
    prop_assert!(first.level_count() <= n);

    let viewport = graph.viewport(None);
    for id in ids {
        prop_assert!(viewport.contains_point(graph.bounds(id).center()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn annealing_invariants((n, edges) in graph_strategy(), seed in any::<u64>()) {
        check_annealing_invariants(n, edges, seed)?;
    }

    #[test]
    fn level_invariants((n, edges) in graph_strategy(), seed in any::<u64>()) {
        check_level_invariants(n, edges, seed)?;
    }
}
