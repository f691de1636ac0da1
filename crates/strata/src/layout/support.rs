//! Placement and routing helpers shared by the layout engines.
//!
//! Both engines finish by moving nodes to computed centers and rerouting
//! edges. These helpers express those steps in terms of [`LayoutTarget`]
//! alone so that the engines never touch a concrete graph type.

use log::trace;

use strata_core::{
    geometry::Point,
    model::{GraphModel, LayoutTarget},
};

use crate::error::StrataError;

/// Translates `node` so that its bounding box is centered at `center`.
///
/// Edges are not rerouted.
pub fn place_centered<T: LayoutTarget>(target: &mut T, node: T::Node, center: Point) {
    let offset = center.sub_point(target.bounds(node).center());
    target.translate(node, offset);
}

/// Centers `node` at `center` and reroutes its visible incident edges.
pub fn place<T: LayoutTarget>(target: &mut T, node: T::Node, center: Point) {
    place_centered(target, node, center);

    // A self-loop shows up in both lists; take it from the outgoing side only.
    let incident: Vec<T::Edge> = target
        .out_edges(node)
        .chain(target.in_edges(node).filter(|&edge| target.tail(edge) != node))
        .filter(|&edge| target.is_edge_visible(edge))
        .collect();
    for edge in incident {
        target.route(edge);
    }
}

/// Reroutes every visible edge whose endpoints both lie within `scope`.
///
/// Returns the number of edges routed.
pub fn route_visible_edges<T: LayoutTarget>(target: &mut T, scope: T::Scope) -> usize {
    let edges: Vec<T::Edge> = target
        .edges(scope)
        .filter(|&edge| target.is_edge_visible(edge))
        .collect();
    for &edge in &edges {
        target.route(edge);
    }
    trace!(scope:? = scope, routed = edges.len(); "Rerouted visible edges");
    edges.len()
}

/// Climbs the containment hierarchy from `node` to the ancestor that is a
/// direct member of `scope`.
///
/// Returns `None` when no ancestor of `node` (including `node` itself) is a
/// member, which happens for edges that leave the scope.
pub fn resolve_in_scope<G: GraphModel>(model: &G, scope: G::Scope, node: G::Node) -> Option<G::Node> {
    let mut current = Some(node);
    while let Some(candidate) = current {
        if model.contains(scope, candidate) {
            return Some(candidate);
        }
        current = model.parent(candidate);
    }
    None
}

/// Verifies that every node enumerated for `scope` is reported as a member
/// of `scope`.
///
/// # Errors
///
/// Returns [`StrataError::Consistency`] naming the first node the model
/// enumerates but does not contain.
pub fn check_consistency<G: GraphModel>(model: &G, scope: G::Scope) -> Result<(), StrataError> {
    model
        .nodes(scope)
        .try_for_each(|node| check_containment(model, scope, node))
}

/// Verifies that `node` is a direct member of `scope`.
///
/// # Errors
///
/// Returns [`StrataError::Consistency`] if it is not.
pub fn check_containment<G: GraphModel>(
    model: &G,
    scope: G::Scope,
    node: G::Node,
) -> Result<(), StrataError> {
    if model.contains(scope, node) {
        Ok(())
    } else {
        Err(StrataError::consistency(format!(
            "node {node:?} is enumerated in scope {scope:?} but not contained in it"
        )))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use strata_core::{
        geometry::{Bounds, Size},
        identifier::Id,
    };

    use super::*;
    use crate::structure::BasicGraph;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    fn chain() -> (BasicGraph, Id, Id, Id) {
        let mut graph = BasicGraph::new(rect(0.0, 0.0, 300.0, 300.0));
        let a = Id::new("support_a");
        let b = Id::new("support_b");
        let c = Id::new("support_c");
        graph
            .add_node(a, rect(0.0, 0.0, 20.0, 10.0))
            .add_node(b, rect(100.0, 100.0, 20.0, 10.0))
            .add_node(c, rect(200.0, 200.0, 20.0, 10.0));
        graph.add_edge(a, b);
        graph.add_edge(b, c);
        (graph, a, b, c)
    }

    #[test]
    fn test_place_centered_does_not_route() {
        let (mut graph, a, _, _) = chain();

        place_centered(&mut graph, a, Point::new(50.0, 60.0));

        let center = graph.bounds(a).center();
        assert_approx_eq!(f32, center.x(), 50.0);
        assert_approx_eq!(f32, center.y(), 60.0);
        assert!(graph.all_edges().all(|edge| graph.route_count(edge) == 0));
    }

    #[test]
    fn test_place_routes_incident_edges_once() {
        let (mut graph, a, b, _) = chain();
        let Some(self_loop) = graph.add_edge(b, b) else {
            panic!("endpoints exist");
        };
        let Some(hidden) = graph.add_edge(a, b) else {
            panic!("endpoints exist");
        };
        graph.set_edge_visible(hidden, false);

        place(&mut graph, b, Point::new(150.0, 150.0));

        let counts: Vec<usize> = graph
            .all_edges()
            .map(|edge| graph.route_count(edge))
            .collect();
        // a->b, b->c, b->b, hidden a->b
        assert_eq!(counts, vec![1, 1, 1, 0]);
        assert_eq!(graph.route_count(self_loop), 1);
    }

    #[test]
    fn test_route_visible_edges_skips_hidden() {
        let (mut graph, _, _, c) = chain();
        graph.set_node_visible(c, false);

        let routed = route_visible_edges(&mut graph, None);

        assert_eq!(routed, 1);
    }

    #[test]
    fn test_resolve_in_scope_climbs_parents() {
        let (mut graph, a, b, _) = chain();
        let deep = Id::new("support_deep");
        graph.add_node(deep, rect(0.0, 0.0, 5.0, 5.0));
        graph.set_parent(deep, Some(a));

        assert_eq!(resolve_in_scope(&graph, None, deep), Some(a));
        assert_eq!(resolve_in_scope(&graph, None, b), Some(b));
        assert_eq!(resolve_in_scope(&graph, Some(a), b), None);
        assert_eq!(resolve_in_scope(&graph, Some(a), deep), Some(deep));
    }

    #[test]
    fn test_consistency_checks() {
        let (graph, a, _, _) = chain();

        assert!(check_consistency(&graph, None).is_ok());
        assert!(check_consistency(&graph, Some(a)).is_ok());
        assert!(matches!(
            check_containment(&graph, Some(a), a),
            Err(StrataError::Consistency(_))
        ));
    }
}
