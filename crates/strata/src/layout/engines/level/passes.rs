//! Leveling passes over the working graph.
//!
//! Run in order: [`break_cycles`], [`compute_levels`], [`add_dummies`],
//! [`make_levels`]. Every traversal keeps an explicit stack so that deep
//! graphs cannot exhaust the call stack.

use log::{debug, trace};

use super::data::{WorkEdge, WorkingGraph};
use crate::error::StrataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    OnPath,
    Done,
}

/// Counts of the edges changed by [`break_cycles`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct CycleBreaks {
    pub(super) reversed: usize,
    pub(super) destroyed: usize,
}

/// Finds the first edge that closes a cycle in a depth-first scan from
/// every node in index order.
fn find_back_edge<N: Copy>(graph: &WorkingGraph<N>) -> Option<usize> {
    let mut state = vec![VisitState::Unvisited; graph.node_count()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..graph.node_count() {
        if state[root] != VisitState::Unvisited {
            continue;
        }
        state[root] = VisitState::OnPath;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let Some(&edge) = graph.out_edges(node).get(top.1) else {
                state[node] = VisitState::Done;
                stack.pop();
                continue;
            };
            top.1 += 1;

            let Some(head) = graph.edge(edge).head else {
                continue;
            };
            match state[head] {
                VisitState::OnPath => return Some(edge),
                VisitState::Unvisited => {
                    state[head] = VisitState::OnPath;
                    stack.push((head, 0));
                }
                VisitState::Done => {}
            }
        }
    }
    None
}

/// Makes the working graph acyclic.
///
/// Each scan stops at the first edge leading back onto the current search
/// path. A self-loop is destroyed; any other such edge is reversed. The
/// scan then restarts from scratch. A restarted scan retraces the previous
/// one up to the broken edge, so at most one break per edge is needed.
///
/// # Errors
///
/// Returns [`StrataError::Consistency`] if the graph is still cyclic after
/// as many breaks as it has edges.
pub(super) fn break_cycles<N: Copy>(graph: &mut WorkingGraph<N>) -> Result<CycleBreaks, StrataError> {
    let limit = graph.live_edges().count();
    let mut breaks = CycleBreaks::default();

    while let Some(edge) = find_back_edge(graph) {
        if breaks.reversed + breaks.destroyed >= limit {
            return Err(StrataError::consistency(format!(
                "cycle breaking did not converge after {limit} breaks"
            )));
        }
        let WorkEdge { tail, head } = graph.edge(edge);
        if tail == head {
            trace!(edge, node:? = tail; "Destroying self-loop");
            graph.destroy_edge(edge);
            breaks.destroyed += 1;
        } else {
            trace!(edge, tail:? = tail, head:? = head; "Reversing cycle edge");
            graph.reverse_edge(edge);
            breaks.reversed += 1;
        }
    }

    debug!(reversed = breaks.reversed, destroyed = breaks.destroyed; "Cycles broken");
    Ok(breaks)
}

/// Post-order traversal over incoming edges starting at `start`.
///
/// Visits only nodes not yet marked visited and calls `emit` for each after
/// all of its unvisited predecessors.
fn reverse_post_order<N: Copy>(
    graph: &mut WorkingGraph<N>,
    start: usize,
    mut emit: impl FnMut(&WorkingGraph<N>, usize),
) {
    graph.visited[start] = true;
    let mut stack = vec![(start, 0)];

    while let Some(top) = stack.last_mut() {
        let node = top.0;
        let Some(&edge) = graph.in_edges(node).get(top.1) else {
            stack.pop();
            emit(graph, node);
            continue;
        };
        top.1 += 1;

        if let Some(tail) = graph.edge(edge).tail {
            if !graph.visited[tail] {
                graph.visited[tail] = true;
                stack.push((tail, 0));
            }
        }
    }
}

/// Assigns every node the latest level consistent with its successors.
///
/// A temporary meta node with an edge from every node gives a single
/// topological order. The forward pass computes longest-path levels; the
/// backward pass pulls each node down to one level above its earliest
/// successor. Returns the number of levels.
pub(super) fn compute_levels<N: Copy>(graph: &mut WorkingGraph<N>) -> usize {
    graph.clear_visited();
    let meta = graph.push_meta();

    let mut topo = Vec::with_capacity(graph.node_count());
    reverse_post_order(graph, meta.node, |_, node| topo.push(node));

    let mut max_level = 0;
    for &node in &topo {
        let level = graph
            .in_nodes(node)
            .map(|pred| graph.level[pred] + 1)
            .max()
            .unwrap_or(0);
        graph.level[node] = level;
        max_level = max_level.max(level);
    }

    for &node in topo.iter().rev() {
        let start = if graph.out_edges(node).is_empty() {
            graph.level[node]
        } else {
            max_level
        };
        let usage = graph
            .out_nodes(node)
            .map(|succ| graph.usage[succ].saturating_sub(1))
            .fold(start, usize::min);
        graph.usage[node] = usage;
    }

    for &node in &topo {
        graph.level[node] = graph.usage[node];
    }

    graph.pop_meta(meta);
    debug!(levels = max_level; "Levels computed");
    max_level
}

/// Splits every edge spanning more than one level with dummy nodes.
///
/// Returns the number of dummies added.
pub(super) fn add_dummies<N: Copy>(graph: &mut WorkingGraph<N>) -> usize {
    let originals = graph.node_count();
    let mut added = 0;

    for to in 0..originals {
        let incoming = graph.in_edges(to).to_vec();
        for mut edge in incoming {
            let Some(mut tail) = graph.edge(edge).tail else {
                continue;
            };
            while graph.level[to] > graph.level[tail] + 1 {
                let dummy = graph.add_dummy(graph.level[tail] + 1);
                graph.set_head(edge, dummy);
                edge = graph.add_edge(dummy, to);
                tail = dummy;
                added += 1;
            }
        }
    }

    debug!(dummies = added; "Dummy nodes inserted");
    added
}

/// Buckets nodes by level.
///
/// Starts with a reverse depth-first traversal from the first node on the
/// highest level so that related nodes end up next to each other, then
/// repeats from every node not reached yet.
pub(super) fn make_levels<N: Copy>(graph: &mut WorkingGraph<N>) -> Vec<Vec<usize>> {
    let Some(max_level) = graph.level.iter().copied().max() else {
        return Vec::new();
    };
    let Some(max_node) = graph.level.iter().position(|&level| level == max_level) else {
        return Vec::new();
    };

    let mut levels = vec![Vec::new(); max_level + 1];
    graph.clear_visited();

    let mut bucket = |graph: &WorkingGraph<N>, node: usize| levels[graph.level[node]].push(node);
    reverse_post_order(graph, max_node, &mut bucket);
    for node in 0..graph.node_count() {
        if !graph.visited[node] {
            reverse_post_order(graph, node, &mut bucket);
        }
    }

    levels
}

/// Every edge goes from a lower level to a strictly higher one.
pub(super) fn check_levels_increase<N: Copy>(graph: &WorkingGraph<N>) -> Result<(), StrataError> {
    for (tail, head) in graph.live_edges() {
        if graph.level[tail] >= graph.level[head] {
            return Err(StrataError::consistency(format!(
                "edge {tail} -> {head} does not increase level ({} -> {})",
                graph.level[tail], graph.level[head]
            )));
        }
    }
    Ok(())
}

/// Every edge spans one level and every dummy has one edge in and one out.
pub(super) fn check_unit_spans<N: Copy>(graph: &WorkingGraph<N>) -> Result<(), StrataError> {
    for (tail, head) in graph.live_edges() {
        if graph.level[tail] + 1 != graph.level[head] {
            return Err(StrataError::consistency(format!(
                "edge {tail} -> {head} spans levels {} -> {}",
                graph.level[tail], graph.level[head]
            )));
        }
    }
    for node in (0..graph.node_count()).filter(|&node| graph.is_dummy(node)) {
        let ins = graph.in_edges(node).len();
        let outs = graph.out_edges(node).len();
        if ins != 1 || outs != 1 {
            return Err(StrataError::consistency(format!(
                "dummy {node} has {ins} incoming and {outs} outgoing edges"
            )));
        }
    }
    Ok(())
}

/// No level is empty and every node sits in the bucket of its level.
pub(super) fn check_buckets<N: Copy>(
    graph: &WorkingGraph<N>,
    levels: &[Vec<usize>],
) -> Result<(), StrataError> {
    if let Some(empty) = levels.iter().position(Vec::is_empty) {
        return Err(StrataError::consistency(format!("level {empty} is empty")));
    }
    for (level, nodes) in levels.iter().enumerate() {
        if let Some(&node) = nodes.iter().find(|&&node| graph.level[node] != level) {
            return Err(StrataError::consistency(format!(
                "node {node} at level {} is bucketed in level {level}",
                graph.level[node]
            )));
        }
    }
    let bucketed: usize = levels.iter().map(Vec::len).sum();
    if bucketed != graph.node_count() {
        return Err(StrataError::consistency(format!(
            "{bucketed} of {} nodes bucketed",
            graph.node_count()
        )));
    }
    Ok(())
}
