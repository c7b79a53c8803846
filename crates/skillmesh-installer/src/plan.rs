//! Install ordering
//!
//! Flattens a resolved graph into arena indices with every dependency ahead
//! of its dependents, each node exactly once. The resolver already rejected
//! cycles, so a plain post-order walk is sufficient.

use crate::resolver::ResolvedGraph;

/// Arena indices in materialization order, root last
pub fn install_order(graph: &ResolvedGraph) -> Vec<usize> {
    let mut order = Vec::with_capacity(graph.len());
    let mut visited = vec![false; graph.len()];
    visit(graph, graph.root_index(), &mut visited, &mut order);
    order
}

fn visit(graph: &ResolvedGraph, index: usize, visited: &mut [bool], order: &mut Vec<usize>) {
    if visited[index] {
        return;
    }
    visited[index] = true;
    for &child in &graph.node(index).children {
        visit(graph, child, visited, order);
    }
    order.push(index);
}
