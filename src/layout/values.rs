//! Derived node values shown in the hover tooltip.

use crate::graph::Graph;
use crate::ir::Edge;

/// Sum of incoming edge values, else the first outgoing edge's value, else zero.
pub fn node_values(graph: &Graph, edges: &[Edge]) -> Vec<f64> {
    let mut incoming: Vec<Option<f64>> = vec![None; graph.len()];
    let mut first_outgoing: Vec<Option<f64>> = vec![None; graph.len()];

    for edge in edges {
        if let Some(to) = graph.id(&edge.to) {
            *incoming[to].get_or_insert(0.0) += edge.value;
        }
        if let Some(from) = graph.id(&edge.from) {
            first_outgoing[from].get_or_insert(edge.value);
        }
    }

    incoming
        .into_iter()
        .zip(first_outgoing)
        .map(|(sum, first)| sum.or(first).unwrap_or(0.0))
        .collect()
}
