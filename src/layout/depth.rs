//! Depth assignment by longest-path relaxation.

use crate::error::LayoutError;
use crate::graph::Graph;
use std::collections::HashMap;

/// Depth of every node after relaxation converged.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    pub depths: Vec<i64>,
    pub passes: usize,
}

/// Grow each node's depth to `1 + max(parent depth)` until a full pass changes nothing.
///
/// Roots start at 0; parents not yet reached count as -1. A pass limit guards against
/// cyclic input, where depths would grow forever.
pub fn relax_depths(graph: &Graph, max_passes: usize) -> Result<Relaxation, LayoutError> {
    let mut depths: Vec<Option<i64>> = vec![None; graph.len()];
    for root in graph.roots() {
        depths[root] = Some(0);
    }

    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;

        for (id, node) in graph.nodes().iter().enumerate() {
            if node.parents.is_empty() {
                continue;
            }
            let max_parent = node
                .parents
                .iter()
                .map(|&p| depths[p].unwrap_or(-1))
                .fold(-1, i64::max);
            let new_depth = max_parent + 1;
            if depths[id].is_none_or(|d| d < new_depth) {
                depths[id] = Some(new_depth);
                changed = true;
            }
        }

        if !changed {
            break;
        }
        if passes >= max_passes {
            return Err(LayoutError::CyclicGraph { passes });
        }
    }

    tracing::trace!(passes, "depth relaxation converged");

    Ok(Relaxation {
        depths: depths.into_iter().map(|d| d.unwrap_or(0)).collect(),
        passes,
    })
}

/// Replace depths of labels named in the `column` map. No edge constraint is checked.
pub fn apply_column_overrides(graph: &Graph, depths: &mut [i64], column: &HashMap<String, i64>) {
    for (label, &depth) in column {
        if let Some(id) = graph.id(label) {
            if depths[id] != depth {
                tracing::debug!(label = %label, from = depths[id], to = depth, "depth override");
            }
            depths[id] = depth;
        }
    }
}
