//! Layered layout: depth relaxation, column ordering and normalized placement.

mod columns;
mod depth;
mod types;
mod values;

pub use columns::{column_y, compare_nodes};
pub use depth::Relaxation;
pub use types::{Column, Layout, LayoutNode};

use crate::error::LayoutError;
use crate::graph::Graph;
use crate::ir::{Edge, Overrides};

use columns::{group_by_depth, order_columns, place_columns};
use depth::{apply_column_overrides, relax_depths};
use values::node_values;

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    /// Relaxation pass limit. Defaults to node count + 1, enough for any acyclic input.
    pub(crate) max_passes: Option<usize>,
}

impl LayoutEngine {
    pub fn with_max_passes(max_passes: usize) -> Self {
        Self {
            max_passes: Some(max_passes),
        }
    }

    /// Compute the layout of `edges` from scratch.
    pub fn layout(&self, edges: &[Edge], overrides: Overrides<'_>) -> Result<Layout, LayoutError> {
        // Phase 1: Graph
        let graph = Graph::from_edges(edges);
        if graph.is_empty() {
            return Ok(Layout::default());
        }

        // Phase 2: Depths
        let max_passes = self.max_passes.unwrap_or(graph.len() + 1);
        let Relaxation { mut depths, passes } = relax_depths(&graph, max_passes)?;
        apply_column_overrides(&graph, &mut depths, overrides.column);

        // Phase 3: Columns
        let columns = order_columns(&graph, group_by_depth(&depths), overrides.priority);
        let max_column_size = columns.iter().map(|c| c.nodes.len()).max().unwrap_or(0);
        let ys = place_columns(&columns, graph.len());

        // Phase 4: Values
        let values = node_values(&graph, edges);

        let nodes: Vec<LayoutNode> = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(id, node)| LayoutNode {
                label: node.label.clone(),
                depth: depths[id],
                y: ys[id],
                value: values[id],
                children: node.children.clone(),
                parents: node.parents.clone(),
            })
            .collect();

        let max_depth = depths.iter().copied().max().unwrap_or(0);

        tracing::debug!(
            nodes = nodes.len(),
            columns = columns.len(),
            max_depth,
            passes,
            "layout computed"
        );

        Ok(Layout {
            nodes,
            columns,
            max_depth,
            max_column_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const EPS: f64 = 1e-9;

    fn sample() -> Vec<Edge> {
        vec![
            Edge::new("A", "B", 4.0),
            Edge::new("A", "C", 6.0),
            Edge::new("B", "D", 4.0),
        ]
    }

    fn layout_with(
        edges: &[Edge],
        column: &HashMap<String, i64>,
        priority: &HashMap<String, f64>,
    ) -> Layout {
        LayoutEngine::default()
            .layout(edges, Overrides { column, priority })
            .unwrap()
    }

    fn layout(edges: &[Edge]) -> Layout {
        layout_with(edges, &HashMap::new(), &HashMap::new())
    }

    fn column_labels<'a>(layout: &'a Layout, depth: i64) -> Vec<&'a str> {
        layout
            .column(depth)
            .unwrap()
            .nodes
            .iter()
            .map(|&id| layout.nodes[id].label.as_str())
            .collect()
    }

    #[test]
    fn test_basic_layout() {
        let layout = layout(&sample());

        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.node("A").unwrap().depth, 0);
        assert_eq!(layout.node("B").unwrap().depth, 1);
        assert_eq!(layout.node("C").unwrap().depth, 1);
        assert_eq!(layout.node("D").unwrap().depth, 2);
        assert_eq!(layout.max_depth, 2);
        assert_eq!(layout.max_column_size, 2);

        assert_eq!(column_labels(&layout, 0), vec!["A"]);
        assert_eq!(column_labels(&layout, 1), vec!["B", "C"]);
        assert_eq!(column_labels(&layout, 2), vec!["D"]);

        assert_eq!(layout.node("D").unwrap().value, 4.0);
        assert_eq!(layout.node("A").unwrap().value, 4.0);
    }

    #[test]
    fn test_layout_y() {
        let layout = layout(&sample());
        let third = 1.0 / 3.0;

        assert!((layout.node("A").unwrap().y - 0.5).abs() < EPS);
        assert!((layout.node("B").unwrap().y - third).abs() < EPS);
        assert!((layout.node("C").unwrap().y - 2.0 * third).abs() < EPS);
        assert_eq!(layout.column(1).unwrap().nodes[1], layout.node_id("C").unwrap());
    }

    #[test]
    fn test_edge_depth_invariant() {
        let edges = vec![
            Edge::new("A", "B", 1.0),
            Edge::new("B", "C", 1.0),
            Edge::new("A", "C", 1.0),
            Edge::new("X", "C", 1.0),
            Edge::new("C", "D", 1.0),
        ];
        let layout = layout(&edges);

        for node in &layout.nodes {
            if node.parents.is_empty() {
                assert_eq!(node.depth, 0);
            } else {
                let max_parent = node
                    .parents
                    .iter()
                    .map(|&p| layout.nodes[p].depth)
                    .max()
                    .unwrap();
                assert_eq!(node.depth, max_parent + 1);
            }
        }
    }

    #[test]
    fn test_column_override() {
        let column = HashMap::from([("D".to_string(), 1)]);
        let layout = layout_with(&sample(), &column, &HashMap::new());

        assert_eq!(layout.node("D").unwrap().depth, 1);
        assert_eq!(layout.max_depth, 1);
        assert_eq!(column_labels(&layout, 1), vec!["B", "C", "D"]);
        assert_eq!(layout.max_column_size, 3);
    }

    #[test]
    fn test_override_can_point_backwards() {
        let column = HashMap::from([("A".to_string(), 5)]);
        let layout = layout_with(&sample(), &column, &HashMap::new());

        assert_eq!(layout.node("A").unwrap().depth, 5);
        // Children keep their structural depth.
        assert_eq!(layout.node("B").unwrap().depth, 1);
        assert_eq!(layout.max_depth, 5);
    }

    #[test]
    fn test_priority_ordering() {
        let priority = HashMap::from([("C".to_string(), 1.0)]);
        let layout = layout_with(&sample(), &HashMap::new(), &priority);
        assert_eq!(column_labels(&layout, 1), vec!["C", "B"]);
    }

    #[test]
    fn test_override_into_single_column() {
        let layout = layout(&[Edge::new("A", "B", 1.0)]);
        let column = HashMap::from([("B".to_string(), 0)]);
        let flat = layout_with(&[Edge::new("A", "B", 1.0)], &column, &HashMap::new());

        assert_eq!(layout.max_depth, 1);
        assert_eq!(flat.max_depth, 0);
        assert_eq!(flat.columns.len(), 1);
        assert_eq!(column_labels(&flat, 0), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_edges() {
        let layout = layout(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.max_depth, 0);
        assert!(layout.y_range().is_none());
    }

    #[test]
    fn test_idempotent() {
        let priority = HashMap::from([("B".to_string(), 2.0)]);
        let first = layout_with(&sample(), &HashMap::new(), &priority);
        let second = layout_with(&sample(), &HashMap::new(), &priority);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cyclic_input_fails() {
        let edges = vec![Edge::new("A", "B", 1.0), Edge::new("B", "A", 1.0)];
        let result = LayoutEngine::default().layout(
            &edges,
            Overrides {
                column: &HashMap::new(),
                priority: &HashMap::new(),
            },
        );
        assert!(matches!(result, Err(LayoutError::CyclicGraph { .. })));
    }

    #[test]
    fn test_max_passes() {
        let edges = vec![
            Edge::new("C", "D", 1.0),
            Edge::new("B", "C", 1.0),
            Edge::new("A", "B", 1.0),
        ];
        let overrides = Overrides {
            column: &HashMap::new(),
            priority: &HashMap::new(),
        };
        assert!(LayoutEngine::with_max_passes(1).layout(&edges, overrides).is_err());
        assert!(LayoutEngine::with_max_passes(10).layout(&edges, overrides).is_ok());
    }

    #[test]
    fn test_links_and_y_range() {
        let layout = layout(&sample());
        let links: Vec<(&str, &str)> = layout
            .links()
            .map(|(f, t)| (layout.nodes[f].label.as_str(), layout.nodes[t].label.as_str()))
            .collect();
        assert_eq!(links, vec![("A", "B"), ("A", "C"), ("B", "D")]);

        let (lo, hi) = layout.y_range().unwrap();
        assert!((lo - 1.0 / 3.0).abs() < EPS);
        assert!((hi - 2.0 / 3.0).abs() < EPS);
    }
}
