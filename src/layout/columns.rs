//! Column grouping, within-column ordering and vertical placement.

use crate::graph::{Graph, NodeId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use super::types::Column;

/// Group nodes by depth, keeping graph order inside each group.
pub fn group_by_depth(depths: &[i64]) -> BTreeMap<i64, Vec<NodeId>> {
    let mut columns: BTreeMap<i64, Vec<NodeId>> = BTreeMap::new();
    for (id, &depth) in depths.iter().enumerate() {
        columns.entry(depth).or_default().push(id);
    }
    columns
}

/// Prioritized nodes first (lower value first), then by label.
pub fn compare_nodes(
    a_priority: Option<f64>,
    a_label: &str,
    b_priority: Option<f64>,
    b_label: &str,
) -> Ordering {
    let by_priority = match (a_priority, b_priority) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_priority.then_with(|| a_label.cmp(b_label))
}

/// Sort every column and return them in ascending depth order.
pub fn order_columns(
    graph: &Graph,
    grouped: BTreeMap<i64, Vec<NodeId>>,
    priority: &HashMap<String, f64>,
) -> Vec<Column> {
    grouped
        .into_iter()
        .map(|(depth, mut nodes)| {
            nodes.sort_by(|&a, &b| {
                let a_label = graph.node(a).label.as_str();
                let b_label = graph.node(b).label.as_str();
                compare_nodes(
                    priority.get(a_label).copied(),
                    a_label,
                    priority.get(b_label).copied(),
                    b_label,
                )
            });
            Column { depth, nodes }
        })
        .collect()
}

/// Normalized y for rank `index` in a column of `size` nodes, spaced by the widest column.
pub fn column_y(index: usize, size: usize, max_column_size: usize) -> f64 {
    let spacing = 1.0 / (max_column_size as f64 + 1.0);
    let start = (1.0 - spacing * (size as f64 - 1.0)) / 2.0;
    start + index as f64 * spacing
}

/// Normalized y per node id.
pub fn place_columns(columns: &[Column], node_count: usize) -> Vec<f64> {
    let max_column_size = columns.iter().map(|c| c.nodes.len()).max().unwrap_or(0);
    let mut ys = vec![0.0; node_count];

    for column in columns {
        for (rank, &id) in column.nodes.iter().enumerate() {
            ys[id] = column_y(rank, column.nodes.len(), max_column_size);
        }
    }

    ys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Edge;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_group_by_depth() {
        let grouped = group_by_depth(&[0, 1, 1, 2, 0]);
        assert_eq!(grouped[&0], vec![0, 4]);
        assert_eq!(grouped[&1], vec![1, 2]);
        assert_eq!(grouped[&2], vec![3]);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_priority_before_label() {
        assert_eq!(compare_nodes(Some(1.0), "Z", None, "A"), Ordering::Less);
        assert_eq!(compare_nodes(None, "A", Some(1.0), "Z"), Ordering::Greater);
        assert_eq!(compare_nodes(Some(2.0), "A", Some(1.0), "Z"), Ordering::Greater);
        assert_eq!(compare_nodes(Some(1.0), "B", Some(1.0), "A"), Ordering::Greater);
        assert_eq!(compare_nodes(None, "A", None, "B"), Ordering::Less);
        // Huge priorities still sort ahead of unprioritized nodes.
        assert_eq!(compare_nodes(Some(f64::MAX), "Z", None, "A"), Ordering::Less);
    }

    #[test]
    fn test_order_columns() {
        let graph = Graph::from_edges(&[
            Edge::new("R", "D", 1.0),
            Edge::new("R", "C", 1.0),
            Edge::new("R", "B", 1.0),
            Edge::new("R", "A", 1.0),
        ]);
        let depths: Vec<i64> = graph
            .nodes()
            .iter()
            .map(|n| if n.label == "R" { 0 } else { 1 })
            .collect();
        let priority = HashMap::from([("D".to_string(), 0.0), ("C".to_string(), 5.0)]);
        let columns = order_columns(&graph, group_by_depth(&depths), &priority);

        let labels: Vec<&str> = columns[1]
            .nodes
            .iter()
            .map(|&id| graph.node(id).label.as_str())
            .collect();
        assert_eq!(labels, vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn test_column_y_centered() {
        // Widest column of 3: spacing 0.25
        assert!((column_y(0, 3, 3) - 0.25).abs() < EPS);
        assert!((column_y(1, 3, 3) - 0.5).abs() < EPS);
        assert!((column_y(2, 3, 3) - 0.75).abs() < EPS);

        // A pair in the same chart keeps the same spacing, centered on 0.5
        assert!((column_y(0, 2, 3) - 0.375).abs() < EPS);
        assert!((column_y(1, 2, 3) - 0.625).abs() < EPS);

        // Single node
        assert!((column_y(0, 1, 1) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_place_columns_symmetry() {
        let columns = vec![
            Column { depth: 0, nodes: vec![0] },
            Column { depth: 1, nodes: vec![1, 2, 3, 4] },
            Column { depth: 2, nodes: vec![5, 6] },
        ];
        let ys = place_columns(&columns, 7);
        let spacing = 1.0 / 5.0;

        for column in &columns {
            let first = ys[column.nodes[0]];
            let last = ys[*column.nodes.last().unwrap()];
            assert!(((first + last) / 2.0 - 0.5).abs() < EPS);
            for pair in column.nodes.windows(2) {
                assert!((ys[pair[1]] - ys[pair[0]] - spacing).abs() < EPS);
            }
        }
        assert!((ys[4] - column_y(3, 4, 4)).abs() < EPS);
        assert!((ys[6] - column_y(1, 2, 4)).abs() < EPS);
    }
}
