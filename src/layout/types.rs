use crate::graph::NodeId;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub label: String,
    pub depth: i64,
    /// Normalized vertical position, centered on 0.5 within its column.
    pub y: f64,
    pub value: f64,
    pub children: Vec<NodeId>,
    pub parents: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub depth: i64,
    pub nodes: Vec<NodeId>, // Sorted by (priority, label)
}

/// Immutable result of one layout pass. Node ids index into `nodes`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub columns: Vec<Column>,
    pub max_depth: i64,
    pub max_column_size: usize,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, label: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn node_id(&self, label: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.label == label)
    }

    pub fn column(&self, depth: i64) -> Option<&Column> {
        self.columns.iter().find(|c| c.depth == depth)
    }

    /// Parent-child links in draw order: per node, one entry per child reference.
    pub fn links(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(id, n)| n.children.iter().map(move |&child| (id, child)))
    }

    /// Actual (min, max) of normalized y across all nodes.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let mut ys = self.nodes.iter().map(|n| n.y);
        let first = ys.next()?;
        Some(ys.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}
