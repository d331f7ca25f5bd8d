//! Edge list to adjacency structure.

use crate::ir::Edge;
use std::collections::HashMap;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub label: String,
    /// One entry per edge, duplicates included.
    pub children: Vec<NodeId>,
    pub parents: Vec<NodeId>,
}

/// Nodes keyed by label, stored in first-reference order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<String, NodeId>,
}

impl Graph {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = Self::default();
        for edge in edges {
            let from = graph.intern(&edge.from);
            let to = graph.intern(&edge.to);
            graph.nodes[from].children.push(to);
            graph.nodes[to].parents.push(from);
        }
        tracing::debug!(nodes = graph.nodes.len(), edges = edges.len(), "graph built");
        graph
    }

    fn intern(&mut self, label: &str) -> NodeId {
        if let Some(&id) = self.index.get(label) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(GraphNode {
            label: label.to_string(),
            children: Vec::new(),
            parents: Vec::new(),
        });
        self.index.insert(label.to_string(), id);
        id
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id]
    }

    pub fn id(&self, label: &str) -> Option<NodeId> {
        self.index.get(label).copied()
    }

    pub fn get(&self, label: &str) -> Option<&GraphNode> {
        self.id(label).map(|id| &self.nodes[id])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parents.is_empty())
            .map(|(id, _)| id)
    }
}
