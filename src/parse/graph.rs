//! petgraph-based directed graph wrapper for the canonical workflow graph.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::{Attributes, Node, NodeId};
use crate::error::DaxError;

/// Directed graph of file and task nodes, keyed by [`NodeId`].
///
/// Parallel edges collapse into one. Iteration helpers return ids in ascending
/// order so every later phase is deterministic.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    pub name: Option<String>,
    pub graph: DiGraph<NodeId, ()>,
    pub node_indices: BTreeMap<NodeId, NodeIndex>,
    nodes: BTreeMap<NodeId, Node>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        WorkflowGraph {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Build a graph from persisted node attributes and an edge list.
    pub fn build(
        name: Option<String>,
        nodes: Vec<(NodeId, Attributes)>,
        edges: Vec<(NodeId, NodeId)>,
    ) -> Result<Self, DaxError> {
        let mut graph = WorkflowGraph {
            name,
            ..Self::default()
        };
        for (id, attrs) in nodes {
            let node = Node::from_attributes(&id, &attrs)?;
            graph.add_node(id, node)?;
        }
        for (source, target) in edges {
            graph.add_edge(&source, &target)?;
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, id: NodeId, node: impl Into<Node>) -> Result<(), DaxError> {
        if self.nodes.contains_key(&id) {
            return Err(DaxError::DuplicateNode(id));
        }
        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(id.clone(), idx);
        self.nodes.insert(id, node.into());
        Ok(())
    }

    pub fn add_edge(&mut self, source: &NodeId, target: &NodeId) -> Result<(), DaxError> {
        let s = self.index(source)?;
        let t = self.index(target)?;
        self.graph.update_edge(s, t, ());
        Ok(())
    }

    fn index(&self, id: &NodeId) -> Result<NodeIndex, DaxError> {
        self.node_indices
            .get(id)
            .copied()
            .ok_or_else(|| DaxError::UnknownNode(id.clone()))
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Node ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn successors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn predecessors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Successors and predecessors together, ignoring direction.
    pub fn neighbors_undirected(&self, id: &NodeId) -> Vec<&NodeId> {
        let Some(&idx) = self.node_indices.get(id) else {
            return vec![];
        };
        let mut out: Vec<&NodeId> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| &self.graph[n])
            .collect();
        out.sort();
        out.dedup();
        out
    }

    fn neighbors(&self, id: &NodeId, direction: Direction) -> Vec<&NodeId> {
        let Some(&idx) = self.node_indices.get(id) else {
            return vec![];
        };
        let mut out: Vec<&NodeId> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        out.sort();
        out
    }

    /// All edges as `(source, target)`, sorted.
    pub fn edges(&self) -> Vec<(&NodeId, &NodeId)> {
        let mut out: Vec<(&NodeId, &NodeId)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(s, t)| (&self.graph[s], &self.graph[t]))
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{FileNode, TaskNode};

    fn sample() -> WorkflowGraph {
        let mut g = WorkflowGraph::new();
        g.add_node(NodeId::Num(0), FileNode::new("input")).unwrap();
        g.add_node(NodeId::Num(1), TaskNode::new("task")).unwrap();
        g.add_node(NodeId::Num(2), FileNode::new("output")).unwrap();
        g.add_edge(&NodeId::Num(0), &NodeId::Num(1)).unwrap();
        g.add_edge(&NodeId::Num(1), &NodeId::Num(2)).unwrap();
        g
    }

    #[test]
    fn neighbors_follow_direction() {
        let g = sample();
        assert_eq!(g.predecessors(&NodeId::Num(1)), vec![&NodeId::Num(0)]);
        assert_eq!(g.successors(&NodeId::Num(1)), vec![&NodeId::Num(2)]);
        assert_eq!(
            g.neighbors_undirected(&NodeId::Num(1)),
            vec![&NodeId::Num(0), &NodeId::Num(2)]
        );
    }

    #[test]
    fn parallel_edges_collapse() {
        let mut g = sample();
        g.add_edge(&NodeId::Num(0), &NodeId::Num(1)).unwrap();
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn duplicate_and_unknown_nodes_are_rejected() {
        let mut g = sample();
        let dup = g.add_node(NodeId::Num(0), FileNode::new("again")).unwrap_err();
        assert_eq!(dup.code(), "L005");
        let unknown = g.add_edge(&NodeId::Num(0), &NodeId::Num(9)).unwrap_err();
        assert_eq!(unknown.code(), "L006");
    }
}
