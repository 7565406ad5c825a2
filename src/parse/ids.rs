//! Node id allocation for nodes added after a graph was loaded.

use super::graph::WorkflowGraph;
use super::types::NodeId;

pub trait IdAllocator {
    /// A fresh id not present in `graph`.
    fn allocate(&mut self, graph: &WorkflowGraph) -> NodeId;
}

/// Monotonic integer ids. Ids already taken in the graph are skipped.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        SequentialIds { next }
    }

    /// Continue after the largest numeric id of `graph`.
    pub fn after(graph: &WorkflowGraph) -> Self {
        let next = graph
            .ids()
            .filter_map(NodeId::as_num)
            .max()
            .map_or(0, |max| max + 1);
        SequentialIds { next }
    }
}

impl IdAllocator for SequentialIds {
    fn allocate(&mut self, graph: &WorkflowGraph) -> NodeId {
        loop {
            let id = NodeId::Num(self.next);
            self.next += 1;
            if !graph.contains(&id) {
                return id;
            }
        }
    }
}
