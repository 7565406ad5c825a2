//! Two-coloring of the workflow graph, treating edges as undirected.

use std::collections::{BTreeMap, VecDeque};

use crate::error::DaxError;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::NodeId;

/// The two color classes of one connected component.
///
/// `first` always holds the smallest id of the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub first: Vec<NodeId>,
    pub second: Vec<NodeId>,
}

impl Component {
    /// The node whose attributes decide which class is which.
    pub fn representative(&self) -> &NodeId {
        &self.first[0]
    }
}

/// Color every component by BFS. Fails on the first edge joining two nodes of
/// the same color, which includes self-loops and odd cycles.
pub fn two_color(graph: &WorkflowGraph) -> Result<Vec<Component>, DaxError> {
    let mut colors: BTreeMap<&NodeId, bool> = BTreeMap::new();
    let mut components = Vec::new();

    for start in graph.ids() {
        if colors.contains_key(start) {
            continue;
        }

        let mut component = Component {
            first: Vec::new(),
            second: Vec::new(),
        };
        let mut queue = VecDeque::from([start]);
        colors.insert(start, false);

        while let Some(id) = queue.pop_front() {
            let color = colors[id];
            if color {
                component.second.push(id.clone());
            } else {
                component.first.push(id.clone());
            }

            for next in graph.neighbors_undirected(id) {
                match colors.get(next) {
                    Some(&c) if c == color => {
                        return Err(DaxError::structure(
                            format!("nodes '{}' and '{}' are adjacent but fall into the same set", id, next),
                            Some(next.clone()),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        colors.insert(next, !color);
                        queue.push_back(next);
                    }
                }
            }
        }

        component.first.sort();
        component.second.sort();
        components.push(component);
    }

    Ok(components)
}
