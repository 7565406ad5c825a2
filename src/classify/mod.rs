//! Classify phase: split the graph into file and task nodes.
//!
//! The result is a lookup table kept apart from the graph. It is cheap to
//! recompute and must be recomputed after the graph changes shape.

pub mod coloring;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::DaxError;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{FILE_ATTRIBUTES, Node, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    File,
    Task,
}

/// Role of every node of a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    roles: BTreeMap<NodeId, Role>,
}

impl Classification {
    pub fn role(&self, id: &NodeId) -> Option<Role> {
        self.roles.get(id).copied()
    }

    pub fn is_file(&self, id: &NodeId) -> bool {
        self.role(id) == Some(Role::File)
    }

    pub fn is_task(&self, id: &NodeId) -> bool {
        self.role(id) == Some(Role::Task)
    }

    /// File node ids, ascending.
    pub fn files(&self) -> impl Iterator<Item = &NodeId> {
        self.with_role(Role::File)
    }

    /// Task node ids, ascending.
    pub fn tasks(&self) -> impl Iterator<Item = &NodeId> {
        self.with_role(Role::Task)
    }

    fn with_role(&self, role: Role) -> impl Iterator<Item = &NodeId> {
        self.roles
            .iter()
            .filter(move |(_, r)| **r == role)
            .map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

fn has_file_attributes(node: &Node) -> bool {
    let names = node.attribute_names();
    FILE_ATTRIBUTES.iter().all(|a| names.contains(a))
}

/// Two-color the graph and decide, per connected component, which color holds
/// the files by looking at the attributes of one representative node.
///
/// Fails with a structure error when no two-coloring exists or when a node's
/// attributes contradict the role its color was given (a file-file or
/// task-task edge).
pub fn classify(graph: &WorkflowGraph) -> Result<Classification, DaxError> {
    let mut roles = BTreeMap::new();

    for component in coloring::two_color(graph)? {
        let representative = component.representative();
        let first_is_files = graph
            .node(representative)
            .map(has_file_attributes)
            .unwrap_or(false);
        let (files, tasks) = if first_is_files {
            (component.first, component.second)
        } else {
            (component.second, component.first)
        };

        for id in files {
            roles.insert(id, Role::File);
        }
        for id in tasks {
            roles.insert(id, Role::Task);
        }
    }

    for (id, role) in &roles {
        let consistent = matches!(
            (graph.node(id), role),
            (Some(Node::File(_)), Role::File) | (Some(Node::Task(_)), Role::Task)
        );
        if !consistent {
            let expected = match role {
                Role::File => "a file",
                Role::Task => "a task",
            };
            return Err(DaxError::structure(
                format!("node '{id}' is connected like {expected} but its attributes say otherwise"),
                Some(id.clone()),
            ));
        }
    }

    let classification = Classification { roles };
    tracing::debug!(
        files = classification.files().count(),
        tasks = classification.tasks().count(),
        "classified workflow graph"
    );
    Ok(classification)
}
