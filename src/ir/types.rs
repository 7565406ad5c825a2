//! Compiled workflow model.
//!
//! Produced by the lowering pass from a classified graph, consumed by the
//! serializer. Never persisted; rebuilt on every conversion.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::parse::types::NodeId;

// =============================================================================
// TOP-LEVEL
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledWorkflow {
    pub catalog: FileCatalog,
    /// One entry per task, ascending by node id.
    pub jobs: Vec<JobCatalogEntry>,
}

impl CompiledWorkflow {
    pub fn job(&self, node_id: &NodeId) -> Option<&JobCatalogEntry> {
        self.jobs.iter().find(|j| &j.node_id == node_id)
    }
}

// =============================================================================
// FILE CATALOG
// =============================================================================

/// A physical location with its site resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    pub url: String,
    pub site: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub logical_name: String,
    pub node_id: NodeId,
    pub locations: Vec<ResolvedLocation>,
    /// Tasks redirecting their stdout into this file.
    pub stdout_producers: BTreeSet<NodeId>,
    /// Tasks redirecting their stderr into this file.
    pub stderr_producers: BTreeSet<NodeId>,
}

/// Logical name → file descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileCatalog {
    files: BTreeMap<String, FileDescriptor>,
}

impl FileCatalog {
    pub fn get(&self, logical_name: &str) -> Option<&FileDescriptor> {
        self.files.get(logical_name)
    }

    pub(crate) fn get_mut(&mut self, logical_name: &str) -> Option<&mut FileDescriptor> {
        self.files.get_mut(logical_name)
    }

    pub fn contains(&self, logical_name: &str) -> bool {
        self.files.contains_key(logical_name)
    }

    pub(crate) fn insert(&mut self, file: FileDescriptor) {
        self.files.insert(file.logical_name.clone(), file);
    }

    /// Descriptors ascending by logical name.
    pub fn iter(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.files.values()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

// =============================================================================
// JOBS
// =============================================================================

/// A job argument: literal text or a reference to a cataloged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Argument {
    Literal(String),
    File(String),
}

impl Argument {
    /// The token as it appeared on the task: the text or the logical name.
    pub fn as_token(&self) -> &str {
        match self {
            Argument::Literal(s) | Argument::File(s) => s,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Argument::File(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCatalogEntry {
    pub node_id: NodeId,
    pub executable_name: String,
    pub arguments: Vec<Argument>,
    /// Logical names of consumed files.
    pub inputs: BTreeSet<String>,
    /// Logical names of produced files.
    pub outputs: BTreeSet<String>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    /// Tasks producing any of this job's inputs.
    pub parents: BTreeSet<NodeId>,
}

impl JobCatalogEntry {
    /// Job id used in the wire document.
    pub fn job_id(&self) -> String {
        self.node_id.to_string()
    }
}
