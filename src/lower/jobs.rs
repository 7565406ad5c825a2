//! Bind each task to its inputs, outputs, stream redirections and parents.

use std::collections::BTreeSet;

use crate::classify::Classification;
use crate::error::DaxError;
use crate::ir::types::{FileCatalog, JobCatalogEntry};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{NodeId, StreamFlags, TaskNode};

use super::arguments::resolve_arguments;

/// Build the job entry of one task and record it as a stream producer on the
/// files it redirects into.
pub fn build_job(
    graph: &WorkflowGraph,
    classification: &Classification,
    catalog: &mut FileCatalog,
    id: &NodeId,
    task: &TaskNode,
) -> Result<JobCatalogEntry, DaxError> {
    let mut job = JobCatalogEntry {
        node_id: id.clone(),
        executable_name: task.executable_name.clone(),
        arguments: resolve_arguments(&task.argument_tokens, catalog),
        inputs: BTreeSet::new(),
        outputs: BTreeSet::new(),
        stdout: None,
        stderr: None,
        parents: BTreeSet::new(),
    };

    for file_id in graph.predecessors(id) {
        let Some(file) = graph.node(file_id).and_then(|n| n.as_file()) else {
            continue;
        };
        job.inputs.insert(file.logical_name.clone());

        // Direct producers of a consumed file are parents; a task reading
        // what it writes depends on itself.
        for producer in graph.predecessors(file_id) {
            if classification.is_task(producer) {
                job.parents.insert(producer.clone());
            }
        }
    }

    for file_id in graph.successors(id) {
        let Some(file) = graph.node(file_id).and_then(|n| n.as_file()) else {
            continue;
        };
        job.outputs.insert(file.logical_name.clone());

        if file.stream_flags.contains(StreamFlags::STDOUT) {
            redirect(id, "stdout", &mut job.stdout, &file.logical_name)?;
            if let Some(descriptor) = catalog.get_mut(&file.logical_name) {
                descriptor.stdout_producers.insert(id.clone());
            }
        }
        if file.stream_flags.contains(StreamFlags::STDERR) {
            redirect(id, "stderr", &mut job.stderr, &file.logical_name)?;
            if let Some(descriptor) = catalog.get_mut(&file.logical_name) {
                descriptor.stderr_producers.insert(id.clone());
            }
        }
    }

    Ok(job)
}

/// A job has one stdout and one stderr.
fn redirect(
    id: &NodeId,
    stream: &'static str,
    slot: &mut Option<String>,
    logical_name: &str,
) -> Result<(), DaxError> {
    if let Some(existing) = slot.as_deref() {
        if existing != logical_name {
            return Err(DaxError::StreamConflict {
                node_id: id.clone(),
                stream,
                first: existing.to_string(),
                second: logical_name.to_string(),
            });
        }
    }
    *slot = Some(logical_name.to_string());
    Ok(())
}
