//! Reverse parser: wire document → canonical `WorkflowGraph`.
//!
//! Node ids are fresh integers from zero, files first, then jobs, in document
//! order. The result is not classified.

use std::collections::BTreeMap;

use crate::error::DaxError;
use crate::parse::graph::WorkflowGraph;
use crate::parse::ids::{IdAllocator, SequentialIds};
use crate::parse::types::{FileNode, Location, Node, NodeId, StreamFlags, TaskNode};

use super::arguments::reconstruct;
use super::types::{DaxDocument, Link};

pub fn parse_document(doc: &DaxDocument, default_site: &str) -> Result<WorkflowGraph, DaxError> {
    let mut graph = WorkflowGraph::with_name(doc.name.clone());
    let mut ids = SequentialIds::starting_at(0);
    let mut by_name: BTreeMap<&str, NodeId> = BTreeMap::new();

    // Files
    for entry in &doc.files {
        let id = ids.allocate(&graph);
        if let Some(first) = by_name.get(entry.name.as_str()) {
            return Err(DaxError::DuplicateLogicalName {
                logical_name: entry.name.clone(),
                first: first.clone(),
                second: id,
            });
        }

        let mut file = FileNode::new(entry.name.clone());
        file.locations = entry
            .pfns
            .iter()
            .map(|pfn| Location {
                url: pfn.url.clone(),
                site: Some(pfn.site.clone().unwrap_or_else(|| default_site.to_string())),
            })
            .collect();

        graph.add_node(id.clone(), file)?;
        by_name.insert(entry.name.as_str(), id);
    }

    // Jobs
    for job in &doc.jobs {
        let id = ids.allocate(&graph);
        let mut task = TaskNode::new(job.name.clone());
        if let Some(arguments) = &job.arguments {
            task.argument_tokens = reconstruct(&job.id, arguments)?;
        }
        graph.add_node(id.clone(), task)?;

        for uses in &job.uses {
            let file_id = lookup(&by_name, &job.id, &uses.name)?;
            match uses.link {
                Link::Input => graph.add_edge(&file_id, &id)?,
                Link::Output => graph.add_edge(&id, &file_id)?,
                Link::Other => {
                    tracing::debug!(job = %job.id, file = %uses.name, "ignoring use with unrecognized link");
                }
            }
        }

        let redirects = [
            (&job.stdout, StreamFlags::STDOUT),
            (&job.stderr, StreamFlags::STDERR),
        ];
        for (target, flag) in redirects {
            let Some(name) = target else { continue };
            let file_id = lookup(&by_name, &job.id, name)?;
            if let Some(Node::File(file)) = graph.node_mut(&file_id) {
                file.stream_flags.insert(flag);
            }
            graph.add_edge(&id, &file_id)?;
        }
    }

    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "reconstructed workflow graph"
    );
    Ok(graph)
}

fn lookup(by_name: &BTreeMap<&str, NodeId>, job_id: &str, name: &str) -> Result<NodeId, DaxError> {
    by_name
        .get(name)
        .cloned()
        .ok_or_else(|| DaxError::UnknownFile {
            job_id: job_id.to_string(),
            logical_name: name.to_string(),
        })
}
