//! Wrap pass: run every task through a wrapper executable.
//!
//! Each task gets a generated configuration artifact as a new input file, and
//! its command line is replaced by `<wrapper> <config>`.

pub mod generator;

use std::path::{Path, PathBuf};

pub use generator::{ConfigGenerator, ConfigRequest, TemplateConfigGenerator};

use crate::classify::{Classification, classify};
use crate::config::Config;
use crate::error::DaxError;
use crate::parse::graph::WorkflowGraph;
use crate::parse::ids::IdAllocator;
use crate::parse::types::{FileNode, Location, Node, NodeId};

/// Rewrite `graph` in place. Returns the ids of the inserted config nodes, in
/// task id order. Any earlier classification of `graph` is stale afterwards.
pub fn wrap(
    graph: &mut WorkflowGraph,
    config: &Config,
    generator: &mut dyn ConfigGenerator,
    ids: &mut dyn IdAllocator,
) -> Result<Vec<NodeId>, DaxError> {
    let classification = classify(graph)?;
    let root = find_root(graph, &classification, &config.root_marker)?;
    let tasks: Vec<NodeId> = classification.tasks().cloned().collect();

    let mut inserted = Vec::with_capacity(tasks.len());
    for task_id in tasks {
        let Some(task) = graph.node(&task_id).and_then(|n| n.as_task()).cloned() else {
            continue;
        };

        let path = generator.generate(&ConfigRequest {
            executable: &task.executable_name,
            arguments: &task.argument_tokens,
            source_root: &root,
            destination_root: &root,
        })?;
        let logical_name = path.to_string_lossy().into_owned();
        let url = std::path::absolute(&path)?.to_string_lossy().into_owned();

        let config_id = ids.allocate(graph);
        graph.add_node(
            config_id.clone(),
            FileNode::new(logical_name.clone()).with_location(Location::new(url, &config.default_site)),
        )?;
        graph.add_edge(&config_id, &task_id)?;

        if let Some(Node::Task(task)) = graph.node_mut(&task_id) {
            task.executable_name = config.wrapper.clone();
            task.argument_tokens = vec![logical_name];
        }
        inserted.push(config_id);
    }

    tracing::info!(
        tasks = inserted.len(),
        wrapper = %config.wrapper,
        root = %root.display(),
        "wrapped tasks"
    );
    Ok(inserted)
}

/// Directory of the first file (by id) whose logical name contains `marker`.
pub fn find_root(
    graph: &WorkflowGraph,
    classification: &Classification,
    marker: &str,
) -> Result<PathBuf, DaxError> {
    classification
        .files()
        .filter_map(|id| graph.node(id).and_then(|n| n.as_file()))
        .find(|f| f.logical_name.contains(marker))
        .map(|f| {
            Path::new(&f.logical_name)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
        .ok_or_else(|| DaxError::MissingMarker {
            marker: marker.to_string(),
        })
}
