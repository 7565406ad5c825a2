//! Lowering phase: classified `WorkflowGraph` → `CompiledWorkflow`.
//!
//! Builds the file catalog, then one job entry per task with its resolved
//! arguments, data bindings, stream redirections and parent jobs.

pub mod arguments;
pub mod catalog;
pub mod jobs;

use crate::classify::Classification;
use crate::error::DaxError;
use crate::ir::types::CompiledWorkflow;
use crate::parse::graph::WorkflowGraph;

/// Compile a classified graph. `default_site` is given to locations that do
/// not name a site.
pub fn compile(
    graph: &WorkflowGraph,
    classification: &Classification,
    default_site: &str,
) -> Result<CompiledWorkflow, DaxError> {
    // 1. File catalog
    let mut catalog = catalog::build_catalog(graph, classification, default_site)?;

    // 2. Jobs, ascending by node id
    let mut jobs = Vec::new();
    for id in classification.tasks() {
        let Some(task) = graph.node(id).and_then(|n| n.as_task()) else {
            continue;
        };
        jobs.push(jobs::build_job(graph, classification, &mut catalog, id, task)?);
    }

    tracing::info!(
        files = catalog.len(),
        jobs = jobs.len(),
        dependencies = jobs.iter().map(|j| j.parents.len()).sum::<usize>(),
        "compiled workflow"
    );

    Ok(CompiledWorkflow { catalog, jobs })
}
