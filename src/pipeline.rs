//! End-to-end conversions: load → (wrap) → classify → compile → serialize.

use std::path::Path;

use crate::classify::classify;
use crate::codegen;
use crate::config::Config;
use crate::dax::{self, DaxDocument};
use crate::error::DaxError;
use crate::lower;
use crate::parse::graph::WorkflowGraph;
use crate::parse::ids::SequentialIds;
use crate::parse::{self, node_link};
use crate::wrap::{self, ConfigGenerator};

/// Compile an in-memory graph into a wire document.
///
/// The document is named after the graph, falling back to `config.document_name`.
pub fn graph_to_document(graph: &WorkflowGraph, config: &Config) -> Result<DaxDocument, DaxError> {
    let classification = classify(graph)?;
    let compiled = lower::compile(graph, &classification, &config.default_site)?;
    let name = graph.name.as_deref().unwrap_or(&config.document_name);
    codegen::to_document(&compiled, name)
}

/// Read a persisted graph, optionally wrap its tasks, and write the document
/// to `output`. Nothing is written when any step fails.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &Config,
    generator: Option<&mut dyn ConfigGenerator>,
) -> Result<DaxDocument, DaxError> {
    let mut graph = parse::load(input)?;

    if let Some(generator) = generator {
        let mut ids = SequentialIds::after(&graph);
        wrap::wrap(&mut graph, config, generator, &mut ids)?;
    }

    let doc = graph_to_document(&graph, config)?;
    codegen::write_document(&doc, output)?;
    Ok(doc)
}

/// Read a wire document and write the reconstructed graph as node-link JSON.
pub fn document_to_node_link(
    input: &Path,
    output: &Path,
    config: &Config,
) -> Result<WorkflowGraph, DaxError> {
    let doc = dax::read_document(input)?;
    let graph = dax::parse_document(&doc, &config.default_site)?;
    codegen::writer::write_json(&node_link::to_node_link(&graph), output)?;
    Ok(graph)
}
