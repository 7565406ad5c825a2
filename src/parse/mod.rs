//! Load phase: persisted graph document → canonical `WorkflowGraph`.

pub mod gexf;
pub mod graph;
pub mod graphml;
pub mod ids;
pub mod node_link;
pub mod types;

use std::path::Path;

pub use graph::WorkflowGraph;
pub use types::*;

use crate::error::DaxError;

/// Recognized persisted graph formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    NodeLink,
    Gexf,
    GraphMl,
}

impl Format {
    /// Dispatch on the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, DaxError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_extension(&ext)
    }

    pub fn from_extension(ext: &str) -> Result<Self, DaxError> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::NodeLink),
            "gexf" | "gxf" => Ok(Format::Gexf),
            "gml" | "graphml" => Ok(Format::GraphMl),
            _ => Err(DaxError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
        }
    }
}

/// Parse a graph document held in memory.
pub fn load_str(format: Format, input: &str) -> Result<WorkflowGraph, DaxError> {
    match format {
        Format::NodeLink => node_link::read(input),
        Format::Gexf => gexf::read(input),
        Format::GraphMl => graphml::read(input),
    }
}

/// Read a persisted workflow graph, choosing the reader by file extension.
pub fn load(path: &Path) -> Result<WorkflowGraph, DaxError> {
    let format = Format::from_path(path)?;
    let input = std::fs::read_to_string(path)?;
    let graph = load_str(format, &input)?;
    tracing::debug!(
        path = %path.display(),
        ?format,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded workflow graph"
    );
    Ok(graph)
}
