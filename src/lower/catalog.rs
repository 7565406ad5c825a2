//! Build the file catalog from the file nodes of a classified graph.

use std::collections::BTreeSet;

use crate::classify::Classification;
use crate::error::DaxError;
use crate::ir::types::{FileCatalog, FileDescriptor, ResolvedLocation};
use crate::parse::graph::WorkflowGraph;

/// One descriptor per file node, keyed by logical name. Locations without a
/// site get `default_site`. Stream flags require a producing task.
pub fn build_catalog(
    graph: &WorkflowGraph,
    classification: &Classification,
    default_site: &str,
) -> Result<FileCatalog, DaxError> {
    let mut catalog = FileCatalog::default();

    for id in classification.files() {
        let Some(file) = graph.node(id).and_then(|n| n.as_file()) else {
            continue;
        };

        if let Some(existing) = catalog.get(&file.logical_name) {
            return Err(DaxError::DuplicateLogicalName {
                logical_name: file.logical_name.clone(),
                first: existing.node_id.clone(),
                second: id.clone(),
            });
        }

        // Stream flags are bound to a job through the task writing the file.
        if !file.stream_flags.is_empty()
            && !graph.predecessors(id).into_iter().any(|p| classification.is_task(p))
        {
            return Err(DaxError::UnproducedStream {
                node_id: id.clone(),
                logical_name: file.logical_name.clone(),
            });
        }

        let locations = file
            .locations
            .iter()
            .map(|l| ResolvedLocation {
                url: l.url.clone(),
                site: l.site.clone().unwrap_or_else(|| default_site.to_string()),
            })
            .collect();

        catalog.insert(FileDescriptor {
            logical_name: file.logical_name.clone(),
            node_id: id.clone(),
            locations,
            stdout_producers: BTreeSet::new(),
            stderr_producers: BTreeSet::new(),
        });
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::parse::types::{FileNode, Location, NodeId, StreamFlags, TaskNode};

    #[test]
    fn missing_sites_take_the_default() {
        let mut g = WorkflowGraph::new();
        g.add_node(
            NodeId::Num(0),
            FileNode::new("in")
                .with_location(Location {
                    url: "file:///data/in".into(),
                    site: None,
                })
                .with_location(Location::new("gsiftp://remote/in", "remote")),
        )
        .unwrap();
        g.add_node(NodeId::Num(1), TaskNode::new("t")).unwrap();
        g.add_edge(&NodeId::Num(0), &NodeId::Num(1)).unwrap();

        let catalog = build_catalog(&g, &classify(&g).unwrap(), "local").unwrap();
        let sites: Vec<&str> = catalog
            .get("in")
            .unwrap()
            .locations
            .iter()
            .map(|l| l.site.as_str())
            .collect();
        assert_eq!(sites, vec!["local", "remote"]);
    }

    #[test]
    fn stream_flags_without_producer_are_rejected() {
        let mut g = WorkflowGraph::new();
        g.add_node(NodeId::Num(0), FileNode::new("in").with_streams(StreamFlags::STDOUT))
            .unwrap();
        g.add_node(NodeId::Num(1), TaskNode::new("t")).unwrap();
        g.add_edge(&NodeId::Num(0), &NodeId::Num(1)).unwrap();

        let err = build_catalog(&g, &classify(&g).unwrap(), "local").unwrap_err();
        assert_eq!(err.code(), "C003");
        assert_eq!(err.node_id(), Some(&NodeId::Num(0)));
    }
}
