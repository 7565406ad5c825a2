//! JSON node-link format (`nodes` + `links`), reader and writer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::graph::WorkflowGraph;
use super::types::{Attributes, NodeId};
use crate::error::DaxError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub multigraph: bool,
    #[serde(default)]
    pub graph: BTreeMap<String, Value>,
    #[serde(default)]
    pub nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    pub links: Vec<NodeLinkEdge>,
}

fn default_directed() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLinkEdge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Read a node-link JSON document into a workflow graph.
pub fn read(input: &str) -> Result<WorkflowGraph, DaxError> {
    let doc: NodeLinkDocument =
        serde_json::from_str(input).map_err(|e| DaxError::malformed("node-link JSON", e))?;
    if !doc.directed {
        tracing::warn!("node-link document is undirected, reading links as source -> target");
    }

    let name = doc.graph.get("name").filter(|v| !v.is_null()).map(stringify);
    let nodes = doc
        .nodes
        .into_iter()
        .map(|n| {
            let attrs: Attributes = n
                .attributes
                .iter()
                // null reads as an absent attribute
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), stringify(v)))
                .collect();
            (n.id, attrs)
        })
        .collect();
    let edges = doc.links.into_iter().map(|e| (e.source, e.target)).collect();

    WorkflowGraph::build(name, nodes, edges)
}

/// Node-link view of a graph, ready to be serialized.
pub fn to_node_link(graph: &WorkflowGraph) -> NodeLinkDocument {
    let mut meta = BTreeMap::new();
    if let Some(name) = &graph.name {
        meta.insert("name".to_string(), Value::String(name.clone()));
    }

    let nodes = graph
        .nodes()
        .map(|(id, node)| NodeLinkNode {
            id: id.clone(),
            attributes: node
                .to_attributes()
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        })
        .collect();

    let links = graph
        .edges()
        .into_iter()
        .map(|(s, t)| NodeLinkEdge {
            source: s.clone(),
            target: t.clone(),
        })
        .collect();

    NodeLinkDocument {
        directed: true,
        multigraph: false,
        graph: meta,
        nodes,
        links,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_attributes_are_read_as_text() {
        let json = r#"{
            "nodes": [{"id": 0, "lfn": "log", "streams": 3}, {"id": 1, "name": "t"}],
            "links": [{"source": 1, "target": 0}]
        }"#;
        let g = read(json).unwrap();
        let file = g.node(&NodeId::Num(0)).unwrap().as_file().unwrap();
        assert_eq!(file.stream_flags.bits(), 3);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn edges_alias_is_accepted() {
        let json = r#"{"nodes": [{"id": "a", "lfn": "x"}, {"id": "b", "name": "t"}],
                       "edges": [{"source": "a", "target": "b"}]}"#;
        let g = read(json).unwrap();
        assert_eq!(g.edges(), vec![(&NodeId::from("a"), &NodeId::from("b"))]);
    }

    #[test]
    fn null_attributes_are_absent() {
        let json = r#"{
            "graph": {"name": null},
            "nodes": [{"id": 0, "lfn": "x", "urls": null, "sites": null}, {"id": 1, "name": "t", "args": null}],
            "links": [{"source": 0, "target": 1}]
        }"#;
        let g = read(json).unwrap();
        assert_eq!(g.name, None);
        assert!(g.node(&NodeId::Num(0)).unwrap().as_file().unwrap().locations.is_empty());
        assert!(g.node(&NodeId::Num(1)).unwrap().as_task().unwrap().argument_tokens.is_empty());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = read("not json").unwrap_err();
        assert_eq!(err.code(), "L002");
    }
}
