//! GEXF reader.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::graph::WorkflowGraph;
use super::graphml::{required_attribute, xml_attributes};
use super::types::{Attributes, NodeId};
use crate::error::DaxError;

const FORMAT: &str = "GEXF";

pub fn read(input: &str) -> Result<WorkflowGraph, DaxError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut name = None;
    // attribute id -> title, for `class="node"` declarations only
    let mut titles: HashMap<String, String> = HashMap::new();
    let mut node_class = false;
    let mut nodes: Vec<(NodeId, Attributes)> = Vec::new();
    let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
    let mut current: Option<(NodeId, Attributes)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DaxError::malformed(FORMAT, e))?;
        let (element, open) = match &event {
            Event::Start(e) => (e.clone(), true),
            Event::Empty(e) => (e.clone(), false),
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"node" => {
                        if let Some(node) = current.take() {
                            nodes.push(node);
                        }
                    }
                    b"attributes" => node_class = false,
                    _ => {}
                }
                continue;
            }
            Event::Eof => break,
            _ => continue,
        };

        let attrs = xml_attributes(FORMAT, &element)?;
        match element.local_name().as_ref() {
            b"graph" => {
                if let Some(graph_name) = attrs.get("name") {
                    name = Some(graph_name.clone());
                }
            }
            b"attributes" => node_class = open && attrs.get("class").map(String::as_str) == Some("node"),
            b"attribute" if node_class => {
                let id = required_attribute(FORMAT, &attrs, "id", "attribute")?;
                let title = attrs.get("title").cloned().unwrap_or_else(|| id.clone());
                titles.insert(id, title);
            }
            b"node" => {
                let id = NodeId::from(required_attribute(FORMAT, &attrs, "id", "node")?);
                if open {
                    current = Some((id, Attributes::new()));
                } else {
                    nodes.push((id, Attributes::new()));
                }
            }
            b"attvalue" => {
                if let Some((_, node_attrs)) = current.as_mut() {
                    let key = required_attribute(FORMAT, &attrs, "for", "attvalue")?;
                    let value = attrs.get("value").cloned().unwrap_or_default();
                    let title = titles.get(&key).cloned().unwrap_or(key);
                    node_attrs.insert(title, value);
                }
            }
            b"edge" => {
                edges.push((
                    NodeId::from(required_attribute(FORMAT, &attrs, "source", "edge")?),
                    NodeId::from(required_attribute(FORMAT, &attrs, "target", "edge")?),
                ));
            }
            _ => {}
        }
    }

    WorkflowGraph::build(name, nodes, edges)
}
