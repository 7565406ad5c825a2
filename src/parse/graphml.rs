//! GraphML reader.
//!
//! Only what workflow graphs use is understood: `<key>` declarations, node and
//! graph `<data>`, and `<edge source target>`. Edge data is skipped.

use std::collections::{BTreeMap, HashMap};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::graph::WorkflowGraph;
use super::types::{Attributes, NodeId};
use crate::error::DaxError;

const FORMAT: &str = "GraphML";

/// Where a `<data>` element currently being read belongs.
enum Scope {
    Graph,
    Node,
    Edge,
}

struct Key {
    domain: String,
    name: String,
}

pub fn read(input: &str) -> Result<WorkflowGraph, DaxError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut keys: HashMap<String, Key> = HashMap::new();
    let mut name = None;
    let mut nodes: Vec<(NodeId, Attributes)> = Vec::new();
    let mut edges: Vec<(NodeId, NodeId)> = Vec::new();

    let mut scope = Scope::Graph;
    let mut current: Option<(NodeId, Attributes)> = None;
    let mut data: Option<(String, String)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DaxError::malformed(FORMAT, e))?;
        match event {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"key" => {
                let attrs = attributes(&e)?;
                let id = required(&attrs, "id", "key")?;
                keys.insert(
                    id.clone(),
                    Key {
                        domain: attrs.get("for").cloned().unwrap_or_else(|| "all".into()),
                        name: attrs.get("attr.name").cloned().unwrap_or(id),
                    },
                );
            }
            Event::Start(e) if e.local_name().as_ref() == b"node" => {
                let attrs = attributes(&e)?;
                current = Some((NodeId::from(required(&attrs, "id", "node")?), Attributes::new()));
                scope = Scope::Node;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"node" => {
                let attrs = attributes(&e)?;
                nodes.push((NodeId::from(required(&attrs, "id", "node")?), Attributes::new()));
            }
            Event::Start(e) if e.local_name().as_ref() == b"edge" => {
                edges.push(edge(&e)?);
                scope = Scope::Edge;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"edge" => {
                edges.push(edge(&e)?);
            }
            Event::Start(e) if e.local_name().as_ref() == b"data" => {
                let attrs = attributes(&e)?;
                data = Some((required(&attrs, "key", "data")?, String::new()));
            }
            Event::Empty(e) if e.local_name().as_ref() == b"data" => {
                let attrs = attributes(&e)?;
                let key = required(&attrs, "key", "data")?;
                store(&keys, &scope, &mut current, &mut name, key, String::new());
            }
            Event::Text(t) => {
                if let Some((_, value)) = data.as_mut() {
                    value.push_str(&t.unescape().map_err(|e| DaxError::malformed(FORMAT, e))?);
                }
            }
            Event::CData(c) => {
                if let Some((_, value)) = data.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"data" => {
                    if let Some((key, value)) = data.take() {
                        store(&keys, &scope, &mut current, &mut name, key, value);
                    }
                }
                b"node" => {
                    if let Some(node) = current.take() {
                        nodes.push(node);
                    }
                    scope = Scope::Graph;
                }
                b"edge" => scope = Scope::Graph,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    WorkflowGraph::build(name, nodes, edges)
}

fn edge(e: &BytesStart) -> Result<(NodeId, NodeId), DaxError> {
    let attrs = attributes(e)?;
    Ok((
        NodeId::from(required(&attrs, "source", "edge")?),
        NodeId::from(required(&attrs, "target", "edge")?),
    ))
}

fn store(
    keys: &HashMap<String, Key>,
    scope: &Scope,
    current: &mut Option<(NodeId, Attributes)>,
    graph_name: &mut Option<String>,
    key: String,
    value: String,
) {
    let (domain, attr_name) = match keys.get(&key) {
        Some(k) => (k.domain.as_str(), k.name.clone()),
        None => ("all", key),
    };
    match scope {
        Scope::Node if domain == "node" || domain == "all" => {
            if let Some((_, attrs)) = current.as_mut() {
                attrs.insert(attr_name, value);
            }
        }
        Scope::Graph if attr_name == "name" && domain != "node" => *graph_name = Some(value),
        _ => {}
    }
}

fn attributes(e: &BytesStart) -> Result<BTreeMap<String, String>, DaxError> {
    xml_attributes(FORMAT, e)
}

fn required(attrs: &BTreeMap<String, String>, name: &str, element: &str) -> Result<String, DaxError> {
    required_attribute(FORMAT, attrs, name, element)
}

/// Attributes of an XML start tag, unescaped.
pub(crate) fn xml_attributes(
    format: &'static str,
    e: &BytesStart,
) -> Result<BTreeMap<String, String>, DaxError> {
    let mut out = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| DaxError::malformed(format, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| DaxError::malformed(format, err))?
            .into_owned();
        out.insert(key, value);
    }
    Ok(out)
}

pub(crate) fn required_attribute(
    format: &'static str,
    attrs: &BTreeMap<String, String>,
    name: &str,
    element: &str,
) -> Result<String, DaxError> {
    attrs.get(name).cloned().ok_or_else(|| {
        DaxError::malformed(format, format!("<{element}> without '{name}' attribute"))
    })
}
