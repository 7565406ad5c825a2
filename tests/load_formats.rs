//! Integration tests for the Load phase across the supported graph formats.

mod helpers;

use std::path::Path;

use daxgen::parse::{self, Format, NodeId};
use helpers::*;

fn load_fixture(name: &str) -> daxgen::parse::WorkflowGraph {
    parse::load(&Path::new("tests/fixtures").join(name)).expect("Fixture should load")
}

#[test]
fn node_link_fixture() {
    let g = load_fixture("valid.json");
    assert_eq!(g.name.as_deref(), Some("valid"));
    assert_eq!(canonical(&g), canonical(&valid_graph()));
    // Numeric string ids normalize to integers.
    assert!(g.contains(&NodeId::Num(1)));
}

#[test]
fn graphml_fixture() {
    let g = load_fixture("valid.graphml");
    assert_eq!(g.name.as_deref(), Some("valid"));
    assert_eq!(canonical(&g), canonical(&valid_graph()));
}

#[test]
fn gexf_fixture() {
    let g = load_fixture("valid.gexf");
    assert_eq!(g.name.as_deref(), Some("valid"));
    assert_eq!(canonical(&g), canonical(&valid_graph()));
}

#[test]
fn formats_agree_on_ids() {
    let json = load_fixture("valid.json");
    let graphml = load_fixture("valid.graphml");
    let gexf = load_fixture("valid.gexf");
    assert_eq!(json.edges(), graphml.edges());
    assert_eq!(json.edges(), gexf.edges());
}

#[test]
fn extension_dispatch() {
    assert_eq!(Format::from_path(Path::new("g.JSON")).unwrap(), Format::NodeLink);
    assert_eq!(Format::from_path(Path::new("g.gxf")).unwrap(), Format::Gexf);
    assert_eq!(Format::from_path(Path::new("g.gml")).unwrap(), Format::GraphMl);
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = parse::load(Path::new("workflow.xml")).unwrap_err();
    assert_eq!(err.code(), "L001");
    assert!(err.to_string().contains("xml"));
}

#[test]
fn edge_to_unknown_node_is_rejected() {
    let json = r#"{"nodes": [{"id": 0, "lfn": "a"}], "links": [{"source": 0, "target": 9}]}"#;
    assert_eq!(parse::load_str(Format::NodeLink, json).unwrap_err().code(), "L006");
}

#[test]
fn node_without_role_attributes_is_rejected() {
    let json = r#"{"nodes": [{"id": 0, "color": "red"}], "links": []}"#;
    let err = parse::load_str(Format::NodeLink, json).unwrap_err();
    assert_eq!(err.code(), "L003");
    assert_eq!(err.node_id(), Some(&NodeId::Num(0)));
}

#[test]
fn locations_are_split_on_commas() {
    let json = r#"{"nodes": [{"id": 0, "lfn": "a", "urls": "file:///x,file:///y", "sites": "s1,s2"}]}"#;
    let g = parse::load_str(Format::NodeLink, json).unwrap();
    let file = g.node(&NodeId::Num(0)).unwrap().as_file().unwrap();
    assert_eq!(file.locations.len(), 2);
    assert_eq!(file.locations[1].url, "file:///y");
    assert_eq!(file.locations[1].site.as_deref(), Some("s2"));
}
