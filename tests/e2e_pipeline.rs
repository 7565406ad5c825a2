//! End-to-end conversions between persisted graphs and wire documents on disk.

mod helpers;

use std::path::Path;

use daxgen::config::Config;
use daxgen::dax;
use daxgen::parse;
use daxgen::pipeline;
use helpers::*;

#[test]
fn convert_each_format_to_the_same_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default();

    let mut documents = Vec::new();
    for fixture in ["valid.json", "valid.graphml", "valid.gexf"] {
        let input = Path::new("tests/fixtures").join(fixture);
        let output = dir.path().join(format!("{fixture}.dax"));
        let doc = pipeline::convert_file(&input, &output, &config, None).unwrap();

        let written = dax::read_document(&output).unwrap();
        assert_eq!(written, doc);
        documents.push(doc);
    }

    assert_eq!(documents[0], documents[1]);
    assert_eq!(documents[0], documents[2]);
    assert_eq!(documents[0].name, "valid");
}

#[test]
fn output_encoding_follows_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = Path::new("tests/fixtures/valid.json");
    let xml = dir.path().join("graph.dax");
    let json = dir.path().join("graph.dax.json");

    let doc = pipeline::convert_file(input, &xml, &Config::default(), None).unwrap();
    pipeline::convert_file(input, &json, &Config::default(), None).unwrap();

    assert!(std::fs::read_to_string(&xml).unwrap().starts_with("<?xml"));
    let text = std::fs::read_to_string(&json).unwrap();
    assert_eq!(dax::from_json(&text).unwrap(), doc);
}

#[test]
fn failed_conversion_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.json");
    let output = dir.path().join("bad.dax");
    std::fs::write(
        &input,
        r#"{"nodes": [{"id": 0, "lfn": "a"}, {"id": 1, "lfn": "b"}], "links": [{"source": 0, "target": 1}]}"#,
    )
    .unwrap();

    let err = pipeline::convert_file(&input, &output, &Config::default(), None).unwrap_err();
    assert_eq!(err.code(), "B001");
    assert!(!output.exists());
}

#[test]
fn existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("graph.dax");
    std::fs::write(&output, "stale").unwrap();

    pipeline::convert_file(
        Path::new("tests/fixtures/valid.json"),
        &output,
        &Config::default(),
        None,
    )
    .unwrap();
    assert_eq!(dax::read_document(&output).unwrap().jobs.len(), 1);
}

#[test]
fn document_back_to_node_link() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("plan.json");

    let graph = pipeline::document_to_node_link(
        Path::new("tests/fixtures/mixed_arguments.dax.json"),
        &output,
        &Config::default(),
    )
    .unwrap();

    let reloaded = parse::load(&output).unwrap();
    assert_eq!(reloaded.name.as_deref(), Some("calibration"));
    assert_eq!(canonical(&reloaded), canonical(&graph));
}

#[test]
fn graph_survives_a_trip_through_both_tools() {
    let dir = tempfile::tempdir().unwrap();
    let dax_path = dir.path().join("graph.dax");
    let plan_path = dir.path().join("plan.json");
    let config = Config::default();

    pipeline::convert_file(Path::new("tests/fixtures/valid.json"), &dax_path, &config, None)
        .unwrap();
    pipeline::document_to_node_link(&dax_path, &plan_path, &config).unwrap();

    let back = parse::load(&plan_path).unwrap();
    assert_eq!(canonical(&back), canonical(&valid_graph()));
}
