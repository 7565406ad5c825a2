//! Integration tests for the lowering pass: classified graph → file catalog + job entries.

mod helpers;

use std::collections::BTreeSet;

use daxgen::classify::classify;
use daxgen::ir::{Argument, CompiledWorkflow};
use daxgen::lower;
use daxgen::parse::{FileNode, Location, Node, StreamFlags, WorkflowGraph};
use helpers::*;

fn compile(g: &WorkflowGraph) -> CompiledWorkflow {
    let c = classify(g).expect("Should classify");
    lower::compile(g, &c, "local").expect("Should compile")
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn compile_valid_graph() {
    let compiled = compile(&valid_graph());

    assert_eq!(compiled.catalog.len(), 2);
    assert!(compiled.catalog.contains("input"));
    assert!(compiled.catalog.contains("output"));

    assert_eq!(compiled.jobs.len(), 1);
    let job = &compiled.jobs[0];
    assert_eq!(job.node_id, id(1));
    assert_eq!(job.executable_name, "task");
    assert_eq!(job.inputs, set(&["input"]));
    assert_eq!(job.outputs, set(&["output"]));
    assert!(job.parents.is_empty(), "No task produces 'input'");
    assert_eq!(job.stdout, None);
}

#[test]
fn argument_substitution_is_exact() {
    let g = graph(
        vec![(0, file("input.dat")), (1, task("t", "--opt val input.dat"))],
        &[(0, 1)],
    );
    let compiled = compile(&g);
    assert_eq!(
        compiled.jobs[0].arguments,
        vec![
            Argument::Literal("--opt".into()),
            Argument::Literal("val".into()),
            Argument::File("input.dat".into()),
        ]
    );
}

#[test]
fn parents_are_direct_producers_only() {
    let compiled = compile(&chain_graph());
    let a = compiled.job(&id(1)).unwrap();
    let b = compiled.job(&id(3)).unwrap();
    let c = compiled.job(&id(5)).unwrap();

    assert!(a.parents.is_empty());
    assert_eq!(b.parents, [id(1)].into_iter().collect());
    assert!(c.parents.contains(&id(3)));
    assert!(!c.parents.contains(&id(1)), "Parents are not transitive through tasks");
}

#[test]
fn parent_reached_through_several_files_appears_once() {
    let g = graph(
        vec![
            (0, task("producer", "")),
            (1, file("a")),
            (2, file("b")),
            (3, task("consumer", "a b")),
        ],
        &[(0, 1), (0, 2), (1, 3), (2, 3)],
    );
    let compiled = compile(&g);
    let consumer = compiled.job(&id(3)).unwrap();
    assert_eq!(consumer.parents.len(), 1);
    assert_eq!(
        consumer.arguments.iter().filter(|a| a.is_file()).count(),
        2
    );
}

#[test]
fn task_reading_its_own_output_depends_on_itself() {
    let g = graph(vec![(0, task("loop", "")), (1, file("state"))], &[(0, 1), (1, 0)]);
    let compiled = compile(&g);
    let job = compiled.job(&id(0)).unwrap();
    assert!(job.parents.contains(&id(0)));
    assert_eq!(job.inputs, set(&["state"]));
    assert_eq!(job.outputs, set(&["state"]));
}

#[test]
fn stream_producers_accumulate() {
    let log = Node::File(FileNode::new("log").with_streams(StreamFlags::STDOUT));
    let g = graph(
        vec![(0, task("a", "")), (1, task("b", "")), (2, log)],
        &[(0, 2), (1, 2)],
    );
    let compiled = compile(&g);

    let descriptor = compiled.catalog.get("log").unwrap();
    assert_eq!(descriptor.stdout_producers, [id(0), id(1)].into_iter().collect());
    assert!(descriptor.stderr_producers.is_empty());
    assert_eq!(compiled.job(&id(0)).unwrap().stdout.as_deref(), Some("log"));
    assert_eq!(compiled.job(&id(1)).unwrap().stdout.as_deref(), Some("log"));
}

#[test]
fn one_file_can_take_both_streams() {
    let log = Node::File(FileNode::new("log").with_streams(StreamFlags::STDOUT | StreamFlags::STDERR));
    let g = graph(vec![(0, task("a", "")), (1, log)], &[(0, 1)]);
    let job = compile(&g).jobs.remove(0);
    assert_eq!(job.stdout.as_deref(), Some("log"));
    assert_eq!(job.stderr.as_deref(), Some("log"));
}

#[test]
fn one_task_with_two_stdout_files_is_rejected() {
    let out1 = Node::File(FileNode::new("out1").with_streams(StreamFlags::STDOUT));
    let out2 = Node::File(FileNode::new("out2").with_streams(StreamFlags::STDOUT));
    let g = graph(vec![(0, task("a", "")), (1, out1), (2, out2)], &[(0, 1), (0, 2)]);
    let c = classify(&g).unwrap();
    let err = lower::compile(&g, &c, "local").unwrap_err();
    assert_eq!(err.code(), "C002");
}

#[test]
fn stream_flags_on_a_file_no_task_writes_are_rejected() {
    let input = Node::File(FileNode::new("in").with_streams(StreamFlags::STDOUT));
    let g = graph(vec![(0, input), (1, task("t", ""))], &[(0, 1)]);
    let c = classify(&g).unwrap();
    let err = lower::compile(&g, &c, "local").unwrap_err();
    assert_eq!(err.code(), "C003");
    assert!(err.to_string().contains("'in'"));
}

#[test]
fn duplicate_logical_name_is_rejected() {
    let g = graph(
        vec![(0, file("x")), (1, task("t", "")), (2, file("x"))],
        &[(0, 1), (1, 2)],
    );
    let c = classify(&g).unwrap();
    let err = lower::compile(&g, &c, "local").unwrap_err();
    assert_eq!(err.code(), "C001");
    assert!(err.to_string().contains("'x'"));
}

#[test]
fn default_site_is_configurable() {
    let input = Node::File(FileNode::new("in").with_location(Location {
        url: "file:///in".into(),
        site: None,
    }));
    let g = graph(vec![(0, input), (1, task("t", ""))], &[(0, 1)]);
    let c = classify(&g).unwrap();
    let compiled = lower::compile(&g, &c, "condorpool").unwrap();
    assert_eq!(compiled.catalog.get("in").unwrap().locations[0].site, "condorpool");
}
