#![allow(dead_code)]

use daxgen::config::DEFAULT_SITE;
use daxgen::parse::*;

// =============================================================================
// Graph builders
// =============================================================================

pub fn id(n: u64) -> NodeId {
    NodeId::Num(n)
}

pub fn file(lfn: &str) -> Node {
    Node::File(FileNode::new(lfn))
}

pub fn task(name: &str, args: &str) -> Node {
    Node::Task(TaskNode::new(name).with_args(args))
}

pub fn graph(nodes: Vec<(u64, Node)>, edges: &[(u64, u64)]) -> WorkflowGraph {
    let mut g = WorkflowGraph::new();
    for (n, node) in nodes {
        g.add_node(id(n), node).unwrap();
    }
    for (s, t) in edges {
        g.add_edge(&id(*s), &id(*t)).unwrap();
    }
    g
}

/// input(0) → task(1) → output(2)
pub fn valid_graph() -> WorkflowGraph {
    let mut g = graph(
        vec![
            (0, file("input")),
            (1, task("task", "--opt val arg")),
            (2, file("output")),
        ],
        &[(0, 1), (1, 2)],
    );
    g.name = Some("valid".into());
    g
}

/// raw(0) → A(1) → f(2) → B(3) → g(4) → C(5) → final(6)
pub fn chain_graph() -> WorkflowGraph {
    graph(
        vec![
            (0, file("raw")),
            (1, task("A", "raw")),
            (2, file("f")),
            (3, task("B", "-i f")),
            (4, file("g")),
            (5, task("C", "g final")),
            (6, file("final")),
        ],
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)],
    )
}

// =============================================================================
// Structural comparison
// =============================================================================

fn label(node: &Node) -> String {
    match node {
        Node::File(f) => format!("file:{}", f.logical_name),
        Node::Task(t) => format!("task:{}[{}]", t.executable_name, t.argument_tokens.join(" ")),
    }
}

fn describe(node: &Node) -> String {
    match node {
        Node::File(f) => {
            let locations: Vec<String> = f
                .locations
                .iter()
                .map(|l| format!("{}@{}", l.url, l.site.as_deref().unwrap_or(DEFAULT_SITE)))
                .collect();
            format!(
                "file:{} locations={:?} streams={}",
                f.logical_name,
                locations,
                f.stream_flags.bits()
            )
        }
        Node::Task(_) => label(node),
    }
}

/// Id-free view of a graph: sorted node descriptions and sorted labeled edges.
///
/// A location without a site reads as the default site.
#[derive(Debug, PartialEq, Eq)]
pub struct Canonical {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

pub fn canonical(g: &WorkflowGraph) -> Canonical {
    let mut nodes: Vec<String> = g.nodes().map(|(_, n)| describe(n)).collect();
    nodes.sort();
    let mut edges: Vec<(String, String)> = g
        .edges()
        .into_iter()
        .map(|(s, t)| (label(g.node(s).unwrap()), label(g.node(t).unwrap())))
        .collect();
    edges.sort();
    Canonical { nodes, edges }
}
