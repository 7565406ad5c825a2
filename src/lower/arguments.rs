//! Resolve task argument tokens against the file catalog.

use crate::ir::types::{Argument, FileCatalog};

/// Every token spelled exactly like a cataloged logical name becomes a file
/// reference, at every position it occurs. Everything else stays literal.
pub fn resolve_arguments(tokens: &[String], catalog: &FileCatalog) -> Vec<Argument> {
    tokens
        .iter()
        .map(|token| {
            if catalog.contains(token) {
                Argument::File(token.clone())
            } else {
                Argument::Literal(token.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::lower::catalog::build_catalog;
    use crate::parse::graph::WorkflowGraph;
    use crate::parse::types::{FileNode, NodeId, TaskNode};

    fn catalog_of(names: &[&str]) -> FileCatalog {
        let mut g = WorkflowGraph::new();
        g.add_node(NodeId::from("t"), TaskNode::new("t")).unwrap();
        for (i, name) in names.iter().enumerate() {
            let id = NodeId::Num(i as u64);
            g.add_node(id.clone(), FileNode::new(*name)).unwrap();
            g.add_edge(&id, &NodeId::from("t")).unwrap();
        }
        build_catalog(&g, &classify(&g).unwrap(), "local").unwrap()
    }

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn only_exact_matches_become_files() {
        let catalog = catalog_of(&["input.dat"]);
        let args = resolve_arguments(&tokens("--opt val input.dat input.dat.bak"), &catalog);
        assert_eq!(
            args,
            vec![
                Argument::Literal("--opt".into()),
                Argument::Literal("val".into()),
                Argument::File("input.dat".into()),
                Argument::Literal("input.dat.bak".into()),
            ]
        );
    }

    #[test]
    fn repeated_tokens_are_all_substituted() {
        let catalog = catalog_of(&["a", "b"]);
        let args = resolve_arguments(&tokens("a -x b a"), &catalog);
        let files: Vec<bool> = args.iter().map(Argument::is_file).collect();
        assert_eq!(files, vec![true, false, true, true]);
    }
}
