//! Dependency tree rendering
//!
//! Produces the `install --tree` view: box-drawing connectors, one line per
//! node, `✓` for records already materialized and `+` for pending ones. A
//! node reached through more than one dependent is printed again with a
//! `(shared)` tag but its subtree is only expanded the first time.

use crate::resolver::{DependencyNode, ResolvedGraph};

/// Render the graph as an indented tree, root first
pub fn render_tree(graph: &ResolvedGraph) -> String {
    let mut out = String::new();
    let mut seen = vec![false; graph.len()];

    let root = graph.root();
    out.push_str(&format!("{} {}@{}\n", marker(root), root.name, root.version));
    seen[graph.root_index()] = true;

    render_children(graph, graph.root_index(), "", &mut seen, &mut out);
    out
}

fn render_children(
    graph: &ResolvedGraph,
    index: usize,
    prefix: &str,
    seen: &mut [bool],
    out: &mut String,
) {
    let children = &graph.node(index).children;
    for (position, &child) in children.iter().enumerate() {
        let last = position + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };
        let node = graph.node(child);
        let shared = seen[child];

        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&format!("{} {}@{}", marker(node), node.name, node.version));
        if shared {
            out.push_str(" (shared)");
        }
        out.push('\n');

        if !shared {
            seen[child] = true;
            let next_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_children(graph, child, &next_prefix, seen, out);
        }
    }
}

fn marker(node: &DependencyNode) -> char {
    if node.is_installed {
        '✓'
    } else {
        '+'
    }
}
