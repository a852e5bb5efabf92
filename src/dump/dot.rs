//! Graphviz DOT export
//!
//! Each arena record becomes a `record` node with index, kind, line and
//! parent fields. Edges mirror the raw links: `left` and `right` for operand
//! slots, `stmt` for the ordered statement list, and dashed `parent` edges
//! back up the tree. An `If`
//! with an else branch therefore shows the then block hanging off the else
//! block's `right` link, exactly as stored.

use crate::parser::ast::Ast;
use std::fmt::Write;

pub fn render_dot(ast: &Ast) -> String {
    let mut out = String::from("digraph ast {\n    node [shape=record, fontname=\"monospace\"];\n");

    for node in ast.iter() {
        let parent = match node.parent {
            Some(parent) => format!("parent #{}", parent),
            None => "parent none".to_string(),
        };
        let _ = writeln!(
            out,
            "    n{0} [label=\"{{#{0} | {1} | line {2} | {3}}}\"];",
            node.index,
            escape(&node.data.kind.to_string()),
            node.data.line,
            parent
        );
    }

    for node in ast.iter() {
        if let Some(left) = node.left {
            let _ = writeln!(out, "    n{} -> n{} [label=\"left\"];", node.index, left);
        }
        if let Some(right) = node.right {
            let _ = writeln!(out, "    n{} -> n{} [label=\"right\"];", node.index, right);
        }
        for child in ast.children(node.index) {
            let _ = writeln!(out, "    n{} -> n{} [label=\"stmt\"];", node.index, child);
        }
        if let Some(parent) = node.parent {
            let _ = writeln!(
                out,
                "    n{} -> n{} [label=\"parent\", style=dashed];",
                node.index, parent
            );
        }
    }

    out.push_str("}\n");
    out
}

/// Escape characters with meaning inside a quoted record label.
fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' | '\\' | '{' | '}' | '|' | '<' | '>' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
