//! Indented text dump of a syntax tree

use crate::parser::ast::{self, Ast};
use crate::tree::NodeId;
use std::fmt::Write;

/// Spaces per depth level
pub const INDENT_WIDTH: usize = 3;

/// Render the whole tree starting at the root.
///
/// Operand children follow their parent in source order (condition before
/// branches, left operand before right); statements follow block order.
pub fn render_text(ast: &Ast) -> String {
    let Some(root) = ast.root() else {
        return "AST is empty\n".to_string();
    };

    let mut out = String::from("Abstract Syntax Tree:\n");

    // Explicit stack so arbitrarily deep trees print without recursion
    let mut pending: Vec<(NodeId, usize)> = vec![(root, 0)];
    while let Some((id, depth)) = pending.pop() {
        let _ = writeln!(
            out,
            "{:indent$}{}",
            "",
            ast.data(id).kind,
            indent = depth * INDENT_WIDTH
        );

        for (_, child) in ast::children(ast, id).into_iter().rev() {
            pending.push((child, depth + 1));
        }
    }

    out
}
