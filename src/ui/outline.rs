//! Flattened view of the syntax tree for the outline pane
//!
//! The tree pane shows one row per visible node. A node's children are visible
//! only while every ancestor is expanded. Rows are rebuilt from the tree and
//! the expanded set whenever either changes.

use crate::parser::ast::{self, Ast, ChildRole};
use crate::tree::NodeId;
use rustc_hash::FxHashSet;

/// One visible line of the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
    /// Role in the parent; `None` for the root
    pub role: Option<ChildRole>,
    pub has_children: bool,
    pub expanded: bool,
}

/// Rows in display order (pre-order, children in source order).
pub fn visible_rows(ast: &Ast, expanded: &FxHashSet<NodeId>) -> Vec<Row> {
    let mut rows = Vec::new();
    let Some(root) = ast.root() else {
        return rows;
    };

    // (node, depth, role), children pushed in reverse to pop in order
    let mut pending = vec![(root, 0, None)];
    while let Some((id, depth, role)) = pending.pop() {
        let children = ast::children(ast, id);
        let is_expanded = expanded.contains(&id);

        rows.push(Row {
            id,
            depth,
            role,
            has_children: !children.is_empty(),
            expanded: is_expanded,
        });

        if is_expanded {
            for (child_role, child) in children.into_iter().rev() {
                pending.push((child, depth + 1, Some(child_role)));
            }
        }
    }

    rows
}

/// Every node with at least one structural child.
pub fn expandable_nodes(ast: &Ast) -> FxHashSet<NodeId> {
    ast.iter()
        .map(|node| node.index)
        .filter(|&id| !ast::children(ast, id).is_empty())
        .collect()
}
