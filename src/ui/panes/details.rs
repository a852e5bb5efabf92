//! Node details pane
//!
//! Shows the raw arena record of the selected node (index, links, line) and
//! the structural roles of its children.

use crate::parser::ast::{self, Ast};
use crate::tree::NodeId;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

fn describe(ast: &Ast, id: Option<NodeId>) -> String {
    match id {
        Some(id) => format!("#{} {}", id, ast.data(id).kind.name()),
        None => "none".to_string(),
    }
}

/// Label/value pairs describing one node
pub fn detail_rows(ast: &Ast, id: NodeId) -> Vec<(&'static str, String)> {
    let node = ast.data(id);
    let mut rows = vec![
        ("index", format!("#{}", id)),
        ("kind", node.kind.name().to_string()),
    ];
    if let Some(payload) = node.kind.payload() {
        rows.push(("value", payload));
    }
    rows.push(("line", node.line.to_string()));
    rows.push(("parent", describe(ast, ast.parent(id))));
    rows.push(("left", describe(ast, ast.left(id))));
    rows.push(("right", describe(ast, ast.right(id))));
    if node.kind.is_container() {
        rows.push(("statements", ast.children(id).count().to_string()));
    }

    for (role, child) in ast::children(ast, id) {
        rows.push((role.label(), describe(ast, Some(child))));
    }

    rows
}

/// Render the details pane for the selected node
pub fn render_details_pane(
    frame: &mut Frame,
    area: Rect,
    ast: &Ast,
    selected: Option<NodeId>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Node ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let Some(id) = selected else {
        let paragraph = Paragraph::new("(no node selected)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = detail_rows(ast, id);
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(rows.len().saturating_sub(visible_height));

    let lines: Vec<Line> = rows
        .into_iter()
        .skip(*scroll_offset)
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{:<11}", label),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(value, Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_details_of_binary_operation() {
        let ast = parse("var x = a + 2;").unwrap();
        let declaration = ast.first_child(0).unwrap();
        let sum = ast.right(declaration).unwrap();
        let rows = detail_rows(&ast, sum);

        let get = |label: &str| {
            rows.iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("kind").as_deref(), Some("BINARY_OPERATION"));
        assert_eq!(get("value").as_deref(), Some("+"));
        assert_eq!(get("line").as_deref(), Some("1"));
        assert_eq!(get("parent"), Some(format!("#{} VAR_DECLARATION", declaration)));
        assert_eq!(get("lhs"), Some("#1 IDENTIFIER".to_string()));
        assert_eq!(get("statements"), None);
    }

    #[test]
    fn test_details_of_root() {
        let ast = parse("x = 1; y = 2;").unwrap();
        let rows = detail_rows(&ast, 0);
        assert!(rows.contains(&("parent", "none".to_string())));
        assert!(rows.contains(&("statements", "2".to_string())));
        assert_eq!(rows.iter().filter(|(label, _)| *label == "stmt").count(), 2);
    }
}
