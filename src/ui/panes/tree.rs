//! Syntax tree outline pane

use crate::parser::ast::{Ast, NodeKind};
use crate::ui::outline::Row;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn kind_style(kind: &NodeKind) -> Style {
    match kind {
        NodeKind::Program | NodeKind::Block => Style::default().fg(DEFAULT_THEME.type_name),
        NodeKind::NumberLiteral(_)
        | NodeKind::StringLiteral(_)
        | NodeKind::Identifier(_)
        | NodeKind::BoolLiteral(_) => Style::default().fg(DEFAULT_THEME.fg),
        _ => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
    }
}

fn payload_style(kind: &NodeKind) -> Style {
    match kind {
        NodeKind::NumberLiteral(_) | NodeKind::BoolLiteral(_) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        NodeKind::StringLiteral(_) => Style::default().fg(DEFAULT_THEME.string),
        NodeKind::BinaryOperation(_) | NodeKind::UnaryOperation(_) => {
            Style::default().fg(DEFAULT_THEME.operator)
        }
        _ => Style::default().fg(DEFAULT_THEME.secondary),
    }
}

/// Build the styled line for one outline row
fn row_line(ast: &Ast, row: &Row) -> Line<'static> {
    let node = ast.data(row.id);
    let marker = match (row.has_children, row.expanded) {
        (false, _) => "  ",
        (true, true) => "▾ ",
        (true, false) => "▸ ",
    };

    let mut spans = vec![
        Span::raw("  ".repeat(row.depth)),
        Span::styled(marker, Style::default().fg(DEFAULT_THEME.comment)),
    ];
    if let Some(role) = row.role {
        spans.push(Span::styled(
            format!("{}: ", role.label()),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    spans.push(Span::styled(node.kind.name(), kind_style(&node.kind)));
    if let Some(payload) = node.kind.payload() {
        spans.push(Span::styled(format!(" {}", payload), payload_style(&node.kind)));
    }

    Line::from(spans)
}

/// Render the tree outline pane
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    ast: &Ast,
    rows: &[Row],
    selected: usize,
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
        .title(format!(" Syntax Tree ({} nodes) ", ast.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let paragraph = Paragraph::new("(empty tree)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Keep the selection inside the window
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, row)| {
            let mut line = row_line(ast, row);
            if idx == selected {
                let highlight = Style::default()
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD);
                for span in &mut line.spans {
                    span.style = span.style.patch(highlight);
                }
            }
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
