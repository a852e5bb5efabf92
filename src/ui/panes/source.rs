//! Source code pane rendering with syntax highlighting
//!
//! This module renders the program text next to the tree outline and
//! highlights the line the selected node starts on.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, literals, strings, and `//` markers
//! - Selected-node line highlighting with a bold line number
//! - Scroll state that keeps the highlighted line at a stable row
//! - Line numbering
//!
//! # Rendering
//!
//! Highlighting works line by line with a small character scanner; it does
//! not run the tokenizer, so strings spanning lines are only coloured on their
//! first line.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Syntax highlighting for one source line
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;
    let mut chars = line.char_indices().peekable();

    fn flush<'a>(spans: &mut Vec<Span<'a>>, line: &'a str, start: &mut Option<usize>, end: usize) {
        if let Some(begin) = start.take() {
            let word = &line[begin..end];
            spans.push(Span::styled(word, get_word_style(word)));
        }
    }

    while let Some((i, c)) = chars.next() {
        // The tokenizer skips only the `//` marker; what follows is still code
        if c == '/' && matches!(chars.peek(), Some((_, '/'))) {
            flush(&mut spans, line, &mut word_start, i);
            chars.next();
            spans.push(Span::styled(
                &line[i..i + 2],
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            continue;
        }

        if c == '"' {
            flush(&mut spans, line, &mut word_start, i);
            let mut end = line.len();
            for (j, next) in chars.by_ref() {
                if next == '"' {
                    end = j + 1;
                    break;
                }
            }
            spans.push(Span::styled(
                &line[i..end],
                Style::default().fg(DEFAULT_THEME.string),
            ));
            continue;
        }

        if c.is_ascii_alphanumeric() || c == '_' || (c == '.' && word_start.is_some()) {
            word_start.get_or_insert(i);
            continue;
        }

        flush(&mut spans, line, &mut word_start, i);
        let style = match c {
            '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary), // Brackets
            '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|' | '!' | '<' | '>' => {
                Style::default().fg(DEFAULT_THEME.operator)
            } // Operators
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(&line[i..i + c.len_utf8()], style));
    }

    flush(&mut spans, line, &mut word_start, line.len());
    Line::from(spans)
}

fn get_word_style(word: &str) -> Style {
    match word {
        "var" | "if" | "else" | "while" | "print" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD), // Keywords
        "true" | "false" => Style::default().fg(DEFAULT_THEME.number), // Constants
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ => Style::default().fg(DEFAULT_THEME.fg), // Identifiers
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Start with the highlighted line centered
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        let target_line_idx = current_line - 1;
        scroll_state.offset = target_line_idx.saturating_sub(target_row);

        if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            scroll_state.offset = scroll_state.offset.min(max_scroll);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                let background = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(background);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
