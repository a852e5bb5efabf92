//! Main TUI application state and logic

use crate::parser::ast::Ast;
use crate::tree::NodeId;
use crate::ui::outline::{self, Row};
use crate::ui::panes::{self, SourceScrollState};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashSet;
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Tree,
    Source,
    Details,
}

impl FocusedPane {
    /// Move focus to the next pane (tree -> source -> details)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Source,
            FocusedPane::Source => FocusedPane::Details,
            FocusedPane::Details => FocusedPane::Tree,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Tree => FocusedPane::Details,
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Details => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// The parsed program
    pub ast: Ast,

    /// The source code the tree was parsed from
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Nodes whose children are shown in the outline
    pub expanded: FxHashSet<NodeId>,

    /// Visible outline rows, rebuilt when `expanded` changes
    rows: Vec<Row>,

    /// Index into `rows` of the selected row
    pub selected: usize,

    /// Per-pane scroll offsets
    pub tree_scroll: usize,
    pub source_scroll: SourceScrollState,
    pub details_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app with the program root expanded
    pub fn new(ast: Ast, source_code: String) -> Self {
        let mut expanded = FxHashSet::default();
        if let Some(root) = ast.root() {
            expanded.insert(root);
        }

        let mut app = App {
            ast,
            source_code,
            focused_pane: FocusedPane::Tree,
            expanded,
            rows: Vec::new(),
            selected: 0,
            tree_scroll: 0,
            source_scroll: SourceScrollState::default(),
            details_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
        };
        app.refresh_rows();
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Rows currently shown by the outline
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Node under the selection, if the tree is not empty
    pub fn selected_node(&self) -> Option<NodeId> {
        self.rows.get(self.selected).map(|row| row.id)
    }

    fn refresh_rows(&mut self) {
        self.rows = outline::visible_rows(&self.ast, &self.expanded);
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Tree on the left, source and details stacked on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[1]);

        let selected = self.selected_node();
        let current_line = selected.map_or(0, |id| self.ast.data(id).line);

        panes::render_tree_pane(
            frame,
            columns[0],
            &self.ast,
            &self.rows,
            self.selected,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_source_pane(
            frame,
            right_rows[0],
            &self.source_code,
            current_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_details_pane(
            frame,
            right_rows[1],
            &self.ast,
            selected,
            self.focused_pane == FocusedPane::Details,
            &mut self.details_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.selected,
            self.rows.len(),
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Tree => self.select(self.selected.saturating_sub(1)),
                FocusedPane::Source => {
                    // Scrolling up makes the highlighted line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Details => {
                    self.details_scroll = self.details_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Tree => self.select(self.selected.saturating_add(1)),
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Details => {
                    self.details_scroll = self.details_scroll.saturating_add(1);
                }
            },
            KeyCode::Right | KeyCode::Enter => self.expand_selected(),
            KeyCode::Left => self.collapse_selected(),
            KeyCode::Char('e') => {
                self.expanded = outline::expandable_nodes(&self.ast);
                self.refresh_rows();
                self.status_message = "Expanded all".to_string();
            }
            KeyCode::Char('c') => {
                self.expanded.clear();
                self.selected = 0;
                self.tree_scroll = 0;
                self.refresh_rows();
                self.status_message = "Collapsed all".to_string();
            }
            _ => {}
        }
    }

    fn select(&mut self, row: usize) {
        if self.rows.is_empty() {
            return;
        }
        self.selected = row.min(self.rows.len() - 1);
        self.details_scroll = 0;
        if let Some(id) = self.selected_node() {
            let node = self.ast.data(id);
            self.status_message = format!("{} at line {}", node.kind.name(), node.line);
        }
    }

    fn expand_selected(&mut self) {
        let Some(row) = self.rows.get(self.selected) else {
            return;
        };
        if row.has_children && !row.expanded {
            self.expanded.insert(row.id);
            self.refresh_rows();
        }
    }

    /// Collapse the selected node, or move to its parent row if it has
    /// nothing to collapse.
    fn collapse_selected(&mut self) {
        let Some(row) = self.rows.get(self.selected).cloned() else {
            return;
        };

        if row.expanded {
            self.expanded.remove(&row.id);
            self.refresh_rows();
            return;
        }

        if let Some(parent_row) = self.rows[..self.selected]
            .iter()
            .rposition(|candidate| candidate.depth + 1 == row.depth)
        {
            self.select(parent_row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn app_for(source: &str) -> App {
        App::new(parse(source).unwrap(), source.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code));
    }

    #[test]
    fn test_new_app_shows_root_and_statements() {
        let app = app_for("x = 1;\ny = 2;");
        assert_eq!(app.rows().len(), 3);
        assert_eq!(app.selected_node(), Some(0));
        assert_eq!(app.focused_pane, FocusedPane::Tree);
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app_for("x = 1;");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 0);
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected, 1);
        assert!(app.status_message.starts_with("ASSIGNMENT"));
    }

    #[test]
    fn test_expand_and_collapse() {
        let mut app = app_for("x = 1;");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.rows().len(), 4);

        // select the name row, then collapse back to its parent
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_expand_all_then_collapse_all() {
        let mut app = app_for("while (i < 3) { i = i + 1; }");
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.rows().len(), app.ast.len());

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_focus_cycles_and_quit() {
        let mut app = app_for("");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Tree);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
