//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`tree`]: Collapsible outline of the syntax tree with the selection
//! - [`source`]: Source code display with syntax highlighting and the selected node's line
//! - [`details`]: Arena record and child roles of the selected node
//! - [`status`]: Status bar with keybindings
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*_pane()` function (the status
//! bar uses `render_status_bar`) that draws from borrowed state and keeps its
//! own scroll offset up to date.

pub mod details;
pub mod source;
pub mod status;
pub mod tree;

// Re-export render functions for convenience
pub use details::render_details_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tree::render_tree_pane;
