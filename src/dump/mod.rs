//! Renderers for parsed trees
//!
//! - [`text`]: indented outline, one node per line
//! - [`dot`]: Graphviz export of the raw arena links

pub mod dot;
pub mod text;

pub use dot::render_dot;
pub use text::render_text;
