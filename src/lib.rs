//! # Introduction
//!
//! twig tokenizes and parses a small imperative language into an arena syntax
//! tree, then renders the tree as text, as Graphviz DOT, or in an interactive
//! terminal browser built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Tokenizer → Parser → Tree<AstNode> → dump / TUI
//! ```
//!
//! 1. [`parser`]: pulls tokens from the [`parser::lexer::Tokenizer`] and
//!    builds the tree by recursive descent.
//! 2. [`tree`]: the generic index-addressed arena the parser builds into.
//! 3. [`dump`]: indented text and DOT renderers.
//! 4. [`ui`]: ratatui-based tree browser; not part of the stable library API.
//! 5. [`logger`]: stderr backend for the `log` facade used by the binary.
//!
//! ## Example
//!
//! ```
//! let ast = twig::parser::parse("var x = 1 + 2 * 3;").unwrap();
//! let text = twig::dump::render_text(&ast);
//! assert!(text.contains("BINARY_OPERATION [*]"));
//! ```

pub mod dump;
pub mod logger;
pub mod parser;
pub mod tree;
pub mod ui;
