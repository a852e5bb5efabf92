//! Source code parser
//!
//! This module transforms program text into an arena syntax tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parser`]: Parsing (tokens → tree)
//! - [`ast`]: Node payloads and the operand layout of each node kind
//!
//! # Language
//!
//! - Statements: `var` declarations, assignments, `if`/`else`, `while`,
//!   `print`, and `{ }` blocks
//! - Expressions: arithmetic, comparison, `&&`/`||`, unary `-` and `!`,
//!   parentheses
//! - Literals: numbers, double-quoted strings, `true`/`false`
//! - Line comments start with `//`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parser;

use ast::Ast;
use parser::{ParseError, Parser};

/// Parse a complete program into its syntax tree.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()?;
    Ok(parser.into_tree())
}
