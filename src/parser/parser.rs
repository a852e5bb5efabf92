//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the [`ParseError`] type, the
//! token helpers and the statement productions. Expression parsing lives in
//! `expressions`, which extends `Parser` with its own `impl` block.
//!
//! # Tree building
//!
//! The parser owns the [`Ast`] while it is being built. Grammar operands are
//! hung on the operand links (`insert_on_left` / `insert_on_right`); statements
//! are appended to the innermost open Program/Block, tracked on an explicit
//! stack of insertion targets.
//!
//! # Errors
//!
//! There is no recovery: the first unmet expectation or invalid token ends the
//! parse with a [`ParseError`].

use crate::parser::ast::{Ast, AstNode, NodeKind};
use crate::parser::lexer::{Token, TokenKind, Tokenizer};
use crate::tree::{NodeId, TreeError};
use log::{debug, info};
use thiserror::Error;

/// Index of the Program node in every parsed tree
pub const ROOT: NodeId = 0;

/// Deepest allowed nesting of blocks and parenthesized expressions
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error at line {line}: expected {expected} in {production}, found {found}")]
    UnexpectedToken {
        production: &'static str,
        expected: TokenKind,
        found: String,
        line: usize,
    },

    #[error("Parse error at line {line}: unknown statement starting with {found}")]
    UnknownStatement { found: String, line: usize },

    #[error("Parse error at line {line}: expected expression, found {found}")]
    UnexpectedExpression { found: String, line: usize },

    #[error("Lexical error at line {line}: {message}")]
    Lex { message: String, line: usize },

    #[error("Parse error at line {line}: invalid number literal '{lexeme}'")]
    InvalidNumber { lexeme: String, line: usize },

    #[error("Parse error at line {line}: nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize, line: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ParseError {
    /// Source line the error points at, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedToken { line, .. }
            | ParseError::UnknownStatement { line, .. }
            | ParseError::UnexpectedExpression { line, .. }
            | ParseError::Lex { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::NestingTooDeep { line, .. } => Some(*line),
            ParseError::Tree(_) => None,
        }
    }
}

/// Recursive descent parser with single-token lookahead
pub struct Parser<'src> {
    tokenizer: Tokenizer<'src>,
    pub(crate) current: Token<'src>,
    pub(crate) tree: Ast,
    open_blocks: Vec<NodeId>,
    /// Open blocks and parentheses around the current token
    depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser and read the first lookahead token.
    pub fn new(source: &'src str) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::new(source);
        let current = tokenizer.next_token();
        let parser = Self {
            tokenizer,
            current,
            tree: Ast::new(),
            open_blocks: Vec::new(),
            depth: 0,
        };
        parser.reject_error_token()?;
        Ok(parser)
    }

    /// Parse the whole program and return the root index.
    ///
    /// The Program node is created on the first call; statements are appended
    /// to it until end of input.
    pub fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let root = match self.tree.root() {
            Some(root) => root,
            None => self.new_node(NodeKind::Program, 1)?,
        };
        self.open_blocks.clear();
        self.open_blocks.push(root);
        self.depth = 0;

        while !self.check(TokenKind::Eof) {
            let statement = self.parse_statement()?;
            self.attach_statement(statement);
        }

        self.open_blocks.pop();
        info!("parsed program: {} nodes", self.tree.len());
        Ok(root)
    }

    /// The tree built so far
    pub fn tree(&self) -> &Ast {
        &self.tree
    }

    /// Hand the finished tree to the caller.
    pub fn into_tree(self) -> Ast {
        self.tree
    }

    /// Program/Block node that receives the next top-level statement.
    pub fn insertion_target(&self) -> Option<NodeId> {
        self.open_blocks.last().copied()
    }

    fn attach_statement(&mut self, statement: NodeId) {
        let target = self.insertion_target().unwrap_or(ROOT);
        self.tree.append_child(target, statement);
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        let statement = match self.current.kind {
            TokenKind::Var => self.parse_var_declaration()?,
            TokenKind::Identifier => self.parse_assignment()?,
            TokenKind::If => self.parse_if()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::LBrace => self.parse_block()?,
            TokenKind::Print => self.parse_print()?,
            _ => {
                return Err(ParseError::UnknownStatement {
                    found: self.current.to_string(),
                    line: self.current.line,
                })
            }
        };

        let node = self.tree.data(statement);
        debug!("parsed {} at line {}", node.kind.name(), node.line);
        Ok(statement)
    }

    /// `var name = expression ;`
    fn parse_var_declaration(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        self.advance()?;

        let (name, name_line) = self.expect_identifier("variable declaration")?;
        self.expect(TokenKind::Eq, "variable declaration")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "variable declaration")?;

        let declaration = self.new_node(NodeKind::VarDeclaration, line)?;
        let name_node = self.new_node(NodeKind::Identifier(name), name_line)?;
        self.tree.insert_on_left(declaration, Some(name_node));
        self.tree.insert_on_right(declaration, Some(value));

        Ok(declaration)
    }

    /// `name = expression ;`
    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let (name, line) = self.expect_identifier("assignment")?;
        self.expect(TokenKind::Eq, "assignment")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "assignment")?;

        let assignment = self.new_node(NodeKind::Assignment, line)?;
        let name_node = self.new_node(NodeKind::Identifier(name), line)?;
        self.tree.insert_on_left(assignment, Some(name_node));
        self.tree.insert_on_right(assignment, Some(value));

        Ok(assignment)
    }

    /// `if ( condition ) block [else block]`
    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        self.advance()?;

        self.expect(TokenKind::LParen, "if statement")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "if statement")?;

        let then_block = self.parse_block()?;
        let else_block = if self.check(TokenKind::Else) {
            self.advance()?;
            Some(self.parse_block()?)
        } else {
            None
        };

        let if_node = self.new_node(NodeKind::If, line)?;
        self.tree.insert_on_left(if_node, Some(condition));
        self.tree.insert_on_right(if_node, Some(then_block));
        self.tree.insert_on_right(if_node, else_block);

        Ok(if_node)
    }

    /// `while ( condition ) block`
    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        self.advance()?;

        self.expect(TokenKind::LParen, "while statement")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "while statement")?;
        let body = self.parse_block()?;

        let while_node = self.new_node(NodeKind::While, line)?;
        self.tree.insert_on_left(while_node, Some(condition));
        self.tree.insert_on_right(while_node, Some(body));

        Ok(while_node)
    }

    /// `print expression ;`
    fn parse_print(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        self.advance()?;

        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon, "print statement")?;

        let print_node = self.new_node(NodeKind::Print, line)?;
        self.tree.insert_on_left(print_node, Some(value));

        Ok(print_node)
    }

    /// `{ statement* }`
    ///
    /// The block is the insertion target while its body is parsed; the caller
    /// attaches the returned node through an operand link.
    pub(crate) fn parse_block(&mut self) -> Result<NodeId, ParseError> {
        let line = self.current.line;
        self.expect(TokenKind::LBrace, "block")?;

        self.enter_nesting(line)?;
        let block = self.new_node(NodeKind::Block, line)?;
        self.open_blocks.push(block);

        while !self.check(TokenKind::RBrace) && !self.check(TokenKind::Eof) {
            let statement = self.parse_statement()?;
            self.attach_statement(statement);
        }

        self.expect(TokenKind::RBrace, "block")?;
        self.open_blocks.pop();
        self.leave_nesting();

        Ok(block)
    }

    // ===== Helper methods =====

    /// Account for one more level of recursion; fails past [`MAX_NESTING_DEPTH`].
    pub(crate) fn enter_nesting(&mut self, line: usize) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave_nesting(&mut self) {
        self.depth -= 1;
    }

    pub(crate) fn new_node(&mut self, kind: NodeKind, line: usize) -> Result<NodeId, ParseError> {
        Ok(self.tree.create_node(AstNode::new(kind, line))?)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Move to the next token; an error token ends the parse.
    pub(crate) fn advance(&mut self) -> Result<Token<'src>, ParseError> {
        let previous = self.current;
        self.current = self.tokenizer.next_token();
        self.reject_error_token()?;
        Ok(previous)
    }

    fn reject_error_token(&self) -> Result<(), ParseError> {
        if self.current.is_error() {
            return Err(ParseError::Lex {
                message: self.current.lexeme.to_string(),
                line: self.current.line,
            });
        }
        Ok(())
    }

    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        production: &'static str,
    ) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(ParseError::UnexpectedToken {
                production,
                expected: kind,
                found: self.current.to_string(),
                line: self.current.line,
            })
        }
    }

    fn expect_identifier(
        &mut self,
        production: &'static str,
    ) -> Result<(String, usize), ParseError> {
        let token = self.expect(TokenKind::Identifier, production)?;
        Ok((token.lexeme.to_string(), token.line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_tree(source: &str) -> Ast {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap();
        parser.into_tree()
    }

    #[test]
    fn test_parse_empty_program() {
        let ast = parse_tree("");
        assert_eq!(ast.len(), 1);
        assert_eq!(ast.data(ROOT).kind, NodeKind::Program);
        assert!(ast.is_leaf(ROOT));
    }

    #[test]
    fn test_parse_var_declaration() {
        let ast = parse_tree("var x = 5;");
        let declaration = ast.first_child(ROOT).unwrap();
        assert_eq!(ast.data(declaration).kind, NodeKind::VarDeclaration);

        let name = ast.left(declaration).unwrap();
        assert_eq!(ast.data(name).kind, NodeKind::Identifier("x".to_string()));
        let value = ast.right(declaration).unwrap();
        assert_eq!(ast.data(value).kind, NodeKind::NumberLiteral(5.0));
        assert_eq!(ast.parent(value), Some(declaration));
    }

    #[test]
    fn test_parse_while_statement() {
        let ast = parse_tree("while (i < 10) { i = i + 1; }");
        let while_node = ast.first_child(ROOT).unwrap();
        assert_eq!(ast.data(while_node).kind, NodeKind::While);

        let body = ast.right(while_node).unwrap();
        assert_eq!(ast.data(body).kind, NodeKind::Block);
        assert_eq!(ast.children(body).count(), 1);
    }

    #[test]
    fn test_parse_if_else() {
        let ast = parse_tree("if (a) { b = 1; } else { b = 2; c = 3; }");
        let if_node = ast.first_child(ROOT).unwrap();
        let (then_block, else_block) = crate::parser::ast::if_branches(&ast, if_node);
        assert_eq!(ast.children(then_block.unwrap()).count(), 1);
        assert_eq!(ast.children(else_block.unwrap()).count(), 2);
    }

    #[test]
    fn test_nested_blocks_restore_insertion_target() {
        let ast = parse_tree("{ { a = 1; } b = 2; } c = 3;");
        let statements: Vec<NodeId> = ast.children(ROOT).collect();
        assert_eq!(statements.len(), 2);

        let outer = statements[0];
        let inner: Vec<NodeId> = ast.children(outer).collect();
        assert_eq!(inner.len(), 2);
        assert_eq!(ast.data(inner[0]).kind, NodeKind::Block);
        assert_eq!(ast.data(inner[1]).kind, NodeKind::Assignment);
        assert_eq!(ast.data(statements[1]).kind, NodeKind::Assignment);
    }

    #[test]
    fn test_print_statement() {
        let ast = parse_tree("print x;");
        let print_node = ast.first_child(ROOT).unwrap();
        assert_eq!(ast.data(print_node).kind, NodeKind::Print);
        let value = ast.left(print_node).unwrap();
        assert_eq!(ast.data(value).kind, NodeKind::Identifier("x".to_string()));
    }

    #[test]
    fn test_missing_semicolon() {
        let mut parser = Parser::new("x = 1").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::Semicolon,
                ..
            }
        ));
    }

    #[test]
    fn test_if_requires_closing_paren() {
        let mut parser = Parser::new("if (x ( { }").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: TokenKind::RParen,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_statement() {
        let mut parser = Parser::new("\n+ 1;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownStatement {
                found: "'+'".to_string(),
                line: 2,
            }
        );
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_lex_error_in_first_token() {
        let err = Parser::new("@").err().unwrap();
        assert!(matches!(err, ParseError::Lex { line: 1, .. }));
    }

    #[test]
    fn test_nested_blocks_up_to_limit() {
        let depth = MAX_NESTING_DEPTH;
        let source = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        let ast = parse_tree(&source);
        assert_eq!(ast.len(), 1 + depth);
    }

    #[test]
    fn test_blocks_past_limit_are_rejected() {
        let source = "{".repeat(100_000);
        let mut parser = Parser::new(&source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                line: 1,
            }
        );
    }

    #[test]
    fn test_insertion_target_is_empty_after_parse() {
        let mut parser = Parser::new("{ a = 1; }").unwrap();
        parser.parse_program().unwrap();
        assert_eq!(parser.insertion_target(), None);
    }
}
