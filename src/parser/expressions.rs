//! Expression parsing implementation
//!
//! Expressions are parsed by a precedence ladder, one method per level, from
//! loosest to tightest:
//!
//! ```text
//! ||  →  &&  →  == !=  →  < > <= >=  →  + -  →  * / %  →  unary ! -  →  primary
//! ```
//!
//! Every binary level is a left fold: the accumulated left operand and the
//! next operand become a new `BinaryOperation` node, which is the new left
//! operand. Prefix operators are collected in a loop and applied from the
//! operand outward, so `--x` and `!!x` nest without recursing per operator.
//! Parentheses recurse and count towards the parser's nesting limit.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::{BinOp, NodeKind, UnOp};
use crate::parser::lexer::TokenKind;
use crate::parser::parser::{ParseError, Parser};
use crate::tree::NodeId;

type Operand<'src> = fn(&mut Parser<'src>) -> Result<NodeId, ParseError>;

impl<'src> Parser<'src> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_logical_or()
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(&[BinOp::Or], Self::parse_logical_and)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(&[BinOp::And], Self::parse_equality)
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(&[BinOp::Eq, BinOp::Ne], Self::parse_relational)
    }

    /// Parse relational (< > <= >=)
    fn parse_relational(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(
            &[BinOp::Lt, BinOp::Gt, BinOp::Le, BinOp::Ge],
            Self::parse_additive,
        )
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(&[BinOp::Add, BinOp::Sub], Self::parse_multiplicative)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary_level(&[BinOp::Mul, BinOp::Div, BinOp::Mod], Self::parse_unary)
    }

    fn parse_binary_level(
        &mut self,
        operators: &[BinOp],
        operand: Operand<'src>,
    ) -> Result<NodeId, ParseError> {
        let mut left = operand(self)?;

        while let Some(op) =
            BinOp::from_token(self.current.kind).filter(|op| operators.contains(op))
        {
            let line = self.advance()?.line;
            let right = operand(self)?;

            let node = self.new_node(NodeKind::BinaryOperation(op), line)?;
            self.tree.insert_on_left(node, Some(left));
            self.tree.insert_on_right(node, Some(right));
            left = node;
        }

        Ok(left)
    }

    /// Parse unary (! -)
    fn parse_unary(&mut self) -> Result<NodeId, ParseError> {
        let mut prefixes = Vec::new();
        while let Some(op) = UnOp::from_token(self.current.kind) {
            let line = self.advance()?.line;
            prefixes.push((op, line));
        }

        let mut operand = self.parse_primary()?;
        for (op, line) in prefixes.into_iter().rev() {
            let node = self.new_node(NodeKind::UnaryOperation(op), line)?;
            self.tree.insert_on_left(node, Some(operand));
            operand = node;
        }

        Ok(operand)
    }

    /// Parse primary (literals, names, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<NodeId, ParseError> {
        let token = self.current;

        match token.kind {
            TokenKind::Number => {
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber {
                        lexeme: token.lexeme.to_string(),
                        line: token.line,
                    })?;
                let node = self.new_node(NodeKind::NumberLiteral(value), token.line)?;
                self.advance()?;
                Ok(node)
            }
            TokenKind::Identifier => {
                let kind = match token.lexeme {
                    "true" => NodeKind::BoolLiteral(true),
                    "false" => NodeKind::BoolLiteral(false),
                    name => NodeKind::Identifier(name.to_string()),
                };
                let node = self.new_node(kind, token.line)?;
                self.advance()?;
                Ok(node)
            }
            TokenKind::String => {
                let text = token
                    .lexeme
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .unwrap_or(token.lexeme);
                let node = self.new_node(NodeKind::StringLiteral(text.to_string()), token.line)?;
                self.advance()?;
                Ok(node)
            }
            TokenKind::LParen => {
                self.enter_nesting(token.line)?;
                self.advance()?;
                let expression = self.parse_expression()?;
                self.expect(TokenKind::RParen, "parenthesized expression")?;
                self.leave_nesting();
                Ok(expression)
            }
            _ => Err(ParseError::UnexpectedExpression {
                found: token.to_string(),
                line: token.line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Ast, BinOp, NodeKind, UnOp};
    use crate::parser::parser::{ParseError, Parser, MAX_NESTING_DEPTH, ROOT};
    use crate::tree::NodeId;

    /// Parse `var v = <expr>;` and return the tree and the initializer.
    fn parse_initializer(expr: &str) -> (Ast, NodeId) {
        let source = format!("var v = {};", expr);
        let mut parser = Parser::new(&source).unwrap();
        parser.parse_program().unwrap();
        let ast = parser.into_tree();
        let declaration = ast.first_child(ROOT).unwrap();
        let value = ast.right(declaration).unwrap();
        (ast, value)
    }

    fn op_of(ast: &Ast, id: NodeId) -> BinOp {
        match ast.data(id).kind {
            NodeKind::BinaryOperation(op) => op,
            ref other => panic!("expected binary operation, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let (ast, value) = parse_initializer("1 + 2 * 3");
        assert_eq!(op_of(&ast, value), BinOp::Add);
        let right = ast.right(value).unwrap();
        assert_eq!(op_of(&ast, right), BinOp::Mul);
        let left = ast.left(value).unwrap();
        assert_eq!(ast.data(left).kind, NodeKind::NumberLiteral(1.0));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let (ast, value) = parse_initializer("10 - 4 - 3");
        assert_eq!(op_of(&ast, value), BinOp::Sub);
        let left = ast.left(value).unwrap();
        assert_eq!(op_of(&ast, left), BinOp::Sub);
        let right = ast.right(value).unwrap();
        assert_eq!(ast.data(right).kind, NodeKind::NumberLiteral(3.0));
    }

    #[test]
    fn test_logical_ladder() {
        let (ast, value) = parse_initializer("a || b && c == d");
        assert_eq!(op_of(&ast, value), BinOp::Or);
        let and = ast.right(value).unwrap();
        assert_eq!(op_of(&ast, and), BinOp::And);
        let eq = ast.right(and).unwrap();
        assert_eq!(op_of(&ast, eq), BinOp::Eq);
    }

    #[test]
    fn test_relational_below_additive() {
        let (ast, value) = parse_initializer("a + 1 >= b % 2");
        assert_eq!(op_of(&ast, value), BinOp::Ge);
        assert_eq!(op_of(&ast, ast.left(value).unwrap()), BinOp::Add);
        assert_eq!(op_of(&ast, ast.right(value).unwrap()), BinOp::Mod);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let (ast, value) = parse_initializer("(1 + 2) * 3");
        assert_eq!(op_of(&ast, value), BinOp::Mul);
        assert_eq!(op_of(&ast, ast.left(value).unwrap()), BinOp::Add);
    }

    #[test]
    fn test_chained_unary_operators() {
        let (ast, value) = parse_initializer("--x");
        assert_eq!(ast.data(value).kind, NodeKind::UnaryOperation(UnOp::Neg));
        let inner = ast.left(value).unwrap();
        assert_eq!(ast.data(inner).kind, NodeKind::UnaryOperation(UnOp::Neg));
        let operand = ast.left(inner).unwrap();
        assert_eq!(ast.data(operand).kind, NodeKind::Identifier("x".to_string()));
        assert_eq!(ast.right(value), None);
    }

    #[test]
    fn test_long_prefix_chain() {
        let (ast, value) = parse_initializer(&format!("{}1", "-".repeat(200_000)));

        let mut id = value;
        let mut negations = 0;
        while let NodeKind::UnaryOperation(UnOp::Neg) = ast.data(id).kind {
            negations += 1;
            id = ast.left(id).unwrap();
        }
        assert_eq!(negations, 200_000);
        assert_eq!(ast.data(id).kind, NodeKind::NumberLiteral(1.0));
    }

    #[test]
    fn test_mixed_prefixes_apply_innermost_last() {
        let (ast, value) = parse_initializer("!-x");
        assert_eq!(ast.data(value).kind, NodeKind::UnaryOperation(UnOp::Not));
        let inner = ast.left(value).unwrap();
        assert_eq!(ast.data(inner).kind, NodeKind::UnaryOperation(UnOp::Neg));
    }

    #[test]
    fn test_parentheses_past_limit_are_rejected() {
        let depth = 100_000;
        let source = format!("var v = {}1{};", "(".repeat(depth), ")".repeat(depth));
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
    fn test_nesting_depth_is_restored_after_parentheses() {
        // each group closes before the next opens
        let group = format!("{}1{}", "(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
        let (ast, value) = parse_initializer(&format!("{} + {}", group, group));
        assert_eq!(op_of(&ast, value), BinOp::Add);
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        let (ast, value) = parse_initializer("!a && b");
        assert_eq!(op_of(&ast, value), BinOp::And);
        let left = ast.left(value).unwrap();
        assert_eq!(ast.data(left).kind, NodeKind::UnaryOperation(UnOp::Not));
    }

    #[test]
    fn test_literals() {
        let (ast, value) = parse_initializer("\"hello\"");
        assert_eq!(ast.data(value).kind, NodeKind::StringLiteral("hello".to_string()));

        let (ast, value) = parse_initializer("true");
        assert_eq!(ast.data(value).kind, NodeKind::BoolLiteral(true));

        let (ast, value) = parse_initializer("12.5");
        assert_eq!(ast.data(value).kind, NodeKind::NumberLiteral(12.5));
    }

    #[test]
    fn test_missing_operand() {
        let mut parser = Parser::new("var v = 1 + ;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedExpression {
                found: "';'".to_string(),
                line: 1,
            }
        );
    }

    #[test]
    fn test_unclosed_parenthesis() {
        let mut parser = Parser::new("var v = (1 + 2;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { production: "parenthesized expression", .. }));
    }
}
