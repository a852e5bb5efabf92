// AST definitions for twig programs

use super::lexer::TokenKind;
use crate::tree::{NodeId, Tree};
use std::fmt;

/// The syntax tree: an arena of [`AstNode`]s rooted at index 0 (the program)
pub type Ast = Tree<AstNode>;

/// Binary operators, one per binary operator token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::Ge,
            TokenKind::AndAnd => BinOp::And,
            TokenKind::OrOr => BinOp::Or,
            _ => return None,
        };
        Some(op)
    }

    /// The operator token this node was built from
    pub fn token(self) -> TokenKind {
        match self {
            BinOp::Add => TokenKind::Plus,
            BinOp::Sub => TokenKind::Minus,
            BinOp::Mul => TokenKind::Star,
            BinOp::Div => TokenKind::Slash,
            BinOp::Mod => TokenKind::Percent,
            BinOp::Eq => TokenKind::EqEq,
            BinOp::Ne => TokenKind::BangEq,
            BinOp::Lt => TokenKind::Lt,
            BinOp::Le => TokenKind::LtEq,
            BinOp::Gt => TokenKind::Gt,
            BinOp::Ge => TokenKind::GtEq,
            BinOp::And => TokenKind::AndAnd,
            BinOp::Or => TokenKind::OrOr,
        }
    }

    pub fn symbol(self) -> &'static str {
        self.token().symbol().unwrap_or("?")
    }
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnOp {
    Neg, // -x
    Not, // !x
}

impl UnOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            _ => None,
        }
    }

    pub fn token(self) -> TokenKind {
        match self {
            UnOp::Neg => TokenKind::Minus,
            UnOp::Not => TokenKind::Bang,
        }
    }

    pub fn symbol(self) -> &'static str {
        self.token().symbol().unwrap_or("?")
    }
}

/// Node payload, discriminated by syntactic category
///
/// Operand layout on the tree links:
/// - `VarDeclaration`, `Assignment`: left = name, right = value
/// - `If`: left = condition, right = then block; an else block is inserted on
///   the right after it, which moves the then block to the else block's right
/// - `While`: left = condition, right = body
/// - `BinaryOperation`: left/right operands; `UnaryOperation`, `Print`: left
/// - `Program`, `Block`: statements on the ordered child list
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program,
    VarDeclaration,
    Assignment,
    If,
    While,
    Block,
    Print,
    BinaryOperation(BinOp),
    UnaryOperation(UnOp),
    NumberLiteral(f64),
    StringLiteral(String),
    Identifier(String),
    BoolLiteral(bool),
}

impl NodeKind {
    /// Upper-case display name used by the dumps
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::VarDeclaration => "VAR_DECLARATION",
            NodeKind::Assignment => "ASSIGNMENT",
            NodeKind::If => "IF",
            NodeKind::While => "WHILE",
            NodeKind::Block => "BLOCK",
            NodeKind::Print => "PRINT",
            NodeKind::BinaryOperation(_) => "BINARY_OPERATION",
            NodeKind::UnaryOperation(_) => "UNARY_OPERATION",
            NodeKind::NumberLiteral(_) => "NUMBER",
            NodeKind::StringLiteral(_) => "STRING",
            NodeKind::Identifier(_) => "IDENTIFIER",
            NodeKind::BoolLiteral(_) => "BOOL",
        }
    }

    /// Literal value, name or operator symbol carried by the node
    pub fn payload(&self) -> Option<String> {
        match self {
            NodeKind::NumberLiteral(value) => Some(value.to_string()),
            NodeKind::StringLiteral(text) => Some(format!("\"{}\"", text)),
            NodeKind::Identifier(name) => Some(name.clone()),
            NodeKind::BoolLiteral(value) => Some(value.to_string()),
            NodeKind::BinaryOperation(op) => Some(op.symbol().to_string()),
            NodeKind::UnaryOperation(op) => Some(op.symbol().to_string()),
            _ => None,
        }
    }

    /// Nodes that hold a statement list
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Program | NodeKind::Block)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            NodeKind::NumberLiteral(value) => write!(f, " ({:.2})", value),
            NodeKind::Identifier(name) => write!(f, " ({})", name),
            NodeKind::StringLiteral(text) => write!(f, " \"{}\"", text),
            NodeKind::BoolLiteral(value) => write!(f, " ({})", value),
            NodeKind::BinaryOperation(op) => write!(f, " [{}]", op.symbol()),
            NodeKind::UnaryOperation(op) => write!(f, " [{}]", op.symbol()),
            _ => Ok(()),
        }
    }
}

/// One syntax tree node: its payload and the line it starts on
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub line: usize,
}

impl AstNode {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// What a child stands for in its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    Statement,
    Name,
    Value,
    Condition,
    Then,
    Else,
    Body,
    Operand,
    Lhs,
    Rhs,
}

impl ChildRole {
    pub fn label(self) -> &'static str {
        match self {
            ChildRole::Statement => "stmt",
            ChildRole::Name => "name",
            ChildRole::Value => "value",
            ChildRole::Condition => "cond",
            ChildRole::Then => "then",
            ChildRole::Else => "else",
            ChildRole::Body => "body",
            ChildRole::Operand => "operand",
            ChildRole::Lhs => "lhs",
            ChildRole::Rhs => "rhs",
        }
    }
}

/// Then and else blocks of an `If` node.
pub fn if_branches(ast: &Ast, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
    match ast.right(id) {
        Some(outer) => match ast.right(outer) {
            Some(then_block) => (Some(then_block), Some(outer)),
            None => (Some(outer), None),
        },
        None => (None, None),
    }
}

/// Structural children of a node in source order, labelled by role.
pub fn children(ast: &Ast, id: NodeId) -> Vec<(ChildRole, NodeId)> {
    let left = ast.left(id);
    let right = ast.right(id);

    fn labelled(pairs: &[(ChildRole, Option<NodeId>)]) -> Vec<(ChildRole, NodeId)> {
        pairs
            .iter()
            .filter_map(|(role, child)| child.map(|c| (*role, c)))
            .collect()
    }

    match &ast.data(id).kind {
        NodeKind::Program | NodeKind::Block => ast
            .children(id)
            .map(|child| (ChildRole::Statement, child))
            .collect(),
        NodeKind::VarDeclaration | NodeKind::Assignment => {
            labelled(&[(ChildRole::Name, left), (ChildRole::Value, right)])
        }
        NodeKind::If => {
            let (then_block, else_block) = if_branches(ast, id);
            labelled(&[
                (ChildRole::Condition, left),
                (ChildRole::Then, then_block),
                (ChildRole::Else, else_block),
            ])
        }
        NodeKind::While => labelled(&[(ChildRole::Condition, left), (ChildRole::Body, right)]),
        NodeKind::BinaryOperation(_) => labelled(&[(ChildRole::Lhs, left), (ChildRole::Rhs, right)]),
        NodeKind::UnaryOperation(_) | NodeKind::Print => labelled(&[(ChildRole::Operand, left)]),
        NodeKind::NumberLiteral(_)
        | NodeKind::StringLiteral(_)
        | NodeKind::Identifier(_)
        | NodeKind::BoolLiteral(_) => Vec::new(),
    }
}
