// Parser integration tests: tree shapes for complete programs

use twig::parser::ast::{self, Ast, BinOp, ChildRole, NodeKind};
use twig::parser::parse;
use twig::parser::parser::{ParseError, Parser, ROOT};
use twig::tree::NodeId;

fn statements(ast: &Ast, parent: NodeId) -> Vec<NodeId> {
    ast.children(parent).collect()
}

fn kind(ast: &Ast, id: Option<NodeId>) -> &NodeKind {
    &ast.data(id.expect("missing node")).kind
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let ast = parse("var x = 1 + 2 * 3;").expect("Parsing failed");

    let declaration = ast.first_child(ROOT).unwrap();
    assert_eq!(ast.data(declaration).kind, NodeKind::VarDeclaration);
    assert_eq!(kind(&ast, ast.left(declaration)), &NodeKind::Identifier("x".into()));

    let sum = ast.right(declaration);
    assert_eq!(kind(&ast, sum), &NodeKind::BinaryOperation(BinOp::Add));
    let product = ast.right(sum.unwrap());
    assert_eq!(kind(&ast, product), &NodeKind::BinaryOperation(BinOp::Mul));
    assert_eq!(kind(&ast, ast.left(product.unwrap())), &NodeKind::NumberLiteral(2.0));
    assert_eq!(kind(&ast, ast.right(product.unwrap())), &NodeKind::NumberLiteral(3.0));
}

#[test]
fn test_if_statement_shape() {
    let ast = parse("if (x > 0) { y = 1; }").expect("Parsing failed");

    let if_node = ast.first_child(ROOT).unwrap();
    assert_eq!(ast.data(if_node).kind, NodeKind::If);
    assert_eq!(kind(&ast, ast.left(if_node)), &NodeKind::BinaryOperation(BinOp::Gt));

    let block = ast.right(if_node).unwrap();
    assert_eq!(ast.data(block).kind, NodeKind::Block);
    let body = statements(&ast, block);
    assert_eq!(body.len(), 1);
    assert_eq!(ast.data(body[0]).kind, NodeKind::Assignment);
}

#[test]
fn test_missing_identifier_attaches_nothing() {
    let mut parser = Parser::new("var = 1;").expect("Parser creation failed");
    let err = parser.parse_program().unwrap_err();

    assert!(matches!(
        err,
        ParseError::UnexpectedToken {
            production: "variable declaration",
            line: 1,
            ..
        }
    ));
    assert_eq!(parser.tree().first_child(ROOT), None);
    assert!(parser.tree().is_leaf(ROOT));
}

#[test]
fn test_consecutive_declarations_keep_their_operands() {
    let ast = parse("{ var a = 1; var b = a + 2; }").expect("Parsing failed");

    let block = ast.first_child(ROOT).unwrap();
    let declarations = statements(&ast, block);
    assert_eq!(declarations.len(), 2);

    let first = declarations[0];
    assert_eq!(kind(&ast, ast.left(first)), &NodeKind::Identifier("a".into()));
    assert_eq!(kind(&ast, ast.right(first)), &NodeKind::NumberLiteral(1.0));

    let second = declarations[1];
    assert_eq!(kind(&ast, ast.left(second)), &NodeKind::Identifier("b".into()));
    assert_eq!(
        kind(&ast, ast.right(second)),
        &NodeKind::BinaryOperation(BinOp::Add)
    );
    assert_eq!(ast.parent(second), Some(block));
}

#[test]
fn test_if_else_branches() {
    let ast = parse("if (a) { x = 1; } else { x = 2; }").expect("Parsing failed");
    let if_node = ast.first_child(ROOT).unwrap();
    let (then_block, else_block) = ast::if_branches(&ast, if_node);

    let then_value = ast.right(ast.first_child(then_block.unwrap()).unwrap());
    let else_value = ast.right(ast.first_child(else_block.unwrap()).unwrap());
    assert_eq!(kind(&ast, then_value), &NodeKind::NumberLiteral(1.0));
    assert_eq!(kind(&ast, else_value), &NodeKind::NumberLiteral(2.0));

    let roles: Vec<ChildRole> = ast::children(&ast, if_node)
        .into_iter()
        .map(|(role, _)| role)
        .collect();
    assert_eq!(roles, vec![ChildRole::Condition, ChildRole::Then, ChildRole::Else]);
}

#[test]
fn test_node_lines() {
    let source = "var n = 3;\nwhile (n > 0) {\n  print n;\n  n = n - 1;\n}\n";
    let ast = parse(source).expect("Parsing failed");

    let top = statements(&ast, ROOT);
    assert_eq!(ast.data(top[0]).line, 1);
    assert_eq!(ast.data(top[1]).line, 2);

    let body = ast.right(top[1]).unwrap();
    let lines: Vec<usize> = statements(&ast, body)
        .into_iter()
        .map(|id| ast.data(id).line)
        .collect();
    assert_eq!(lines, vec![3, 4]);
}

#[test]
fn test_comment_marker_only_skips_two_characters() {
    // the text after `//` is still scanned
    let ast = parse("// x = 1;").expect("Parsing failed");
    let assignment = ast.first_child(ROOT).unwrap();
    assert_eq!(ast.data(assignment).kind, NodeKind::Assignment);
}

#[test]
fn test_error_messages() {
    let err = parse("x = 1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error at line 1: expected ';' in assignment, found end of input"
    );

    let err = parse("x = \"open").unwrap_err();
    assert_eq!(err.to_string(), "Lexical error at line 1: Unterminated string");
    assert_eq!(err.line(), Some(1));

    let err = parse("x = \"a\nb\nc").unwrap_err();
    assert_eq!(err.to_string(), "Lexical error at line 1: Unterminated string");
}

#[test]
fn test_large_program_grows_arena() {
    let source: String = (0..200).map(|i| format!("v{} = {};\n", i, i)).collect();
    let ast = parse(&source).expect("Parsing failed");

    assert_eq!(ast.len(), 1 + 200 * 3);
    assert_eq!(statements(&ast, ROOT).len(), 200);
    let last = *statements(&ast, ROOT).last().unwrap();
    assert_eq!(ast.data(last).line, 200);
}
