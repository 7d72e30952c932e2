//! Integration tests for the public parse API.

mod common;

use celfmt_parser::{BinaryOp, Comment, Expr, UnaryOp};
use pretty_assertions::assert_eq;

// ============================================================================
// Literals
// ============================================================================

#[test]
fn parse_numeric_literals() {
    assert_eq!(common::assert_parses("0").node, Expr::Int(0));
    assert_eq!(common::assert_parses("0x1F").node, Expr::Int(31));
    assert_eq!(common::assert_parses("123U").node, Expr::UInt(123));
    assert_eq!(common::assert_parses("1.5e-3").node, Expr::Float(1.5e-3));
}

#[test]
fn parse_string_and_bytes_literals() {
    assert_eq!(
        common::assert_parses(r#""hello\nworld""#).node,
        Expr::String("hello\nworld".to_string())
    );
    assert_eq!(
        common::assert_parses(r#"r"hello\n""#).node,
        Expr::String("hello\\n".to_string())
    );
    assert_eq!(
        common::assert_parses(r#"b"abc""#).node,
        Expr::Bytes(b"abc".to_vec())
    );
}

#[test]
fn parse_keyword_literals() {
    assert_eq!(common::assert_parses("true").node, Expr::Bool(true));
    assert_eq!(common::assert_parses("false").node, Expr::Bool(false));
    assert_eq!(common::assert_parses("null").node, Expr::Null);
}

#[test]
fn parse_root_identifier() {
    assert_eq!(
        common::assert_parses(".state").node,
        Expr::RootIdent("state".to_string())
    );
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn parse_and_binds_tighter_than_or() {
    let expr = common::assert_parses("a || b && c");
    match expr.node {
        Expr::Binary { op, right, .. } => {
            assert_eq!(op, BinaryOp::Or);
            assert!(matches!(
                right.node,
                Expr::Binary {
                    op: BinaryOp::And,
                    ..
                }
            ));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn parse_in_operator() {
    let expr = common::assert_parses("'a' in ['a']");
    assert!(matches!(
        expr.node,
        Expr::Binary {
            op: BinaryOp::In,
            ..
        }
    ));
}

#[test]
fn parse_negation_of_call() {
    let expr = common::assert_parses("-size(x)");
    match expr.node {
        Expr::Unary { op, expr } => {
            assert_eq!(op, UnaryOp::Neg);
            assert!(matches!(expr.node, Expr::Call { .. }));
        }
        other => panic!("expected unary, got {:?}", other),
    }
}

#[test]
fn parentheses_override_precedence() {
    let expr = common::assert_parses("(1 + 2) * 3");
    match expr.node {
        Expr::Binary { op, left, .. } => {
            assert_eq!(op, BinaryOp::Mul);
            assert!(matches!(
                left.node,
                Expr::Binary {
                    op: BinaryOp::Add,
                    ..
                }
            ));
        }
        other => panic!("expected binary, got {:?}", other),
    }
}

#[test]
fn span_binary_covers_operands() {
    let expr = common::assert_parses("foo + bar");
    assert_eq!(expr.span, 0..9);
}

// ============================================================================
// Postfix and literals with structure
// ============================================================================

#[test]
fn parse_method_call() {
    let expr = common::assert_parses("'abc'.has_prefix('a')");
    match expr.node {
        Expr::Call { expr, args } => {
            assert!(matches!(expr.node, Expr::Member { ref field, .. } if field == "has_prefix"));
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn parse_qualified_struct_literal() {
    let expr = common::assert_parses("google.protobuf.Duration{seconds: 1}");
    match expr.node {
        Expr::Struct { type_name, fields } => {
            assert!(matches!(type_name.node, Expr::Member { ref field, .. } if field == "Duration"));
            assert_eq!(fields.len(), 1);
            assert!(!fields[0].optional);
        }
        other => panic!("expected struct, got {:?}", other),
    }
}

#[test]
fn parse_map_with_trailing_comma() {
    let expr = common::assert_parses("{'a': 1, 'b': 2,}");
    assert!(matches!(expr.node, Expr::Map(ref entries) if entries.len() == 2));
}

// ============================================================================
// Macros
// ============================================================================

#[test]
fn has_expands_to_presence_test() {
    let expr = common::assert_parses("has(a.b)");
    assert!(matches!(expr.node, Expr::MemberTestOnly { ref field, .. } if field == "b"));
}

#[test]
fn nested_macros_are_all_tracked() {
    let result = common::assert_parses_full("xs.map(x, x.filter(y, y > 0))");
    assert_eq!(result.macro_calls.len(), 2);
    let ast = result.ast.expect("ast");
    assert!(result.macro_calls.contains_key(&ast.id));
}

#[test]
fn opt_map_is_tracked() {
    let result = common::assert_parses_full("o.optMap(v, v + 1)");
    let ast = result.ast.expect("ast");
    assert!(matches!(ast.node, Expr::Ternary { .. }));
    match &result.macro_calls[&ast.id].node {
        Expr::Call { expr, .. } => {
            assert!(matches!(expr.node, Expr::Member { ref field, .. } if field == "optMap"));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

#[test]
fn global_macro_call_keeps_ident_callee() {
    let result = common::assert_parses_full("has(state.x)");
    let ast = result.ast.expect("ast");
    match &result.macro_calls[&ast.id].node {
        Expr::Call { expr, args } => {
            assert_eq!(expr.node, Expr::Ident("has".to_string()));
            assert!(matches!(args[0].node, Expr::Member { .. }));
        }
        other => panic!("expected call, got {:?}", other),
    }
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn comments_are_collected_in_order() {
    let result = common::assert_parses_full("// lead\n[\n  1, // one\n  2,\n]");
    assert_eq!(
        result.comments,
        vec![
            Comment {
                text: "// lead".to_string(),
                span: 0..7,
            },
            Comment {
                text: "// one".to_string(),
                span: 15..21,
            },
        ]
    );
}

#[test]
fn comment_only_input_is_empty() {
    let result = celfmt_parser::parse("// nothing here");
    assert_eq!(result.errors[0].message, "empty input");
    assert_eq!(result.comments.len(), 1);
}
