//! Error handling tests for celfmt-parser.

mod common;

use celfmt_parser::{parse, parse_with_options, ParseOptions};

#[test]
fn error_on_unclosed_delimiters() {
    assert!(parse("(1 + 2").is_err());
    assert!(parse("[1, 2").is_err());
    assert!(parse("{\"a\": 1").is_err());
}

#[test]
fn error_on_missing_operator() {
    let errors = common::assert_parse_error("1 2");
    assert_eq!(errors[0].message, "unexpected tokens after expression");
    assert_eq!(errors[0].span, 2..3);
}

#[test]
fn error_on_trailing_operator() {
    let errors = common::assert_parse_error("1 +");
    assert_eq!(errors[0].message, "unexpected end of input");
}

#[test]
fn error_on_empty_input() {
    let errors = common::assert_parse_error("   ");
    assert_eq!(errors[0].message, "empty input");
}

#[test]
fn error_on_unclosed_string() {
    let errors = common::assert_parse_error("\"hello");
    assert_eq!(errors[0].message, "unterminated or malformed string literal");
}

#[test]
fn error_on_unexpected_character() {
    let errors = common::assert_parse_error("a # b");
    assert_eq!(errors[0].message, "unexpected character '#'");
}

#[test]
fn error_on_reserved_identifier() {
    let errors = common::assert_parse_error("package + 1");
    assert_eq!(
        errors[0].message,
        "'package' is a reserved word and cannot be used as an identifier"
    );
}

#[test]
fn error_on_incomplete_ternary() {
    let errors = common::assert_parse_error("a ? b");
    assert_eq!(errors[0].message, "expected ':', found end of input");
}

#[test]
fn error_on_optional_syntax_when_disabled() {
    let errors = common::assert_parse_error("[?a]");
    assert_eq!(errors[0].message, "unsupported syntax '?'");

    let result = parse_with_options("[?a]", &ParseOptions::default().with_optional_syntax(true));
    assert!(result.is_ok());
}

#[test]
fn error_on_uncallable_target() {
    let errors = common::assert_parse_error("1(2)");
    assert_eq!(errors[0].message, "expression is not callable");
}

#[test]
fn error_on_invalid_has_argument() {
    let errors = common::assert_parse_error("has(a)");
    assert_eq!(errors[0].message, "invalid argument to has() macro");
}

#[test]
fn into_result_discards_partial_ast() {
    let result = parse("a b");
    assert!(result.ast.is_some());
    assert!(result.into_result().is_err());
}
