//! Common test utilities for celfmt-parser integration tests.

use celfmt_parser::{parse_with_options, ParseError, ParseOptions, ParseResult, SpannedExpr};
use celfmt_parser::macros::{COLLECTIONS_MACROS, OPTIONAL_MACROS};

/// Options matching the formatter's environment: optional syntax, extra
/// macros and macro call tracking.
#[allow(dead_code)]
pub fn full_options() -> ParseOptions {
    ParseOptions::default()
        .with_optional_syntax(true)
        .with_macro_call_tracking(true)
        .with_macros(OPTIONAL_MACROS)
        .with_macros(COLLECTIONS_MACROS)
}

/// Parse input with [`full_options`] and assert it succeeds.
#[allow(dead_code)]
pub fn assert_parses_full(input: &str) -> ParseResult {
    let result = parse_with_options(input, &full_options());
    if !result.is_ok() {
        panic!("failed to parse '{}': {:?}", input, messages(&result.errors));
    }
    result
}

/// Parse input and assert it succeeds, returning the AST.
#[allow(dead_code)]
pub fn assert_parses(input: &str) -> SpannedExpr {
    let result = celfmt_parser::parse(input);
    if !result.errors.is_empty() {
        panic!("failed to parse '{}': {:?}", input, messages(&result.errors));
    }
    result.ast.expect("expected AST")
}

/// Parse input and assert it fails, returning the errors.
#[allow(dead_code)]
pub fn assert_parse_error(input: &str) -> Vec<ParseError> {
    let result = celfmt_parser::parse(input);
    if result.errors.is_empty() {
        panic!("expected parse error for '{}', but got: {:?}", input, result.ast);
    }
    result.errors
}

fn messages(errors: &[ParseError]) -> Vec<String> {
    errors.iter().map(|e| e.to_string()).collect()
}
