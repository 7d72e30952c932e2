//! Common test utilities for celfmt integration tests.

use celfmt::{format, Ast, Env, FormatOptions};

/// The formatter's environment.
pub fn env() -> &'static Env {
    Env::shared().expect("celfmt environment")
}

/// Compile `source` and assert it succeeds.
#[allow(dead_code)]
pub fn compile(source: &str) -> Ast {
    match env().compile(source) {
        Ok(ast) => ast,
        Err(err) => panic!("failed to compile {:?}:\n{}", source, err),
    }
}

/// Parse `source` without checking and assert it succeeds.
#[allow(dead_code)]
pub fn parse(source: &str) -> Ast {
    match env().parse_only(source) {
        Ok(ast) => ast,
        Err(err) => panic!("failed to parse {:?}:\n{}", source, err),
    }
}

/// Format an AST with the default pretty options.
pub fn pretty(ast: &Ast) -> String {
    match format(ast, &FormatOptions::pretty()) {
        Ok(text) => text,
        Err(err) => panic!("failed to format: {}", err),
    }
}

/// Compile and format `source`, checking that formatting is stable and
/// keeps the expression's meaning.
#[allow(dead_code)]
pub fn assert_stable(source: &str) -> String {
    let ast = compile(source);
    let first = pretty(&ast);
    let reparsed = compile(&first);
    assert!(
        ast.expr().node.structurally_eq(&reparsed.expr().node),
        "meaning changed:\n--- input ---\n{}\n--- output ---\n{}",
        source,
        first
    );
    let second = pretty(&reparsed);
    pretty_assertions::assert_eq!(first, second, "formatting is not idempotent");
    first
}

/// Assert `source` formats to `expected`, and that `expected` is stable.
#[allow(dead_code)]
pub fn assert_formats(source: &str, expected: &str) {
    let out = assert_stable(source);
    pretty_assertions::assert_eq!(out, expected);
}
