//! Common test utilities for celfmt-checker integration tests.

use std::collections::HashMap;

use celfmt_checker::{check, CelType, CheckResult, FunctionDecl, STANDARD_LIBRARY};
use celfmt_common::extensions::{optionals_extension, strings_extension};
use celfmt_parser::macros::{COLLECTIONS_MACROS, OPTIONAL_MACROS};
use celfmt_parser::{parse_with_options, ParseOptions, SpannedExpr};

/// Standard library plus optionals and strings.
pub fn functions() -> HashMap<String, FunctionDecl> {
    let mut functions: HashMap<String, FunctionDecl> = HashMap::new();
    let extra = optionals_extension()
        .into_iter()
        .chain(strings_extension());
    for decl in STANDARD_LIBRARY.iter().cloned().chain(extra) {
        match functions.get_mut(&decl.name) {
            Some(existing) => existing.merge(decl),
            None => {
                functions.insert(decl.name.clone(), decl);
            }
        }
    }
    functions
}

pub fn parse(source: &str) -> SpannedExpr {
    let options = ParseOptions::default()
        .with_optional_syntax(true)
        .with_macros(OPTIONAL_MACROS)
        .with_macros(COLLECTIONS_MACROS);
    let result = parse_with_options(source, &options);
    match result.into_result() {
        Ok(ast) => ast,
        Err(errors) => panic!("failed to parse '{}': {:?}", source, errors),
    }
}

pub fn check_with(source: &str, variables: &[(&str, CelType)]) -> (SpannedExpr, CheckResult) {
    let ast = parse(source);
    let variables = variables
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.clone()))
        .collect();
    let result = check(&ast, &variables, &functions(), "");
    (ast, result)
}

/// Check `source` with `state: dyn` and return the root type.
#[allow(dead_code)]
pub fn assert_checks(source: &str) -> CelType {
    let (ast, result) = check_with(source, &[("state", CelType::Dyn)]);
    if !result.is_ok() {
        panic!("failed to check '{}': {:?}", source, messages(&result));
    }
    result.get_type(ast.id).cloned().expect("root type")
}

/// Check `source` with `state: dyn` and return the error messages.
#[allow(dead_code)]
pub fn assert_check_errors(source: &str) -> Vec<String> {
    let (_, result) = check_with(source, &[("state", CelType::Dyn)]);
    if result.is_ok() {
        panic!("expected check errors for '{}'", source);
    }
    messages(&result)
}

fn messages(result: &CheckResult) -> Vec<String> {
    result.errors.iter().map(|e| e.message()).collect()
}
