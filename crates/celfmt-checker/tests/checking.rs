//! Integration tests for type checking parsed expressions.

mod common;

use celfmt_checker::CelType;
use common::{assert_check_errors, assert_checks, check_with};
use pretty_assertions::assert_eq;

#[test]
fn state_is_dynamic() {
    assert_eq!(assert_checks("state"), CelType::Dyn);
    assert_eq!(assert_checks("state.items[0].name"), CelType::Dyn);
    assert_eq!(assert_checks("state.count > 10"), CelType::Bool);
}

#[test]
fn operators_on_literals() {
    assert_eq!(assert_checks("1 + 1"), CelType::Int);
    assert_eq!(assert_checks("1u * 2u"), CelType::UInt);
    assert_eq!(assert_checks("1.5 / 2.0"), CelType::Double);
    assert_eq!(assert_checks("!true || false"), CelType::Bool);
    assert_eq!(assert_checks("-(3 % 2)"), CelType::Int);
    assert_eq!(assert_checks("b'ab' + b'c'"), CelType::Bytes);
}

#[test]
fn ordering_across_numeric_types() {
    for source in [
        "1 < 1.5",
        "1u < 2",
        "2 <= 3u",
        "2.5 > 1u",
        "1u >= 0.5",
        "-1 > 2.0",
        "state.n < 10 && 10 <= state.n",
    ] {
        assert_eq!(assert_checks(source), CelType::Bool, "{}", source);
    }
}

#[test]
fn membership_and_equality() {
    assert_eq!(assert_checks("'a' in ['a', 'b']"), CelType::Bool);
    assert_eq!(assert_checks("'k' in {'k': 1}"), CelType::Bool);
    assert_eq!(assert_checks("state == null"), CelType::Bool);
}

#[test]
fn aggregate_literals() {
    assert_eq!(
        assert_checks("{'a': 1, 'b': 2}"),
        CelType::map(CelType::String, CelType::Int)
    );
    assert_eq!(assert_checks("[[1], [2]]"), CelType::list(CelType::list(CelType::Int)));
    assert_eq!(assert_checks("[1, state]"), CelType::list(CelType::Int));
}

#[test]
fn ternary_joins_branches() {
    assert_eq!(assert_checks("state.x ? 'a' : 'b'"), CelType::String);
}

#[test]
fn macros_over_dynamic_state() {
    assert_eq!(assert_checks("state.items.all(i, i.ok)"), CelType::Bool);
    assert_eq!(assert_checks("state.items.exists_one(i, i == 1)"), CelType::Bool);
    assert_eq!(assert_checks("has(state.items)"), CelType::Bool);
    assert_eq!(
        assert_checks("state.items.map(i, i.name)"),
        CelType::dyn_list()
    );
    assert_eq!(
        assert_checks("[1, 2, 3].map(i, i > 1, i * 10)"),
        CelType::list(CelType::Int)
    );
}

#[test]
fn bind_macro_scopes_its_variable() {
    assert_eq!(assert_checks("[1, 2].as(xs, xs.size() + 1)"), CelType::Int);

    let errors = assert_check_errors("[1, 2].as(xs, xs) + xs");
    assert_eq!(errors, vec!["undeclared reference to 'xs'".to_string()]);
}

#[test]
fn optional_syntax() {
    assert_eq!(
        assert_checks("state.?name"),
        CelType::optional(CelType::Dyn)
    );
    assert_eq!(
        assert_checks("state.?a.?b.orValue(1)"),
        CelType::Int
    );
    assert_eq!(
        assert_checks("{'a': 1}[?'a']"),
        CelType::optional(CelType::Int)
    );
    assert_eq!(
        assert_checks("optional.of(1).optMap(x, x + 1)"),
        CelType::optional(CelType::Int)
    );
    assert_eq!(
        assert_checks("[?optional.of(1), 2]"),
        CelType::list(CelType::Int)
    );
}

#[test]
fn extension_functions_resolve() {
    assert_eq!(assert_checks("'abc'.has_prefix('a')"), CelType::Bool);
    assert_eq!(assert_checks("state.name.to_lower()"), CelType::String);
}

#[test]
fn undeclared_identifiers_are_reported() {
    assert_eq!(
        assert_check_errors("undeclared_var"),
        vec!["undeclared reference to 'undeclared_var'".to_string()]
    );
    assert_eq!(
        assert_check_errors("state.x + other.y"),
        vec!["undeclared reference to 'other'".to_string()]
    );
}

#[test]
fn undeclared_functions_are_reported() {
    assert_eq!(
        assert_check_errors("frobnicate(1)"),
        vec!["undeclared reference to 'frobnicate'".to_string()]
    );
}

#[test]
fn overload_mismatches_are_reported() {
    assert_eq!(
        assert_check_errors("'a' - 'b'"),
        vec!["no matching overload for '_-_' applied to (string, string)".to_string()]
    );
    assert_eq!(
        assert_check_errors("size(1)"),
        vec!["no matching overload for 'size' applied to (int)".to_string()]
    );
}

#[test]
fn comprehension_range_must_be_iterable() {
    assert_eq!(
        assert_check_errors("'abc'.all(c, c == 'a')"),
        vec!["expression of type 'string' cannot be range of a comprehension".to_string()]
    );
}

#[test]
fn errors_carry_spans() {
    let (_, result) = check_with("state && missing", &[("state", CelType::Dyn)]);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].span, 9..16);
}

#[test]
fn variables_shadowed_by_comprehensions() {
    let (_, result) = check_with(
        "x.all(x, x > 0)",
        &[("x", CelType::list(CelType::Int))],
    );
    assert!(result.is_ok(), "{:?}", result.errors);
}
