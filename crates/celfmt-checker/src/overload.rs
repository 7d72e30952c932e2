//! Overload resolution for CEL function calls.
//!
//! Every overload whose call style and arity fit is tried with its own
//! set of type parameter bindings. When several overloads match (usually
//! because an argument is `dyn`) their result types are joined.

use std::collections::HashMap;
use std::sync::Arc;

use celfmt_common::{CelType, FunctionDecl};

/// Result of overload resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadResult {
    pub result_type: CelType,
    /// IDs of every matching overload, in declaration order.
    pub overload_ids: Vec<String>,
}

/// Resolve the overloads of `func` that accept the given argument types.
///
/// `target` is the receiver type for method calls and `None` for global
/// calls. Returns `None` if no overload matches.
pub fn resolve_overload(
    func: &FunctionDecl,
    target: Option<&CelType>,
    args: &[CelType],
) -> Option<OverloadResult> {
    let full_args: Vec<&CelType> = target.into_iter().chain(args.iter()).collect();

    let mut result_type: Option<CelType> = None;
    let mut overload_ids = Vec::new();

    for overload in &func.overloads {
        if overload.is_member != target.is_some() || overload.params.len() != full_args.len() {
            continue;
        }

        let mut substitutions = HashMap::new();
        let matched = overload
            .params
            .iter()
            .zip(&full_args)
            .all(|(param, arg)| param.unify_with_substitution(arg, &mut substitutions));
        if !matched {
            continue;
        }

        let resolved = finalize_type(&substitute_type(&overload.result, &substitutions));
        result_type = Some(match result_type {
            Some(previous) if previous != resolved => CelType::Dyn,
            _ => resolved,
        });
        overload_ids.push(overload.id.clone());
    }

    result_type.map(|result_type| OverloadResult {
        result_type,
        overload_ids,
    })
}

/// Replace bound type parameters with their bindings.
pub fn substitute_type(ty: &CelType, substitutions: &HashMap<Arc<str>, CelType>) -> CelType {
    match ty {
        CelType::TypeParam(name) => substitutions
            .get(name)
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        CelType::List(elem) => CelType::list(substitute_type(elem, substitutions)),
        CelType::Map(key, val) => CelType::map(
            substitute_type(key, substitutions),
            substitute_type(val, substitutions),
        ),
        CelType::Type(inner) => CelType::type_of(substitute_type(inner, substitutions)),
        CelType::Optional(inner) => CelType::optional(substitute_type(inner, substitutions)),
        _ => ty.clone(),
    }
}

/// Replace any type parameter left unbound with `dyn`.
pub fn finalize_type(ty: &CelType) -> CelType {
    if !ty.has_type_params() {
        return ty.clone();
    }
    match ty {
        CelType::TypeParam(_) => CelType::Dyn,
        CelType::List(elem) => CelType::list(finalize_type(elem)),
        CelType::Map(key, val) => CelType::map(finalize_type(key), finalize_type(val)),
        CelType::Type(inner) => CelType::type_of(finalize_type(inner)),
        CelType::Optional(inner) => CelType::optional(finalize_type(inner)),
        _ => ty.clone(),
    }
}
