//! Core type checker implementation.
//!
//! The checker walks a parsed expression, resolving identifiers against a
//! scope stack and calls against function declarations. It records the type
//! of every node and the declaration each reference resolved to.

use std::collections::HashMap;

use celfmt_common::{
    BinaryOp, CelType, Expr, FunctionDecl, ListElement, MapEntry, SpannedExpr, StructField,
    UnaryOp,
};

use crate::errors::{CheckError, CheckErrorKind};
use crate::overload::resolve_overload;
use crate::scope::ScopeStack;
use crate::standard_library::type_constants;

/// Reference information for a resolved identifier or function.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceInfo {
    /// The fully qualified name.
    pub name: String,
    /// Matching overload IDs for function calls.
    pub overload_ids: Vec<String>,
}

impl ReferenceInfo {
    pub fn ident(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overload_ids: Vec::new(),
        }
    }

    pub fn function(name: impl Into<String>, overload_ids: Vec<String>) -> Self {
        Self {
            name: name.into(),
            overload_ids,
        }
    }
}

/// Result of type checking an expression.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
    /// Map from expression ID to inferred type.
    pub type_map: HashMap<i64, CelType>,
    /// Map from expression ID to resolved reference.
    pub reference_map: HashMap<i64, ReferenceInfo>,
    pub errors: Vec<CheckError>,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get_type(&self, expr_id: i64) -> Option<&CelType> {
        self.type_map.get(&expr_id)
    }

    pub fn get_reference(&self, expr_id: i64) -> Option<&ReferenceInfo> {
        self.reference_map.get(&expr_id)
    }
}

/// Type checker for CEL expressions.
pub struct Checker<'a> {
    scopes: ScopeStack,
    functions: &'a HashMap<String, FunctionDecl>,
    /// Container namespace for qualified name resolution.
    container: &'a str,
    type_map: HashMap<i64, CelType>,
    reference_map: HashMap<i64, ReferenceInfo>,
    errors: Vec<CheckError>,
}

impl<'a> Checker<'a> {
    /// Create a checker over the given variables and functions.
    ///
    /// The standard type constants (`int`, `string`, ...) are always in scope.
    pub fn new(
        variables: &HashMap<String, CelType>,
        functions: &'a HashMap<String, FunctionDecl>,
        container: &'a str,
    ) -> Self {
        let mut scopes = ScopeStack::new();
        for (name, cel_type) in type_constants() {
            scopes.declare(name, cel_type);
        }
        for (name, cel_type) in variables {
            scopes.declare(name.as_str(), cel_type.clone());
        }

        Self {
            scopes,
            functions,
            container,
            type_map: HashMap::new(),
            reference_map: HashMap::new(),
            errors: Vec::new(),
        }
    }

    /// Type check an expression and return the result.
    pub fn check(mut self, expr: &SpannedExpr) -> CheckResult {
        self.check_expr(expr);

        CheckResult {
            type_map: self.type_map,
            reference_map: self.reference_map,
            errors: self.errors,
        }
    }

    fn report(&mut self, error: CheckError) {
        self.errors.push(error);
    }

    /// Type check an expression and return its type.
    fn check_expr(&mut self, expr: &SpannedExpr) -> CelType {
        let result = match &expr.node {
            Expr::Null => CelType::Null,
            Expr::Bool(_) => CelType::Bool,
            Expr::Int(_) => CelType::Int,
            Expr::UInt(_) => CelType::UInt,
            Expr::Float(_) => CelType::Double,
            Expr::String(_) => CelType::String,
            Expr::Bytes(_) => CelType::Bytes,

            Expr::Ident(name) | Expr::RootIdent(name) => self.check_ident(name, expr),

            Expr::List(elements) => self.check_list(elements),
            Expr::Map(entries) => self.check_map(entries),

            Expr::Unary { op, expr: inner } => self.check_unary(*op, inner, expr),
            Expr::Binary { op, left, right } => self.check_binary(*op, left, right, expr),
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.check_ternary(cond, then_expr, else_expr, expr),

            Expr::Member {
                expr: obj,
                field,
                optional,
            } => self.check_member(obj, field, *optional, expr),
            Expr::Index {
                expr: obj,
                index,
                optional,
            } => self.check_index(obj, index, *optional, expr),
            Expr::Call { expr: callee, args } => self.check_call(callee, args, expr),
            Expr::Struct { type_name, fields } => self.check_struct(type_name, fields),

            Expr::Comprehension {
                iter_var,
                iter_range,
                accu_var,
                accu_init,
                loop_condition,
                loop_step,
                result,
            } => {
                let range_type = self.check_expr(iter_range);
                let iter_type = match &range_type {
                    CelType::List(elem) => (**elem).clone(),
                    CelType::Map(key, _) => (**key).clone(),
                    CelType::Dyn | CelType::Error => CelType::Dyn,
                    other => {
                        self.report(CheckError::new(
                            CheckErrorKind::NotIterable(other.clone()),
                            iter_range.span.clone(),
                            iter_range.id,
                        ));
                        CelType::Dyn
                    }
                };
                let accu_type = self.check_expr(accu_init);

                self.scopes.enter_scope();
                self.scopes.declare(iter_var.as_str(), iter_type);
                self.scopes.declare(accu_var.as_str(), accu_type.clone());

                self.check_bool_condition(loop_condition);

                // The step of map() and filter() knows the element type the
                // empty initial list lacks.
                let step_type = self.check_expr(loop_step);
                if accu_type == CelType::dyn_list() && matches!(step_type, CelType::List(_)) {
                    self.scopes.declare(accu_var.as_str(), step_type);
                }

                let result_type = self.check_expr(result);
                self.scopes.exit_scope();
                result_type
            }

            Expr::MemberTestOnly { expr: obj, field } => self.check_presence_test(obj, field, expr),

            Expr::Error => {
                self.report(CheckError::new(
                    CheckErrorKind::Unsupported,
                    expr.span.clone(),
                    expr.id,
                ));
                CelType::Error
            }
        };

        self.type_map.insert(expr.id, result.clone());
        result
    }

    fn check_bool_condition(&mut self, cond: &SpannedExpr) {
        let cond_type = self.check_expr(cond);
        if !matches!(cond_type, CelType::Bool | CelType::Dyn | CelType::Error) {
            self.report(CheckError::type_mismatch(
                CelType::Bool,
                cond_type,
                cond.span.clone(),
                cond.id,
            ));
        }
    }

    fn check_ident(&mut self, name: &str, expr: &SpannedExpr) -> CelType {
        match self.resolve_qualified(name) {
            Some((resolved, cel_type)) => {
                self.reference_map
                    .insert(expr.id, ReferenceInfo::ident(resolved));
                cel_type
            }
            None => {
                self.report(CheckError::undeclared_reference(
                    name,
                    expr.span.clone(),
                    expr.id,
                ));
                CelType::Error
            }
        }
    }

    /// Resolve a possibly qualified name, first as written and then
    /// prefixed with the container.
    fn resolve_qualified(&self, name: &str) -> Option<(String, CelType)> {
        if let Some(decl) = self.scopes.resolve(name) {
            return Some((name.to_string(), decl.cel_type.clone()));
        }
        if self.container.is_empty() {
            return None;
        }
        let qualified = format!("{}.{}", self.container, name);
        let decl = self.scopes.resolve(&qualified)?;
        Some((qualified, decl.cel_type.clone()))
    }

    fn check_list(&mut self, elements: &[ListElement]) -> CelType {
        let types: Vec<CelType> = elements
            .iter()
            .map(|elem| {
                let ty = self.check_expr(&elem.expr);
                if elem.optional {
                    unwrap_optional(ty)
                } else {
                    ty
                }
            })
            .collect();
        CelType::list(join_types(&types))
    }

    fn check_map(&mut self, entries: &[MapEntry]) -> CelType {
        let mut key_types = Vec::with_capacity(entries.len());
        let mut value_types = Vec::with_capacity(entries.len());
        for entry in entries {
            key_types.push(self.check_expr(&entry.key));
            let value_type = self.check_expr(&entry.value);
            value_types.push(if entry.optional {
                unwrap_optional(value_type)
            } else {
                value_type
            });
        }
        CelType::map(join_types(&key_types), join_types(&value_types))
    }

    fn check_unary(&mut self, op: UnaryOp, inner: &SpannedExpr, expr: &SpannedExpr) -> CelType {
        let inner_type = self.check_expr(inner);
        self.resolve_function_call(op.function_name(), None, &[inner_type], expr)
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        left: &SpannedExpr,
        right: &SpannedExpr,
        expr: &SpannedExpr,
    ) -> CelType {
        let left_type = self.check_expr(left);
        let right_type = self.check_expr(right);
        self.resolve_function_call(op.function_name(), None, &[left_type, right_type], expr)
    }

    fn check_ternary(
        &mut self,
        cond: &SpannedExpr,
        then_expr: &SpannedExpr,
        else_expr: &SpannedExpr,
        expr: &SpannedExpr,
    ) -> CelType {
        self.check_bool_condition(cond);
        let then_type = self.check_expr(then_expr);
        let else_type = self.check_expr(else_expr);
        self.resolve_function_call("_?_:_", None, &[CelType::Bool, then_type, else_type], expr)
    }

    fn check_member(
        &mut self,
        obj: &SpannedExpr,
        field: &str,
        optional: bool,
        expr: &SpannedExpr,
    ) -> CelType {
        // A dotted name may denote a declared identifier such as
        // `google.protobuf.Timestamp`.
        if !optional {
            if let Some(qualified) = qualified_name(obj, field) {
                if let Some((resolved, cel_type)) = self.resolve_qualified(&qualified) {
                    self.reference_map
                        .insert(expr.id, ReferenceInfo::ident(resolved));
                    return cel_type;
                }
            }
        }

        let obj_type = self.check_expr(obj);
        let (inner_type, was_optional) = match &obj_type {
            CelType::Optional(inner) => ((**inner).clone(), true),
            other => (other.clone(), false),
        };

        let result = match &inner_type {
            CelType::Map(_, value) => (**value).clone(),
            CelType::Dyn | CelType::TypeParam(_) => CelType::Dyn,
            CelType::Error => return CelType::Error,
            other => {
                self.report(CheckError::undefined_field(
                    &other.display_name(),
                    field,
                    expr.span.clone(),
                    expr.id,
                ));
                return CelType::Error;
            }
        };

        wrap_optional(result, optional || was_optional)
    }

    fn check_presence_test(&mut self, obj: &SpannedExpr, field: &str, expr: &SpannedExpr) -> CelType {
        match self.check_expr(obj) {
            CelType::Map(_, _) | CelType::Dyn | CelType::TypeParam(_) | CelType::Error => {}
            other => self.report(CheckError::undefined_field(
                &other.display_name(),
                field,
                expr.span.clone(),
                expr.id,
            )),
        }
        CelType::Bool
    }

    fn check_index(
        &mut self,
        obj: &SpannedExpr,
        index: &SpannedExpr,
        optional: bool,
        expr: &SpannedExpr,
    ) -> CelType {
        let obj_type = self.check_expr(obj);
        let index_type = self.check_expr(index);

        let (inner_type, was_optional) = match obj_type {
            CelType::Optional(inner) => ((*inner).clone(), true),
            other => (other, false),
        };

        let result = self.resolve_function_call("_[_]", None, &[inner_type, index_type], expr);
        wrap_optional(result, optional || was_optional)
    }

    fn check_call(
        &mut self,
        callee: &SpannedExpr,
        args: &[SpannedExpr],
        expr: &SpannedExpr,
    ) -> CelType {
        match &callee.node {
            Expr::Member {
                expr: receiver,
                field,
                ..
            } => {
                // Namespaced functions such as `optional.of(x)`.
                if let Some(qualified) = qualified_name(receiver, field) {
                    if self.functions.contains_key(&qualified) {
                        let arg_types = self.check_args(args);
                        return self.resolve_function_call(&qualified, None, &arg_types, expr);
                    }
                }

                let receiver_type = self.check_expr(receiver);
                let arg_types = self.check_args(args);
                self.resolve_function_call(field, Some(receiver_type), &arg_types, expr)
            }
            Expr::Ident(name) | Expr::RootIdent(name) => {
                let arg_types = self.check_args(args);
                self.resolve_function_call(name, None, &arg_types, expr)
            }
            _ => {
                self.check_expr(callee);
                self.check_args(args);
                CelType::Dyn
            }
        }
    }

    fn check_args(&mut self, args: &[SpannedExpr]) -> Vec<CelType> {
        args.iter().map(|arg| self.check_expr(arg)).collect()
    }

    fn resolve_function_call(
        &mut self,
        name: &str,
        receiver: Option<CelType>,
        args: &[CelType],
        expr: &SpannedExpr,
    ) -> CelType {
        let functions = self.functions;
        let Some(func) = functions.get(name) else {
            self.report(CheckError::undeclared_reference(
                name,
                expr.span.clone(),
                expr.id,
            ));
            return CelType::Error;
        };

        // Errors have already been reported for the operands.
        if receiver.iter().chain(args).any(|t| *t == CelType::Error) {
            return CelType::Error;
        }

        match resolve_overload(func, receiver.as_ref(), args) {
            Some(result) => {
                self.reference_map.insert(
                    expr.id,
                    ReferenceInfo::function(&func.name, result.overload_ids),
                );
                result.result_type
            }
            None => {
                let all_args = receiver.into_iter().chain(args.iter().cloned()).collect();
                self.report(CheckError::no_matching_overload(
                    &func.name,
                    all_args,
                    expr.span.clone(),
                    expr.id,
                ));
                CelType::Error
            }
        }
    }

    /// No message types are declared, so every struct literal names an
    /// unknown type. Field values are still checked for their own errors.
    fn check_struct(&mut self, type_name: &SpannedExpr, fields: &[StructField]) -> CelType {
        let name = type_name_of(type_name).unwrap_or_default();
        self.report(CheckError::undeclared_reference(
            &name,
            type_name.span.clone(),
            type_name.id,
        ));
        for field in fields {
            self.check_expr(&field.value);
        }
        CelType::Error
    }
}

fn unwrap_optional(ty: CelType) -> CelType {
    match ty {
        CelType::Optional(inner) => (*inner).clone(),
        other => other,
    }
}

/// Wrap in `optional` unless already optional; chained optional
/// selections never nest.
fn wrap_optional(ty: CelType, optional: bool) -> CelType {
    match ty {
        CelType::Optional(_) | CelType::Error => ty,
        other if optional => CelType::optional(other),
        other => other,
    }
}

/// Build `a.b.c` from a member chain rooted at an identifier.
fn qualified_name(obj: &SpannedExpr, field: &str) -> Option<String> {
    let prefix = type_name_of(obj)?;
    Some(format!("{}.{}", prefix, field))
}

fn type_name_of(expr: &SpannedExpr) -> Option<String> {
    match &expr.node {
        Expr::Ident(name) => Some(name.clone()),
        Expr::RootIdent(name) => Some(name.clone()),
        Expr::Member {
            expr: inner,
            field,
            optional: false,
        } => qualified_name(inner, field),
        _ => None,
    }
}

/// Join element types of an aggregate literal.
///
/// The first concrete type wins if every other type is compatible with it;
/// otherwise the aggregate is heterogeneous and the join is `dyn`.
fn join_types(types: &[CelType]) -> CelType {
    let Some(best) = types
        .iter()
        .find(|t| !matches!(t, CelType::Dyn | CelType::Error))
    else {
        return CelType::Dyn;
    };

    if types.iter().all(|t| best.is_assignable_from(t)) {
        best.clone()
    } else {
        CelType::Dyn
    }
}

/// Type check `expr` against the given variables and functions.
///
/// `container` qualifies relative names and may be empty.
pub fn check(
    expr: &SpannedExpr,
    variables: &HashMap<String, CelType>,
    functions: &HashMap<String, FunctionDecl>,
    container: &str,
) -> CheckResult {
    Checker::new(variables, functions, container).check(expr)
}
