//! Macro system for the CEL parser.
//!
//! Macros in CEL are syntactic transformations that expand at parse time.
//! They transform specific call patterns (like `list.all(x, cond)`) into
//! expanded AST nodes (like `Comprehension`).
//!
//! Macros are keyed by `name:arg_count:is_receiver` (e.g., `"all:2:true"`).
//! This allows separate definitions for different argument counts.
//! Lookup tries the exact key first, then falls back to a var-arg key.

use std::collections::HashMap;

use celfmt_common::{
    BinaryOp, Expr, ListElement, Span, Spanned, SpannedExpr, UnaryOp,
};

/// Indicates whether a macro is called as a global function or as a method on a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroStyle {
    /// Global function call: `macro_name(args...)`
    Global,
    /// Receiver-style method call: `receiver.macro_name(args...)`
    Receiver,
}

/// Specifies the expected argument count for a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgCount {
    /// Exact number of arguments required.
    Exact(usize),
    /// Variable arguments with a minimum count.
    VarArg(usize),
}

impl ArgCount {
    /// Check if the given argument count matches this specification.
    pub fn matches(&self, count: usize) -> bool {
        match self {
            ArgCount::Exact(n) => count == *n,
            ArgCount::VarArg(min) => count >= *min,
        }
    }

    /// Get the count value (exact count or minimum for vararg).
    pub fn count(&self) -> usize {
        match self {
            ArgCount::Exact(n) => *n,
            ArgCount::VarArg(min) => *min,
        }
    }

    pub fn is_vararg(&self) -> bool {
        matches!(self, ArgCount::VarArg(_))
    }
}

/// Result of macro expansion.
#[derive(Debug)]
pub enum MacroExpansion {
    /// Macro was successfully expanded to this expression.
    Expanded(SpannedExpr),
    /// Macro signature matched but expansion failed (e.g., invalid arguments).
    Error { message: String, span: Span },
}

/// Context provided to macro expanders for creating AST nodes.
pub struct MacroContext<'a> {
    next_id_fn: &'a mut dyn FnMut() -> i64,
}

impl<'a> MacroContext<'a> {
    pub fn new(next_id_fn: &'a mut dyn FnMut() -> i64) -> Self {
        Self { next_id_fn }
    }

    /// Allocate the next unique node ID.
    pub fn next_id(&mut self) -> i64 {
        (self.next_id_fn)()
    }

    /// Create a synthetic node sharing the span of the macro call.
    fn node(&mut self, node: Expr, span: &Span) -> SpannedExpr {
        Spanned::new(self.next_id(), node, span.clone())
    }

    fn boxed(&mut self, node: Expr, span: &Span) -> Box<SpannedExpr> {
        Box::new(self.node(node, span))
    }
}

/// Type alias for macro expander functions.
///
/// # Parameters
/// - `ctx`: Macro context for ID allocation
/// - `span`: Source span of the entire call expression
/// - `receiver`: The receiver expression for receiver-style macros, None for global macros
/// - `args`: The arguments passed to the macro
pub type MacroExpander = fn(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion;

/// Definition of a single macro.
#[derive(Clone)]
pub struct Macro {
    /// The macro name (e.g., "all", "has", "map").
    pub name: &'static str,
    pub style: MacroStyle,
    pub arg_count: ArgCount,
    pub expander: MacroExpander,
    pub description: &'static str,
}

impl Macro {
    pub const fn new(
        name: &'static str,
        style: MacroStyle,
        arg_count: ArgCount,
        expander: MacroExpander,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            style,
            arg_count,
            expander,
            description,
        }
    }

    /// Generate the lookup key for this macro.
    pub fn key(&self) -> String {
        make_key(self.name, self.arg_count.count(), self.style == MacroStyle::Receiver)
    }
}

impl std::fmt::Debug for Macro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Macro")
            .field("name", &self.name)
            .field("style", &self.style)
            .field("arg_count", &self.arg_count)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

fn make_key(name: &str, arg_count: usize, is_receiver: bool) -> String {
    format!("{}:{}:{}", name, arg_count, is_receiver)
}

/// Registry of macros with lookup by name, arity and call style.
#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Macro>,
    /// Minimum arity of vararg macros, keyed by `name:is_receiver`.
    vararg_keys: HashMap<String, usize>,
}

impl MacroRegistry {
    /// Create an empty macro registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard CEL macros.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_all(STANDARD_MACROS);
        registry
    }

    /// Register a macro, replacing any macro with the same key.
    pub fn register(&mut self, macro_def: Macro) {
        if macro_def.arg_count.is_vararg() {
            let vararg_key = format!(
                "{}:{}",
                macro_def.name,
                macro_def.style == MacroStyle::Receiver
            );
            self.vararg_keys
                .insert(vararg_key, macro_def.arg_count.count());
        }
        self.macros.insert(macro_def.key(), macro_def);
    }

    pub fn register_all(&mut self, macros: &[Macro]) {
        for macro_def in macros {
            self.register(macro_def.clone());
        }
    }

    /// Look up a macro by name, argument count, and receiver style.
    pub fn lookup(&self, name: &str, arg_count: usize, is_receiver: bool) -> Option<&Macro> {
        if let Some(m) = self.macros.get(&make_key(name, arg_count, is_receiver)) {
            return Some(m);
        }

        let min_args = *self.vararg_keys.get(&format!("{}:{}", name, is_receiver))?;
        if arg_count >= min_args {
            self.macros.get(&make_key(name, min_args, is_receiver))
        } else {
            None
        }
    }

    /// Check if any macro with this name and call style is registered.
    pub fn has_name(&self, name: &str, is_receiver: bool) -> bool {
        self.macros.values().any(|m| {
            m.name == name && (m.style == MacroStyle::Receiver) == is_receiver
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.macros.values().any(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.macros.values()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

// ============================================================================
// Macro tables
// ============================================================================

/// Accumulator variable name used in comprehension expansions.
pub const ACCU_VAR: &str = "__result__";

/// Iteration variable used by bind-style expansions, which never iterate.
pub const UNUSED_ITER_VAR: &str = "#unused";

/// Standard CEL macros.
pub static STANDARD_MACROS: &[Macro] = &[
    Macro::new(
        "has",
        MacroStyle::Global,
        ArgCount::Exact(1),
        expand_has,
        "Tests whether a field is set",
    ),
    Macro::new(
        "all",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_all,
        "Tests whether all elements satisfy a condition",
    ),
    Macro::new(
        "exists",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_exists,
        "Tests whether any element satisfies a condition",
    ),
    Macro::new(
        "exists_one",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_exists_one,
        "Tests whether exactly one element satisfies a condition",
    ),
    Macro::new(
        "map",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_map,
        "Transforms elements of a list",
    ),
    Macro::new(
        "map",
        MacroStyle::Receiver,
        ArgCount::Exact(3),
        expand_map_filtered,
        "Transforms elements of a list with filtering",
    ),
    Macro::new(
        "filter",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_filter,
        "Filters elements of a list by a condition",
    ),
];

/// Macros contributed by optional types at version 1 and later.
pub static OPTIONAL_MACROS: &[Macro] = &[
    Macro::new(
        "optMap",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_opt_map,
        "Applies a function to the value of a present optional",
    ),
    Macro::new(
        "optFlatMap",
        MacroStyle::Receiver,
        ArgCount::Exact(2),
        expand_opt_flat_map,
        "Applies an optional-returning function to a present optional",
    ),
];

/// Macros contributed by the collections library.
pub static COLLECTIONS_MACROS: &[Macro] = &[Macro::new(
    "as",
    MacroStyle::Receiver,
    ArgCount::Exact(2),
    expand_as,
    "Binds the receiver to a name within an expression",
)];

// === Helper Functions ===

fn error(message: impl Into<String>, span: Span) -> MacroExpansion {
    MacroExpansion::Error {
        message: message.into(),
        span,
    }
}

/// Split a receiver macro's arguments into `(receiver, var_name, rest)`.
fn receiver_and_var(
    name: &str,
    span: &Span,
    receiver: Option<SpannedExpr>,
    mut args: Vec<SpannedExpr>,
) -> Result<(SpannedExpr, String, Vec<SpannedExpr>), MacroExpansion> {
    let receiver =
        receiver.ok_or_else(|| error(format!("{}() requires a receiver", name), span.clone()))?;
    if args.is_empty() {
        return Err(error(format!("{}() requires arguments", name), span.clone()));
    }
    let var = args.remove(0);
    match var.node {
        Expr::Ident(name) => Ok((receiver, name, args)),
        _ => Err(error("argument must be a simple name", var.span)),
    }
}

/// Assemble a comprehension rooted at a freshly allocated ID.
#[allow(clippy::too_many_arguments)]
fn comprehension(
    ctx: &mut MacroContext,
    span: Span,
    iter_var: String,
    iter_range: SpannedExpr,
    accu_var: &str,
    accu_init: Box<SpannedExpr>,
    loop_condition: Box<SpannedExpr>,
    loop_step: Box<SpannedExpr>,
    result: Box<SpannedExpr>,
) -> SpannedExpr {
    Spanned::new(
        ctx.next_id(),
        Expr::Comprehension {
            iter_var,
            iter_range: Box::new(iter_range),
            accu_var: accu_var.to_string(),
            accu_init,
            loop_condition,
            loop_step,
            result,
        },
        span,
    )
}

fn accu(ctx: &mut MacroContext, span: &Span) -> Box<SpannedExpr> {
    ctx.boxed(Expr::Ident(ACCU_VAR.to_string()), span)
}

/// `bind var = init in body`, expressed as a comprehension over an empty list.
fn bind(
    ctx: &mut MacroContext,
    span: Span,
    var: String,
    init: SpannedExpr,
    body: SpannedExpr,
) -> SpannedExpr {
    let iter_range = ctx.node(Expr::List(Vec::new()), &span);
    let loop_condition = ctx.boxed(Expr::Bool(false), &span);
    let loop_step = ctx.boxed(Expr::Ident(var.clone()), &span);
    comprehension(
        ctx,
        span,
        UNUSED_ITER_VAR.to_string(),
        iter_range,
        &var,
        Box::new(init),
        loop_condition,
        loop_step,
        Box::new(body),
    )
}

/// Build `target.name(args...)` as a synthetic call.
fn method_call(
    ctx: &mut MacroContext,
    span: &Span,
    target: SpannedExpr,
    name: &str,
    args: Vec<SpannedExpr>,
) -> SpannedExpr {
    let callee = ctx.node(
        Expr::Member {
            expr: Box::new(target),
            field: name.to_string(),
            optional: false,
        },
        span,
    );
    ctx.node(
        Expr::Call {
            expr: Box::new(callee),
            args,
        },
        span,
    )
}

// === has() ===

fn expand_has(
    ctx: &mut MacroContext,
    span: Span,
    _receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let Some(arg) = args.into_iter().next() else {
        return error("has() requires 1 argument", span);
    };

    match arg.node {
        Expr::Member {
            expr,
            field,
            optional: false,
        } => MacroExpansion::Expanded(ctx.node(Expr::MemberTestOnly { expr, field }, &span)),
        _ => error("invalid argument to has() macro", arg.span),
    }
}

// === all(), exists(), exists_one() ===

fn expand_all(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let (range, iter_var, mut rest) = match receiver_and_var("all", &span, receiver, args) {
        Ok(parts) => parts,
        Err(e) => return e,
    };
    let cond = rest.remove(0);

    let accu_init = ctx.boxed(Expr::Bool(true), &span);
    let loop_condition = accu(ctx, &span);
    let accu_ref = accu(ctx, &span);
    let loop_step = ctx.boxed(
        Expr::Binary {
            op: BinaryOp::And,
            left: accu_ref,
            right: Box::new(cond),
        },
        &span,
    );
    let result = accu(ctx, &span);

    MacroExpansion::Expanded(comprehension(
        ctx, span, iter_var, range, ACCU_VAR, accu_init, loop_condition, loop_step, result,
    ))
}

fn expand_exists(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let (range, iter_var, mut rest) = match receiver_and_var("exists", &span, receiver, args) {
        Ok(parts) => parts,
        Err(e) => return e,
    };
    let cond = rest.remove(0);

    let accu_init = ctx.boxed(Expr::Bool(false), &span);
    let accu_ref = accu(ctx, &span);
    let loop_condition = ctx.boxed(
        Expr::Unary {
            op: UnaryOp::Not,
            expr: accu_ref,
        },
        &span,
    );
    let accu_ref = accu(ctx, &span);
    let loop_step = ctx.boxed(
        Expr::Binary {
            op: BinaryOp::Or,
            left: accu_ref,
            right: Box::new(cond),
        },
        &span,
    );
    let result = accu(ctx, &span);

    MacroExpansion::Expanded(comprehension(
        ctx, span, iter_var, range, ACCU_VAR, accu_init, loop_condition, loop_step, result,
    ))
}

fn expand_exists_one(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let (range, iter_var, mut rest) = match receiver_and_var("exists_one", &span, receiver, args)
    {
        Ok(parts) => parts,
        Err(e) => return e,
    };
    let cond = rest.remove(0);

    let accu_init = ctx.boxed(Expr::Int(0), &span);
    let loop_condition = ctx.boxed(Expr::Bool(true), &span);

    let accu_ref = accu(ctx, &span);
    let one = ctx.boxed(Expr::Int(1), &span);
    let increment = ctx.boxed(
        Expr::Binary {
            op: BinaryOp::Add,
            left: accu_ref,
            right: one,
        },
        &span,
    );
    let unchanged = accu(ctx, &span);
    let loop_step = ctx.boxed(
        Expr::Ternary {
            cond: Box::new(cond),
            then_expr: increment,
            else_expr: unchanged,
        },
        &span,
    );

    let accu_ref = accu(ctx, &span);
    let one = ctx.boxed(Expr::Int(1), &span);
    let result = ctx.boxed(
        Expr::Binary {
            op: BinaryOp::Eq,
            left: accu_ref,
            right: one,
        },
        &span,
    );

    MacroExpansion::Expanded(comprehension(
        ctx, span, iter_var, range, ACCU_VAR, accu_init, loop_condition, loop_step, result,
    ))
}

// === map(), filter() ===

/// `accu + [elem]`
fn append(ctx: &mut MacroContext, span: &Span, elem: SpannedExpr) -> Box<SpannedExpr> {
    let accu_ref = accu(ctx, span);
    let single = ctx.boxed(
        Expr::List(vec![ListElement {
            expr: elem,
            optional: false,
        }]),
        span,
    );
    ctx.boxed(
        Expr::Binary {
            op: BinaryOp::Add,
            left: accu_ref,
            right: single,
        },
        span,
    )
}

/// Fold over `range`, appending `transform` for elements passing `filter`.
fn expand_list_fold(
    ctx: &mut MacroContext,
    span: Span,
    range: SpannedExpr,
    iter_var: String,
    filter: Option<SpannedExpr>,
    transform: SpannedExpr,
) -> MacroExpansion {
    let accu_init = ctx.boxed(Expr::List(Vec::new()), &span);
    let loop_condition = ctx.boxed(Expr::Bool(true), &span);
    let appended = append(ctx, &span, transform);
    let loop_step = match filter {
        Some(cond) => {
            let unchanged = accu(ctx, &span);
            ctx.boxed(
                Expr::Ternary {
                    cond: Box::new(cond),
                    then_expr: appended,
                    else_expr: unchanged,
                },
                &span,
            )
        }
        None => appended,
    };
    let result = accu(ctx, &span);

    MacroExpansion::Expanded(comprehension(
        ctx, span, iter_var, range, ACCU_VAR, accu_init, loop_condition, loop_step, result,
    ))
}

fn expand_map(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    match receiver_and_var("map", &span, receiver, args) {
        Ok((range, iter_var, mut rest)) => {
            let transform = rest.remove(0);
            expand_list_fold(ctx, span, range, iter_var, None, transform)
        }
        Err(e) => e,
    }
}

fn expand_map_filtered(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    match receiver_and_var("map", &span, receiver, args) {
        Ok((range, iter_var, mut rest)) => {
            let filter = rest.remove(0);
            let transform = rest.remove(0);
            expand_list_fold(ctx, span, range, iter_var, Some(filter), transform)
        }
        Err(e) => e,
    }
}

fn expand_filter(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    match receiver_and_var("filter", &span, receiver, args) {
        Ok((range, iter_var, mut rest)) => {
            let filter = rest.remove(0);
            let elem = ctx.node(Expr::Ident(iter_var.clone()), &span);
            expand_list_fold(ctx, span, range, iter_var, Some(filter), elem)
        }
        Err(e) => e,
    }
}

// === optMap(), optFlatMap() ===

/// `target.hasValue() ? then : optional.none()`
fn opt_branch(
    ctx: &mut MacroContext,
    span: Span,
    target: SpannedExpr,
    then_expr: SpannedExpr,
) -> SpannedExpr {
    let has_value = method_call(ctx, &span, target, "hasValue", Vec::new());
    let optional = ctx.node(Expr::Ident("optional".to_string()), &span);
    let none = method_call(ctx, &span, optional, "none", Vec::new());
    ctx.node(
        Expr::Ternary {
            cond: Box::new(has_value),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(none),
        },
        &span,
    )
}

fn expand_opt_map(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let (target, var, mut rest) = match receiver_and_var("optMap", &span, receiver, args) {
        Ok(parts) => parts,
        Err(e) => return e,
    };
    let body = rest.remove(0);

    let value = method_call(ctx, &span, target.clone(), "value", Vec::new());
    let bound = bind(ctx, span.clone(), var, value, body);
    let optional = ctx.node(Expr::Ident("optional".to_string()), &span);
    let wrapped = method_call(ctx, &span, optional, "of", vec![bound]);
    MacroExpansion::Expanded(opt_branch(ctx, span, target, wrapped))
}

fn expand_opt_flat_map(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    let (target, var, mut rest) = match receiver_and_var("optFlatMap", &span, receiver, args) {
        Ok(parts) => parts,
        Err(e) => return e,
    };
    let body = rest.remove(0);

    let value = method_call(ctx, &span, target.clone(), "value", Vec::new());
    let bound = bind(ctx, span.clone(), var, value, body);
    MacroExpansion::Expanded(opt_branch(ctx, span, target, bound))
}

// === as() ===

fn expand_as(
    ctx: &mut MacroContext,
    span: Span,
    receiver: Option<SpannedExpr>,
    args: Vec<SpannedExpr>,
) -> MacroExpansion {
    match receiver_and_var("as", &span, receiver, args) {
        Ok((target, var, mut rest)) => {
            let body = rest.remove(0);
            MacroExpansion::Expanded(bind(ctx, span, var, target, body))
        }
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(id: i64, name: &str) -> SpannedExpr {
        Spanned::new(id, Expr::Ident(name.to_string()), 0..name.len())
    }

    fn expand(
        macro_def: &Macro,
        receiver: Option<SpannedExpr>,
        args: Vec<SpannedExpr>,
    ) -> MacroExpansion {
        let mut next = 100;
        let mut next_id = || {
            next += 1;
            next
        };
        let mut ctx = MacroContext::new(&mut next_id);
        (macro_def.expander)(&mut ctx, 0..10, receiver, args)
    }

    #[test]
    fn standard_registry_lookup() {
        let registry = MacroRegistry::standard();
        assert!(registry.lookup("has", 1, false).is_some());
        assert!(registry.lookup("has", 1, true).is_none());
        assert!(registry.lookup("map", 2, true).is_some());
        assert!(registry.lookup("map", 3, true).is_some());
        assert!(registry.lookup("map", 4, true).is_none());
        assert!(registry.lookup("optMap", 2, true).is_none());
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn vararg_lookup_falls_back_to_minimum() {
        let mut registry = MacroRegistry::new();
        registry.register(Macro::new(
            "variadic",
            MacroStyle::Global,
            ArgCount::VarArg(1),
            expand_has,
            "test",
        ));
        assert!(registry.lookup("variadic", 3, false).is_some());
        assert!(registry.lookup("variadic", 0, false).is_none());
    }

    #[test]
    fn has_name_respects_style() {
        let mut registry = MacroRegistry::standard();
        registry.register_all(COLLECTIONS_MACROS);
        assert!(registry.has_name("as", true));
        assert!(!registry.has_name("as", false));
        assert!(registry.has_name("has", false));
    }

    #[test]
    fn all_expands_to_comprehension() {
        let all = MacroRegistry::standard().lookup("all", 2, true).cloned().unwrap();
        let result = expand(&all, Some(ident(1, "xs")), vec![ident(2, "x"), ident(3, "ok")]);
        match result {
            MacroExpansion::Expanded(expr) => match expr.node {
                Expr::Comprehension {
                    iter_var,
                    accu_var,
                    accu_init,
                    ..
                } => {
                    assert_eq!(iter_var, "x");
                    assert_eq!(accu_var, ACCU_VAR);
                    assert_eq!(accu_init.node, Expr::Bool(true));
                }
                other => panic!("expected comprehension, got {:?}", other),
            },
            MacroExpansion::Error { message, .. } => panic!("unexpected error: {}", message),
        }
    }

    #[test]
    fn iteration_variable_must_be_simple_name() {
        let exists = MacroRegistry::standard()
            .lookup("exists", 2, true)
            .cloned()
            .unwrap();
        let var = Spanned::new(
            2,
            Expr::Member {
                expr: Box::new(ident(4, "a")),
                field: "b".into(),
                optional: false,
            },
            3..6,
        );
        match expand(&exists, Some(ident(1, "xs")), vec![var, ident(3, "ok")]) {
            MacroExpansion::Error { message, span } => {
                assert_eq!(message, "argument must be a simple name");
                assert_eq!(span, 3..6);
            }
            MacroExpansion::Expanded(_) => panic!("expected error"),
        }
    }

    #[test]
    fn has_requires_field_selection() {
        let has = MacroRegistry::standard().lookup("has", 1, false).cloned().unwrap();
        assert!(matches!(
            expand(&has, None, vec![ident(1, "x")]),
            MacroExpansion::Error { .. }
        ));
    }

    #[test]
    fn as_binds_receiver() {
        let result = expand(&COLLECTIONS_MACROS[0], Some(ident(1, "state")), vec![
            ident(2, "s"),
            ident(3, "s"),
        ]);
        match result {
            MacroExpansion::Expanded(expr) => match expr.node {
                Expr::Comprehension {
                    iter_var,
                    accu_var,
                    accu_init,
                    loop_condition,
                    ..
                } => {
                    assert_eq!(iter_var, UNUSED_ITER_VAR);
                    assert_eq!(accu_var, "s");
                    assert_eq!(accu_init.node, Expr::Ident("state".into()));
                    assert_eq!(loop_condition.node, Expr::Bool(false));
                }
                other => panic!("expected comprehension, got {:?}", other),
            },
            MacroExpansion::Error { message, .. } => panic!("unexpected error: {}", message),
        }
    }

    #[test]
    fn opt_map_expands_to_ternary() {
        let result = expand(&OPTIONAL_MACROS[0], Some(ident(1, "o")), vec![
            ident(2, "v"),
            ident(3, "v"),
        ]);
        match result {
            MacroExpansion::Expanded(expr) => {
                assert!(matches!(expr.node, Expr::Ternary { .. }));
            }
            MacroExpansion::Error { message, .. } => panic!("unexpected error: {}", message),
        }
    }
}
