//! CEL Abstract Syntax Tree definitions.

use std::collections::HashMap;

/// Source span for error reporting and formatting.
/// Uses byte offsets into the source string.
pub type Span = std::ops::Range<usize>;

/// AST node with source location and unique ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// Unique identifier for this node (1-indexed, assigned during parsing)
    pub id: i64,
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(id: i64, node: T, span: Span) -> Self {
        Self { id, node, span }
    }
}

/// A spanned expression.
pub type SpannedExpr = Spanned<Expr>;

/// Map of expansion IDs to the original macro call expressions.
///
/// The key is the ID of the root node a macro expanded into. The value is
/// the call as it was written, with its arguments already parsed (and any
/// nested macros already expanded).
pub type MacroCalls = HashMap<i64, SpannedExpr>;

/// A list element that may be optional (`[?x]`).
#[derive(Debug, Clone, PartialEq)]
pub struct ListElement {
    pub expr: SpannedExpr,
    pub optional: bool,
}

/// A map entry that may be optional (`{?k: v}`).
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    pub key: SpannedExpr,
    pub value: SpannedExpr,
    pub optional: bool,
}

/// A struct field that may be optional (`T{?f: v}`).
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    /// Span of the field name.
    pub span: Span,
    pub value: SpannedExpr,
    pub optional: bool,
}

/// CEL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),

    // Identifiers
    Ident(String),
    /// Root-scoped identifier (`.name`) - resolves in root scope only
    RootIdent(String),

    // Collections
    List(Vec<ListElement>),
    Map(Vec<MapEntry>),

    // Operations
    Unary {
        op: UnaryOp,
        expr: Box<SpannedExpr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<SpannedExpr>,
        right: Box<SpannedExpr>,
    },
    Ternary {
        cond: Box<SpannedExpr>,
        then_expr: Box<SpannedExpr>,
        else_expr: Box<SpannedExpr>,
    },

    // Access
    /// Field selection `a.b`, or `a.?b` when `optional` is set.
    Member {
        expr: Box<SpannedExpr>,
        field: String,
        optional: bool,
    },
    /// Index `a[b]`, or `a[?b]` when `optional` is set.
    Index {
        expr: Box<SpannedExpr>,
        index: Box<SpannedExpr>,
        optional: bool,
    },
    Call {
        expr: Box<SpannedExpr>,
        args: Vec<SpannedExpr>,
    },
    /// Struct/message literal: TypeName{field: value, ...}
    /// The type_name is the expression preceding the braces (Ident, RootIdent, or Member chain)
    Struct {
        type_name: Box<SpannedExpr>,
        fields: Vec<StructField>,
    },

    /// Comprehension expression (result of macro expansion).
    ///
    /// Semantics:
    /// ```text
    /// let accu_var = accu_init
    /// for (let iter_var in iter_range) {
    ///    if (!loop_condition) { break }
    ///    accu_var = loop_step
    /// }
    /// return result
    /// ```
    Comprehension {
        iter_var: String,
        iter_range: Box<SpannedExpr>,
        accu_var: String,
        accu_init: Box<SpannedExpr>,
        loop_condition: Box<SpannedExpr>,
        loop_step: Box<SpannedExpr>,
        result: Box<SpannedExpr>,
    },

    /// Member test expression (result of `has(m.x)` macro expansion).
    MemberTestOnly {
        expr: Box<SpannedExpr>,
        field: String,
    },

    /// Placeholder for a node that could not be built.
    Error,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation (`-`)
    Neg,
    /// Logical negation (`!`)
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // Membership
    In,

    // Logical
    And,
    Or,
}

impl UnaryOp {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }

    /// The function name the checker resolves this operator to.
    pub fn function_name(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-_",
            UnaryOp::Not => "!_",
        }
    }
}

impl BinaryOp {
    /// The operator as written in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// The function name the checker resolves this operator to.
    pub fn function_name(&self) -> &'static str {
        match self {
            BinaryOp::Add => "_+_",
            BinaryOp::Sub => "_-_",
            BinaryOp::Mul => "_*_",
            BinaryOp::Div => "_/_",
            BinaryOp::Mod => "_%_",
            BinaryOp::Eq => "_==_",
            BinaryOp::Ne => "_!=_",
            BinaryOp::Lt => "_<_",
            BinaryOp::Le => "_<=_",
            BinaryOp::Gt => "_>_",
            BinaryOp::Ge => "_>=_",
            BinaryOp::In => "@in",
            BinaryOp::And => "_&&_",
            BinaryOp::Or => "_||_",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge
            | BinaryOp::In => 3,
            BinaryOp::Add | BinaryOp::Sub => 4,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 5,
        }
    }
}

impl Expr {
    /// Compare two expressions ignoring node IDs and spans.
    ///
    /// Two trees that are structurally equal evaluate identically, which is
    /// what makes reformatted source interchangeable with its input.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Null, Expr::Null) | (Expr::Error, Expr::Error) => true,
            (Expr::Bool(a), Expr::Bool(b)) => a == b,
            (Expr::Int(a), Expr::Int(b)) => a == b,
            (Expr::UInt(a), Expr::UInt(b)) => a == b,
            (Expr::Float(a), Expr::Float(b)) => a.to_bits() == b.to_bits(),
            (Expr::String(a), Expr::String(b)) => a == b,
            (Expr::Bytes(a), Expr::Bytes(b)) => a == b,
            (Expr::Ident(a), Expr::Ident(b)) => a == b,
            (Expr::RootIdent(a), Expr::RootIdent(b)) => a == b,
            (Expr::List(a), Expr::List(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        x.optional == y.optional && x.expr.node.structurally_eq(&y.expr.node)
                    })
            }
            (Expr::Map(a), Expr::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| {
                        x.optional == y.optional
                            && x.key.node.structurally_eq(&y.key.node)
                            && x.value.node.structurally_eq(&y.value.node)
                    })
            }
            (
                Expr::Unary { op: a, expr: ae },
                Expr::Unary { op: b, expr: be },
            ) => a == b && ae.node.structurally_eq(&be.node),
            (
                Expr::Binary { op: a, left: al, right: ar },
                Expr::Binary { op: b, left: bl, right: br },
            ) => a == b && al.node.structurally_eq(&bl.node) && ar.node.structurally_eq(&br.node),
            (
                Expr::Ternary { cond: ac, then_expr: at, else_expr: ae },
                Expr::Ternary { cond: bc, then_expr: bt, else_expr: be },
            ) => {
                ac.node.structurally_eq(&bc.node)
                    && at.node.structurally_eq(&bt.node)
                    && ae.node.structurally_eq(&be.node)
            }
            (
                Expr::Member { expr: ae, field: af, optional: ao },
                Expr::Member { expr: be, field: bf, optional: bo },
            ) => af == bf && ao == bo && ae.node.structurally_eq(&be.node),
            (
                Expr::Index { expr: ae, index: ai, optional: ao },
                Expr::Index { expr: be, index: bi, optional: bo },
            ) => ao == bo && ae.node.structurally_eq(&be.node) && ai.node.structurally_eq(&bi.node),
            (Expr::Call { expr: ae, args: aa }, Expr::Call { expr: be, args: ba }) => {
                ae.node.structurally_eq(&be.node) && all_structurally_eq(aa, ba)
            }
            (
                Expr::Struct { type_name: at, fields: af },
                Expr::Struct { type_name: bt, fields: bf },
            ) => {
                at.node.structurally_eq(&bt.node)
                    && af.len() == bf.len()
                    && af.iter().zip(bf).all(|(x, y)| {
                        x.name == y.name
                            && x.optional == y.optional
                            && x.value.node.structurally_eq(&y.value.node)
                    })
            }
            (
                Expr::Comprehension {
                    iter_var: av,
                    iter_range: ar,
                    accu_var: aa,
                    accu_init: ai,
                    loop_condition: ac,
                    loop_step: asp,
                    result: ares,
                },
                Expr::Comprehension {
                    iter_var: bv,
                    iter_range: br,
                    accu_var: ba,
                    accu_init: bi,
                    loop_condition: bc,
                    loop_step: bsp,
                    result: bres,
                },
            ) => {
                av == bv
                    && aa == ba
                    && ar.node.structurally_eq(&br.node)
                    && ai.node.structurally_eq(&bi.node)
                    && ac.node.structurally_eq(&bc.node)
                    && asp.node.structurally_eq(&bsp.node)
                    && ares.node.structurally_eq(&bres.node)
            }
            (
                Expr::MemberTestOnly { expr: ae, field: af },
                Expr::MemberTestOnly { expr: be, field: bf },
            ) => af == bf && ae.node.structurally_eq(&be.node),
            _ => false,
        }
    }
}

impl Expr {
    /// Direct subexpressions, in source order where there is one.
    pub fn children(&self) -> Vec<&SpannedExpr> {
        match self {
            Expr::Null
            | Expr::Bool(_)
            | Expr::Int(_)
            | Expr::UInt(_)
            | Expr::Float(_)
            | Expr::String(_)
            | Expr::Bytes(_)
            | Expr::Ident(_)
            | Expr::RootIdent(_)
            | Expr::Error => Vec::new(),
            Expr::List(elements) => elements.iter().map(|e| &e.expr).collect(),
            Expr::Map(entries) => entries.iter().flat_map(|e| [&e.key, &e.value]).collect(),
            Expr::Unary { expr, .. }
            | Expr::Member { expr, .. }
            | Expr::MemberTestOnly { expr, .. } => vec![expr.as_ref()],
            Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => vec![cond.as_ref(), then_expr.as_ref(), else_expr.as_ref()],
            Expr::Index { expr, index, .. } => vec![expr.as_ref(), index.as_ref()],
            Expr::Call { expr, args } => std::iter::once(expr.as_ref()).chain(args).collect(),
            Expr::Struct { type_name, fields } => std::iter::once(type_name.as_ref())
                .chain(fields.iter().map(|f| &f.value))
                .collect(),
            Expr::Comprehension {
                iter_range,
                accu_init,
                loop_condition,
                loop_step,
                result,
                ..
            } => vec![
                iter_range.as_ref(),
                accu_init.as_ref(),
                loop_condition.as_ref(),
                loop_step.as_ref(),
                result.as_ref(),
            ],
        }
    }
}

impl SpannedExpr {
    /// Number of nodes on the longest path from this node to a leaf.
    ///
    /// With `calls`, macro expansions are measured as the call that was
    /// written instead. Walks with an explicit stack, so any tree can be
    /// measured.
    pub fn height(&self, calls: Option<&MacroCalls>) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, depth)) = stack.pop() {
            max = max.max(depth);
            let view = calls.and_then(|calls| calls.get(&expr.id)).unwrap_or(expr);
            stack.extend(view.node.children().into_iter().map(|child| (child, depth + 1)));
        }
        max
    }
}

fn all_structurally_eq(a: &[SpannedExpr], b: &[SpannedExpr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.node.structurally_eq(&y.node))
}
