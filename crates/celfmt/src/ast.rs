//! Compiled expressions bound to their source text.
//!
//! An `Ast` is what the formatter consumes: the expression tree, the
//! original text (for literal spelling and line positions), the comments
//! the lexer set aside, and the macro calls recorded during parsing.

use celfmt_checker::CheckResult;
use celfmt_common::{CelType, Comment, MacroCalls, Source, SpannedExpr};

/// A parsed, and usually type-checked, expression.
///
/// - `Env::compile()` returns a checked `Ast`.
/// - `Env::parse_only()` returns an unchecked one.
#[derive(Debug, Clone)]
pub struct Ast {
    expr: SpannedExpr,
    source: Source,
    comments: Vec<Comment>,
    macro_calls: MacroCalls,
    /// Type checking results (None if unchecked).
    type_info: Option<CheckResult>,
}

impl Ast {
    /// Create an unchecked AST (after parsing, before type checking).
    pub fn new_unchecked(
        expr: SpannedExpr,
        source: Source,
        comments: Vec<Comment>,
        macro_calls: MacroCalls,
    ) -> Self {
        Self {
            expr,
            source,
            comments,
            macro_calls,
            type_info: None,
        }
    }

    /// Attach type checking results.
    pub fn with_type_info(mut self, check_result: CheckResult) -> Self {
        self.type_info = Some(check_result);
        self
    }

    pub fn is_checked(&self) -> bool {
        self.type_info.is_some()
    }

    pub fn expr(&self) -> &SpannedExpr {
        &self.expr
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Line comments in source order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Original macro calls keyed by the id of the node they expanded to.
    /// Empty unless the environment tracks macro calls.
    pub fn macro_calls(&self) -> &MacroCalls {
        &self.macro_calls
    }

    pub fn type_info(&self) -> Option<&CheckResult> {
        self.type_info.as_ref()
    }

    /// The type of the root expression, if checked.
    pub fn result_type(&self) -> Option<&CelType> {
        self.type_info
            .as_ref()
            .and_then(|info| info.type_map.get(&self.expr.id))
    }
}
