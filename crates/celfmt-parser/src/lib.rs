//! CEL (Common Expression Language) parser.
//!
//! Produces a [`SpannedExpr`] with macros expanded inline, plus the line
//! comments found in the source and, when requested, the original form of
//! every macro call.

mod lexer;
pub mod macros;
mod parser;

pub use celfmt_common::{
    BinaryOp, Comment, Expr, MacroCalls, Span, Spanned, SpannedExpr, UnaryOp,
};
pub use macros::{
    ArgCount, Macro, MacroContext, MacroExpander, MacroExpansion, MacroRegistry, MacroStyle,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default limit on expression nesting.
///
/// Counts every node on the longest path through the tree, both as written
/// and after macro expansion. The checker and the formatter recurse once per
/// level, so this also bounds their stack use.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 64;

/// A parse error with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for ParseError {}

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Accept `.?`, `[?` and `?`-prefixed list, map and struct elements.
    pub optional_syntax: bool,
    /// Record the original call for each macro expansion.
    pub macro_call_tracking: bool,
    pub max_recursion_depth: usize,
    pub macros: MacroRegistry,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            optional_syntax: false,
            macro_call_tracking: false,
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
            macros: MacroRegistry::standard(),
        }
    }
}

impl ParseOptions {
    pub fn with_optional_syntax(mut self, enabled: bool) -> Self {
        self.optional_syntax = enabled;
        self
    }

    pub fn with_macro_call_tracking(mut self, enabled: bool) -> Self {
        self.macro_call_tracking = enabled;
        self
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Register additional macros on top of the current registry.
    pub fn with_macros(mut self, macros: &[Macro]) -> Self {
        self.macros.register_all(macros);
        self
    }
}

/// Result of parsing a CEL expression.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The parsed AST, if parsing succeeded far enough to produce one.
    pub ast: Option<SpannedExpr>,
    /// Any parse errors encountered.
    pub errors: Vec<ParseError>,
    /// Line comments in source order.
    pub comments: Vec<Comment>,
    /// Original macro calls keyed by expansion ID.
    pub macro_calls: MacroCalls,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.ast.is_some()
    }

    /// Returns true if there are any parse errors.
    pub fn is_err(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Converts to a Result, discarding partial AST on error.
    pub fn into_result(self) -> Result<SpannedExpr, Vec<ParseError>> {
        if self.errors.is_empty() {
            self.ast.ok_or_else(Vec::new)
        } else {
            Err(self.errors)
        }
    }
}

/// Parse a CEL expression with the standard macros and no optional syntax.
pub fn parse(input: &str) -> ParseResult {
    parse_with_options(input, &ParseOptions::default())
}

/// Parse a CEL expression from source.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> ParseResult {
    let (tokens, comments) = match lexer::lex(input) {
        Ok(lexed) => lexed,
        Err(e) => {
            return ParseResult {
                ast: None,
                errors: vec![ParseError::new(e.message, e.span)],
                comments: Vec::new(),
                macro_calls: MacroCalls::new(),
            };
        }
    };

    let (ast, errors, macro_calls) = parser::parse_tokens(&tokens, options);

    ParseResult {
        ast,
        errors,
        comments,
        macro_calls,
    }
}
