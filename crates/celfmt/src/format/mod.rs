//! Canonical source layout for compiled expressions.
//!
//! ```
//! use celfmt::{format, Env, FormatOptions};
//!
//! let env = Env::celfmt().unwrap();
//! let ast = env.compile("state.items.map(i,i.id)").unwrap();
//! let text = format(&ast, &FormatOptions::default()).unwrap();
//! assert_eq!(text, "state.items.map(i, i.id)");
//! ```

mod comments;
mod options;
mod render;

pub use options::{FormatOptions, Style, INDENT_WIDTH, MAX_LINE_WIDTH};

use crate::ast::Ast;
use crate::error::FormatError;
use comments::CommentCursor;
use render::Printer;

/// Print `ast` as source text.
///
/// The output parses back to an expression that is structurally equal to
/// the input, and formatting the output again returns it unchanged.
pub fn format(ast: &Ast, options: &FormatOptions) -> Result<String, FormatError> {
    let cursor = CommentCursor::new(ast.comments(), ast.source());
    let mut printer = Printer::new(ast.source(), cursor, ast.macro_calls(), options);
    printer.program(ast.expr())
}
