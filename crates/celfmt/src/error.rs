//! Error types for the compile-then-format pipeline.

use celfmt_checker::CheckError;
use celfmt_common::extensions::XmlSchemaError;
use celfmt_common::{Source, Span};
use celfmt_parser::ParseError;
use thiserror::Error;

/// Failure to build an environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("xml library: {0}")]
    Xml(#[from] XmlSchemaError),

    #[error("unsupported optional types version {0}")]
    UnsupportedOptionalVersion(u32),

    #[error("variable '{name}' declared as both {first} and {second}")]
    ConflictingVariable {
        name: String,
        first: String,
        second: String,
    },
}

/// A source that failed to compile.
///
/// Parsing and checking are all-or-nothing: either variant carries every
/// diagnostic found, and no AST is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("{}", render_diagnostics(input, errors))]
    Parse {
        input: Source,
        errors: Vec<ParseError>,
    },

    #[error("{}", render_diagnostics(input, errors))]
    Check {
        input: Source,
        errors: Vec<CheckError>,
    },
}

impl CompileError {
    /// The individual diagnostics, each rendered as `line:column: message`.
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            CompileError::Parse { input, errors } => diagnostic_lines(input, errors),
            CompileError::Check { input, errors } => diagnostic_lines(input, errors),
        }
    }
}

/// A located message from either compiler stage.
trait Diagnostic {
    fn span(&self) -> &Span;
    fn message(&self) -> String;
}

impl Diagnostic for ParseError {
    fn span(&self) -> &Span {
        &self.span
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

impl Diagnostic for CheckError {
    fn span(&self) -> &Span {
        &self.span
    }

    fn message(&self) -> String {
        CheckError::message(self)
    }
}

fn diagnostic_lines<D: Diagnostic>(source: &Source, errors: &[D]) -> Vec<String> {
    errors
        .iter()
        .map(|e| {
            let (line, column) = source.line_col(e.span().start);
            format!("{}:{}: {}", line, column, e.message())
        })
        .collect()
}

fn render_diagnostics<D: Diagnostic>(source: &Source, errors: &[D]) -> String {
    diagnostic_lines(source, errors).join("\n")
}

/// The formatter met a tree it cannot render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no macro call recorded for expansion {0}")]
    MissingMacroCall(i64),

    #[error("expression {0} is an error node")]
    ErrorNode(i64),

    #[error("expression {0} is not a valid type name")]
    InvalidTypeName(i64),
}

/// A call from the host that was rejected before the pipeline ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("celFmt requires one argument")]
    Arity,

    #[error("celFmt argument must be a string")]
    NotAString,
}

/// Any failure surfaced to the host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CelFmtError {
    #[error(transparent)]
    Call(#[from] CallError),

    #[error("failed to create env: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to parse program: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to format program: {0}")]
    Format(#[from] FormatError),
}
