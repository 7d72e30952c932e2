//! Source text with a line index, and the comments found in it.

use std::sync::Arc;

use crate::ast::Span;

/// A `//` line comment captured while lexing.
///
/// `text` is the comment as written, including the leading `//` and
/// excluding the line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// Expression source text plus the byte offset of every line start.
#[derive(Debug, Clone)]
pub struct Source {
    text: Arc<str>,
    line_starts: Vec<usize>,
}

impl Source {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source text covered by `span`, or `None` if the span is out of
    /// range or splits a UTF-8 sequence.
    pub fn slice(&self, span: &Span) -> Option<&str> {
        self.text.get(span.clone())
    }

    /// Zero-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// One-based line and column of `offset`, counting columns in chars.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let start = self.line_starts[line];
        let end = offset.min(self.text.len());
        let column = self
            .text
            .get(start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - start);
        (line + 1, column + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}
