//! Comment placement.
//!
//! Comments are handed out strictly in source order. A comment is emitted
//! either on its own line before the element that follows it, after the
//! element it shares a source line with, or before the closing bracket of
//! the container it sits in. Comments that fall inside an expression with
//! no such slot move to the next one, so none is ever lost.

use celfmt_common::{Comment, Source, Span};

/// Cursor over the comments of one source.
pub struct CommentCursor<'a> {
    comments: &'a [Comment],
    source: &'a Source,
    next: usize,
}

impl<'a> CommentCursor<'a> {
    pub fn new(comments: &'a [Comment], source: &'a Source) -> Self {
        Self {
            comments,
            source,
            next: 0,
        }
    }

    /// Take every pending comment that starts before `pos`.
    pub fn take_before(&mut self, pos: usize) -> &'a [Comment] {
        let start = self.next;
        while self
            .comments
            .get(self.next)
            .is_some_and(|c| c.span.start < pos)
        {
            self.next += 1;
        }
        &self.comments[start..self.next]
    }

    /// Take the next comment if it follows `end` on the same source line
    /// and starts before `limit`.
    pub fn take_trailing(&mut self, end: usize, limit: usize) -> Option<&'a Comment> {
        let comment = self.comments.get(self.next)?;
        let start = comment.span.start;
        if start < end || start >= limit {
            return None;
        }
        if self.source.line_of(start) != self.source.line_of(end.saturating_sub(1)) {
            return None;
        }
        self.next += 1;
        Some(comment)
    }

    /// Whether a pending comment starts inside `span`.
    pub fn any_within(&self, span: &Span) -> bool {
        self.comments[self.next..]
            .iter()
            .any(|c| span.contains(&c.span.start))
    }

    /// Take every pending comment.
    pub fn take_rest(&mut self) -> &'a [Comment] {
        let rest = &self.comments[self.next..];
        self.next = self.comments.len();
        rest
    }

    /// Whether a comment at `offset` is on the same line as the byte
    /// before `end`.
    pub fn same_line(&self, offset: usize, end: usize) -> bool {
        self.source.line_of(offset) == self.source.line_of(end.saturating_sub(1))
    }
}

/// A comment as emitted: its text without trailing whitespace.
pub fn comment_text(comment: &Comment) -> &str {
    comment.text.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str, start: usize) -> Comment {
        Comment {
            text: text.to_string(),
            span: start..start + text.len(),
        }
    }

    #[test]
    fn test_take_before_is_ordered() {
        let source = Source::new("// a\n[1, // b\n2]");
        let comments = vec![comment("// a", 0), comment("// b", 9)];
        let mut cursor = CommentCursor::new(&comments, &source);

        assert_eq!(cursor.take_before(5).len(), 1);
        assert!(cursor.any_within(&(5..16)));
        assert!(cursor.take_before(5).is_empty());
        assert_eq!(cursor.take_rest().len(), 1);
        assert!(!cursor.any_within(&(0..16)));
    }

    #[test]
    fn test_trailing_requires_same_line() {
        let source = Source::new("[1, // b\n2 // c\n]");
        let comments = vec![comment("// b", 4), comment("// c", 11)];
        let mut cursor = CommentCursor::new(&comments, &source);

        // `1` ends at 2 and `// b` follows it on line one.
        assert_eq!(cursor.take_trailing(2, 9).map(|c| c.span.start), Some(4));
        // `// c` is on line two, not after anything ending on line one.
        assert!(cursor.take_trailing(2, 17).is_none());
        assert_eq!(cursor.take_trailing(10, 17).map(|c| c.span.start), Some(11));
    }

    #[test]
    fn test_trailing_respects_limit() {
        let source = Source::new("[1, 2 // c\n]");
        let comments = vec![comment("// c", 6)];
        let mut cursor = CommentCursor::new(&comments, &source);
        assert!(cursor.take_trailing(2, 4).is_none());
        assert!(cursor.take_trailing(5, 12).is_some());
    }

    #[test]
    fn test_comment_text_trims() {
        assert_eq!(comment_text(&comment("// x  ", 0)), "// x");
    }
}
