//! Formatter configuration.

/// Default maximum line width before breaking.
pub const MAX_LINE_WIDTH: usize = 80;

/// Columns a tab indent counts for when measuring width.
pub const INDENT_WIDTH: usize = 4;

/// Overall layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Break lines to fit the width, keeping comments.
    #[default]
    Pretty,
    /// Everything on one line; comments are dropped.
    Compact,
}

/// Options for [`format`](super::format).
///
/// Indentation is always one tab per level; `indent_width` is only how
/// wide a tab counts when deciding whether a line fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub style: Style,
    /// End every broken list, map, struct and argument list with a comma.
    pub always_comma: bool,
    pub indent_width: usize,
    pub max_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::pretty()
    }
}

impl FormatOptions {
    /// Pretty layout with trailing commas.
    pub fn pretty() -> Self {
        Self {
            style: Style::Pretty,
            always_comma: true,
            indent_width: INDENT_WIDTH,
            max_width: MAX_LINE_WIDTH,
        }
    }

    /// Single-line layout.
    pub fn compact() -> Self {
        Self {
            style: Style::Compact,
            always_comma: false,
            ..Self::pretty()
        }
    }

    pub fn with_max_width(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_always_comma(mut self, always_comma: bool) -> Self {
        self.always_comma = always_comma;
        self
    }

    pub fn is_compact(&self) -> bool {
        self.style == Style::Compact
    }

    /// Whether the last element of a broken sequence gets a comma.
    #[inline]
    pub fn trailing_comma(&self) -> bool {
        self.always_comma && !self.is_compact()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let pretty = FormatOptions::pretty();
        assert_eq!(pretty.style, Style::Pretty);
        assert!(pretty.trailing_comma());
        assert_eq!(pretty.max_width, 80);

        let compact = FormatOptions::compact();
        assert!(compact.is_compact());
        assert!(!compact.trailing_comma());
        assert!(!compact.with_always_comma(true).trailing_comma());
    }
}
