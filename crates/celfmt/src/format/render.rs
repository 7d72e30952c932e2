//! Layout of expressions into text.
//!
//! Every node is first tried on a single line. When that line would run past
//! the width limit, or a container holds comments, the node breaks:
//!
//! - lists, maps, struct literals and argument lists put one element per
//!   line, one level deeper, each followed by a comma;
//! - operator chains break after each operator, one operand per line;
//! - conditionals put `?` and `:` at the end of their lines with both
//!   branches indented, and keep the comments found between their parts.
//!
//! Non-empty maps and struct literals always break in pretty mode. Nodes
//! produced by macro expansion are printed as the call that was written.

use celfmt_common::{
    BinaryOp, Expr, ListElement, MacroCalls, MapEntry, Source, Span, SpannedExpr, StructField,
};

use super::comments::{comment_text, CommentCursor};
use super::options::FormatOptions;
use crate::error::FormatError;

type Result<T> = std::result::Result<T, FormatError>;

/// Binding strength of nodes that are not binary operators.
const TERNARY: u8 = 0;
const UNARY: u8 = 6;
const PRIMARY: u8 = 7;

/// One element of a bracketed sequence.
#[derive(Clone, Copy)]
enum Item<'a> {
    Element(&'a ListElement),
    Argument(&'a SpannedExpr),
    Entry(&'a MapEntry),
    Field(&'a StructField),
}

impl Item<'_> {
    fn span(&self) -> Span {
        match self {
            Item::Element(elem) => elem.expr.span.clone(),
            Item::Argument(arg) => arg.span.clone(),
            Item::Entry(entry) => entry.key.span.start..entry.value.span.end,
            Item::Field(field) => field.span.start..field.value.span.end,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// One line if it fits, otherwise one element per line.
    Fill,
    /// Like `Fill`, but a trailing bracketed argument may open on the
    /// call's line.
    Hug,
    /// Always one element per line.
    Break,
}

pub(crate) struct Printer<'a> {
    source: &'a Source,
    macro_calls: &'a MacroCalls,
    comments: CommentCursor<'a>,
    options: &'a FormatOptions,
}

impl<'a> Printer<'a> {
    pub fn new(
        source: &'a Source,
        comments: CommentCursor<'a>,
        macro_calls: &'a MacroCalls,
        options: &'a FormatOptions,
    ) -> Self {
        Self {
            source,
            macro_calls,
            comments,
            options,
        }
    }

    /// Lay out a whole program, including comments before and after the
    /// root expression.
    pub fn program(&mut self, root: &'a SpannedExpr) -> Result<String> {
        let mut out = String::new();
        if !self.options.is_compact() {
            for comment in self.comments.take_before(root.span.start) {
                out.push_str(comment_text(comment));
                out.push('\n');
            }
        }

        out.push_str(&self.render(root, 0, 0)?);

        if !self.options.is_compact() {
            for (i, comment) in self.comments.take_rest().iter().enumerate() {
                let trailing = i == 0
                    && comment.span.start >= root.span.end
                    && self.comments.same_line(comment.span.start, root.span.end);
                out.push(if trailing { ' ' } else { '\n' });
                out.push_str(comment_text(comment));
            }
        }
        Ok(out)
    }

    /// The node to print for `expr`: the recorded call if `expr` is the
    /// root of a macro expansion.
    fn resolve(&self, expr: &'a SpannedExpr) -> &'a SpannedExpr {
        self.macro_calls.get(&expr.id).unwrap_or(expr)
    }

    fn precedence(&self, expr: &'a SpannedExpr) -> u8 {
        match &self.resolve(expr).node {
            Expr::Ternary { .. } => TERNARY,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { .. } => UNARY,
            _ => PRIMARY,
        }
    }

    fn holds_comments(&self, span: &Span) -> bool {
        !self.options.is_compact() && self.comments.any_within(span)
    }

    fn fits(&self, col: usize, text: &str) -> bool {
        !text.contains('\n') && col + text.chars().count() <= self.options.max_width
    }

    /// Column after printing `text` starting at `col`.
    fn end_col(&self, col: usize, text: &str) -> usize {
        match text.rsplit_once('\n') {
            Some((_, last)) => {
                let tabs = last.chars().take_while(|c| *c == '\t').count();
                tabs * self.options.indent_width + last.chars().count() - tabs
            }
            None => col + text.chars().count(),
        }
    }

    fn indentation(&self, level: usize) -> String {
        "\t".repeat(level)
    }

    // === Single line ===

    /// `expr` on one line, or `None` if it has to break regardless of width.
    fn flat(&self, expr: &'a SpannedExpr) -> Result<Option<String>> {
        let expr = self.resolve(expr);
        let text = match &expr.node {
            Expr::Null
            | Expr::Bool(_)
            | Expr::Int(_)
            | Expr::UInt(_)
            | Expr::Float(_)
            | Expr::String(_)
            | Expr::Bytes(_) => self.literal(expr),
            Expr::Ident(name) => name.clone(),
            Expr::RootIdent(name) => format!(".{}", name),
            Expr::Unary { op, expr: operand } => {
                let Some(inner) = self.flat_operand(operand, self.precedence(operand) < UNARY)?
                else {
                    return Ok(None);
                };
                format!("{}{}", op.as_str(), inner)
            }
            Expr::Binary { op, left, right } => {
                let prec = op.precedence();
                let Some(l) = self.flat_operand(left, self.precedence(left) < prec)? else {
                    return Ok(None);
                };
                let Some(r) = self.flat_operand(right, self.precedence(right) <= prec)? else {
                    return Ok(None);
                };
                format!("{} {} {}", l, op.as_str(), r)
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                // Comments up to the else branch get their own lines. The
                // else branch places its own.
                if self.holds_comments(&(expr.span.start..else_expr.span.start)) {
                    return Ok(None);
                }
                let Some(c) = self.flat_operand(cond, self.precedence(cond) == TERNARY)? else {
                    return Ok(None);
                };
                let Some(t) = self.flat_operand(then_expr, self.precedence(then_expr) == TERNARY)?
                else {
                    return Ok(None);
                };
                let Some(e) = self.flat(else_expr)? else {
                    return Ok(None);
                };
                format!("{} ? {} : {}", c, t, e)
            }
            Expr::Member {
                expr: operand,
                field,
                optional,
            } => {
                let Some(recv) = self.flat_primary(operand)? else {
                    return Ok(None);
                };
                format!("{}{}{}", recv, member_dot(*optional), field)
            }
            Expr::Index {
                expr: operand,
                index,
                optional,
            } => {
                let Some(recv) = self.flat_primary(operand)? else {
                    return Ok(None);
                };
                let Some(idx) = self.flat(index)? else {
                    return Ok(None);
                };
                format!("{}{}{}]", recv, index_open(*optional), idx)
            }
            Expr::Call { expr: callee, args } => {
                if self.holds_comments(&expr.span) {
                    return Ok(None);
                }
                let Some(name) = self.flat_callee(callee)? else {
                    return Ok(None);
                };
                let items: Vec<Item<'a>> = args.iter().map(Item::Argument).collect();
                let Some(parts) = self.flat_items(&items)? else {
                    return Ok(None);
                };
                format!("{}({})", name, parts.join(", "))
            }
            Expr::List(elements) => {
                if self.holds_comments(&expr.span) {
                    return Ok(None);
                }
                let items: Vec<Item<'a>> = elements.iter().map(Item::Element).collect();
                let Some(parts) = self.flat_items(&items)? else {
                    return Ok(None);
                };
                format!("[{}]", parts.join(", "))
            }
            Expr::Map(entries) => {
                if self.holds_comments(&expr.span)
                    || (!entries.is_empty() && !self.options.is_compact())
                {
                    return Ok(None);
                }
                let items: Vec<Item<'a>> = entries.iter().map(Item::Entry).collect();
                let Some(parts) = self.flat_items(&items)? else {
                    return Ok(None);
                };
                format!("{{{}}}", parts.join(", "))
            }
            Expr::Struct { type_name, fields } => {
                if self.holds_comments(&expr.span)
                    || (!fields.is_empty() && !self.options.is_compact())
                {
                    return Ok(None);
                }
                let name = self.type_name(type_name)?;
                let items: Vec<Item<'a>> = fields.iter().map(Item::Field).collect();
                let Some(parts) = self.flat_items(&items)? else {
                    return Ok(None);
                };
                format!("{}{{{}}}", name, parts.join(", "))
            }
            Expr::Comprehension { .. } | Expr::MemberTestOnly { .. } => {
                return Err(FormatError::MissingMacroCall(expr.id))
            }
            Expr::Error => return Err(FormatError::ErrorNode(expr.id)),
        };
        Ok(Some(text))
    }

    fn flat_operand(&self, expr: &'a SpannedExpr, parens: bool) -> Result<Option<String>> {
        Ok(self
            .flat(expr)?
            .map(|text| if parens { format!("({})", text) } else { text }))
    }

    fn flat_primary(&self, expr: &'a SpannedExpr) -> Result<Option<String>> {
        self.flat_operand(expr, self.precedence(expr) < PRIMARY)
    }

    fn flat_callee(&self, callee: &'a SpannedExpr) -> Result<Option<String>> {
        match &callee.node {
            Expr::Ident(name) => Ok(Some(name.clone())),
            Expr::RootIdent(name) => Ok(Some(format!(".{}", name))),
            Expr::Member {
                expr: receiver,
                field,
                optional,
            } => Ok(self
                .flat_primary(receiver)?
                .map(|recv| format!("{}{}{}", recv, member_dot(*optional), field))),
            _ => self.flat_primary(callee),
        }
    }

    fn flat_items(&self, items: &[Item<'a>]) -> Result<Option<Vec<String>>> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            match self.flat_item(*item)? {
                Some(part) => parts.push(part),
                None => return Ok(None),
            }
        }
        Ok(Some(parts))
    }

    fn flat_item(&self, item: Item<'a>) -> Result<Option<String>> {
        let text = match item {
            Item::Argument(arg) => return self.flat(arg),
            Item::Element(elem) => self
                .flat(&elem.expr)?
                .map(|value| format!("{}{}", optional_marker(elem.optional), value)),
            Item::Entry(entry) => match (self.flat(&entry.key)?, self.flat(&entry.value)?) {
                (Some(key), Some(value)) => Some(format!(
                    "{}{}: {}",
                    optional_marker(entry.optional),
                    key,
                    value
                )),
                _ => None,
            },
            Item::Field(field) => self.flat(&field.value)?.map(|value| {
                format!(
                    "{}{}: {}",
                    optional_marker(field.optional),
                    field.name,
                    value
                )
            }),
        };
        Ok(text)
    }

    /// Literals keep their source spelling (quote style, raw and triple
    /// quoted strings, hex integers, exponents).
    fn literal(&self, expr: &SpannedExpr) -> String {
        if let Some(text) = self.source.slice(&expr.span) {
            // `-9223372036854775808` spans its sign, and whatever the source
            // put between the two.
            if let (Expr::Int(_), Some(rest)) = (&expr.node, text.strip_prefix('-')) {
                let digits = rest
                    .rsplit(|c: char| !c.is_ascii_alphanumeric())
                    .next()
                    .unwrap_or(rest);
                return format!("-{}", digits);
            }
            if !text.is_empty() {
                return text.to_string();
            }
        }
        match &expr.node {
            Expr::Null => "null".to_string(),
            Expr::Bool(b) => b.to_string(),
            Expr::Int(n) => n.to_string(),
            Expr::UInt(n) => format!("{}u", n),
            Expr::Float(f) => format_float(*f),
            Expr::String(s) => format!("\"{}\"", escape_string(s)),
            Expr::Bytes(b) => format!("b\"{}\"", escape_bytes(b)),
            _ => String::new(),
        }
    }

    fn type_name(&self, type_name: &'a SpannedExpr) -> Result<String> {
        match &type_name.node {
            Expr::Ident(name) => Ok(name.clone()),
            Expr::RootIdent(name) => Ok(format!(".{}", name)),
            Expr::Member {
                expr,
                field,
                optional: false,
            } => Ok(format!("{}.{}", self.type_name(expr)?, field)),
            _ => Err(FormatError::InvalidTypeName(type_name.id)),
        }
    }

    // === Width-aware layout ===

    /// Lay out `expr` starting at column `col` on a line indented `indent`
    /// levels.
    fn render(&mut self, expr: &'a SpannedExpr, indent: usize, col: usize) -> Result<String> {
        let flat = self.flat(expr)?;
        if let Some(text) = &flat {
            if self.options.is_compact() || self.fits(col, text) {
                return Ok(text.clone());
            }
        }

        let expr = self.resolve(expr);
        match &expr.node {
            Expr::Unary { op, expr: operand } => {
                let parens = self.precedence(operand) < UNARY;
                let inner = self.render_operand(operand, parens, indent, col + 1)?;
                Ok(format!("{}{}", op.as_str(), inner))
            }
            Expr::Binary { op, left, right } => {
                self.render_binary(*op, left, right, flat.is_some(), indent, col)
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.render_ternary(cond, then_expr, else_expr, indent, col),
            Expr::Member {
                expr: operand,
                field,
                optional,
            } => {
                let recv = self.render_primary(operand, indent, col)?;
                Ok(format!("{}{}{}", recv, member_dot(*optional), field))
            }
            Expr::Index {
                expr: operand,
                index,
                optional,
            } => {
                let recv = self.render_primary(operand, indent, col)?;
                let open = index_open(*optional);
                let at = self.end_col(col, &recv) + open.len();
                let idx = self.render(index, indent, at)?;
                Ok(format!("{}{}{}]", recv, open, idx))
            }
            Expr::Call { expr: callee, args } => {
                let name = self.render_callee(callee, indent, col)?;
                let items: Vec<Item<'a>> = args.iter().map(Item::Argument).collect();
                let at = self.end_col(col, &name);
                let list = self.sequence("(", ")", &items, &expr.span, Layout::Hug, indent, at)?;
                Ok(format!("{}{}", name, list))
            }
            Expr::List(elements) => {
                let items: Vec<Item<'a>> = elements.iter().map(Item::Element).collect();
                self.sequence("[", "]", &items, &expr.span, Layout::Fill, indent, col)
            }
            Expr::Map(entries) => {
                let items: Vec<Item<'a>> = entries.iter().map(Item::Entry).collect();
                self.sequence("{", "}", &items, &expr.span, Layout::Break, indent, col)
            }
            Expr::Struct { type_name, fields } => {
                let name = self.type_name(type_name)?;
                let items: Vec<Item<'a>> = fields.iter().map(Item::Field).collect();
                let at = self.end_col(col, &name);
                let body = self.sequence("{", "}", &items, &expr.span, Layout::Break, indent, at)?;
                Ok(format!("{}{}", name, body))
            }
            // Literals and identifiers never break.
            _ => flat.ok_or(FormatError::ErrorNode(expr.id)),
        }
    }

    fn render_operand(
        &mut self,
        expr: &'a SpannedExpr,
        parens: bool,
        indent: usize,
        col: usize,
    ) -> Result<String> {
        if parens {
            Ok(format!("({})", self.render(expr, indent, col + 1)?))
        } else {
            self.render(expr, indent, col)
        }
    }

    fn render_primary(&mut self, expr: &'a SpannedExpr, indent: usize, col: usize) -> Result<String> {
        let parens = self.precedence(expr) < PRIMARY;
        self.render_operand(expr, parens, indent, col)
    }

    fn render_callee(&mut self, callee: &'a SpannedExpr, indent: usize, col: usize) -> Result<String> {
        match &callee.node {
            Expr::Ident(name) => Ok(name.clone()),
            Expr::RootIdent(name) => Ok(format!(".{}", name)),
            Expr::Member {
                expr: receiver,
                field,
                optional,
            } => {
                let recv = self.render_primary(receiver, indent, col)?;
                Ok(format!("{}{}{}", recv, member_dot(*optional), field))
            }
            _ => self.render_primary(callee, indent, col),
        }
    }

    /// A chain that is too wide breaks after every operator. Logical chains
    /// break even when an operand has to break; other operators then stay
    /// on the line and let the operand break instead.
    fn render_binary(
        &mut self,
        op: BinaryOp,
        left: &'a SpannedExpr,
        right: &'a SpannedExpr,
        single_line: bool,
        indent: usize,
        col: usize,
    ) -> Result<String> {
        let prec = op.precedence();
        if single_line || matches!(op, BinaryOp::And | BinaryOp::Or) {
            let (first, rest) = self.chain(op, left, right);
            let pad = self.indentation(indent);
            let line_start = indent * self.options.indent_width;
            let mut out = self.render_operand(first, self.precedence(first) < prec, indent, col)?;
            for (op, operand) in rest {
                out.push_str(&format!(" {}\n{}", op.as_str(), pad));
                let parens = self.precedence(operand) <= prec;
                out.push_str(&self.render_operand(operand, parens, indent, line_start)?);
            }
            return Ok(out);
        }

        let l = self.render_operand(left, self.precedence(left) < prec, indent, col)?;
        let at = self.end_col(col, &l) + op.as_str().len() + 2;
        let r = self.render_operand(right, self.precedence(right) <= prec, indent, at)?;
        Ok(format!("{} {} {}", l, op.as_str(), r))
    }

    /// Operands of a left-nested run of operators sharing `op`'s
    /// precedence: the first operand, then each operator with the operand
    /// after it.
    fn chain(
        &self,
        op: BinaryOp,
        left: &'a SpannedExpr,
        right: &'a SpannedExpr,
    ) -> (&'a SpannedExpr, Vec<(BinaryOp, &'a SpannedExpr)>) {
        let mut rest = vec![(op, right)];
        let mut current = left;
        while let Expr::Binary {
            op: inner,
            left,
            right,
        } = &current.node
        {
            if inner.precedence() != op.precedence() {
                break;
            }
            rest.push((*inner, right.as_ref()));
            current = left.as_ref();
        }
        rest.reverse();
        (current, rest)
    }

    fn render_ternary(
        &mut self,
        cond: &'a SpannedExpr,
        then_expr: &'a SpannedExpr,
        else_expr: &'a SpannedExpr,
        indent: usize,
        col: usize,
    ) -> Result<String> {
        let inner = indent + 1;
        let inner_col = inner * self.options.indent_width;
        let outer_pad = self.indentation(indent);
        let inner_pad = self.indentation(inner);

        let mut out = self.render_operand(cond, self.precedence(cond) == TERNARY, indent, col)?;
        out.push_str(" ?");
        self.trailing_comment(&mut out, cond.span.end, then_expr.span.start);
        self.leading_comments(&mut out, then_expr.span.start, &inner_pad);

        let t = self.render_operand(
            then_expr,
            self.precedence(then_expr) == TERNARY,
            inner,
            inner_col,
        )?;
        out.push('\n');
        out.push_str(&inner_pad);
        out.push_str(&t);
        self.trailing_comment(&mut out, then_expr.span.end, else_expr.span.start);

        out.push('\n');
        out.push_str(&outer_pad);
        out.push(':');
        self.leading_comments(&mut out, else_expr.span.start, &inner_pad);

        let e = self.render(else_expr, inner, inner_col)?;
        out.push('\n');
        out.push_str(&inner_pad);
        out.push_str(&e);
        Ok(out)
    }

    /// Pending comments before `pos`, each on its own line.
    fn leading_comments(&mut self, out: &mut String, pos: usize, pad: &str) {
        for comment in self.comments.take_before(pos) {
            out.push('\n');
            out.push_str(pad);
            out.push_str(comment_text(comment));
        }
    }

    fn trailing_comment(&mut self, out: &mut String, end: usize, limit: usize) {
        if let Some(comment) = self.comments.take_trailing(end, limit) {
            out.push(' ');
            out.push_str(comment_text(comment));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn sequence(
        &mut self,
        open: &str,
        close: &str,
        items: &[Item<'a>],
        span: &Span,
        layout: Layout,
        indent: usize,
        col: usize,
    ) -> Result<String> {
        let has_comments = self.holds_comments(span);
        if items.is_empty() && !has_comments {
            return Ok(format!("{}{}", open, close));
        }

        let one_line = self.options.is_compact() || (layout != Layout::Break && !has_comments);
        if one_line {
            if let Some(parts) = self.flat_items(items)? {
                let line = format!("{}{}{}", open, parts.join(", "), close);
                if self.options.is_compact() || self.fits(col, &line) {
                    return Ok(line);
                }
            }
            if layout == Layout::Hug {
                if let Some(hugged) = self.hug(open, close, items, indent, col)? {
                    return Ok(hugged);
                }
            }
        }

        self.broken(open, close, items, span, indent)
    }

    /// `f(a, b, [` with the last argument's body below, when everything
    /// before it fits on the call's line.
    fn hug(
        &mut self,
        open: &str,
        close: &str,
        items: &[Item<'a>],
        indent: usize,
        col: usize,
    ) -> Result<Option<String>> {
        let Some((last, init)) = items.split_last() else {
            return Ok(None);
        };
        if !self.is_bracketed(*last) {
            return Ok(None);
        }
        let Some(parts) = self.flat_items(init)? else {
            return Ok(None);
        };

        let mut head = String::from(open);
        for part in parts {
            head.push_str(&part);
            head.push_str(", ");
        }
        if !self.fits(col, &head) {
            return Ok(None);
        }

        let tail = self.render_item(*last, indent, self.end_col(col, &head))?;
        let Some((first_line, _)) = tail.split_once('\n') else {
            return Ok(None);
        };
        if !self.fits(col, &format!("{}{}", head, first_line)) {
            return Ok(None);
        }
        Ok(Some(format!("{}{}{}", head, tail, close)))
    }

    fn is_bracketed(&self, item: Item<'a>) -> bool {
        let Item::Argument(arg) = item else {
            return false;
        };
        matches!(
            self.resolve(arg).node,
            Expr::List(_) | Expr::Map(_) | Expr::Struct { .. } | Expr::Call { .. }
        )
    }

    fn broken(
        &mut self,
        open: &str,
        close: &str,
        items: &[Item<'a>],
        span: &Span,
        indent: usize,
    ) -> Result<String> {
        let inner = indent + 1;
        let inner_col = inner * self.options.indent_width;
        let pad = self.indentation(inner);
        let mut out = String::from(open);

        for (i, item) in items.iter().enumerate() {
            let item_span = item.span();
            self.leading_comments(&mut out, item_span.start, &pad);

            let text = self.render_item(*item, inner, inner_col)?;
            out.push('\n');
            out.push_str(&pad);
            out.push_str(&text);
            if i + 1 < items.len() || self.options.trailing_comma() {
                out.push(',');
            }

            let limit = items.get(i + 1).map_or(span.end, |next| next.span().start);
            self.trailing_comment(&mut out, item_span.end, limit);
        }

        self.leading_comments(&mut out, span.end, &pad);

        out.push('\n');
        out.push_str(&self.indentation(indent));
        out.push_str(close);
        Ok(out)
    }

    fn render_item(&mut self, item: Item<'a>, indent: usize, col: usize) -> Result<String> {
        match item {
            Item::Argument(arg) => self.render(arg, indent, col),
            Item::Element(elem) => {
                let marker = optional_marker(elem.optional);
                let value = self.render(&elem.expr, indent, col + marker.len())?;
                Ok(format!("{}{}", marker, value))
            }
            Item::Entry(entry) => {
                let marker = optional_marker(entry.optional);
                let key = self.render(&entry.key, indent, col + marker.len())?;
                let at = self.end_col(col + marker.len(), &key) + 2;
                let value = self.render(&entry.value, indent, at)?;
                Ok(format!("{}{}: {}", marker, key, value))
            }
            Item::Field(field) => {
                let marker = optional_marker(field.optional);
                let at = col + marker.len() + field.name.chars().count() + 2;
                let value = self.render(&field.value, indent, at)?;
                Ok(format!("{}{}: {}", marker, field.name, value))
            }
        }
    }
}

fn member_dot(optional: bool) -> &'static str {
    if optional {
        ".?"
    } else {
        "."
    }
}

fn index_open(optional: bool) -> &'static str {
    if optional {
        "[?"
    } else {
        "["
    }
}

fn optional_marker(optional: bool) -> &'static str {
    if optional {
        "?"
    } else {
        ""
    }
}

/// Format a float so it still reads as a double.
fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "double(\"NaN\")".to_string();
    }
    if f.is_infinite() {
        let sign = if f.is_sign_positive() { "" } else { "-" };
        return format!("double(\"{}Infinity\")", sign);
    }
    let s = f.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{}.0", s)
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if b.is_ascii_graphic() || b == b' ' => out.push(b as char),
            b => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}
