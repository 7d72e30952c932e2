//! CEL parser - hand-written recursive descent with inline macro expansion.

use celfmt_common::{
    BinaryOp, Expr, ListElement, MacroCalls, MapEntry, Span, Spanned, SpannedExpr, StructField,
    UnaryOp,
};

use crate::lexer::{SpannedToken, Token};
use crate::macros::{MacroContext, MacroExpansion};
use crate::{ParseError, ParseOptions};

/// Recursive descent parser for CEL expressions.
pub struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    /// Counter for generating unique node IDs (starts at 1)
    next_id: i64,
    /// Current expression nesting depth.
    depth: usize,
    options: &'a ParseOptions,
    /// Map of expansion IDs to original macro call expressions.
    macro_calls: MacroCalls,
    /// Accumulated macro expansion errors.
    macro_errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [SpannedToken], options: &'a ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            next_id: 1,
            depth: 0,
            options,
            macro_calls: MacroCalls::new(),
            macro_errors: Vec::new(),
        }
    }

    /// Take the macro_calls map, replacing it with an empty map.
    pub fn take_macro_calls(&mut self) -> MacroCalls {
        std::mem::take(&mut self.macro_calls)
    }

    /// Take accumulated macro errors.
    pub fn take_macro_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.macro_errors)
    }

    /// Allocate the next unique node ID.
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Utility Methods ===

    /// Peek at the current token without consuming it.
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    /// Get the span of the current token.
    pub fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| s.clone())
            .unwrap_or_else(|| self.eof_span())
    }

    /// Get the span representing end-of-input.
    fn eof_span(&self) -> Span {
        let end = self.tokens.last().map(|(_, s)| s.end).unwrap_or(0);
        end..end
    }

    /// Advance to the next token, returning the current one.
    fn advance(&mut self) -> Option<&'a SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Check if the current token matches the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Consume the current token if it matches, returning true if consumed.
    fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token, returning an error if not found.
    fn expect(&mut self, token: &Token) -> Result<Span, ParseError> {
        if self.check(token) {
            let span = self.peek_span();
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::new(
                format!("expected '{}', found {}", token, self.describe_current()),
                self.peek_span(),
            ))
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(token) => format!("'{}'", token),
            None => "end of input".to_string(),
        }
    }

    /// Consume a `?` marker if present, failing when optional syntax is disabled.
    fn match_optional_marker(&mut self, syntax: &str) -> Result<bool, ParseError> {
        if !self.check(&Token::Question) {
            return Ok(false);
        }
        if !self.options.optional_syntax {
            return Err(ParseError::new(
                format!("unsupported syntax '{}'", syntax),
                self.peek_span(),
            ));
        }
        self.advance();
        Ok(true)
    }

    /// Check if we've reached the end of the token stream.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn binary(&mut self, op: BinaryOp, left: SpannedExpr, right: SpannedExpr) -> SpannedExpr {
        let span = left.span.start..right.span.end;
        Spanned::new(
            self.next_id(),
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    /// Count one more level of nesting.
    ///
    /// Every node that wraps another (operator chains, unary runs, postfix
    /// selections and calls, nested expressions) enters a level, so the
    /// counter bounds the depth of the tree being built.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_recursion_depth {
            return Err(recursion_error(self.options, self.peek_span()));
        }
        Ok(())
    }

    fn leave(&mut self, levels: usize) {
        self.depth -= levels;
    }

    // === Expression Parsing ===

    /// Parse an expression (entry point).
    pub fn parse_expr(&mut self) -> Result<SpannedExpr, ParseError> {
        self.enter()?;
        let result = self.parse_ternary();
        self.leave(1);
        result
    }

    /// Parse ternary conditional: expr ? expr : expr
    fn parse_ternary(&mut self) -> Result<SpannedExpr, ParseError> {
        let cond = self.parse_or()?;

        if !self.match_token(&Token::Question) {
            return Ok(cond);
        }

        let then_expr = self.parse_or()?;
        self.expect(&Token::Colon)?;
        let else_expr = self.parse_expr()?;
        let span = cond.span.start..else_expr.span.end;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Ternary {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            span,
        ))
    }

    /// Parse logical OR: expr || expr
    fn parse_or(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut left = self.parse_and()?;
        let mut levels = 0;
        while self.match_token(&Token::Or) {
            self.enter()?;
            levels += 1;
            let right = self.parse_and()?;
            left = self.binary(BinaryOp::Or, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    /// Parse logical AND: expr && expr
    fn parse_and(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut left = self.parse_relation()?;
        let mut levels = 0;
        while self.match_token(&Token::And) {
            self.enter()?;
            levels += 1;
            let right = self.parse_relation()?;
            left = self.binary(BinaryOp::And, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    /// Parse relational operators: == != < <= > >= in
    fn parse_relation(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut left = self.parse_addition()?;
        let mut levels = 0;
        while let Some(op) = self.peek_relop() {
            self.advance();
            self.enter()?;
            levels += 1;
            let right = self.parse_addition()?;
            left = self.binary(op, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    /// Check if the current token is a relational operator.
    fn peek_relop(&self) -> Option<BinaryOp> {
        match self.peek()? {
            Token::EqEq => Some(BinaryOp::Eq),
            Token::Ne => Some(BinaryOp::Ne),
            Token::Lt => Some(BinaryOp::Lt),
            Token::Le => Some(BinaryOp::Le),
            Token::Gt => Some(BinaryOp::Gt),
            Token::Ge => Some(BinaryOp::Ge),
            Token::In => Some(BinaryOp::In),
            _ => None,
        }
    }

    /// Parse additive operators: + -
    fn parse_addition(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut left = self.parse_mult()?;
        let mut levels = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            self.enter()?;
            levels += 1;
            let right = self.parse_mult()?;
            left = self.binary(op, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    /// Parse multiplicative operators: * / %
    fn parse_mult(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut left = self.parse_unary()?;
        let mut levels = 0;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            self.enter()?;
            levels += 1;
            let right = self.parse_unary()?;
            left = self.binary(op, left, right);
        }
        self.leave(levels);
        Ok(left)
    }

    /// Parse unary operators: - !
    ///
    /// Operator runs are collected iteratively so `!!!!x` does not recurse.
    /// A minus directly before `9223372036854775808` is part of the literal.
    fn parse_unary(&mut self) -> Result<SpannedExpr, ParseError> {
        let mut ops = Vec::new();
        loop {
            let op = match self.peek() {
                Some(Token::Minus) => UnaryOp::Neg,
                Some(Token::Not) => UnaryOp::Not,
                _ => break,
            };
            self.enter()?;
            ops.push((op, self.peek_span().start));
            self.advance();
        }
        let levels = ops.len();

        let negated = match (ops.last(), self.peek()) {
            (Some(&(UnaryOp::Neg, start)), Some(Token::Int(n))) if *n == I64_MIN_MAGNITUDE => {
                Some(start)
            }
            _ => None,
        };
        if negated.is_some() {
            ops.pop();
        }

        let mut expr = self.parse_postfix(negated)?;
        self.leave(levels);
        while let Some((op, start)) = ops.pop() {
            let span = start..expr.span.end;
            expr = Spanned::new(
                self.next_id(),
                Expr::Unary {
                    op,
                    expr: Box::new(expr),
                },
                span,
            );
        }
        Ok(expr)
    }

    /// Parse postfix operators: . [] () {}
    fn parse_postfix(&mut self, negated: Option<usize>) -> Result<SpannedExpr, ParseError> {
        let mut expr = self.parse_atom(negated)?;
        let mut levels = 0;

        loop {
            let struct_init = is_type_expr(&expr);
            match self.peek() {
                Some(Token::LParen | Token::LBracket | Token::Dot) => {}
                // Struct literal (only if expr is an ident or member chain)
                Some(Token::LBrace) if struct_init => {}
                _ => break,
            }
            self.enter()?;
            levels += 1;

            expr = match self.peek() {
                Some(Token::LParen) => {
                    if !is_callable(&expr) {
                        return Err(ParseError::new(
                            "expression is not callable",
                            self.peek_span(),
                        ));
                    }
                    self.parse_call(expr)?
                }
                Some(Token::LBracket) => self.parse_index(expr)?,
                Some(Token::Dot) => self.parse_member(expr)?,
                _ => self.parse_struct_init(expr)?,
            };
        }

        self.leave(levels);
        Ok(expr)
    }

    /// Parse comma-separated items up to `close`, allowing a trailing comma.
    fn parse_comma_list<T>(
        &mut self,
        close: &Token,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<(Vec<T>, Span), ParseError> {
        let mut items = Vec::new();
        if !self.check(close) {
            items.push(item(self)?);
            while self.match_token(&Token::Comma) {
                if self.check(close) {
                    break; // trailing comma
                }
                items.push(item(self)?);
            }
        }
        let end = self.expect(close)?;
        Ok((items, end))
    }

    /// Parse a function call: expr(args...)
    /// Also handles inline macro expansion using the macro registry.
    fn parse_call(&mut self, callee: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = callee.span.start;
        self.expect(&Token::LParen)?;
        let (args, end_span) = self.parse_comma_list(&Token::RParen, Self::parse_expr)?;
        let span = start..end_span.end;

        if let Some(expanded) = self.try_macro_expansion(&callee, span.clone(), &args) {
            return Ok(expanded);
        }

        Ok(Spanned::new(
            self.next_id(),
            Expr::Call {
                expr: Box::new(callee),
                args,
            },
            span,
        ))
    }

    /// Try to expand a call as a macro using the registry.
    ///
    /// Returns None if no macro applies or the expansion failed; failures are
    /// recorded as errors and the call is kept unexpanded.
    fn try_macro_expansion(
        &mut self,
        callee: &SpannedExpr,
        span: Span,
        args: &[SpannedExpr],
    ) -> Option<SpannedExpr> {
        let options = self.options;
        let (name, receiver) = match &callee.node {
            Expr::Ident(name) if options.macros.has_name(name, false) => (name.as_str(), None),
            Expr::Member {
                expr,
                field,
                optional: false,
            } if options.macros.has_name(field, true) => (field.as_str(), Some((**expr).clone())),
            _ => return None,
        };
        let macro_def = options.macros.lookup(name, args.len(), receiver.is_some())?;

        let mut next_id = self.next_id;
        let result = {
            let mut next_id_fn = || {
                let id = next_id;
                next_id += 1;
                id
            };
            let mut ctx = MacroContext::new(&mut next_id_fn);
            (macro_def.expander)(&mut ctx, span.clone(), receiver, args.to_vec())
        };
        self.next_id = next_id;

        match result {
            MacroExpansion::Expanded(expr) => {
                if options.macro_call_tracking {
                    let original = Spanned::new(
                        expr.id,
                        Expr::Call {
                            expr: Box::new(callee.clone()),
                            args: args.to_vec(),
                        },
                        span,
                    );
                    self.macro_calls.insert(expr.id, original);
                }
                Some(expr)
            }
            MacroExpansion::Error { message, span } => {
                self.macro_errors.push(ParseError::new(message, span));
                None
            }
        }
    }

    /// Parse an index operation: expr[index] or expr[?index]
    fn parse_index(&mut self, base: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = base.span.start;
        self.expect(&Token::LBracket)?;
        let optional = self.match_optional_marker("[?")?;
        let index = self.parse_expr()?;
        let end_span = self.expect(&Token::RBracket)?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Index {
                expr: Box::new(base),
                index: Box::new(index),
                optional,
            },
            start..end_span.end,
        ))
    }

    /// Parse member access: expr.field or expr.?field
    fn parse_member(&mut self, base: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = base.span.start;
        self.expect(&Token::Dot)?;
        let optional = self.match_optional_marker(".?")?;

        // Reserved words are valid selectors, e.g. `x.as(y, y)`.
        let (field, end) = match self.peek() {
            Some(Token::Ident(name)) | Some(Token::Reserved(name)) => {
                let field = name.clone();
                let end = self.peek_span().end;
                self.advance();
                (field, end)
            }
            _ => {
                return Err(ParseError::new(
                    format!(
                        "expected identifier after '.', found {}",
                        self.describe_current()
                    ),
                    self.peek_span(),
                ));
            }
        };

        Ok(Spanned::new(
            self.next_id(),
            Expr::Member {
                expr: Box::new(base),
                field,
                optional,
            },
            start..end,
        ))
    }

    /// Parse struct initialization: Type{field: value, ...}
    fn parse_struct_init(&mut self, type_name: SpannedExpr) -> Result<SpannedExpr, ParseError> {
        let start = type_name.span.start;
        self.expect(&Token::LBrace)?;
        let (fields, end_span) =
            self.parse_comma_list(&Token::RBrace, Self::parse_struct_field)?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Struct {
                type_name: Box::new(type_name),
                fields,
            },
            start..end_span.end,
        ))
    }

    /// Parse a struct field: name: value or ?name: value
    fn parse_struct_field(&mut self) -> Result<StructField, ParseError> {
        let optional = self.match_optional_marker("?")?;
        let (name, span) = match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                let span = self.peek_span();
                self.advance();
                (name, span)
            }
            _ => {
                return Err(ParseError::new(
                    format!("expected field name, found {}", self.describe_current()),
                    self.peek_span(),
                ));
            }
        };

        self.expect(&Token::Colon)?;
        let value = self.parse_expr()?;

        Ok(StructField {
            name,
            span,
            value,
            optional,
        })
    }

    /// Parse an atom: literal, identifier, parenthesized expression, list, or map.
    ///
    /// `negated` holds the start of a minus sign folded into the literal
    /// `9223372036854775808`.
    fn parse_atom(&mut self, negated: Option<usize>) -> Result<SpannedExpr, ParseError> {
        let span = self.peek_span();

        let Some((token, _)) = self.advance() else {
            return Err(ParseError::new("unexpected end of input", self.eof_span()));
        };

        let node = match token {
            Token::Int(n) => match negated {
                Some(start) => {
                    return Ok(Spanned::new(
                        self.next_id(),
                        Expr::Int(i64::MIN),
                        start..span.end,
                    ));
                }
                None => match i64::try_from(*n) {
                    Ok(n) => Expr::Int(n),
                    Err(_) => {
                        return Err(ParseError::new("integer literal out of range", span));
                    }
                },
            },
            Token::UInt(n) => Expr::UInt(*n),
            Token::Float(n) => Expr::Float(*n),
            Token::String(s) => Expr::String(s.clone()),
            Token::Bytes(b) => Expr::Bytes(b.clone()),
            Token::True => Expr::Bool(true),
            Token::False => Expr::Bool(false),
            Token::Null => Expr::Null,
            Token::Ident(name) => Expr::Ident(name.clone()),

            Token::Reserved(word) => {
                return Err(ParseError::new(
                    format!(
                        "'{}' is a reserved word and cannot be used as an identifier",
                        word
                    ),
                    span,
                ));
            }

            // Root identifier: .name
            Token::Dot => match self.advance() {
                Some((Token::Ident(name), end_span)) => {
                    return Ok(Spanned::new(
                        self.next_id(),
                        Expr::RootIdent(name.clone()),
                        span.start..end_span.end,
                    ));
                }
                _ => {
                    return Err(ParseError::new(
                        "expected identifier after '.'",
                        self.peek_span(),
                    ));
                }
            },

            Token::LParen => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                return Ok(expr);
            }

            Token::LBracket => return self.parse_list(span.start),
            Token::LBrace => return self.parse_map(span.start),

            token => {
                return Err(ParseError::new(
                    format!("unexpected token '{}'", token),
                    span,
                ));
            }
        };

        Ok(Spanned::new(self.next_id(), node, span))
    }

    /// Parse a list literal after its opening bracket: [expr, ?expr, ...]
    fn parse_list(&mut self, start: usize) -> Result<SpannedExpr, ParseError> {
        let (items, end_span) = self.parse_comma_list(&Token::RBracket, |p| {
            let optional = p.match_optional_marker("?")?;
            let expr = p.parse_expr()?;
            Ok(ListElement { expr, optional })
        })?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::List(items),
            start..end_span.end,
        ))
    }

    /// Parse a map literal after its opening brace: {expr: expr, ?expr: expr, ...}
    fn parse_map(&mut self, start: usize) -> Result<SpannedExpr, ParseError> {
        let (entries, end_span) = self.parse_comma_list(&Token::RBrace, |p| {
            let optional = p.match_optional_marker("?")?;
            let key = p.parse_expr()?;
            p.expect(&Token::Colon)?;
            let value = p.parse_expr()?;
            Ok(MapEntry {
                key,
                value,
                optional,
            })
        })?;

        Ok(Spanned::new(
            self.next_id(),
            Expr::Map(entries),
            start..end_span.end,
        ))
    }
}

/// Magnitude of `i64::MIN`, the one integer literal that needs its sign.
const I64_MIN_MAGNITUDE: u64 = 1 << 63;

fn recursion_error(options: &ParseOptions, span: Span) -> ParseError {
    ParseError::new(
        format!(
            "expression recursion limit exceeded: {}",
            options.max_recursion_depth
        ),
        span,
    )
}

/// Check if the expression can be used as a function or method target.
fn is_callable(expr: &SpannedExpr) -> bool {
    matches!(
        expr.node,
        Expr::Ident(_) | Expr::RootIdent(_) | Expr::Member { optional: false, .. }
    )
}

/// Check if the expression can be used as a type name for struct literals.
fn is_type_expr(expr: &SpannedExpr) -> bool {
    match &expr.node {
        Expr::Ident(_) | Expr::RootIdent(_) => true,
        Expr::Member {
            expr,
            optional: false,
            ..
        } => is_type_expr(expr),
        _ => false,
    }
}

/// Parse tokens into an AST with inline macro expansion.
///
/// Returns the AST, any parse errors encountered (macro expansion errors
/// included), and the map of macro call IDs to original expressions.
pub fn parse_tokens(
    tokens: &[SpannedToken],
    options: &ParseOptions,
) -> (Option<SpannedExpr>, Vec<ParseError>, MacroCalls) {
    if tokens.is_empty() {
        return (
            None,
            vec![ParseError::new("empty input", 0..0)],
            MacroCalls::new(),
        );
    }

    let mut parser = Parser::new(tokens, options);
    match parser.parse_expr() {
        Ok(ast) => {
            let macro_calls = parser.take_macro_calls();
            let mut errors = parser.take_macro_errors();
            // Macro expansions and operator chains can nest deeper than the
            // levels counted while parsing. Both the expanded tree and the
            // tree as written must stay within the limit.
            let height = ast.height(None).max(ast.height(Some(&macro_calls)));
            if height > options.max_recursion_depth {
                errors.push(recursion_error(options, ast.span.clone()));
                return (None, errors, MacroCalls::new());
            }
            if !parser.at_end() {
                errors.push(ParseError::new(
                    "unexpected tokens after expression",
                    parser.peek_span(),
                ));
            }
            (Some(ast), errors, macro_calls)
        }
        Err(e) => {
            let mut errors = parser.take_macro_errors();
            errors.push(e);
            (None, errors, MacroCalls::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::macros::{ACCU_VAR, COLLECTIONS_MACROS, OPTIONAL_MACROS};

    fn full_options() -> ParseOptions {
        ParseOptions::default()
            .with_optional_syntax(true)
            .with_macro_call_tracking(true)
            .with_macros(OPTIONAL_MACROS)
            .with_macros(COLLECTIONS_MACROS)
    }

    fn parse_with(input: &str, options: &ParseOptions) -> (SpannedExpr, MacroCalls) {
        let (tokens, _) = lex(input).unwrap();
        let (ast, errors, macro_calls) = parse_tokens(&tokens, options);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        (ast.expect("expected AST"), macro_calls)
    }

    fn parse_expr(input: &str) -> SpannedExpr {
        parse_with(input, &ParseOptions::default()).0
    }

    fn parse_errors(input: &str, options: &ParseOptions) -> Vec<ParseError> {
        let (tokens, _) = lex(input).unwrap();
        parse_tokens(&tokens, options).1
    }

    #[test]
    fn parse_precedence() {
        let expr = parse_expr("1 + 2 * 3");
        match expr.node {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op, BinaryOp::Add);
                assert!(matches!(
                    right.node,
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn parse_left_associative() {
        let expr = parse_expr("a - b - c");
        match expr.node {
            Expr::Binary { op, left, .. } => {
                assert_eq!(op, BinaryOp::Sub);
                assert!(matches!(left.node, Expr::Binary { .. }));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn parse_ternary_is_right_associative() {
        let expr = parse_expr("a ? b : c ? d : e");
        match expr.node {
            Expr::Ternary { else_expr, .. } => {
                assert!(matches!(else_expr.node, Expr::Ternary { .. }));
            }
            other => panic!("expected ternary, got {:?}", other),
        }
    }

    #[test]
    fn parse_unary_chain_spans() {
        let expr = parse_expr("!!x");
        assert_eq!(expr.span, 0..3);
        match expr.node {
            Expr::Unary { op, expr: inner } => {
                assert_eq!(op, UnaryOp::Not);
                assert_eq!(inner.span, 1..3);
            }
            other => panic!("expected unary, got {:?}", other),
        }
    }

    #[test]
    fn node_ids_are_unique() {
        fn collect(expr: &SpannedExpr, ids: &mut Vec<i64>) {
            ids.push(expr.id);
            match &expr.node {
                Expr::Binary { left, right, .. } => {
                    collect(left, ids);
                    collect(right, ids);
                }
                Expr::Call { expr, args } => {
                    collect(expr, ids);
                    args.iter().for_each(|a| collect(a, ids));
                }
                Expr::Member { expr, .. } => collect(expr, ids),
                _ => {}
            }
        }
        let mut ids = Vec::new();
        collect(&parse_expr("a.b(c, d) + e"), &mut ids);
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }

    #[test]
    fn reserved_word_allowed_as_selector() {
        let expr = parse_expr("a.package");
        assert!(matches!(expr.node, Expr::Member { ref field, .. } if field == "package"));
    }

    #[test]
    fn trailing_commas_accepted() {
        assert!(matches!(parse_expr("[1, 2,]").node, Expr::List(ref l) if l.len() == 2));
        assert!(matches!(parse_expr("{1: 2,}").node, Expr::Map(ref m) if m.len() == 1));
        assert!(matches!(parse_expr("f(1, 2,)").node, Expr::Call { ref args, .. } if args.len() == 2));
    }

    #[test]
    fn optional_syntax_requires_option() {
        let errors = parse_errors("a.?b", &ParseOptions::default());
        assert_eq!(errors[0].message, "unsupported syntax '.?'");

        let (expr, _) = parse_with("a.?b", &full_options());
        assert!(matches!(expr.node, Expr::Member { optional: true, .. }));
    }

    #[test]
    fn optional_elements() {
        let (expr, _) = parse_with("[?a, b]", &full_options());
        match expr.node {
            Expr::List(items) => {
                assert!(items[0].optional);
                assert!(!items[1].optional);
            }
            other => panic!("expected list, got {:?}", other),
        }

        let (expr, _) = parse_with("{?'k': v}", &full_options());
        assert!(matches!(expr.node, Expr::Map(ref m) if m[0].optional));

        let (expr, _) = parse_with("m[?'k']", &full_options());
        assert!(matches!(expr.node, Expr::Index { optional: true, .. }));
    }

    #[test]
    fn struct_field_spans() {
        let expr = parse_expr("Msg{name: 1}");
        match expr.node {
            Expr::Struct { fields, .. } => {
                assert_eq!(fields[0].name, "name");
                assert_eq!(fields[0].span, 4..8);
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn macro_calls_recorded_when_tracking() {
        let (expr, calls) = parse_with("xs.all(x, x > 0)", &full_options());
        assert!(matches!(expr.node, Expr::Comprehension { ref accu_var, .. } if accu_var == ACCU_VAR));
        let original = calls.get(&expr.id).expect("macro call recorded");
        match &original.node {
            Expr::Call { expr, args } => {
                assert!(matches!(expr.node, Expr::Member { ref field, .. } if field == "all"));
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn macro_calls_not_recorded_without_tracking() {
        let (_, calls) = parse_with("has(a.b)", &ParseOptions::default());
        assert!(calls.is_empty());
    }

    #[test]
    fn macro_errors_are_reported() {
        let errors = parse_errors("xs.all(x.y, true)", &ParseOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "argument must be a simple name");
    }

    #[test]
    fn as_macro_needs_collections() {
        let (expr, _) = parse_with("state.as(s, s.x)", &full_options());
        assert!(matches!(expr.node, Expr::Comprehension { .. }));

        let expr = parse_expr("state.as(s, s.x)");
        assert!(matches!(expr.node, Expr::Call { .. }));
    }

    #[test]
    fn recursion_limit() {
        let options = ParseOptions::default().with_max_recursion_depth(8);
        let input = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        let errors = parse_errors(&input, &options);
        assert_eq!(errors[0].message, "expression recursion limit exceeded: 8");

        let input = format!("{}1{}", "(".repeat(5), ")".repeat(5));
        assert!(parse_errors(&input, &options).is_empty());
    }

    #[test]
    fn recursion_limit_counts_every_nesting_node() {
        let options = ParseOptions::default().with_max_recursion_depth(8);
        let limit = |input: String| {
            let errors = parse_errors(&input, &options);
            errors
                .iter()
                .any(|e| e.message == "expression recursion limit exceeded: 8")
        };

        // Eight nodes deep is allowed, nine is not.
        assert!(!limit(vec!["1"; 8].join(" + ")));
        assert!(limit(vec!["1"; 9].join(" && ")));
        assert!(!limit(format!("{}true", "!".repeat(7))));
        assert!(limit(format!("{}true", "-".repeat(8))));
        assert!(!limit(format!("a{}", ".b".repeat(7))));
        assert!(limit(format!("a{}", "[0]".repeat(8))));
        assert!(!limit(format!("{}1{}", "[".repeat(7), "]".repeat(7))));
        assert!(limit(format!("{}1{}", "[".repeat(8), "]".repeat(8))));
    }

    #[test]
    fn recursion_limit_applies_to_finished_tree() {
        // The parenthesized chain is counted while the outer chain is still
        // short; the tree it ends up in is six nodes deep.
        let input = "1 + (1 + 1 + 1) + 1 + 1";
        let errors = parse_errors(input, &ParseOptions::default().with_max_recursion_depth(5));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expression recursion limit exceeded: 5");

        assert!(parse_errors(input, &ParseOptions::default().with_max_recursion_depth(6)).is_empty());
    }

    #[test]
    fn long_inputs_fail_without_recursing() {
        let options = ParseOptions::default();
        for input in [
            vec!["1"; 5000].join("+"),
            format!("{}true", "!".repeat(5000)),
            format!("state{}", ".a".repeat(5000)),
            format!("{}1{}", "[".repeat(5000), "]".repeat(5000)),
        ] {
            let errors = parse_errors(&input, &options);
            assert!(
                errors[0].message.starts_with("expression recursion limit exceeded"),
                "{:?}",
                errors
            );
        }
    }

    #[test]
    fn parse_int64_min() {
        let expr = parse_expr("-9223372036854775808");
        assert_eq!(expr.node, Expr::Int(i64::MIN));
        assert_eq!(expr.span, 0..20);

        let expr = parse_expr("- 9223372036854775808");
        assert_eq!(expr.node, Expr::Int(i64::MIN));

        // Only the innermost minus belongs to the literal.
        let expr = parse_expr("--9223372036854775808");
        match expr.node {
            Expr::Unary { op, expr } => {
                assert_eq!(op, UnaryOp::Neg);
                assert_eq!(expr.node, Expr::Int(i64::MIN));
            }
            other => panic!("expected unary, got {:?}", other),
        }

        // Other negative literals stay negations.
        let expr = parse_expr("-5");
        assert!(matches!(expr.node, Expr::Unary { op: UnaryOp::Neg, .. }));
    }

    #[test]
    fn parse_int_out_of_range() {
        let errors = parse_errors("9223372036854775808", &ParseOptions::default());
        assert_eq!(errors[0].message, "integer literal out of range");
        assert_eq!(errors[0].span, 0..19);

        let errors = parse_errors("!9223372036854775808", &ParseOptions::default());
        assert_eq!(errors[0].message, "integer literal out of range");
    }
}
