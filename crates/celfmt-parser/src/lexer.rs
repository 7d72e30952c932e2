//! CEL lexer using logos.

use celfmt_common::{Comment, Span};
use logos::Logos;

/// A token with its source span.
pub type SpannedToken = (Token, Span);

/// Lexer error with span information.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// CEL tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// Line comment; split out of the token stream by [`lex`].
    #[regex(r"//[^\n]*")]
    Comment,

    // === Numeric Literals ===
    // Order matters: more specific patterns first

    // Hex unsigned: 0x1Fu, 0X1FU
    #[regex(r"0[xX][0-9a-fA-F]+[uU]", lex_hex_uint)]
    // Decimal unsigned: 123u, 123U
    #[regex(r"[0-9]+[uU]", lex_decimal_uint, priority = 4)]
    UInt(u64),

    /// Magnitude of a signed integer literal. The parser checks the range,
    /// since `-9223372036854775808` is only valid with its sign.
    // Hex int: 0x1F, 0X1F
    #[regex(r"0[xX][0-9a-fA-F]+", lex_hex_int, priority = 3)]
    // Decimal int: 123 (lowest priority for numbers)
    #[regex(r"[0-9]+", lex_decimal_int, priority = 1)]
    Int(u64),

    // Float with decimal point and optional exponent: 1.5, 1.5e10, .5
    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?", lex_float, priority = 5)]
    // Float with exponent only: 1e10, 1E-5
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", lex_float, priority = 2)]
    Float(f64),

    // === String Literals ===
    // Triple-quoted strings (must come before single/double to match first)
    #[regex(r#"""""#, lex_triple_double_string)]
    #[regex(r"'''", lex_triple_single_string)]
    #[regex(r#"[rR]""""#, lex_triple_double_string)]
    #[regex(r"[rR]'''", lex_triple_single_string)]
    // Raw strings
    #[regex(r#"[rR]""#, lex_raw_double_string)]
    #[regex(r"[rR]'", lex_raw_single_string)]
    // Regular strings
    #[regex(r#"""#, lex_double_string)]
    #[regex(r"'", lex_single_string)]
    String(String),

    // === Bytes Literals ===
    #[regex(r#"[bB]""#, lex_bytes_double)]
    #[regex(r"[bB]'", lex_bytes_single)]
    Bytes(Vec<u8>),

    // === Keywords ===
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("in")]
    In,

    // === Reserved Words ===
    #[token("as", |_| "as".to_string())]
    #[token("break", |_| "break".to_string())]
    #[token("const", |_| "const".to_string())]
    #[token("continue", |_| "continue".to_string())]
    #[token("else", |_| "else".to_string())]
    #[token("for", |_| "for".to_string())]
    #[token("function", |_| "function".to_string())]
    #[token("if", |_| "if".to_string())]
    #[token("import", |_| "import".to_string())]
    #[token("let", |_| "let".to_string())]
    #[token("loop", |_| "loop".to_string())]
    #[token("package", |_| "package".to_string())]
    #[token("namespace", |_| "namespace".to_string())]
    #[token("return", |_| "return".to_string())]
    #[token("var", |_| "var".to_string())]
    #[token("void", |_| "void".to_string())]
    #[token("while", |_| "while".to_string())]
    Reserved(String),

    // === Identifier ===
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 0)]
    Ident(String),

    // === Operators (multi-char first) ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("!")]
    Not,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Comment => write!(f, "comment"),
            Token::Int(n) => write!(f, "{}", n),
            Token::UInt(n) => write!(f, "{}u", n),
            Token::Float(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "{:?}", s),
            Token::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Null => write!(f, "null"),
            Token::In => write!(f, "in"),
            Token::Reserved(s) => write!(f, "{}", s),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::EqEq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Not => write!(f, "!"),
            Token::Question => write!(f, "?"),
            Token::Colon => write!(f, ":"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Dot => write!(f, "."),
            Token::Comma => write!(f, ","),
        }
    }
}

// === Lexer Callbacks for Numbers ===

fn lex_decimal_int(lex: &mut logos::Lexer<Token>) -> Option<u64> {
    lex.slice().parse().ok()
}

fn lex_decimal_uint(lex: &mut logos::Lexer<Token>) -> Option<u64> {
    let s = lex.slice();
    s[..s.len() - 1].parse().ok() // Remove trailing u/U
}

fn lex_hex_int(lex: &mut logos::Lexer<Token>) -> Option<u64> {
    let s = lex.slice();
    u64::from_str_radix(&s[2..], 16).ok() // Skip 0x
}

fn lex_hex_uint(lex: &mut logos::Lexer<Token>) -> Option<u64> {
    let s = lex.slice();
    u64::from_str_radix(&s[2..s.len() - 1], 16).ok() // Skip 0x, remove u
}

fn lex_float(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

// === Lexer Callbacks for Strings ===

fn lex_double_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_quoted(lex, '"', false).and_then(|b| String::from_utf8(b).ok())
}

fn lex_single_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_quoted(lex, '\'', false).and_then(|b| String::from_utf8(b).ok())
}

fn lex_bytes_double(lex: &mut logos::Lexer<Token>) -> Option<Vec<u8>> {
    lex_quoted(lex, '"', true)
}

fn lex_bytes_single(lex: &mut logos::Lexer<Token>) -> Option<Vec<u8>> {
    lex_quoted(lex, '\'', true)
}

/// Read a quoted literal body after the opening quote, processing escapes.
///
/// In strings `\x`, `\u` and octal escapes denote code points; in bytes
/// `\x` and octal escapes denote raw octets.
fn lex_quoted(lex: &mut logos::Lexer<Token>, quote: char, bytes: bool) -> Option<Vec<u8>> {
    let remainder = lex.remainder();
    let mut chars = remainder.chars();
    let mut result = Vec::new();
    let mut consumed = 0;

    let push_char = |result: &mut Vec<u8>, c: char| {
        let mut buf = [0u8; 4];
        result.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    };

    while let Some(c) = chars.next() {
        consumed += c.len_utf8();
        if c == quote {
            lex.bump(consumed);
            return Some(result);
        }
        if c == '\n' {
            // Newline not allowed in single-line literals
            return None;
        }
        if c != '\\' {
            push_char(&mut result, c);
            continue;
        }

        let escape = chars.next()?;
        consumed += escape.len_utf8();
        let simple = match escape {
            '\\' => Some('\\'),
            '/' => Some('/'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '`' => Some('`'),
            'a' => Some('\x07'),
            'b' => Some('\x08'),
            'f' => Some('\x0C'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\x0B'),
            '?' => Some('?'),
            _ => None,
        };
        if let Some(c) = simple {
            push_char(&mut result, c);
            continue;
        }

        let (digits, radix) = match escape {
            'x' | 'X' => (2, 16),
            'u' if !bytes => (4, 16),
            'U' if !bytes => (8, 16),
            '0'..='3' => (2, 8),
            _ => return None, // Invalid escape
        };
        let mut hex: String = chars.by_ref().take(digits).collect();
        if hex.len() != digits {
            return None;
        }
        consumed += digits;
        if radix == 8 {
            hex.insert(0, escape);
        }
        let value = u32::from_str_radix(&hex, radix).ok()?;
        if bytes && value <= 0xFF {
            result.push(value as u8);
        } else {
            push_char(&mut result, char::from_u32(value)?);
        }
    }

    None // Unclosed literal
}

fn lex_raw_double_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_raw_string(lex, '"')
}

fn lex_raw_single_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_raw_string(lex, '\'')
}

fn lex_raw_string(lex: &mut logos::Lexer<Token>, quote: char) -> Option<String> {
    let remainder = lex.remainder();
    let end = remainder.find(|c: char| c == quote || c == '\n')?;
    if !remainder[end..].starts_with(quote) {
        return None;
    }
    let content = remainder[..end].to_string();
    lex.bump(end + quote.len_utf8());
    Some(content)
}

fn lex_triple_double_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_triple_string(lex, "\"\"\"")
}

fn lex_triple_single_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    lex_triple_string(lex, "'''")
}

fn lex_triple_string(lex: &mut logos::Lexer<Token>, end_quote: &str) -> Option<String> {
    let remainder = lex.remainder();
    let end_pos = remainder.find(end_quote)?;
    let content = remainder[..end_pos].to_string();
    lex.bump(end_pos + end_quote.len());
    Some(content)
}

// === Public Lexer API ===

/// Tokenize the input string, separating comments from significant tokens.
pub fn lex(input: &str) -> Result<(Vec<SpannedToken>, Vec<Comment>), LexError> {
    let mut tokens = Vec::new();
    let mut comments = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Comment) => {
                let text = lexer.slice().trim_end_matches('\r');
                comments.push(Comment {
                    text: text.to_string(),
                    span: span.start..span.start + text.len(),
                });
            }
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let found = input[span.clone()].chars().next().unwrap_or(' ');
                let message = match found {
                    '"' | '\'' => "unterminated or malformed string literal".to_string(),
                    // Numeric patterns match any digit run; only conversion fails.
                    '0'..='9' => "integer literal out of range".to_string(),
                    _ => format!("unexpected character '{}'", found),
                };
                return Err(LexError { message, span });
            }
        }
    }

    Ok((tokens, comments))
}
