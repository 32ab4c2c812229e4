//! JavaScript token scanner.
//!
//! A pull scanner: the parser calls [`Scanner::scan`] for the next token
//! and [`Scanner::rescan_template_continuation`] at the closing `}` of a
//! template substitution, where the scanner re-reads the brace as the
//! start of a `TemplateMiddle`/`TemplateTail` token. Whitespace is
//! skipped; comments are collected into a side list.
//!
//! Token spans are token-tight byte ranges into the source. The scanner
//! never allocates per token; string unescaping happens on demand in
//! [`unescape_string`].

mod token;

pub use token::TokenKind;

use once_cell::sync::Lazy;
use remod_common::{Comment, CommentKind, Span};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    pub pos: u32,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.pos)
    }
}

impl std::error::Error for ScanError {}

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for (text, kind) in [
        ("var", TokenKind::Var),
        ("let", TokenKind::Let),
        ("const", TokenKind::Const),
        ("function", TokenKind::Function),
        ("return", TokenKind::Return),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("for", TokenKind::For),
        ("while", TokenKind::While),
        ("do", TokenKind::Do),
        ("break", TokenKind::Break),
        ("continue", TokenKind::Continue),
        ("new", TokenKind::New),
        ("delete", TokenKind::Delete),
        ("typeof", TokenKind::Typeof),
        ("void", TokenKind::Void),
        ("in", TokenKind::In),
        ("instanceof", TokenKind::Instanceof),
        ("this", TokenKind::This),
        ("null", TokenKind::Null),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("class", TokenKind::Class),
        ("extends", TokenKind::Extends),
        ("import", TokenKind::Import),
        ("export", TokenKind::Export),
        ("default", TokenKind::Default),
        ("try", TokenKind::Try),
        ("catch", TokenKind::Catch),
        ("finally", TokenKind::Finally),
        ("throw", TokenKind::Throw),
        ("switch", TokenKind::Switch),
        ("case", TokenKind::Case),
        ("await", TokenKind::Await),
        ("yield", TokenKind::Yield),
        ("debugger", TokenKind::Debugger),
    ] {
        map.insert(text, kind);
    }
    map
});

/// Scanner state that [`Scanner::rewind`] restores, for speculative
/// parses (arrow-function parameter lists).
#[derive(Copy, Clone, Debug)]
pub struct Checkpoint {
    pos: usize,
    comments_len: usize,
}

pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    comments: Vec<Comment>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            comments: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Comments collected so far, in document order.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn into_comments(self) -> Vec<Comment> {
        self.comments
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            comments_len: self.comments.len(),
        }
    }

    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.comments.truncate(checkpoint.comments_len);
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn error(&self, message: impl Into<String>, pos: usize) -> ScanError {
        ScanError {
            message: message.into(),
            pos: pos as u32,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\r' | b'\n' => self.pos += 1,
                b'/' if self.peek_at(1) == b'/' => {
                    let start = self.pos;
                    while self.pos < self.bytes.len() && self.peek() != b'\n' {
                        self.pos += 1;
                    }
                    self.comments.push(Comment {
                        kind: CommentKind::Line,
                        span: Span::new(start as u32, self.pos as u32),
                    });
                }
                b'/' if self.peek_at(1) == b'*' => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.pos >= self.bytes.len() {
                            return Err(self.error("unterminated block comment", start));
                        }
                        if self.peek() == b'*' && self.peek_at(1) == b'/' {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                    self.comments.push(Comment {
                        kind: CommentKind::Block,
                        span: Span::new(start as u32, self.pos as u32),
                    });
                }
                _ => return Ok(()),
            }
        }
    }

    /// Scan the next token. Returns an `Eof` token at the end of input.
    pub fn scan(&mut self) -> Result<Token, ScanError> {
        self.skip_trivia()?;
        let start = self.pos;
        if start >= self.bytes.len() {
            return Ok(self.token(TokenKind::Eof, start));
        }
        let c = self.peek();
        match c {
            b'(' => self.punct(TokenKind::LParen),
            b')' => self.punct(TokenKind::RParen),
            b'{' => self.punct(TokenKind::LBrace),
            b'}' => self.punct(TokenKind::RBrace),
            b'[' => self.punct(TokenKind::LBracket),
            b']' => self.punct(TokenKind::RBracket),
            b';' => self.punct(TokenKind::Semicolon),
            b',' => self.punct(TokenKind::Comma),
            b':' => self.punct(TokenKind::Colon),
            b'~' => self.punct(TokenKind::Tilde),
            b'@' => self.punct(TokenKind::At),
            b'#' => match self.peek_at(1) {
                b'{' => self.punct2(TokenKind::HashLBrace),
                b'[' => self.punct2(TokenKind::HashLBracket),
                _ => Err(self.error("unexpected character `#`", start)),
            },
            b'.' => {
                if self.peek_at(1) == b'.' && self.peek_at(2) == b'.' {
                    self.pos += 3;
                    Ok(self.token(TokenKind::DotDotDot, start))
                } else if self.peek_at(1).is_ascii_digit() {
                    self.scan_number(start)
                } else {
                    self.punct(TokenKind::Dot)
                }
            }
            b'?' => match (self.peek_at(1), self.peek_at(2)) {
                (b'?', b'=') => self.punct3(TokenKind::QuestionQuestionEq),
                (b'?', _) => self.punct2(TokenKind::QuestionQuestion),
                _ => self.punct(TokenKind::Question),
            },
            b'=' => match (self.peek_at(1), self.peek_at(2)) {
                (b'=', b'=') => self.punct3(TokenKind::EqEqEq),
                (b'=', _) => self.punct2(TokenKind::EqEq),
                (b'>', _) => self.punct2(TokenKind::Arrow),
                _ => self.punct(TokenKind::Eq),
            },
            b'!' => match (self.peek_at(1), self.peek_at(2)) {
                (b'=', b'=') => self.punct3(TokenKind::NotEqEq),
                (b'=', _) => self.punct2(TokenKind::NotEq),
                _ => self.punct(TokenKind::Bang),
            },
            b'+' => match self.peek_at(1) {
                b'+' => self.punct2(TokenKind::PlusPlus),
                b'=' => self.punct2(TokenKind::PlusEq),
                _ => self.punct(TokenKind::Plus),
            },
            b'-' => match self.peek_at(1) {
                b'-' => self.punct2(TokenKind::MinusMinus),
                b'=' => self.punct2(TokenKind::MinusEq),
                _ => self.punct(TokenKind::Minus),
            },
            b'*' => match (self.peek_at(1), self.peek_at(2)) {
                (b'*', b'=') => self.punct3(TokenKind::StarStarEq),
                (b'*', _) => self.punct2(TokenKind::StarStar),
                (b'=', _) => self.punct2(TokenKind::StarEq),
                _ => self.punct(TokenKind::Star),
            },
            b'/' => match self.peek_at(1) {
                b'=' => self.punct2(TokenKind::SlashEq),
                _ => self.punct(TokenKind::Slash),
            },
            b'%' => match self.peek_at(1) {
                b'=' => self.punct2(TokenKind::PercentEq),
                _ => self.punct(TokenKind::Percent),
            },
            b'<' => match (self.peek_at(1), self.peek_at(2)) {
                (b'<', b'=') => self.punct3(TokenKind::LtLtEq),
                (b'<', _) => self.punct2(TokenKind::LtLt),
                (b'=', _) => self.punct2(TokenKind::LtEq),
                _ => self.punct(TokenKind::Lt),
            },
            b'>' => match (self.peek_at(1), self.peek_at(2), self.peek_at(3)) {
                (b'>', b'>', b'=') => self.punct4(TokenKind::GtGtGtEq),
                (b'>', b'>', _) => self.punct3(TokenKind::GtGtGt),
                (b'>', b'=', _) => self.punct3(TokenKind::GtGtEq),
                (b'>', _, _) => self.punct2(TokenKind::GtGt),
                (b'=', _, _) => self.punct2(TokenKind::GtEq),
                _ => self.punct(TokenKind::Gt),
            },
            b'&' => match (self.peek_at(1), self.peek_at(2)) {
                (b'&', b'=') => self.punct3(TokenKind::AmpAmpEq),
                (b'&', _) => self.punct2(TokenKind::AmpAmp),
                (b'=', _) => self.punct2(TokenKind::AmpEq),
                _ => self.punct(TokenKind::Amp),
            },
            b'|' => match (self.peek_at(1), self.peek_at(2)) {
                (b'|', b'=') => self.punct3(TokenKind::BarBarEq),
                (b'|', _) => self.punct2(TokenKind::BarBar),
                (b'=', _) => self.punct2(TokenKind::BarEq),
                _ => self.punct(TokenKind::Bar),
            },
            b'^' => match self.peek_at(1) {
                b'=' => self.punct2(TokenKind::CaretEq),
                _ => self.punct(TokenKind::Caret),
            },
            b'"' | b'\'' => self.scan_string(start, c),
            b'`' => self.scan_template_part(start, true),
            b'0'..=b'9' => self.scan_number(start),
            _ if is_identifier_start(c) => {
                self.pos += 1;
                while is_identifier_part(self.peek()) {
                    self.pos += 1;
                }
                let text = &self.source[start..self.pos];
                let kind = KEYWORDS
                    .get(text)
                    .copied()
                    .unwrap_or(TokenKind::Identifier);
                Ok(self.token(kind, start))
            }
            _ => Err(self.error(
                format!("unexpected character `{}`", self.peek() as char),
                start,
            )),
        }
    }

    /// Re-scan the `}` that closed a template substitution as the start
    /// of the next template part. The parser must be positioned exactly
    /// on that brace (`brace_start` is its byte offset).
    pub fn rescan_template_continuation(&mut self, brace_start: u32) -> Result<Token, ScanError> {
        self.pos = brace_start as usize;
        debug_assert_eq!(self.peek(), b'}');
        self.scan_template_part(self.pos, false)
    }

    /// Scan one template part starting at a backtick (head) or a closing
    /// brace (continuation). Produces one of the four template kinds.
    fn scan_template_part(&mut self, start: usize, head: bool) -> Result<Token, ScanError> {
        self.pos = start + 1;
        loop {
            if self.pos >= self.bytes.len() {
                return Err(self.error("unterminated template literal", start));
            }
            match self.peek() {
                b'`' => {
                    self.pos += 1;
                    let kind = if head {
                        TokenKind::NoSubstitutionTemplate
                    } else {
                        TokenKind::TemplateTail
                    };
                    return Ok(self.token(kind, start));
                }
                b'$' if self.peek_at(1) == b'{' => {
                    self.pos += 2;
                    let kind = if head {
                        TokenKind::TemplateHead
                    } else {
                        TokenKind::TemplateMiddle
                    };
                    return Ok(self.token(kind, start));
                }
                b'\\' => self.pos += 2,
                _ => self.pos += 1,
            }
        }
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Result<Token, ScanError> {
        self.pos += 1;
        loop {
            if self.pos >= self.bytes.len() {
                return Err(self.error("unterminated string literal", start));
            }
            match self.peek() {
                b'\n' => return Err(self.error("unterminated string literal", start)),
                b'\\' => self.pos += 2,
                c if c == quote => {
                    self.pos += 1;
                    return Ok(self.token(TokenKind::StringLiteral, start));
                }
                _ => self.pos += 1,
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> Result<Token, ScanError> {
        if self.peek() == b'0' && matches!(self.peek_at(1), b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
        {
            let radix_char = self.peek_at(1);
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek().is_ascii_alphanumeric() {
                self.pos += 1;
            }
            if self.pos == digits_start {
                return Err(self.error(
                    format!("missing digits after `0{}`", radix_char as char),
                    start,
                ));
            }
            return Ok(self.token(TokenKind::NumericLiteral, start));
        }
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek() == b'.' {
            self.pos += 1;
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        Ok(self.token(TokenKind::NumericLiteral, start))
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(start as u32, self.pos as u32),
        }
    }

    fn punct(&mut self, kind: TokenKind) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 1;
        Ok(self.token(kind, start))
    }

    fn punct2(&mut self, kind: TokenKind) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 2;
        Ok(self.token(kind, start))
    }

    fn punct3(&mut self, kind: TokenKind) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 3;
        Ok(self.token(kind, start))
    }

    fn punct4(&mut self, kind: TokenKind) -> Result<Token, ScanError> {
        let start = self.pos;
        self.pos += 4;
        Ok(self.token(kind, start))
    }
}

fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$' || c >= 0x80
}

fn is_identifier_part(c: u8) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// Cooked value of a string literal token, quotes stripped and escapes
/// processed.
pub fn unescape_string(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    unescape_text(inner)
}

/// Escape processing shared by strings and template cooked text.
pub fn unescape_text(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if let Ok(v) = u32::from_str_radix(&hex, 16)
                    && let Some(ch) = char::from_u32(v)
                {
                    out.push(ch);
                }
            }
            Some('u') => {
                let mut rest = chars.clone();
                if rest.next() == Some('{') {
                    let hex: String = rest.by_ref().take_while(|&c| c != '}').collect();
                    if let Ok(v) = u32::from_str_radix(&hex, 16)
                        && let Some(ch) = char::from_u32(v)
                    {
                        out.push(ch);
                    }
                    chars = rest;
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    if let Ok(v) = u32::from_str_radix(&hex, 16)
                        && let Some(ch) = char::from_u32(v)
                    {
                        out.push(ch);
                    }
                }
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Numeric value of a numeric literal token.
pub fn parse_number(raw: &str) -> f64 {
    let bytes = raw.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' {
        let radix = match bytes[1] {
            b'x' | b'X' => Some(16),
            b'o' | b'O' => Some(8),
            b'b' | b'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return i64::from_str_radix(&raw[2..], radix)
                .map(|v| v as f64)
                .unwrap_or(f64::NAN);
        }
    }
    raw.parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.scan().expect("scan");
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        assert_eq!(
            kinds("const of = await x;"),
            vec![
                TokenKind::Const,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::Await,
                TokenKind::Identifier,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn scans_compound_operators() {
        assert_eq!(
            kinds("a >>>= b ** c ?? d"),
            vec![
                TokenKind::Identifier,
                TokenKind::GtGtGtEq,
                TokenKind::Identifier,
                TokenKind::StarStar,
                TokenKind::Identifier,
                TokenKind::QuestionQuestion,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn collects_comments_as_trivia() {
        let mut scanner = Scanner::new("a // one\n/* two */ b");
        let mut seen = Vec::new();
        loop {
            let token = scanner.scan().expect("scan");
            if token.kind == TokenKind::Eof {
                break;
            }
            seen.push(token.kind);
        }
        assert_eq!(seen, vec![TokenKind::Identifier, TokenKind::Identifier]);
        let comments = scanner.comments();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text("a // one\n/* two */ b"), " one");
        assert_eq!(comments[1].text("a // one\n/* two */ b"), " two ");
    }

    #[test]
    fn template_parts_rescan() {
        let source = "`a ${ x } b`";
        let mut scanner = Scanner::new(source);
        let head = scanner.scan().expect("head");
        assert_eq!(head.kind, TokenKind::TemplateHead);
        assert_eq!(head.text(source), "`a ${");
        let x = scanner.scan().expect("x");
        assert_eq!(x.kind, TokenKind::Identifier);
        let brace = scanner.scan().expect("brace");
        assert_eq!(brace.kind, TokenKind::RBrace);
        let tail = scanner
            .rescan_template_continuation(brace.span.start)
            .expect("tail");
        assert_eq!(tail.kind, TokenKind::TemplateTail);
        assert_eq!(tail.text(source), "} b`");
    }

    #[test]
    fn string_and_number_values() {
        assert_eq!(unescape_string(r#""a\nb""#), "a\nb");
        assert_eq!(unescape_string(r#"'it\'s'"#), "it's");
        assert_eq!(parse_number("0x10"), 16.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert_eq!(parse_number("1.5e2"), 150.0);
    }

    #[test]
    fn unterminated_string_errors() {
        let mut scanner = Scanner::new("'abc");
        assert!(scanner.scan().is_err());
    }
}
