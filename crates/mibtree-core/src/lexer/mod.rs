//! Lexer for MIB module text.
//!
//! Produces a token stream for the extractor. The lexer is lenient: malformed
//! input yields diagnostics and `Error` tokens rather than aborting, so a
//! single bad construct does not sink the whole module.

// Allow truncation casts - source size is limited to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

mod keyword;
mod token;

pub use keyword::lookup_keyword;
pub use token::{Span, Token, TokenKind};

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Byte offset into source text.
pub type ByteOffset = u32;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The construct is malformed; surrounding text may be mis-tokenized.
    Error,
    /// Tolerated deviation from SMI syntax.
    Warning,
}

/// A diagnostic message from the lexer.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Location in source text.
    pub span: Span,
    /// Human-readable message.
    pub message: String,
}

/// Skip modes entered on certain keywords.
///
/// MACRO bodies are not SMI syntax and EXPORTS lists carry no information the
/// extractor needs, so both are swallowed here instead of burdening the
/// parser with recovery logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerState {
    /// Normal tokenization.
    Normal,
    /// After a MACRO keyword; skip until the closing END.
    InMacro,
    /// After an EXPORTS keyword; skip until the terminating semicolon.
    InExports,
}

/// MIB lexer over a source string.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Source bytes, for single-byte dispatch.
    bytes: &'src [u8],
    /// Current byte position.
    pos: usize,
    /// Current skip mode.
    state: LexerState,
    /// Diagnostics collected so far.
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            state: LexerState::Normal,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the entire source.
    ///
    /// The returned token list always ends with a single `Eof` token.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        match self.state {
            LexerState::Normal => self.next_normal_token(),
            LexerState::InMacro => self.skip_macro_body(),
            LexerState::InExports => self.skip_exports_body(),
        }
    }

    fn next_normal_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let Some(b) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };
        match b {
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b'[' => self.single(TokenKind::LBracket),
            b']' => self.single(TokenKind::RBracket),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b'|' => self.single(TokenKind::Pipe),
            b':' => {
                if self.peek_at(1) == Some(b':') && self.peek_at(2) == Some(b'=') {
                    self.pos += 3;
                    self.token(TokenKind::ColonColonEqual, start)
                } else {
                    self.single(TokenKind::Colon)
                }
            }
            b'.' => {
                if self.peek_at(1) == Some(b'.') {
                    self.pos += 2;
                    self.token(TokenKind::DotDot, start)
                } else {
                    self.single(TokenKind::Dot)
                }
            }
            b'-' => {
                // "--" never reaches here; comments are consumed with
                // whitespace above.
                if matches!(self.peek_at(1), Some(b'0'..=b'9')) {
                    self.scan_negative_number()
                } else {
                    self.single(TokenKind::Minus)
                }
            }
            b'0'..=b'9' => self.scan_number(),
            b'"' => self.scan_quoted_string(),
            b'\'' => self.scan_hex_or_bin_string(),
            b'A'..=b'Z' | b'a'..=b'z' => self.scan_identifier_or_keyword(),
            _ => {
                let ch = self.source[self.pos..].chars().next().unwrap_or('\u{fffd}');
                self.pos += ch.len_utf8();
                let span = self.span_from(start);
                self.error(span, &format!("Unexpected character {ch:?}"));
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Skips whitespace and comments.
    ///
    /// An ASN.1 comment starts with "--" and ends at the next "--" or at the
    /// end of the line, whichever comes first.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    self.skip_comment();
                }
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.pos += 1;
                    return;
                }
                b'-' if self.peek_at(1) == Some(b'-') => {
                    self.pos += 2;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Skips a MACRO body up to its closing END keyword.
    ///
    /// The body is not tokenized at all, so keywords inside macro notation
    /// never leak into the token stream.
    fn skip_macro_body(&mut self) -> Token {
        while self.pos < self.bytes.len() {
            if self.matches_word(b"END") {
                let start = self.pos;
                self.pos += 3;
                self.state = LexerState::Normal;
                return self.token(TokenKind::KwEnd, start);
            }
            self.pos += 1;
        }
        let start = self.pos;
        let span = self.span_from(start);
        self.error(span, "Unterminated MACRO definition");
        self.state = LexerState::Normal;
        self.token(TokenKind::Eof, start)
    }

    /// Skips an EXPORTS list up to its terminating semicolon.
    fn skip_exports_body(&mut self) -> Token {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b';' {
                let start = self.pos;
                self.pos += 1;
                self.state = LexerState::Normal;
                return self.token(TokenKind::Semicolon, start);
            }
            self.pos += 1;
        }
        let start = self.pos;
        let span = self.span_from(start);
        self.error(span, "Unterminated EXPORTS clause");
        self.state = LexerState::Normal;
        self.token(TokenKind::Eof, start)
    }

    fn scan_identifier_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' => self.pos += 1,
                // A hyphen pair starts a comment, terminating the identifier.
                b'-' if self.peek_at(1) != Some(b'-') => self.pos += 1,
                _ => break,
            }
        }
        let text = &self.source[start..self.pos];
        if text.ends_with('-') {
            let span = self.span_from(start);
            self.error(span, "Identifier ends with a hyphen");
        }
        if let Some(kind) = lookup_keyword(text) {
            match kind {
                TokenKind::KwMacro => self.state = LexerState::InMacro,
                TokenKind::KwExports => self.state = LexerState::InExports,
                _ => {}
            }
            return self.token(kind, start);
        }
        let kind = if self.bytes[start].is_ascii_uppercase() {
            TokenKind::UppercaseIdent
        } else {
            TokenKind::LowercaseIdent
        };
        self.token(kind, start)
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        if text.len() > 1 && text.starts_with('0') {
            let span = self.span_from(start);
            self.warning(span, "Number has leading zeros");
        }
        self.token(TokenKind::Number, start)
    }

    fn scan_negative_number(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        self.token(TokenKind::NegativeNumber, start)
    }

    /// Scans a quoted string, which may span multiple lines.
    ///
    /// The token span includes the surrounding quotes.
    fn scan_quoted_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
                None => {
                    let span = self.span_from(start);
                    self.error(span, "Unterminated quoted string");
                    break;
                }
            }
        }
        self.token(TokenKind::QuotedString, start)
    }

    /// Scans a hex ('AB'H) or binary ('01010101'B) character string.
    fn scan_hex_or_bin_string(&mut self) -> Token {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek() {
            if b == b'\'' {
                break;
            }
            self.pos += 1;
        }
        if self.peek().is_none() {
            let span = self.span_from(start);
            self.error(span, "Unterminated character string");
            return self.token(TokenKind::Error, start);
        }
        let content_len = self.pos - start - 1;
        self.pos += 1;
        match self.peek() {
            Some(b'H' | b'h') => {
                self.pos += 1;
                if content_len % 2 != 0 {
                    let span = self.span_from(start);
                    self.error(span, "Hex string has an odd number of digits");
                }
                self.token(TokenKind::HexString, start)
            }
            Some(b'B' | b'b') => {
                self.pos += 1;
                if content_len % 8 != 0 {
                    let span = self.span_from(start);
                    self.error(span, "Binary string length is not a multiple of 8");
                }
                self.token(TokenKind::BinString, start)
            }
            _ => {
                let span = self.span_from(start);
                self.error(span, "Character string missing H or B suffix");
                self.token(TokenKind::Error, start)
            }
        }
    }

    /// Returns true when `word` sits at the current position bounded by
    /// non-identifier bytes on both sides.
    fn matches_word(&self, word: &[u8]) -> bool {
        let end = self.pos + word.len();
        if end > self.bytes.len() || &self.bytes[self.pos..end] != word {
            return false;
        }
        let before = self.pos == 0 || !is_word_byte(self.bytes[self.pos - 1]);
        let after = end == self.bytes.len() || !is_word_byte(self.bytes[end]);
        before && after
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.pos += 1;
        self.token(kind, start)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as ByteOffset, self.pos as ByteOffset)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, self.span_from(start))
    }

    fn error(&mut self, span: Span, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            span,
            message: String::from(message),
        });
    }

    fn warning(&mut self, span: Span, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            span,
            message: String::from(message),
        });
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}
