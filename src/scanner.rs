//! Module `scanner` implements a one‑pass, streaming lexer for the Monkey language.
//!
//! It transforms a byte slice (`&[u8]`) into a sequence of [`Token`]s, skipping whitespace
//! and comments, and emitting exactly one `EOF` token at the end. Designed as a `FusedIterator`,
//! it can be chained safely with other iterator adapters.
//!
//! The scanner never fails: anything it cannot classify becomes an `ILLEGAL`
//! token and it is the parser's job to report it.
//!
//! # Token Recognition (`scan_token`)
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `[`, `]`, `,`, `:`, `;`, `+`, `-`, `*`, `/`, `<`, `>`.
//! - Two‑character operators: `!=`, `==`.
//! - String literals: `"` … `"`, no escapes, may span lines; unterminated ⇒ `ILLEGAL`.
//! - Integer literals: runs of ASCII digits.
//! - Identifiers/keywords: alphanumeric/_ sequences, resolved via a perfect‑hash `KEYWORDS` map.
//! - `//` comments run to end of line and are skipped with `memchr`.
//!
//! # Example
//!
//! ```rust
//! use monkey_interpreter::scanner::Scanner;
//!
//! let source = b"let five = 5; // example";
//! for token in Scanner::new(source) {
//!     println!("{}", token);
//! }
//! ```

use crate::token::{Token, TokenType};
use log::{info, trace};
use memchr::memchr;
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"fn"     => TokenType::FUNCTION,
    b"let"    => TokenType::LET,
    b"true"   => TokenType::TRUE,
    b"false"  => TokenType::FALSE,
    b"if"     => TokenType::IF,
    b"else"   => TokenType::ELSE,
    b"return" => TokenType::RETURN,
};

/// A single pass **scanner / lexer** that converts raw UTF‑8 bytes into a
/// sequence of owned [`Token`]s.
pub struct Scanner<'a> {
    src: &'a [u8],              // entire source buffer
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    start_line: usize,          // line on which the current lexeme began
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a [u8]) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            line: 1,
            start_line: 1,
            pending: None,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    #[inline(always)]
    const fn len(&self) -> usize {
        self.src.len()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  Callers guard with [`Self::is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` past EOF.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* lexeme starting at `self.curr`.  If it produces an
    /// actual token the kind is stored in `self.pending`; whitespace and
    /// comments leave `pending = None`.
    fn scan_token(&mut self) {
        let b = self.advance();

        let tt = match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b'[' => TokenType::LEFT_BRACKET,
            b']' => TokenType::RIGHT_BRACKET,
            b',' => TokenType::COMMA,
            b':' => TokenType::COLON,
            b';' => TokenType::SEMICOLON,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b'*' => TokenType::STAR,
            b'<' => TokenType::LESS,
            b'>' => TokenType::GREATER,

            // ── one‑or‑two character operators (!, !=, =, ==) ────────────
            b'!' => {
                if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                }
            }

            b'=' => {
                if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                }
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => return,

            b'\n' => {
                self.line += 1;
                return;
            }

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    match memchr(b'\n', &self.src[self.curr..]) {
                        Some(pos) => self.curr += pos,
                        None => self.curr = self.len(),
                    }

                    return;
                }

                TokenType::SLASH
            }

            b'"' => self.scan_string(),

            b'0'..=b'9' => self.scan_integer(),

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(),

            // ── unexpected byte: swallow the rest of a multi‑byte char ──
            _ => {
                while self.peek() & 0b1100_0000 == 0b1000_0000 {
                    self.advance();
                }

                TokenType::ILLEGAL
            }
        };

        self.pending = Some(tt);
    }

    /// `self.start` points at the opening `"`.  On success `self.curr` is
    /// one past the closing `"`.
    fn scan_string(&mut self) -> TokenType {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            trace!("Unterminated string starting on line {}", self.start_line);

            return TokenType::ILLEGAL;
        }

        self.advance(); // closing quote

        TokenType::STRING
    }

    fn scan_integer(&mut self) -> TokenType {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        TokenType::INTEGER
    }

    fn scan_identifier(&mut self) -> TokenType {
        while {
            let c: u8 = self.peek();
            c.is_ascii_alphanumeric() || c == b'_'
        } {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        KEYWORDS.get(slice).copied().unwrap_or(TokenType::IDENTIFIER)
    }

    /// Source text for a recognised token of kind `tt`.
    fn literal(&self, tt: TokenType) -> String {
        let slice: &[u8] = match tt {
            TokenType::STRING => &self.src[self.start + 1..self.curr - 1],
            _ => &self.src[self.start..self.curr],
        };

        String::from_utf8_lossy(slice).into_owned()
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr <= self.len() {
            // EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Token::new(TokenType::EOF, "", self.line));
            }

            self.start = self.curr;
            self.start_line = self.line;
            self.pending = None;

            self.scan_token();

            if let Some(tt) = self.pending.take() {
                let token = Token::new(tt, self.literal(tt), self.start_line);
                trace!("Scanned token {} on line {}", token, token.line);

                return Some(token);
            }
        }

        None // already yielded EOF
    }
}

impl FusedIterator for Scanner<'_> {}

/// Scan a whole source string into a token vector ending in `EOF`.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source.as_bytes()).collect()
}
