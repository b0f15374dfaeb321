use log::trace;
use serde::Serialize;
use std::fmt;

/// The different kinds of tokens recognized by the Monkey scanner.
///
/// Kinds carry no payload; the source text of every token lives in
/// [`Token::literal`].  `ILLEGAL` marks bytes the scanner could not make sense
/// of and `EOF` marks the end of input.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '{'
    LEFT_BRACE,

    /// '}'
    RIGHT_BRACE,

    /// '['
    LEFT_BRACKET,

    /// ']'
    RIGHT_BRACKET,

    /// ','
    COMMA,

    /// ':'
    COLON,

    /// ';'
    SEMICOLON,

    /// '-'
    MINUS,

    /// '+'
    PLUS,

    /// '/'
    SLASH,

    /// '*'
    STAR,

    /// '!'
    BANG,

    /// '!='
    BANG_EQUAL,

    /// '='
    EQUAL,

    /// '=='
    EQUAL_EQUAL,

    /// '>'
    GREATER,

    /// '<'
    LESS,

    /// A user‑defined identifier
    IDENTIFIER,

    /// A decimal integer literal
    INTEGER,

    /// A string literal (literal holds the contents without quotes)
    STRING,

    /// 'fn'
    FUNCTION,

    /// 'let'
    LET,

    /// 'true'
    TRUE,

    /// 'false'
    FALSE,

    /// 'if'
    IF,

    /// 'else'
    ELSE,

    /// 'return'
    RETURN,

    /// A byte sequence the scanner does not recognise
    ILLEGAL,

    /// End‑of‑file marker
    EOF,
}

impl TokenType {
    /// The upper‑case variant name, as used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            TokenType::LEFT_PAREN => "LEFT_PAREN",
            TokenType::RIGHT_PAREN => "RIGHT_PAREN",
            TokenType::LEFT_BRACE => "LEFT_BRACE",
            TokenType::RIGHT_BRACE => "RIGHT_BRACE",
            TokenType::LEFT_BRACKET => "LEFT_BRACKET",
            TokenType::RIGHT_BRACKET => "RIGHT_BRACKET",
            TokenType::COMMA => "COMMA",
            TokenType::COLON => "COLON",
            TokenType::SEMICOLON => "SEMICOLON",
            TokenType::MINUS => "MINUS",
            TokenType::PLUS => "PLUS",
            TokenType::SLASH => "SLASH",
            TokenType::STAR => "STAR",
            TokenType::BANG => "BANG",
            TokenType::BANG_EQUAL => "BANG_EQUAL",
            TokenType::EQUAL => "EQUAL",
            TokenType::EQUAL_EQUAL => "EQUAL_EQUAL",
            TokenType::GREATER => "GREATER",
            TokenType::LESS => "LESS",
            TokenType::IDENTIFIER => "IDENTIFIER",
            TokenType::INTEGER => "INTEGER",
            TokenType::STRING => "STRING",
            TokenType::FUNCTION => "FUNCTION",
            TokenType::LET => "LET",
            TokenType::TRUE => "TRUE",
            TokenType::FALSE => "FALSE",
            TokenType::IF => "IF",
            TokenType::ELSE => "ELSE",
            TokenType::RETURN => "RETURN",
            TokenType::ILLEGAL => "ILLEGAL",
            TokenType::EOF => "EOF",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token, including its type, the source text it was built from,
/// and the line number where it was found.  Immutable once produced.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// Source text of the token.  For strings this excludes the quotes.
    pub literal: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given type, literal, and line.
    pub fn new<S: Into<String>>(token_type: TokenType, literal: S, line: usize) -> Self {
        let literal: String = literal.into();

        trace!(
            "Creating new token: type={:?}, literal={}, line={}",
            token_type,
            literal,
            line
        );

        Self {
            token_type,
            literal,
            line,
        }
    }

    /// Convenience check used throughout the parser.
    #[inline(always)]
    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.token_type, self.literal)
    }
}
