//! Centralised error hierarchy for the **Monkey interpreter**.
//!
//! Two taxonomies live side by side:
//!
//! * [`ParseError`] is a recoverable diagnostic collected by the parser.  The
//!   parser never aborts on one; it records it and resynchronises.
//! * Evaluation failures are *not* Rust errors at all.  They are first‑class
//!   [`Value::Error`](crate::value::Value::Error) values threaded through the
//!   evaluator.
//!
//! [`MonkeyError`] is what a driver (the CLI) converts both into once it has
//! to stop, so that it can lean on a uniform `Result<T>` alias and `anyhow`.
//!
//! The module **does not** print diagnostics itself

use std::io;
use thiserror::Error;

use log::debug;

/// One structural problem found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error: {message}")]
pub struct ParseError {
    /// Human‑readable description.
    pub message: String,

    /// 1‑based line of the token the parser was looking at.
    pub line: usize,
}

impl ParseError {
    pub fn new<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        debug!("Creating Parse error: line={}, msg={}", line, message);

        ParseError { message, line }
    }
}

/// Canonical error type surfaced to drivers of the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MonkeyError {
    /// The program had at least one syntax error and must not be evaluated.
    #[error("{}", render_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Evaluation produced an error value; carries its message unmodified.
    #[error("ERROR: {0}")]
    Runtime(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn render_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<Vec<ParseError>> for MonkeyError {
    fn from(errors: Vec<ParseError>) -> Self {
        MonkeyError::Parse(errors)
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, MonkeyError>;
