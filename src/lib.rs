pub mod builtins;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

pub use error::{MonkeyError, ParseError, Result};
pub use interpreter::{eval, Interpreter, Node};
pub use parser::parse;

/// Scan and parse `source` in one go.
pub fn parse_source(source: &str) -> (stmt::Program, Vec<ParseError>) {
    parse(scanner::Scanner::new(source.as_bytes()))
}
