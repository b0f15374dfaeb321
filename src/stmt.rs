use std::fmt;

use serde::Serialize;

use crate::expr::{Expr, Identifier};
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `let <name> = <value>;`
    Let {
        token: Token,
        name: Identifier,
        value: Expr,
    },

    /// `return <value>;`.  A missing operand evaluates to null.
    Return {
        token: Token,
        value: Option<Expr>,
    },

    /// An expression used as a statement; its value is the statement's value.
    Expression {
        token: Token,
        expression: Expr,
    },

    Block(BlockStatement),
}

impl Stmt {
    pub fn token(&self) -> &Token {
        match self {
            Stmt::Let { token, .. } | Stmt::Return { token, .. } | Stmt::Expression { token, .. } => {
                token
            }
            Stmt::Block(block) => &block.token,
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { name, value, .. } => write!(f, "let {} = {};", name, value),

            Stmt::Return { value, .. } => match value {
                Some(value) => write!(f, "return {};", value),
                None => f.write_str("return;"),
            },

            Stmt::Expression { expression, .. } => write!(f, "{}", expression),

            Stmt::Block(block) => write!(f, "{}", block),
        }
    }
}

/// `{ <statements> }` ‑ the body of functions and `if` branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatement {
    /// The opening `{`.
    pub token: Token,
    pub statements: Vec<Stmt>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        write_statements(f, &self.statements)?;
        if !self.statements.is_empty() {
            f.write_str(" ")?;
        }
        f.write_str("}")
    }
}

/// Root of every parse: the ordered top‑level statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_statements(f, &self.statements)
    }
}

/// Statements are space separated.  An expression statement followed by
/// another statement gets a `;`, otherwise `a (b)` would re‑parse as a call.
fn write_statements(f: &mut fmt::Formatter<'_>, statements: &[Stmt]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }

        write!(f, "{}", stmt)?;

        let followed = i + 1 < statements.len();
        if followed && matches!(stmt, Stmt::Expression { .. } | Stmt::Block(_)) {
            f.write_str(";")?;
        }
    }

    Ok(())
}
