use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::stmt::BlockStatement;
use crate::token::Token;

/// A name occurrence: `let` targets, parameters and variable reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

impl Identifier {
    pub fn new(token: Token) -> Self {
        let value = token.literal.clone();

        Identifier { token, value }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    /// `!x`
    Bang,
    /// `-x`
    Minus,
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    Greater,
    Equal,
    NotEqual,
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Star => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Less => "<",
            InfixOperator::Greater => ">",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
        })
    }
}

/// `fn(<params>) { <body> }`.  Shared behind an `Rc` so that every function
/// value created from it points at the same parameter list and body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionLiteral {
    /// The `fn` keyword.
    pub token: Token,
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        write_separated(f, &self.parameters, ", ")?;
        write!(f, ") {}", self.body)
    }
}

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
/// Each variant keeps the token it started from for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Identifier(Identifier),

    Integer {
        token: Token,
        value: i64,
    },

    Str {
        token: Token,
        value: String,
    },

    Boolean {
        token: Token,
        value: bool,
    },

    /// `[a, b, c]`, anchored on the `[` token.
    Array {
        token: Token,
        elements: Vec<Expr>,
    },

    /// `{k: v, ...}`.  Pairs keep source order, which carries no meaning.
    Hash {
        token: Token,
        pairs: Vec<(Expr, Expr)>,
    },

    Prefix {
        token: Token,
        operator: PrefixOperator,
        right: Box<Expr>,
    },

    Infix {
        token: Token,
        left: Box<Expr>,
        operator: InfixOperator,
        right: Box<Expr>,
    },

    If {
        token: Token,
        condition: Box<Expr>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    Function(Rc<FunctionLiteral>),

    /// `callee(args)`, anchored on the `(` token.
    Call {
        token: Token,
        function: Box<Expr>,
        arguments: Vec<Expr>,
    },

    /// `left[index]`, anchored on the `[` token.
    Index {
        token: Token,
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

impl Expr {
    /// The token this node was built from.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Identifier(ident) => &ident.token,
            Expr::Function(literal) => &literal.token,
            Expr::Integer { token, .. }
            | Expr::Str { token, .. }
            | Expr::Boolean { token, .. }
            | Expr::Array { token, .. }
            | Expr::Hash { token, .. }
            | Expr::Prefix { token, .. }
            | Expr::Infix { token, .. }
            | Expr::If { token, .. }
            | Expr::Call { token, .. }
            | Expr::Index { token, .. } => token,
        }
    }

    pub fn line(&self) -> usize {
        self.token().line
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(ident) => write!(f, "{}", ident),

            Expr::Integer { value, .. } => f.write_str(itoa::Buffer::new().format(*value)),

            Expr::Str { value, .. } => write!(f, "\"{}\"", value),

            Expr::Boolean { value, .. } => write!(f, "{}", value),

            Expr::Array { elements, .. } => {
                f.write_str("[")?;
                write_separated(f, elements, ", ")?;
                f.write_str("]")
            }

            Expr::Hash { pairs, .. } => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }

            Expr::Prefix {
                operator, right, ..
            } => write!(f, "({}{})", operator, right),

            Expr::Infix {
                left,
                operator,
                right,
                ..
            } => write!(f, "({} {} {})", left, operator, right),

            Expr::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }

            Expr::Function(literal) => write!(f, "{}", literal),

            Expr::Call {
                function,
                arguments,
                ..
            } => {
                write!(f, "{}(", function)?;
                write_separated(f, arguments, ", ")?;
                f.write_str(")")
            }

            Expr::Index { left, index, .. } => write!(f, "({}[{}])", left, index),
        }
    }
}

pub(crate) fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
