use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::environment::Env;
use crate::expr::{write_separated, FunctionLiteral};

/// Host function signature for built‑ins.  Failures come back as
/// [`Value::Error`], never as a Rust error.
pub type BuiltinFn = fn(&[Value]) -> Value;

/// A host‑provided variadic function.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A closure: the literal it was created from plus the environment that was
/// current at creation time, held by reference.
#[derive(Clone)]
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Env,
}

impl fmt::Debug for Function {
    // The captured environment may contain this very function.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.literal)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.literal, &other.literal) && Rc::ptr_eq(&self.env, &other.env)
    }
}

/// Which hashable variant a [`HashKey`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashTag {
    Integer,
    Boolean,
    String,
}

/// `{variant tag, 64‑bit digest}`.  Equal iff both parts are equal, so
/// `1` and `true` never collide even though both digest to `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey {
    pub tag: HashTag,
    pub digest: u64,
}

/// An entry of a hash value.  The original key is kept for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// Runtime value produced by the evaluator.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Value>),
    Hash(HashMap<HashKey, HashPair>),
    Function(Function),
    Builtin(Builtin),
    /// Control‑flow signal for `return`; unwrapped at the enclosing call or
    /// program and never stored in a binding or collection.
    Return(Box<Value>),
    Error(String),
}

const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// 64‑bit FNV‑1a over raw bytes.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

impl Value {
    /// Upper‑case variant name used in runtime diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// The hash key of a hashable value (integer, boolean, string).
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Value::Integer(i) => HashKey {
                tag: HashTag::Integer,
                digest: *i as u64,
            },
            Value::Boolean(b) => HashKey {
                tag: HashTag::Boolean,
                digest: u64::from(*b),
            },
            Value::String(s) => HashKey {
                tag: HashTag::String,
                digest: fnv1a(s.as_bytes()),
            },
            _ => return None,
        };

        Some(key)
    }

    pub fn is_hashable(&self) -> bool {
        self.hash_key().is_some()
    }

    /// `null` and `false` are falsy; everything else, `0` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Errors and return wrappers; both abort whatever is being evaluated
    /// and travel up unchanged.
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::Error(_) | Value::Return(_))
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Value::Error(message.into())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Hash(a), Value::Hash(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => f.write_str(itoa::Buffer::new().format(*i)),

            Value::Boolean(b) => write!(f, "{}", b),

            Value::String(s) => f.write_str(s),

            Value::Null => f.write_str("null"),

            Value::Array(elements) => {
                f.write_str("[")?;
                write_separated(f, elements, ", ")?;
                f.write_str("]")
            }

            Value::Hash(pairs) => {
                f.write_str("{")?;
                for (i, pair) in pairs.values().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_str("}")
            }

            Value::Function(function) => write!(f, "{}", function.literal),

            Value::Builtin(builtin) => write!(f, "builtin function {}", builtin.name),

            Value::Return(value) => write!(f, "{}", value),

            Value::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}
