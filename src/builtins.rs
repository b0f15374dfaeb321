//! Built‑in functions.
//!
//! Names resolve here only after the environment chain came up empty, so a
//! `let len = ...` shadows the built‑in.  Every body reports misuse as an
//! error value.

use log::debug;
use phf::phf_map;

use crate::value::{Builtin, Value};

static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "len"   => Builtin { name: "len", func: len },
    "first" => Builtin { name: "first", func: first },
    "last"  => Builtin { name: "last", func: last },
    "rest"  => Builtin { name: "rest", func: rest },
    "push"  => Builtin { name: "push", func: push },
    "puts"  => Builtin { name: "puts", func: puts },
};

/// The built‑in called `name`, if there is one.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.get(name).copied()
}

/// Names of every built‑in, in no particular order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.keys().copied()
}

fn wrong_arity(got: usize, want: usize) -> Value {
    Value::error(format!(
        "wrong number of arguments. got={}, want={}",
        got, want
    ))
}

fn len(args: &[Value]) -> Value {
    let [arg] = args else {
        return wrong_arity(args.len(), 1);
    };

    match arg {
        Value::String(s) => Value::Integer(s.len() as i64),
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        other => Value::error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

/// Shared argument check for the array helpers.
fn array_arg<'v>(name: &str, args: &'v [Value], want: usize) -> Result<&'v [Value], Value> {
    if args.len() != want {
        return Err(wrong_arity(args.len(), want));
    }

    match &args[0] {
        Value::Array(elements) => Ok(elements.as_slice()),
        other => Err(Value::error(format!(
            "argument to `{}` must be ARRAY, got {}",
            name,
            other.type_name()
        ))),
    }
}

fn first(args: &[Value]) -> Value {
    match array_arg("first", args, 1) {
        Ok(elements) => elements.first().cloned().unwrap_or(Value::Null),
        Err(err) => err,
    }
}

fn last(args: &[Value]) -> Value {
    match array_arg("last", args, 1) {
        Ok(elements) => elements.last().cloned().unwrap_or(Value::Null),
        Err(err) => err,
    }
}

fn rest(args: &[Value]) -> Value {
    match array_arg("rest", args, 1) {
        Ok([]) => Value::Null,
        Ok([_, tail @ ..]) => Value::Array(tail.to_vec()),
        Err(err) => err,
    }
}

fn push(args: &[Value]) -> Value {
    match array_arg("push", args, 2) {
        Ok(elements) => {
            let mut extended = Vec::with_capacity(elements.len() + 1);
            extended.extend_from_slice(elements);
            extended.push(args[1].clone());
            Value::Array(extended)
        }
        Err(err) => err,
    }
}

fn puts(args: &[Value]) -> Value {
    debug!("puts called with {} argument(s)", args.len());

    for arg in args {
        println!("{}", arg);
    }

    Value::Null
}
