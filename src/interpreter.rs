//! Tree‑walking evaluator.
//!
//! Every rule returns a [`Value`].  Failures are [`Value::Error`] and `return`
//! is [`Value::Return`]; both are checked for explicitly at each use site and
//! handed back unchanged, so nothing here unwinds through Rust errors.

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, trace};

use crate::builtins;
use crate::environment::{Env, Environment};
use crate::expr::{Expr, FunctionLiteral, Identifier, InfixOperator, PrefixOperator};
use crate::stmt::{BlockStatement, Program, Stmt};
use crate::value::{Function, HashPair, Value};

/// Anything [`eval`] accepts.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Statement(&'a Stmt),
    Block(&'a BlockStatement),
    Expression(&'a Expr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Statement(stmt)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(block: &'a BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expression(expr)
    }
}

/// Evaluate `node` in `env`.
pub fn eval<'a, N: Into<Node<'a>>>(node: N, env: &Env) -> Value {
    match node.into() {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(stmt) => eval_statement(stmt, env),
        Node::Block(block) => eval_block(block, env),
        Node::Expression(expr) => eval_expression(expr, env),
    }
}

/// A session: one root environment shared by every program it runs.
pub struct Interpreter {
    environment: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        Self {
            environment: Environment::new_root(),
        }
    }

    /// Evaluate a whole program in the session's root environment.
    pub fn interpret(&mut self, program: &Program) -> Value {
        debug!("Interpreting {} statements", program.statements.len());

        let value = eval_program(program, &self.environment);

        info!("Interpretation finished with {}", value.type_name());

        value
    }

    pub fn environment(&self) -> &Env {
        &self.environment
    }
}

// ───────────────────────── statements ─────────────────────────

/// Like [`eval_block`] but a top‑level `return` is unwrapped here.
fn eval_program(program: &Program, env: &Env) -> Value {
    let mut result = Value::Null;

    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Value::Return(value) => return *value,
            err @ Value::Error(_) => return err,
            value => result = value,
        }
    }

    result
}

/// Stops at the first return wrapper or error and hands it up untouched.
fn eval_block(block: &BlockStatement, env: &Env) -> Value {
    let mut result = Value::Null;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);

        if matches!(result, Value::Return(_) | Value::Error(_)) {
            trace!("Block short‑circuits on {}", result.type_name());
            return result;
        }
    }

    result
}

fn eval_statement(stmt: &Stmt, env: &Env) -> Value {
    match stmt {
        Stmt::Expression { expression, .. } => eval_expression(expression, env),

        Stmt::Let { name, value, .. } => {
            let value = eval_expression(value, env);
            if value.is_signal() {
                return value;
            }

            debug!("Binding '{}'", name.value);
            env.borrow_mut().define(&name.value, value);

            Value::Null
        }

        Stmt::Return { value, .. } => {
            let value = match value {
                Some(expr) => eval_expression(expr, env),
                None => Value::Null,
            };
            if value.is_signal() {
                return value;
            }

            Value::Return(Box::new(value))
        }

        Stmt::Block(block) => eval_block(block, env),
    }
}

// ───────────────────────── expressions ────────────────────────

fn eval_expression(expr: &Expr, env: &Env) -> Value {
    match expr {
        Expr::Integer { value, .. } => Value::Integer(*value),

        Expr::Str { value, .. } => Value::String(value.clone()),

        Expr::Boolean { value, .. } => Value::Boolean(*value),

        Expr::Identifier(ident) => eval_identifier(ident, env),

        Expr::Prefix {
            operator, right, ..
        } => {
            let right = eval_expression(right, env);
            if right.is_signal() {
                return right;
            }

            eval_prefix(*operator, right)
        }

        Expr::Infix {
            left,
            operator,
            right,
            ..
        } => {
            let left = eval_expression(left, env);
            if left.is_signal() {
                return left;
            }

            let right = eval_expression(right, env);
            if right.is_signal() {
                return right;
            }

            eval_infix(*operator, left, right)
        }

        Expr::If {
            condition,
            consequence,
            alternative,
            ..
        } => {
            let condition = eval_expression(condition, env);
            if condition.is_signal() {
                return condition;
            }

            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Value::Null
            }
        }

        Expr::Function(literal) => Value::Function(Function {
            literal: Rc::clone(literal),
            env: Rc::clone(env),
        }),

        Expr::Call {
            function,
            arguments,
            ..
        } => {
            let callee = eval_expression(function, env);
            if callee.is_signal() {
                return callee;
            }

            match eval_expressions(arguments, env) {
                Ok(args) => apply_function(callee, &args),
                Err(err) => err,
            }
        }

        Expr::Array { elements, .. } => match eval_expressions(elements, env) {
            Ok(elements) => Value::Array(elements),
            Err(err) => err,
        },

        Expr::Hash { pairs, .. } => eval_hash_literal(pairs, env),

        Expr::Index { left, index, .. } => {
            let left = eval_expression(left, env);
            if left.is_signal() {
                return left;
            }

            let index = eval_expression(index, env);
            if index.is_signal() {
                return index;
            }

            eval_index(left, index)
        }
    }
}

fn eval_identifier(ident: &Identifier, env: &Env) -> Value {
    if let Some(value) = env.borrow().get(&ident.value) {
        return value;
    }

    if let Some(builtin) = builtins::lookup(&ident.value) {
        return Value::Builtin(builtin);
    }

    debug!("Unresolved identifier '{}' on line {}", ident.value, ident.token.line);

    Value::error(format!("identifier not found: {}", ident.value))
}

/// Left to right; the first error or return wrapper aborts and is returned
/// as `Err`.
fn eval_expressions(exprs: &[Expr], env: &Env) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());

    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_signal() {
            return Err(value);
        }
        values.push(value);
    }

    Ok(values)
}

fn eval_prefix(operator: PrefixOperator, right: Value) -> Value {
    match operator {
        PrefixOperator::Bang => Value::Boolean(!right.is_truthy()),
        PrefixOperator::Minus => match right {
            Value::Integer(i) => Value::Integer(i.wrapping_neg()),
            other => Value::error(format!("unknown operator: -{}", other.type_name())),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b),

        (Value::Boolean(a), Value::Boolean(b)) => match operator {
            InfixOperator::Equal => Value::Boolean(a == b),
            InfixOperator::NotEqual => Value::Boolean(a != b),
            _ => unknown_operator(operator, &left, &right),
        },

        (Value::String(a), Value::String(b)) => match operator {
            InfixOperator::Plus => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Value::String(joined)
            }
            _ => unknown_operator(operator, &left, &right),
        },

        _ if left.type_name() != right.type_name() => Value::error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),

        _ => unknown_operator(operator, &left, &right),
    }
}

fn unknown_operator(operator: InfixOperator, left: &Value, right: &Value) -> Value {
    Value::error(format!(
        "unknown operator: {} {} {}",
        left.type_name(),
        operator,
        right.type_name()
    ))
}

/// Two's‑complement wrapping arithmetic; only division by zero fails.
fn eval_integer_infix(operator: InfixOperator, a: i64, b: i64) -> Value {
    match operator {
        InfixOperator::Plus => Value::Integer(a.wrapping_add(b)),
        InfixOperator::Minus => Value::Integer(a.wrapping_sub(b)),
        InfixOperator::Star => Value::Integer(a.wrapping_mul(b)),
        InfixOperator::Slash => {
            if b == 0 {
                Value::error(format!("division by zero: {} / {}", a, b))
            } else {
                Value::Integer(a.wrapping_div(b))
            }
        }
        InfixOperator::Less => Value::Boolean(a < b),
        InfixOperator::Greater => Value::Boolean(a > b),
        InfixOperator::Equal => Value::Boolean(a == b),
        InfixOperator::NotEqual => Value::Boolean(a != b),
    }
}

fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Env) -> Value {
    let mut hash = HashMap::with_capacity(pairs.len());

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.is_signal() {
            return key;
        }

        let Some(hash_key) = key.hash_key() else {
            return Value::error(format!("unusable as hash key: {}", key.type_name()));
        };

        let value = eval_expression(value_expr, env);
        if value.is_signal() {
            return value;
        }

        hash.insert(hash_key, HashPair { key, value });
    }

    Value::Hash(hash)
}

fn eval_index(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Value::Null),

        (Value::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map_or(Value::Null, |pair| pair.value.clone()),
            None => unsupported_index(&left, &index),
        },

        _ => unsupported_index(&left, &index),
    }
}

fn unsupported_index(left: &Value, index: &Value) -> Value {
    Value::error(format!(
        "index operator not supported: {}[{}]",
        left.type_name(),
        index.type_name()
    ))
}

// ───────────────────────── calls ──────────────────────────────

fn apply_function(callee: Value, args: &[Value]) -> Value {
    match callee {
        Value::Function(function) => call_function(&function, args),

        Value::Builtin(builtin) => {
            debug!("Calling builtin '{}'", builtin.name);
            builtin.call(args)
        }

        other => Value::error(format!("not a function: {}", other.type_name())),
    }
}

fn call_function(function: &Function, args: &[Value]) -> Value {
    let FunctionLiteral {
        parameters, body, ..
    } = function.literal.as_ref();

    if parameters.len() != args.len() {
        return Value::error(format!(
            "wrong number of arguments: want={}, got={}",
            parameters.len(),
            args.len()
        ));
    }

    let call_env = Environment::new_enclosed(&function.env);
    {
        let mut scope = call_env.borrow_mut();
        for (param, arg) in parameters.iter().zip(args) {
            scope.define(&param.value, arg.clone());
        }
    }

    trace!("Calling function with {} argument(s)", args.len());

    match eval_block(body, &call_env) {
        Value::Return(value) => *value,
        other => other,
    }
}
