use crate::value::Value;
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope.  Closures keep one alive after the call that
/// created it has returned.
pub type Env = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Env) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// A fresh root scope behind a shared handle.
    pub fn new_root() -> Env {
        Rc::new(RefCell::new(Environment::new()))
    }

    /// A fresh scope whose lookups fall back to `enclosing`.
    pub fn new_enclosed(enclosing: &Env) -> Env {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    /// Bind `name` in this scope; the last write wins.
    pub fn define(&mut self, name: &str, value: Value) {
        trace!("define {} = {}", name, value.type_name());

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up here, then outward through the enclosing scopes.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            None
        }
    }

    pub fn enclosing(&self) -> Option<&Env> {
        self.enclosing.as_ref()
    }
}
