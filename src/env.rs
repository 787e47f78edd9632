// ABOUTME: Environment module for managing variable bindings and parent-chain scopes

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Environments are always shared by reference count: a `Function` holds a
/// strong reference to its captured frame, and application forks a frame
/// rather than mutating the one a long-lived closure points at.
pub type Env = Rc<Environment>;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: RefCell<Option<Env>>,
}

impl Environment {
    /// Creates a new, parentless environment.
    pub fn new() -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: RefCell::new(None),
        })
    }

    /// Creates a new environment with the given parent already installed.
    pub fn with_parent(parent: Env) -> Env {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: RefCell::new(Some(parent)),
        })
    }

    /// Binds `name` in this frame only, overwriting any existing binding.
    pub fn insert(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Binds `name` at the root of the parent chain.
    pub fn insert_global(self: &Rc<Self>, name: impl Into<String>, value: Value) {
        let mut current = Rc::clone(self);
        loop {
            let next = current.parent.borrow().clone();
            match next {
                Some(p) => current = p,
                None => break,
            }
        }
        current.insert(name, value);
    }

    /// Looks up `name` starting in this frame, walking to the root.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.bindings.borrow().get(name) {
            return Some(v.clone());
        }
        match self.parent.borrow().as_ref() {
            Some(p) => p.lookup(name),
            None => None,
        }
    }

    /// Installs `parent` as this environment's outer scope. Refuses to make
    /// an environment its own parent, which would turn the chain into a
    /// cycle.
    pub fn set_outer_scope(self: &Rc<Self>, parent: Env) {
        if Rc::ptr_eq(self, &parent) {
            return;
        }
        *self.parent.borrow_mut() = Some(parent);
    }

    /// Produces a fresh frame with a copy of this frame's own bindings
    /// (each cloned via `Value::clone`) and the same parent pointer.
    pub fn fork(self: &Rc<Self>) -> Env {
        let bindings = self
            .bindings
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Rc::new(Environment {
            bindings: RefCell::new(bindings),
            parent: RefCell::new(self.parent.borrow().clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let env = Environment::new();
        env.insert("x", Value::Integer(42));
        assert!(matches!(env.lookup("x"), Some(Value::Integer(42))));
    }

    #[test]
    fn test_unbound_symbol() {
        let env = Environment::new();
        assert!(env.lookup("undefined").is_none());
    }

    #[test]
    fn test_shadowing() {
        let parent = Environment::new();
        parent.insert("x", Value::Integer(1));

        let child = Environment::with_parent(parent);
        child.insert("x", Value::Integer(2));

        assert!(matches!(child.lookup("x"), Some(Value::Integer(2))));
    }

    #[test]
    fn test_parent_lookup() {
        let parent = Environment::new();
        parent.insert("x", Value::Integer(7));

        let child = Environment::with_parent(parent);
        assert!(matches!(child.lookup("x"), Some(Value::Integer(7))));
    }

    #[test]
    fn test_insert_global_walks_to_root() {
        let root = Environment::new();
        let mid = Environment::with_parent(root.clone());
        let leaf = Environment::with_parent(mid.clone());

        leaf.insert_global("g", Value::Integer(99));

        assert!(root.lookup("g").is_some());
        assert!(matches!(leaf.lookup("g"), Some(Value::Integer(99))));
    }

    #[test]
    fn test_set_outer_scope_refuses_self() {
        let env = Environment::new();
        env.set_outer_scope(env.clone());
        // No cycle: lookup on an unbound name must still terminate.
        assert!(env.lookup("missing").is_none());
    }

    #[test]
    fn test_fork_copies_bindings_shares_parent() {
        let parent = Environment::new();
        parent.insert("shared", Value::Integer(1));
        let env = Environment::with_parent(parent.clone());
        env.insert("local", Value::Integer(2));

        let forked = env.fork();
        forked.insert("local", Value::Integer(3));

        // Original frame unaffected by mutation of the fork.
        assert!(matches!(env.lookup("local"), Some(Value::Integer(2))));
        assert!(matches!(forked.lookup("local"), Some(Value::Integer(3))));
        // Parent chain is shared, not copied.
        assert!(matches!(forked.lookup("shared"), Some(Value::Integer(1))));
    }
}
