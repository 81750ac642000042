use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use indexmap::IndexMap;
use minijinja::value::{Enumerator, Object, Value};

use crate::constants::MAX_INVOCATION_DEPTH;
use crate::error::{Error, Result};

/// One layer of bound variables.
pub type Scope = IndexMap<String, Value>;

/// Stack of scopes consulted innermost-first during lookup.
#[derive(Debug, Clone, Default)]
pub struct Context {
    scopes: Vec<Arc<Scope>>,
    invocation_depth: usize,
}

impl Context {
    pub fn new(root: Scope) -> Self {
        Self { scopes: vec![Arc::new(root)], invocation_depth: 0 }
    }

    /// Builds a context whose root scope holds the keys of a JSON object.
    ///
    /// Any other JSON value yields an empty root scope.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let root = match value.as_object() {
            Some(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), Value::from_serialize(value)))
                .collect(),
            None => Scope::new(),
        };
        Self::new(root)
    }

    pub fn push(&mut self, scope: Scope) {
        self.scopes.push(Arc::new(scope));
    }

    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop().map(Arc::unwrap_or_clone)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Binds `name` in the innermost scope.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if self.scopes.is_empty() {
            self.scopes.push(Arc::default());
        }
        if let Some(scope) = self.scopes.last_mut() {
            Arc::make_mut(scope).insert(name.into(), value);
        }
    }

    /// Number of scope layers, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn invocation_depth(&self) -> usize {
        self.invocation_depth
    }

    /// Enters the body of the macro `name`, optionally pushing a scope.
    ///
    /// The returned frame pops the scope and leaves the invocation when it
    /// is dropped, whichever way the body render ends.
    pub fn enter(&mut self, name: &str, scope: Option<Scope>) -> Result<Frame<'_>> {
        if self.invocation_depth >= MAX_INVOCATION_DEPTH {
            return Err(Error::RecursionLimit {
                name: name.to_string(),
                limit: MAX_INVOCATION_DEPTH,
            });
        }
        self.invocation_depth += 1;
        let pushed = scope.is_some();
        if let Some(scope) = scope {
            self.push(scope);
        }
        Ok(Frame { ctx: self, pushed })
    }

    /// Snapshot of the stack as a minijinja value for expression evaluation.
    pub fn to_value(&self) -> Value {
        Value::from_object(ScopeChain { layers: self.scopes.clone() })
    }
}

/// Guard returned by [`Context::enter`].
#[derive(Debug)]
pub struct Frame<'c> {
    ctx: &'c mut Context,
    pushed: bool,
}

impl Deref for Frame<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.ctx
    }
}

impl DerefMut for Frame<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.ctx
    }
}

impl Drop for Frame<'_> {
    fn drop(&mut self) {
        if self.pushed {
            self.ctx.scopes.pop();
        }
        self.ctx.invocation_depth -= 1;
    }
}

#[derive(Debug)]
struct ScopeChain {
    layers: Vec<Arc<Scope>>,
}

impl Object for ScopeChain {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let name = key.as_str()?;
        self.layers.iter().rev().find_map(|scope| scope.get(name).cloned())
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let mut keys: IndexMap<&str, ()> = IndexMap::new();
        for scope in &self.layers {
            for key in scope.keys() {
                keys.insert(key, ());
            }
        }
        Enumerator::Values(keys.into_keys().map(Value::from).collect())
    }
}
