use std::collections::HashMap;
use std::rc::Rc;

use crate::template::Node;

/// A named template fragment defined with `{% template %}`.
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    pub body: Rc<[Node]>,
}

/// Macros registered during rendering, keyed by name.
///
/// Registration happens when a definition tag renders, so the registry holds
/// whatever definitions have executed so far. Same-named definitions replace
/// each other.
#[derive(Debug, Default)]
pub struct MacroRegistry {
    macros: HashMap<String, Macro>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a macro, returning the one it replaced.
    pub fn insert(&mut self, name: &str, body: Rc<[Node]>) -> Option<Macro> {
        self.macros.insert(name.to_string(), Macro { name: name.to_string(), body })
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    /// Shared handle to the body of `name`, so it can render without
    /// holding a borrow of the registry.
    pub fn body(&self, name: &str) -> Option<Rc<[Node]>> {
        self.get(name).map(|m| Rc::clone(&m.body))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.macros.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}
