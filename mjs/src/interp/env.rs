//! Environment chain for variable bindings
//!
//! Lookup walks from the current environment rootward. Parent links only
//! point toward the root, so the `Rc` chain is acyclic; a function-call
//! environment is dropped when the executor releases its last reference at
//! return.

use super::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

/// Shared reference to an environment
pub type EnvRef = Rc<RefCell<Environment>>;

/// How a slot came into existence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Explicit `var` declaration, confined to the enclosing function scope
    DeclaredLocal,
    /// Assignment to a name with no binding anywhere in the chain; always
    /// lives in the root environment
    ImplicitGlobal,
}

/// A value slot, owned exclusively by its declaring environment
#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,
    pub kind: BindingKind,
}

/// Environment holding variable slots
#[derive(Debug)]
pub struct Environment {
    slots: HashMap<String, Slot>,
    /// Parent environment for lexical scoping; `None` at the root
    parent: Option<EnvRef>,
}

impl Environment {
    /// Create a root (global) environment
    pub fn new() -> Self {
        Environment {
            slots: HashMap::new(),
            parent: None,
        }
    }

    /// Create an environment with a parent
    pub fn with_parent(parent: EnvRef) -> Self {
        Environment {
            slots: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Wrap in Rc<RefCell<>>
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Register a `var` name in THIS environment, bound to undefined.
    /// Idempotent: hoisting and re-declaration never clobber a value the
    /// slot already holds.
    pub fn declare_local(&mut self, name: &str) {
        self.slots.entry(name.to_string()).or_insert(Slot {
            value: Value::Undefined,
            kind: BindingKind::DeclaredLocal,
        });
    }

    /// Initializer assignment into this environment's own slot. The slot
    /// normally already exists from the hoisting pass; the binding kind is
    /// preserved if it does.
    pub fn define_local(&mut self, name: impl Into<String>, value: Value) {
        let slot = self.slots.entry(name.into()).or_insert(Slot {
            value: Value::Undefined,
            kind: BindingKind::DeclaredLocal,
        });
        slot.value = value;
    }

    /// Look up a name in the scope chain. `None` means no binding exists
    /// anywhere - distinct from an existing binding holding undefined.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(slot) = self.slots.get(name) {
            Some(slot.value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            None
        }
    }

    /// Check if a name is bound anywhere in the chain
    pub fn contains(&self, name: &str) -> bool {
        if self.slots.contains_key(name) {
            true
        } else if let Some(parent) = &self.parent {
            parent.borrow().contains(name)
        } else {
            false
        }
    }

    /// Binding kind of the nearest slot for `name` in the chain
    pub fn kind_of(&self, name: &str) -> Option<BindingKind> {
        if let Some(slot) = self.slots.get(name) {
            Some(slot.kind)
        } else if let Some(parent) = &self.parent {
            parent.borrow().kind_of(name)
        } else {
            None
        }
    }

    /// Update an existing slot in place, wherever in the chain it lives.
    /// Hands the value back if no binding exists anywhere.
    fn try_set(&mut self, name: &str, value: Value) -> Result<(), Value> {
        if let Some(slot) = self.slots.get_mut(name) {
            slot.value = value;
            Ok(())
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().try_set(name, value)
        } else {
            Err(value)
        }
    }

    fn define_implicit_global(&mut self, name: &str, value: Value) {
        debug_assert!(self.is_root());
        self.slots.insert(
            name.to_string(),
            Slot {
                value,
                kind: BindingKind::ImplicitGlobal,
            },
        );
    }

    /// Slots owned by this environment only (not the chain)
    pub fn bindings(&self) -> &HashMap<String, Slot> {
        &self.slots
    }

    /// Render this environment's own bindings, sorted by name.
    /// Used by the CLI symbol-table dump.
    pub fn trace(&self) -> String {
        let mut names: Vec<&String> = self.slots.keys().collect();
        names.sort();
        let mut out = String::new();
        for name in names {
            let slot = &self.slots[name];
            let _ = writeln!(out, "{} = {}", name, slot.value);
        }
        out
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a child environment from a parent reference
pub fn child_env(parent: &EnvRef) -> EnvRef {
    Environment::with_parent(Rc::clone(parent)).into_ref()
}

/// Walk parent links to the root environment
pub fn root_of(env: &EnvRef) -> EnvRef {
    let mut current = Rc::clone(env);
    loop {
        let parent = current.borrow().parent.clone();
        match parent {
            Some(p) => current = p,
            None => return current,
        }
    }
}

/// Assign to a name: update the existing slot in place wherever the chain
/// holds it, preserving its owner and kind. A name bound nowhere becomes an
/// implicit global in the ROOT environment - never in `env`.
pub fn assign(env: &EnvRef, name: &str, value: Value) {
    let unbound = env.borrow_mut().try_set(name, value);
    if let Err(value) = unbound {
        let root = root_of(env);
        root.borrow_mut().define_implicit_global(name, value);
    }
}

/// Every name visible from `env`, nearest scope first. Suggestion
/// candidates for reference-missing diagnostics.
pub fn visible_names(env: &EnvRef) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = Rc::clone(env);
    loop {
        {
            let e = current.borrow();
            let mut level: Vec<&String> = e.slots.keys().collect();
            level.sort();
            for name in level {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        let parent = current.borrow().parent.clone();
        match parent {
            Some(p) => current = p,
            None => return names,
        }
    }
}
