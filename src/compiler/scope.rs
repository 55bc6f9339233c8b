//! Name to storage bindings with shadow/restore discipline.

use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};

/// The bindings visible at one point of lowering, plus what every open scope
/// shadowed.
///
/// Scopes are only opened through [`ScopeStack::enter`], which hands out a
/// [`Scope`] guard. Every binding made through the guard is undone when the
/// guard drops, whichever way the enclosing code exits.
#[derive(Debug)]
pub struct ScopeStack<B> {
    bindings: HashMap<String, B>,
    /// One frame per open scope: each name bound in it with what it replaced.
    frames: Vec<Vec<(String, Option<B>)>>,
}

impl<B> ScopeStack<B> {
    pub fn new() -> Self {
        ScopeStack {
            bindings: HashMap::new(),
            frames: vec![],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&B> {
        self.bindings.get(name)
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut B> {
        self.bindings.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Number of scopes currently open.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn enter(&mut self) -> Scope<'_, B> {
        self.frames.push(vec![]);
        Scope { stack: self }
    }

    fn exit(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        for (name, previous) in frame.into_iter().rev() {
            match previous {
                Some(binding) => self.bindings.insert(name, binding),
                None => self.bindings.remove(&name),
            };
        }
    }
}

impl<B> Default for ScopeStack<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// An open scope. Dereferences to the whole stack, so lookups see outer
/// bindings and nested scopes can be entered from it.
pub struct Scope<'a, B> {
    stack: &'a mut ScopeStack<B>,
}

impl<B> Scope<'_, B> {
    /// Binds `name` until this scope closes, shadowing any binding it had.
    pub fn bind(&mut self, name: &str, binding: B) {
        let previous = self.stack.bindings.insert(name.to_string(), binding);

        if let Some(frame) = self.stack.frames.last_mut() {
            frame.push((name.to_string(), previous));
        }
    }
}

impl<B> Deref for Scope<'_, B> {
    type Target = ScopeStack<B>;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl<B> DerefMut for Scope<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl<B> Drop for Scope<'_, B> {
    fn drop(&mut self) {
        self.stack.exit();
    }
}
