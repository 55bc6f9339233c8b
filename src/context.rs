//! Per-compilation state shared by the parser and the backend.

use std::collections::HashMap;

use crate::{ast::ast::Prototype, parser::lookups::OperatorTable};

/// Holds the binary operator precedences and the prototype symbol table for
/// one compilation unit. Created before the first token is pulled and dropped
/// after the last definition is lowered.
#[derive(Debug, Clone)]
pub struct CompilationContext {
    pub operators: OperatorTable,
    prototypes: HashMap<String, Prototype>,
}

impl CompilationContext {
    /// A context with the standard binary operators installed.
    pub fn new() -> Self {
        CompilationContext {
            operators: OperatorTable::with_standard_operators(),
            prototypes: HashMap::new(),
        }
    }

    pub fn lookup_prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    /// Records `prototype` under its name, replacing any earlier declaration.
    pub fn insert_prototype(&mut self, prototype: Prototype) -> Option<Prototype> {
        self.prototypes.insert(prototype.name.clone(), prototype)
    }

    pub fn remove_prototype(&mut self, name: &str) -> Option<Prototype> {
        self.prototypes.remove(name)
    }
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::CompilationContext;
    use crate::ast::ast::Prototype;

    #[test]
    fn test_standard_operators_installed() {
        let context = CompilationContext::new();

        assert_eq!(context.operators.lookup('+'), Some(20));
        assert_eq!(context.operators.lookup('='), Some(2));
    }

    #[test]
    fn test_prototype_overwrite() {
        let mut context = CompilationContext::new();

        assert!(context
            .insert_prototype(Prototype::new("foo", vec!["a".to_string()]))
            .is_none());
        let previous = context.insert_prototype(Prototype::new("foo", vec!["b".to_string()]));

        assert_eq!(previous.map(|p| p.params), Some(vec!["a".to_string()]));
        assert_eq!(
            context.lookup_prototype("foo").map(|p| p.params.clone()),
            Some(vec!["b".to_string()])
        );
        assert!(context.lookup_prototype("bar").is_none());
    }
}
