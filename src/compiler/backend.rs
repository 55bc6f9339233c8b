use crate::{
    ast::ast::{FunctionDef, Item, Prototype},
    context::CompilationContext,
    errors::errors::Error,
};

/// Lowers parsed top-level items into whatever a backend produces.
///
/// Both methods may read and update the compilation context: definitions and
/// externs record their prototype in it, and a failed binary operator
/// definition may withdraw its precedence. A failure abandons the item; it
/// carries no partial result.
pub trait Backend {
    type Value;

    fn lower_prototype(
        &mut self,
        prototype: &Prototype,
        context: &mut CompilationContext,
    ) -> Result<Self::Value, Error>;

    fn lower_function(
        &mut self,
        function: &FunctionDef,
        context: &mut CompilationContext,
    ) -> Result<Self::Value, Error>;

    fn lower_item(&mut self, item: &Item, context: &mut CompilationContext) -> Result<Self::Value, Error> {
        match item {
            Item::Definition(function) | Item::Expression(function) => self.lower_function(function, context),
            Item::Extern(prototype) => self.lower_prototype(prototype, context),
        }
    }
}
