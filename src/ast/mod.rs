/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the tree the parser produces
///
/// Submodules:
/// - ast: Expression nodes, prototypes, function definitions and top-level items
/// - display: S-expression rendering and indentation for dumps
pub mod ast;
pub mod display;

#[cfg(test)]
mod tests;
