//! Lowering of parsed items.
//!
//! This module holds the pieces a backend is built from:
//!
//! - The `Backend` trait every lowering target implements
//! - `ScopeStack`, the shadow/restore bookkeeping for `var` and `for` bindings
//! - `Evaluator`, a backend that runs the program directly

pub mod backend;
pub mod evaluator;
pub mod scope;

#[cfg(test)]
mod tests;
