//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms the lexer's token stream
//! into top-level items. It uses recursive descent for the grammar and
//! precedence climbing for binary operators and handles:
//!
//! - Expression parsing (binary and unary operators, calls, if/for/var)
//! - Prototypes, including user-defined unary and binary operators
//! - Definitions, externs and bare top-level expressions
//! - Nesting limits and error reporting
//!
//! Binary operator precedences are looked up in the compilation context, so a
//! `def binary` changes how everything after it parses.

pub mod expr;
pub mod items;
pub mod lookups;
pub mod parser;
