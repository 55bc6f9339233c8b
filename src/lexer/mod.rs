//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that turns source characters
//! into tokens for the parser, one token per request. It handles:
//!
//! - Character sources with line/column tracking
//! - Recognition of keywords, identifiers and numeric literals
//! - Single-character tokens for operators, punctuation and unknown bytes
//! - Comments and whitespace handling

pub mod lexer;
pub mod source;
pub mod tokens;
