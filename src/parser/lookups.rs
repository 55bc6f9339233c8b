use std::collections::HashMap;

use crate::{
    ast::ast::{Expr, Item},
    errors::errors::Error,
    lexer::{source::CharacterSource, tokens::TokenKind},
};

use super::{expr::*, items::*, parser::Parser};

/// Lowest and highest precedence a `binary` declaration may ask for.
pub const MIN_PRECEDENCE: i32 = 1;
pub const MAX_PRECEDENCE: i32 = 100;

/// Precedences of the operators every compilation starts with. Higher binds
/// tighter.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Assignment = 2,
    Relational = 10,
    Additive = 20,
    Multiplicative = 40,
}

/// Maps single-character binary operators to their precedence.
///
/// A character with no entry (or a non-positive one) is not a binary operator
/// and ends a binary chain when the parser meets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorTable {
    precedences: HashMap<char, i32>,
}

impl OperatorTable {
    pub fn new() -> Self {
        OperatorTable {
            precedences: HashMap::new(),
        }
    }

    pub fn with_standard_operators() -> Self {
        let mut table = OperatorTable::new();
        create_operator_lookups(&mut table);
        table
    }

    pub fn lookup(&self, operator: char) -> Option<i32> {
        self.precedences
            .get(&operator)
            .copied()
            .filter(|precedence| *precedence > 0)
    }

    /// Installs `operator` at `precedence`, returning the entry it replaced.
    pub fn define(&mut self, operator: char, precedence: i32) -> Option<i32> {
        self.precedences.insert(operator, precedence)
    }

    pub fn remove(&mut self, operator: char) -> Option<i32> {
        self.precedences.remove(&operator)
    }

    /// Precedence of the token as a binary operator, `-1` if it is not one.
    pub fn token_precedence(&self, kind: TokenKind) -> i32 {
        kind.as_ascii()
            .and_then(|operator| self.lookup(operator))
            .unwrap_or(-1)
    }
}

pub fn create_operator_lookups(table: &mut OperatorTable) {
    table.define('=', BindingPower::Assignment as i32);
    table.define('<', BindingPower::Relational as i32);
    table.define('+', BindingPower::Additive as i32);
    table.define('-', BindingPower::Additive as i32);
    table.define('*', BindingPower::Multiplicative as i32);
}

pub type NUDHandler<S> = fn(&mut Parser<S>) -> Result<Expr, Error>;
pub type ItemHandler<S> = fn(&mut Parser<S>) -> Result<Item, Error>;

pub fn create_token_lookups<S: CharacterSource>(parser: &mut Parser<S>) {
    // Primary expressions
    parser.nud(TokenKind::Number, parse_number_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::Char('('), parse_paren_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::For, parse_for_expr);
    parser.nud(TokenKind::Var, parse_var_expr);

    // Top-level items; anything else is a bare expression
    parser.item(TokenKind::Def, parse_definition_item);
    parser.item(TokenKind::Extern, parse_extern_item);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup<S> = HashMap<TokenKind, NUDHandler<S>>;
pub type ItemLookup<S> = HashMap<TokenKind, ItemHandler<S>>;
