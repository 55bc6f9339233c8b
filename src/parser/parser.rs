//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry points.
//! The parser pulls tokens from the lexer on demand and always holds exactly
//! one token of lookahead. Expressions are parsed by recursive descent with
//! precedence climbing for binary operators, whose precedences live in the
//! compilation context and can grow while parsing.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for primary expressions
//! - Item handlers for top-level constructs

use std::collections::HashMap;

use crate::{
    ast::ast::Item,
    context::CompilationContext,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        source::{CharacterSource, StrSource},
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    items::parse_item,
    lookups::{create_token_lookups, ItemHandler, ItemLookup, NUDHandler, NUDLookup},
};

/// How deeply expressions may nest before parsing gives up.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParserOptions {
    /// Nesting limit for parenthesised, control-flow and prefix-operator
    /// expressions.
    pub max_depth: usize,
    /// Reject numeric literals with more than one period instead of reading
    /// their longest valid prefix.
    pub strict_numbers: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
            strict_numbers: false,
        }
    }
}

/// The main parser structure that maintains parsing state.
///
/// Every parse routine expects the current token to be the first token of its
/// construct and leaves the current token one past the end of it.
pub struct Parser<S: CharacterSource> {
    /// Source of tokens
    lexer: Lexer<S>,
    /// The lookahead token
    current: Token,
    /// Operator precedences and declared prototypes
    context: CompilationContext,
    options: ParserOptions,
    /// Current expression nesting depth
    depth: usize,
    /// Lookup table for primary expression handlers
    nud_lookup: NUDLookup<S>,
    /// Lookup table for top-level item handlers
    item_lookup: ItemLookup<S>,
}

impl<S: CharacterSource> Parser<S> {
    /// Creates a new Parser and pulls the first token.
    pub fn new(mut lexer: Lexer<S>, context: CompilationContext, options: ParserOptions) -> Self {
        let current = lexer.next_token();

        let mut parser = Parser {
            lexer,
            current,
            context,
            options,
            depth: 0,
            nud_lookup: HashMap::new(),
            item_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);

        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Pulls the next token and returns the one it replaces.
    pub fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    /// Consumes the current token if it is of `expected_kind`; otherwise fails
    /// with an error naming what was `expected`.
    pub fn expect(&mut self, expected_kind: TokenKind, expected: &str) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            return Err(self.error(ErrorImpl::ExpectedToken {
                expected: expected.to_string(),
                token: self.current.to_string(),
            }));
        }

        Ok(self.advance())
    }

    /// Checks if there is anything left before the end of input.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Precedence of the current token as a binary operator, `-1` if it is
    /// not a declared one.
    pub fn token_precedence(&self) -> i32 {
        self.context.operators.token_precedence(self.current.kind)
    }

    /// Runs `parse` one nesting level deeper, failing once the configured
    /// limit is reached.
    pub fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        self.holding_depth(|parser| {
            parser.descend()?;
            parse(parser)
        })
    }

    /// Takes one more nesting level until the enclosing
    /// [`holding_depth`](Self::holding_depth) call returns.
    pub fn descend(&mut self) -> Result<(), Error> {
        if self.depth >= self.options.max_depth {
            return Err(self.error(ErrorImpl::NestingTooDeep {
                limit: self.options.max_depth,
            }));
        }

        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` and gives back every level it descended, whether or not
    /// it succeeded.
    pub fn holding_depth<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        let depth = self.depth;
        let result = parse(self);
        self.depth = depth;

        result
    }

    /// Builds an error located at the current token.
    pub fn error(&self, error: ErrorImpl) -> Error {
        Error::new(error, self.get_position())
    }

    /// Returns the position where the current token starts.
    pub fn get_position(&self) -> Position {
        self.current.span.start.clone()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn context(&self) -> &CompilationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut CompilationContext {
        &mut self.context
    }

    pub fn into_context(self) -> CompilationContext {
        self.context
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup<S> {
        &self.nud_lookup
    }

    /// Returns a reference to the top-level item lookup table.
    pub fn get_item_lookup(&self) -> &ItemLookup<S> {
        &self.item_lookup
    }

    /// Registers a primary expression handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler<S>) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a top-level item handler for a token.
    pub fn item(&mut self, kind: TokenKind, item_fn: ItemHandler<S>) {
        self.item_lookup.insert(kind, item_fn);
    }
}

/// Parses every top-level item in `source` with default options.
///
/// Top-level semicolons are skipped. Parsing stops at the first error; the
/// parser is returned alongside so its context can be inspected.
pub fn parse(source: &str, file: Option<String>) -> (Parser<StrSource>, Result<Vec<Item>, Error>) {
    parse_with(source, file, CompilationContext::new(), ParserOptions::default())
}

pub fn parse_with(
    source: &str,
    file: Option<String>,
    context: CompilationContext,
    options: ParserOptions,
) -> (Parser<StrSource>, Result<Vec<Item>, Error>) {
    let mut parser = Parser::new(Lexer::new(StrSource::new(source, file)), context, options);
    let mut items = vec![];

    while parser.has_tokens() {
        if parser.current_token().is_char(';') {
            parser.advance();
            continue;
        }

        match parse_item(&mut parser) {
            Ok(item) => items.push(item),
            Err(error) => return (parser, Err(error)),
        }
    }

    (parser, Ok(items))
}
