//! Top-level loop: parse one item, lower it, repeat.
//!
//! A parse failure discards exactly one token before the next attempt, so a
//! broken construct costs at most the tokens already read plus one. A
//! lowering failure discards nothing since its item was fully consumed.

use crate::{
    ast::ast::Item,
    compiler::backend::Backend,
    context::CompilationContext,
    errors::errors::Error,
    lexer::{
        lexer::Lexer,
        source::{CharacterSource, StrSource},
    },
    parser::{
        items::parse_item,
        parser::{Parser, ParserOptions},
    },
};

/// A successfully lowered top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<V> {
    pub item: Item,
    pub value: V,
}

pub struct Driver<S: CharacterSource, B: Backend> {
    parser: Parser<S>,
    backend: B,
}

impl<B: Backend> Driver<StrSource, B> {
    pub fn for_source(source: &str, file: Option<String>, options: ParserOptions, backend: B) -> Self {
        let lexer = Lexer::new(StrSource::new(source, file));

        Driver::new(Parser::new(lexer, CompilationContext::new(), options), backend)
    }
}

impl<S: CharacterSource, B: Backend> Driver<S, B> {
    pub fn new(parser: Parser<S>, backend: B) -> Self {
        Driver { parser, backend }
    }

    /// Handles the next top-level item. Semicolons between items are skipped;
    /// `None` means the input is exhausted.
    pub fn step(&mut self) -> Option<Result<Outcome<B::Value>, Error>> {
        while self.parser.current_token().is_char(';') {
            self.parser.advance();
        }

        if !self.parser.has_tokens() {
            return None;
        }

        let position = self.parser.get_position();

        let item = match parse_item(&mut self.parser) {
            Ok(item) => item,
            Err(error) => {
                self.parser.advance();
                return Some(Err(error));
            }
        };

        let lowered = self.backend.lower_item(&item, self.parser.context_mut());

        Some(match lowered {
            Ok(value) => Ok(Outcome { item, value }),
            Err(error) => Err(error.with_position(position)),
        })
    }

    /// Steps until the input is exhausted.
    pub fn run(&mut self) -> Vec<Result<Outcome<B::Value>, Error>> {
        let mut results = vec![];

        while let Some(result) = self.step() {
            results.push(result);
        }

        results
    }

    pub fn parser(&self) -> &Parser<S> {
        &self.parser
    }

    pub fn context(&self) -> &CompilationContext {
        self.parser.context()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_parts(self) -> (Parser<S>, B) {
        (self.parser, self.backend)
    }
}
