use lazy_static::lazy_static;
use regex::Regex;

use crate::{Position, Span, MK_TOKEN};

use super::{
    source::{CharacterSource, StrSource},
    tokens::{Token, TokenKind, RESERVED_LOOKUP},
};

lazy_static! {
    /// The longest prefix a decimal string-to-float conversion accepts out of a
    /// `[0-9.]+` run: digits, at most one period, digits.
    static ref NUMBER_PREFIX: Regex = Regex::new(r"^[0-9]*\.?[0-9]*").unwrap();
    static ref WELL_FORMED_NUMBER: Regex = Regex::new(r"^(?:[0-9]+\.?[0-9]*|\.[0-9]+)$").unwrap();
}

/// Converts a `[0-9.]+` run to a float, stopping at the first character that
/// no longer fits a decimal literal. `"1.23.45"` reads as `1.23`, a lone `"."`
/// as `0`.
pub fn parse_number_prefix(text: &str) -> f64 {
    let prefix = NUMBER_PREFIX.find(text).map_or("", |m| m.as_str());
    prefix.parse().unwrap_or(0.0)
}

/// Whether the whole of `text` is a single decimal literal.
pub fn is_well_formed_number(text: &str) -> bool {
    WELL_FORMED_NUMBER.is_match(text)
}

/// ASCII whitespace plus the vertical tab, which `is_ascii_whitespace` leaves out.
fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Turns a stream of characters into tokens on demand.
///
/// One character of lookahead is held between calls; it starts out as a space
/// so the first call pulls from the source.
pub struct Lexer<S: CharacterSource> {
    source: S,
    last_char: Option<char>,
    previous_position: Position,
}

impl<S: CharacterSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        let previous_position = source.position();

        Lexer {
            source,
            last_char: Some(' '),
            previous_position,
        }
    }

    fn read(&mut self) {
        self.previous_position = self.source.position();
        self.last_char = self.source.next_char();
    }

    fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.previous_position.clone(),
        }
    }

    /// Returns the next token. Once the source is exhausted every call returns
    /// an `EOF` token.
    pub fn next_token(&mut self) -> Token {
        loop {
            while matches!(self.last_char, Some(c) if is_space(c)) {
                self.read();
            }

            let start = self.source.position();

            match self.last_char {
                None => {
                    let span = Span {
                        start: start.clone(),
                        end: start,
                    };
                    return MK_TOKEN!(TokenKind::EOF, String::new(), span);
                }
                Some(c) if c.is_ascii_alphabetic() => return self.identifier(start),
                Some(c) if c.is_ascii_digit() || c == '.' => return self.number(start),
                Some('#') => {
                    while !matches!(self.last_char, None | Some('\n') | Some('\r')) {
                        self.read();
                    }
                }
                Some(c) => {
                    self.read();
                    return MK_TOKEN!(TokenKind::Char(c), c.to_string(), self.span_from(start));
                }
            }
        }
    }

    fn identifier(&mut self, start: Position) -> Token {
        let mut value = String::new();

        while let Some(c) = self.last_char.filter(|c| c.is_ascii_alphanumeric()) {
            value.push(c);
            self.read();
        }

        let kind = RESERVED_LOOKUP
            .get(value.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        MK_TOKEN!(kind, value, self.span_from(start))
    }

    fn number(&mut self, start: Position) -> Token {
        let mut value = String::new();

        while let Some(c) = self.last_char.filter(|c| c.is_ascii_digit() || *c == '.') {
            value.push(c);
            self.read();
        }

        let number = parse_number_prefix(&value);
        MK_TOKEN!(TokenKind::Number, value, number, self.span_from(start))
    }
}

/// Lexes all of `source`, including the trailing `EOF` token.
pub fn tokenize(source: &str, file: Option<String>) -> Vec<Token> {
    let mut lexer = Lexer::new(StrSource::new(source, file));
    let mut tokens = vec![];

    loop {
        let token = lexer.next_token();
        let at_end = token.is(TokenKind::EOF);
        tokens.push(token);

        if at_end {
            return tokens;
        }
    }
}
