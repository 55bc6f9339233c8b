use crate::{
    ast::ast::{FunctionDef, Item, OperatorKind, Prototype, DEFAULT_BINARY_PRECEDENCE},
    errors::errors::{Error, ErrorImpl},
    lexer::{source::CharacterSource, tokens::TokenKind},
};

use super::{
    expr::{parse_expression, take_number},
    lookups::{MAX_PRECEDENCE, MIN_PRECEDENCE},
    parser::Parser,
};

/// Parses one top-level construct: a definition, an extern, or a bare
/// expression.
pub fn parse_item<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Item, Error> {
    let handler = parser
        .get_item_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => handler(parser),
        None => Ok(Item::Expression(parse_top_level_expr(parser)?)),
    }
}

pub fn parse_definition_item<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Item, Error> {
    Ok(Item::Definition(parse_definition(parser)?))
}

pub fn parse_extern_item<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Item, Error> {
    Ok(Item::Extern(parse_extern(parser)?))
}

fn expect_operator<S: CharacterSource>(parser: &mut Parser<S>, kind: &str) -> Result<char, Error> {
    match parser.current_token_kind().as_ascii() {
        Some(operator) => {
            parser.advance();
            Ok(operator)
        }
        None => Err(parser.error(ErrorImpl::ExpectedOperator {
            kind: kind.to_string(),
            token: parser.current_token().to_string(),
        })),
    }
}

/// prototype
///     ::= identifier '(' identifier* ')'
///     ::= 'unary' OPCHAR '(' identifier ')'
///     ::= 'binary' OPCHAR number? '(' identifier identifier ')'
pub fn parse_prototype<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Prototype, Error> {
    let (name, kind) = match parser.current_token_kind() {
        TokenKind::Identifier => (Some(parser.advance().value), OperatorKind::None),
        TokenKind::Unary => {
            parser.advance();
            (None, OperatorKind::Unary(expect_operator(parser, "unary")?))
        }
        TokenKind::Binary => {
            parser.advance();
            let operator = expect_operator(parser, "binary")?;

            let mut precedence = DEFAULT_BINARY_PRECEDENCE;
            if parser.current_token_kind() == TokenKind::Number {
                let position = parser.get_position();
                let value = take_number(parser)?;

                if value < MIN_PRECEDENCE as f64 || value > MAX_PRECEDENCE as f64 {
                    return Err(Error::new(ErrorImpl::InvalidPrecedence { value }, position));
                }
                precedence = value as i32;
            }

            (None, OperatorKind::Binary { operator, precedence })
        }
        _ => {
            return Err(parser.error(ErrorImpl::ExpectedFunctionName {
                token: parser.current_token().to_string(),
            }))
        }
    };

    parser.expect(TokenKind::Char('('), "'(' in prototype")?;

    let mut params = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        params.push(parser.advance().value);
    }

    parser.expect(TokenKind::Char(')'), "')' in prototype")?;

    match name {
        Some(name) => Ok(Prototype::new(&name, params)),
        None => {
            let received = params.len();
            Prototype::operator(kind, params).ok_or_else(|| {
                parser.error(ErrorImpl::InvalidOperandCount {
                    expected: kind.operand_count().unwrap_or(0),
                    received,
                })
            })
        }
    }
}

/// definition ::= 'def' prototype expression
///
/// A binary operator's precedence is installed as soon as its prototype is
/// read, so the body can already use it. If the body fails, the table entry
/// it replaced is put back.
pub fn parse_definition<S: CharacterSource>(parser: &mut Parser<S>) -> Result<FunctionDef, Error> {
    parser.advance();
    let prototype = parse_prototype(parser)?;

    let installed = match prototype.kind {
        OperatorKind::Binary { operator, precedence } => Some((
            operator,
            parser.context_mut().operators.define(operator, precedence),
        )),
        _ => None,
    };

    match parse_expression(parser) {
        Ok(body) => Ok(FunctionDef::new(prototype, body)),
        Err(error) => {
            if let Some((operator, previous)) = installed {
                let operators = &mut parser.context_mut().operators;
                match previous {
                    Some(precedence) => operators.define(operator, precedence),
                    None => operators.remove(operator),
                };
            }

            Err(error)
        }
    }
}

/// external ::= 'extern' prototype
pub fn parse_extern<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Prototype, Error> {
    parser.advance();
    parse_prototype(parser)
}

/// toplevelexpr ::= expression
///
/// Wraps the expression in an anonymous nullary function.
pub fn parse_top_level_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<FunctionDef, Error> {
    let body = parse_expression(parser)?;

    Ok(FunctionDef::new(Prototype::anonymous(), body))
}
