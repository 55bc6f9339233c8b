use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{is_well_formed_number, parse_number_prefix},
        source::CharacterSource,
        tokens::TokenKind,
    },
};

use super::parser::Parser;

/// expression ::= unary binoprhs
pub fn parse_expression<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.nested(|parser| {
        let lhs = parse_unary(parser)?;
        parse_binop_rhs(parser, 0, lhs)
    })
}

/// binoprhs ::= (binop unary)*
///
/// Consumes operators binding at least as tightly as `expr_prec`. Equal
/// precedence groups to the left.
///
/// Every fold makes the tree one level taller, so each one counts against
/// the nesting limit just like a parenthesis.
pub fn parse_binop_rhs<S: CharacterSource>(
    parser: &mut Parser<S>,
    expr_prec: i32,
    lhs: Expr,
) -> Result<Expr, Error> {
    parser.holding_depth(|parser| fold_binop_rhs(parser, expr_prec, lhs))
}

fn fold_binop_rhs<S: CharacterSource>(parser: &mut Parser<S>, expr_prec: i32, lhs: Expr) -> Result<Expr, Error> {
    let mut lhs = lhs;

    loop {
        let token_prec = parser.token_precedence();
        if token_prec < expr_prec {
            return Ok(lhs);
        }

        let Some(operator) = parser.current_token_kind().as_ascii() else {
            return Ok(lhs);
        };
        parser.advance();

        let mut rhs = parse_unary(parser)?;

        // If the next operator binds tighter, it takes rhs as its lhs first
        let next_prec = parser.token_precedence();
        if token_prec < next_prec {
            rhs = parse_binop_rhs(parser, token_prec + 1, rhs)?;
        }

        parser.descend()?;
        lhs = Expr::binary(operator, lhs, rhs);
    }
}

/// unary ::= primary | OPCHAR unary
///
/// Any ASCII character other than `(` and `,` in prefix position is taken as
/// a unary operator. Whether it is defined is only known when lowering.
pub fn parse_unary<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    match parser.current_token_kind().as_ascii() {
        Some(operator) if operator != '(' && operator != ',' => {
            parser.advance();
            let operand = parser.nested(parse_unary)?;

            Ok(Expr::unary(operator, operand))
        }
        _ => parse_primary(parser),
    }
}

pub fn parse_primary<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    let handler = parser
        .get_nud_lookup()
        .get(&parser.current_token_kind())
        .copied();

    match handler {
        Some(handler) => handler(parser),
        None => Err(parser.error(ErrorImpl::ExpectedExpression {
            token: parser.current_token().to_string(),
        })),
    }
}

/// Consumes the current number token and returns its value.
pub fn take_number<S: CharacterSource>(parser: &mut Parser<S>) -> Result<f64, Error> {
    let token = parser.current_token();

    if parser.options().strict_numbers && !is_well_formed_number(&token.value) {
        return Err(parser.error(ErrorImpl::MalformedNumber {
            token: token.value.clone(),
        }));
    }

    let value = token
        .number
        .unwrap_or_else(|| parse_number_prefix(&token.value));
    parser.advance();

    Ok(value)
}

/// numberexpr ::= number
pub fn parse_number_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    Ok(Expr::Number(take_number(parser)?))
}

/// parenexpr ::= '(' expression ')'
pub fn parse_paren_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expression(parser)?;
    parser.expect(TokenKind::Char(')'), "')'")?;

    Ok(expr)
}

/// identifierexpr ::= identifier | identifier '(' (expression (',' expression)*)? ')'
pub fn parse_identifier_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    let name = parser.advance().value;

    if !parser.current_token().is_char('(') {
        return Ok(Expr::Variable(name));
    }
    parser.advance();

    let mut args = vec![];
    if !parser.current_token().is_char(')') {
        loop {
            args.push(parse_expression(parser)?);

            if parser.current_token().is_char(')') {
                break;
            }

            if !parser.current_token().is_char(',') {
                return Err(parser.error(ErrorImpl::ExpectedToken {
                    expected: String::from("')' or ',' in argument list"),
                    token: parser.current_token().to_string(),
                }));
            }
            parser.advance();
        }
    }
    parser.advance();

    Ok(Expr::Call { callee: name, args })
}

/// ifexpr ::= 'if' expression 'then' expression 'else' expression
pub fn parse_if_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.advance();

    let condition = parse_expression(parser)?;
    parser.expect(TokenKind::Then, "'then'")?;
    let then_branch = parse_expression(parser)?;
    parser.expect(TokenKind::Else, "'else'")?;
    let else_branch = parse_expression(parser)?;

    Ok(Expr::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    })
}

/// forexpr ::= 'for' identifier '=' expression ',' expression (',' expression)? 'in' expression
pub fn parse_for_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.advance();

    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.error(ErrorImpl::ExpectedIdentifier {
            context: String::from("after 'for'"),
            token: parser.current_token().to_string(),
        }));
    }
    let variable = parser.advance().value;

    parser.expect(TokenKind::Char('='), "'=' after 'for'")?;
    let start = parse_expression(parser)?;

    parser.expect(TokenKind::Char(','), "',' after for start value")?;
    let end = parse_expression(parser)?;

    let step = if parser.current_token().is_char(',') {
        parser.advance();
        Some(Box::new(parse_expression(parser)?))
    } else {
        None
    };

    parser.expect(TokenKind::In, "'in' after 'for'")?;
    let body = parse_expression(parser)?;

    Ok(Expr::For {
        variable,
        start: Box::new(start),
        end: Box::new(end),
        step,
        body: Box::new(body),
    })
}

/// varexpr ::= 'var' identifier ('=' expression)? (',' identifier ('=' expression)?)* 'in' expression
pub fn parse_var_expr<S: CharacterSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.advance();

    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.error(ErrorImpl::ExpectedIdentifier {
            context: String::from("after 'var'"),
            token: parser.current_token().to_string(),
        }));
    }

    let mut bindings = vec![];
    loop {
        let name = parser.advance().value;

        let init = if parser.current_token().is_char('=') {
            parser.advance();
            Some(parse_expression(parser)?)
        } else {
            None
        };
        bindings.push((name, init));

        if !parser.current_token().is_char(',') {
            break;
        }
        parser.advance();

        if parser.current_token_kind() != TokenKind::Identifier {
            return Err(parser.error(ErrorImpl::ExpectedIdentifier {
                context: String::from("list after 'var'"),
                token: parser.current_token().to_string(),
            }));
        }
    }

    parser.expect(TokenKind::In, "'in' after 'var'")?;
    let body = parse_expression(parser)?;

    Ok(Expr::Var {
        bindings,
        body: Box::new(body),
    })
}
