//! CDEF expression parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;

use super::lexer::{self, Token};
use super::{Expr, Op, Term};

/// Parse a comma-separated RPN expression
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let len = input.len();
    let tokens = lexer::lex(input)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expr_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            // Report the first error; later ones are usually knock-on effects
            errs.into_iter()
                .next()
                .map(|e| ParseError::from_rich(e, describe_token))
                .unwrap_or_else(|| ParseError::Syntax {
                    span: 0..len,
                    message: "invalid expression".to_string(),
                    expected: vec![],
                })
        })
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let operand = select! {
        Token::Number(n) => Term::Number(n),
        Token::Name(s) => Term::Variable(s),
    }
    .labelled("operand");

    let operator = select! {
        Token::Plus => Op::Add,
        Token::Minus => Op::Sub,
        Token::Star => Op::Mul,
        Token::Slash => Op::Div,
        Token::Percent => Op::Mod,
        Token::Max => Op::Max,
        Token::Min => Op::Min,
        Token::Abs => Op::Abs,
        Token::Lt => Op::Lt,
        Token::Gt => Op::Gt,
        Token::Le => Op::Le,
        Token::Ge => Op::Ge,
        Token::Eq => Op::Eq,
        Token::Ne => Op::Ne,
        Token::If => Op::If,
        Token::Un => Op::Un,
        Token::Unkn => Op::Unkn,
        Token::Inf => Op::Inf,
        Token::NegInf => Op::NegInf,
        Token::AddNan => Op::AddNan,
    }
    .map(Term::Op)
    .labelled("operator");

    choice((operand, operator))
        .separated_by(just(Token::Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|terms| Expr { terms })
        .then_ignore(end())
}

/// Format a token for human-readable error messages
fn describe_token(tok: &Token) -> String {
    match tok {
        Token::Name(s) => format!("variable '{}'", s),
        Token::Number(n) => format!("number {}", n),
        Token::Comma => "','".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::Slash => "'/'".to_string(),
        Token::Percent => "'%'".to_string(),
        Token::Max => "'MAX'".to_string(),
        Token::Min => "'MIN'".to_string(),
        Token::Abs => "'ABS'".to_string(),
        Token::Lt => "'LT'".to_string(),
        Token::Gt => "'GT'".to_string(),
        Token::Le => "'LE'".to_string(),
        Token::Ge => "'GE'".to_string(),
        Token::Eq => "'EQ'".to_string(),
        Token::Ne => "'NE'".to_string(),
        Token::If => "'IF'".to_string(),
        Token::Un => "'UN'".to_string(),
        Token::Unkn => "'UNKN'".to_string(),
        Token::Inf => "'INF'".to_string(),
        Token::NegInf => "'NEGINF'".to_string(),
        Token::AddNan => "'ADDNAN'".to_string(),
    }
}
