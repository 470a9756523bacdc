//! Perfdata parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ParseError;

use super::lexer::{self, Token};
use super::{PerfValue, ThresholdRange};

/// Parse a perfdata string into its entries
pub fn parse(input: &str) -> Result<Vec<PerfValue>, ParseError> {
    let len = input.len();
    let tokens = lexer::lex(input)?;

    let token_iter = tokens.into_iter().map(|(tok, span)| (tok, span.into()));
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    perfdata_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .next()
                .map(|e| ParseError::from_rich(e, describe_token))
                .unwrap_or_else(|| ParseError::Syntax {
                    span: 0..len,
                    message: "invalid perfdata".to_string(),
                    expected: vec![],
                })
        })
}

fn perfdata_parser<'a, I>() -> impl Parser<'a, I, Vec<PerfValue>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let number = select! {
        Token::Number(s) => s,
    }
    .try_map(|s, span| {
        s.parse::<f64>()
            .map_err(|_| Rich::custom(span, format!("invalid number '{}'", s)))
    })
    .labelled("number");

    let word = select! {
        Token::Word(s) => s,
    };

    // Unquoted labels may mix words and digits: `1min`, `load15`
    let label = choice((
        select! { Token::Quoted(s) => s },
        select! {
            Token::Word(s) => s,
            Token::Number(s) => s,
        }
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(|parts| parts.concat()),
    ))
    .labelled("label");

    let value = choice((
        number.clone().map(Some),
        word.clone().try_map(|w, span| {
            if w == "U" {
                Ok(None::<f64>)
            } else {
                Err(Rich::custom(span, format!("expected a value, found '{}'", w)))
            }
        }),
    ))
    .labelled("value");

    // Range start: a number, or `~` for negative infinity
    let start = choice((
        just(Token::Tilde).to(f64::NEG_INFINITY),
        number.clone(),
    ));

    let range = just(Token::At)
        .or_not()
        .then(start.then_ignore(just(Token::Colon)).or_not())
        .then(number.clone().or_not())
        .map(|((at, start), end)| {
            if at.is_none() && start.is_none() && end.is_none() {
                return None;
            }
            Some(ThresholdRange {
                start: start.unwrap_or(0.0),
                end: end.unwrap_or(f64::INFINITY),
                inside: at.is_some(),
            })
        });

    let range_field = just(Token::Semicolon)
        .ignore_then(range)
        .or_not()
        .map(Option::flatten);

    let number_field = just(Token::Semicolon)
        .ignore_then(number.or_not())
        .or_not()
        .map(Option::flatten);

    let entry = label
        .then_ignore(just(Token::Equals))
        .then(value)
        .then(word.or_not())
        .then(range_field.clone())
        .then(range_field)
        .then(number_field.clone())
        .then(number_field)
        // some plugins emit more separators than fields
        .then_ignore(just(Token::Semicolon).repeated())
        .map(|((((((label, value), unit), warn), crit), min), max)| PerfValue {
            label,
            value,
            unit,
            warn,
            crit,
            min,
            max,
        });

    just(Token::Space)
        .or_not()
        .ignore_then(
            entry
                .separated_by(just(Token::Space))
                .allow_trailing()
                .collect::<Vec<_>>(),
        )
        .then_ignore(end())
}

/// Format a token for human-readable error messages
fn describe_token(tok: &Token) -> String {
    match tok {
        Token::Space => "whitespace".to_string(),
        Token::Equals => "'='".to_string(),
        Token::Semicolon => "';'".to_string(),
        Token::Colon => "':'".to_string(),
        Token::At => "'@'".to_string(),
        Token::Tilde => "'~'".to_string(),
        Token::Quoted(s) => format!("quoted label '{}'", s),
        Token::Number(s) => format!("number {}", s),
        Token::Word(s) => format!("'{}'", s),
    }
}
