//! Lexer for CDEF expressions using logos

use logos::Logos;

use crate::error::{ParseError, Span};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token(",")]
    Comma,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    // Functions and constants
    #[token("MAX")]
    Max,
    #[token("MIN")]
    Min,
    #[token("ABS")]
    Abs,
    #[token("LT")]
    Lt,
    #[token("GT")]
    Gt,
    #[token("LE")]
    Le,
    #[token("GE")]
    Ge,
    #[token("EQ")]
    Eq,
    #[token("NE")]
    Ne,
    #[token("IF")]
    If,
    #[token("UN")]
    Un,
    #[token("UNKN")]
    Unkn,
    #[token("INF")]
    Inf,
    #[token("NEGINF")]
    NegInf,
    #[token("ADDNAN")]
    AddNan,

    // Literals - variable names must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string(), priority = 1)]
    Name(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
}

/// Lex a CDEF expression into tokens with spans
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(t) => Ok((t, span)),
            Err(()) => Err(ParseError::Lexical {
                text: input[span.clone()].to_string(),
                span,
            }),
        })
        .collect()
}
