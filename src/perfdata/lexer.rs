//! Lexer for plugin performance data using logos

use logos::Logos;

use crate::error::{ParseError, Span};

/// Perfdata tokens
///
/// Whitespace is significant: it separates entries, so it is a token
/// rather than skipped. Numbers keep their source text because they can
/// also be part of an unquoted label (`1min=0.5`).
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"[ \t\r\n]+")]
    Space,

    #[token("=")]
    Equals,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("@")]
    At,
    #[token("~")]
    Tilde,

    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    Quoted(String),

    #[regex(r"[-+]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][-+]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    #[regex(r"[^ \t\r\n=;:@~'0-9.+\-][^ \t\r\n=;:']*", |lex| lex.slice().to_string())]
    Word(String),
}

/// Lex perfdata into tokens with spans
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

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    fn number(s: &str) -> Token {
        Token::Number(s.to_string())
    }

    #[test]
    fn test_simple_entry() {
        assert_eq!(
            tokens("active=20;;;;"),
            vec![
                word("active"),
                Token::Equals,
                number("20"),
                Token::Semicolon,
                Token::Semicolon,
                Token::Semicolon,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_value_with_unit() {
        assert_eq!(
            tokens("offset=0.3s;5;10"),
            vec![
                word("offset"),
                Token::Equals,
                number("0.3"),
                word("s"),
                Token::Semicolon,
                number("5"),
                Token::Semicolon,
                number("10"),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_one_token() {
        assert_eq!(
            tokens("a=1  \tb=2"),
            vec![
                word("a"),
                Token::Equals,
                number("1"),
                Token::Space,
                word("b"),
                Token::Equals,
                number("2"),
            ]
        );
    }

    #[test]
    fn test_quoted_label_and_range() {
        assert_eq!(
            tokens("'C: used'=5;@~:10"),
            vec![
                Token::Quoted("C: used".to_string()),
                Token::Equals,
                number("5"),
                Token::Semicolon,
                Token::At,
                Token::Tilde,
                Token::Colon,
                number("10"),
            ]
        );
    }

    #[test]
    fn test_negative_and_percent() {
        assert_eq!(
            tokens("x=-1.5%"),
            vec![word("x"), Token::Equals, number("-1.5"), word("%")]
        );
    }

    #[test]
    fn test_unterminated_quote_is_lexical_error() {
        assert!(matches!(
            lex("'abc=1"),
            Err(ParseError::Lexical { .. })
        ));
    }
}
