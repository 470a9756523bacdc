//! Error types for perfdata and CDEF expression parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use chumsky::error::{Rich, RichPattern, RichReason};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("Unrecognized input at {span:?}: '{text}'")]
    Lexical { span: Span, text: String },
}

impl ParseError {
    /// Byte range the error points at
    pub fn span(&self) -> Span {
        match self {
            ParseError::Syntax { span, .. } | ParseError::Lexical { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span();
        let (message, detail) = match self {
            ParseError::Syntax {
                message, expected, ..
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (message.clone(), format!("{}{}", message, expected_str))
            }
            ParseError::Lexical { text, .. } => (
                "Unrecognized input".to_string(),
                format!("cannot start a token with '{}'", text),
            ),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(detail)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    /// Convert a chumsky error, describing tokens with `describe`
    pub(crate) fn from_rich<T>(err: Rich<'_, T>, describe: impl Fn(&T) -> String) -> Self {
        let message = match err.reason() {
            RichReason::ExpectedFound { .. } => match err.found() {
                Some(tok) => format!("Unexpected {}", describe(tok)),
                None => "Unexpected end of input".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(describe(&**tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_of_each_variant() {
        let syntax = ParseError::Syntax {
            span: 2..5,
            message: "Unexpected ','".to_string(),
            expected: vec![],
        };
        let lexical = ParseError::Lexical {
            span: 7..8,
            text: "$".to_string(),
        };
        assert_eq!(syntax.span(), 2..5);
        assert_eq!(lexical.span(), 7..8);
    }

    #[test]
    fn test_format_includes_message_and_expected() {
        let err = ParseError::Syntax {
            span: 4..5,
            message: "Unexpected ','".to_string(),
            expected: vec!["number".to_string(), "variable name".to_string()],
        };
        let report = err.format("a,b,,+", "cdef");
        assert!(report.contains("Unexpected ','"));
        assert!(report.contains("Expected: number, variable name"));
    }

    #[test]
    fn test_display_of_lexical_error() {
        let err = ParseError::Lexical {
            span: 0..1,
            text: "$".to_string(),
        };
        assert_eq!(err.to_string(), "Unrecognized input at 0..1: '$'");
    }
}
