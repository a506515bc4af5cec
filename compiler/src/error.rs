use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::{tokenizer::{Token, TokenKind}, utils::quote};

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input {} in line {line}", quote(.remainder))]
    Lex {
        remainder: String,
        line:      i64,
    },

    #[error("{reason} <{content}>({kind}) in line {line} while parsing {production}")]
    Parse {
        reason:     ParseErrorKind,
        content:    String,
        kind:       TokenKind,
        line:       i64,
        production: Production,
    },
}

impl ProtoError {
    /// Builds a `Parse` error pointing at `token`.
    pub fn parse(reason: ParseErrorKind, token: &Token, production: Production) -> Self {
        ProtoError::Parse {
            reason,
            content: token.content.clone(),
            kind:    token.kind,
            line:    token.line,
            production,
        }
    }

    /// Line the error was reported at, if it came from the schema text.
    pub fn line(&self) -> Option<i64> {
        match self {
            ProtoError::Lex { line, .. } | ProtoError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Why a grammar decision point rejected its lookahead token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    UnexpectedToken,
    UnknownType,
    UnexpectedEof,
    DuplicateMessage,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ParseErrorKind::UnexpectedToken  => "Unexpected token",
            ParseErrorKind::UnknownType      => "Unknown type",
            ParseErrorKind::UnexpectedEof    => "Unexpected end of input",
            ParseErrorKind::DuplicateMessage => "Duplicate message",
        };
        f.write_str(text)
    }
}

/// Grammar rule being parsed when an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Production {
    Schema,
    Package,
    Message,
    Element,
    Type,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Production::Schema  => "schema",
            Production::Package => "package",
            Production::Message => "message",
            Production::Element => "element",
            Production::Type    => "type",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let token = Token {
            content: "Sub".into(),
            kind:    TokenKind::Identifier,
            line:    2,
        };
        let err = ProtoError::parse(ParseErrorKind::UnknownType, &token, Production::Type);
        assert_eq!(
            err.to_string(),
            "Unknown type <Sub>(identifier) in line 2 while parsing type"
        );
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_lex_error_message() {
        let err = ProtoError::Lex { remainder: "@ x".into(), line: 4 };
        assert_eq!(err.to_string(), "Invalid input \"@ x\" in line 4");
    }
}
