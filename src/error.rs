use thiserror::Error;

use crate::lexer::LexError;
use crate::parser::ParseError;
use crate::runtime::RuntimeError;

/// Any failure from running a program end to end.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Lexing and parsing failures happen before any statement runs.
    pub fn is_frontend(&self) -> bool {
        matches!(self, Error::Lex(_) | Error::Parse(_))
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Lex(error) => Error::Lex(error),
            other => Error::Parse(other),
        }
    }
}
