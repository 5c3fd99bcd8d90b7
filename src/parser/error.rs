use thiserror::Error;

use crate::lexer::LexError;
use crate::runtime::RuntimeError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Expected {expected}, got {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Base class '{name}' is not declared (line {line})")]
    UndeclaredBaseClass { name: String, line: usize },
    #[error("Class '{name}' is already declared (line {line})")]
    DuplicateClass { name: String, line: usize },
    #[error("{source} (line {line})")]
    InvalidClass {
        #[source]
        source: RuntimeError,
        line: usize,
    },
    #[error("'{name}' is not a class; free functions are not supported (line {line})")]
    NotCallable { name: String, line: usize },
    #[error("str() takes exactly one argument, got {found} (line {line})")]
    StrArity { found: usize, line: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;
