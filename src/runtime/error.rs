use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("'{name}' is not a class instance, got {type_name}")]
    NotAnInstance { name: String, type_name: String },
    #[error("Operation '{operation}' is not supported for types {left} and {right}")]
    UnsupportedOperands {
        operation: String,
        left: String,
        right: String,
    },
    #[error("Operation '{operation}' is not supported for type {type_name}")]
    UnsupportedOperand {
        operation: String,
        type_name: String,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Class {class} has no method '{method}'")]
    UndefinedMethod { class: String, method: String },
    #[error("Method {class}.{method} expected {expected} arguments, got {found}")]
    MethodArityMismatch {
        class: String,
        method: String,
        expected: usize,
        found: usize,
    },
    #[error("Cannot call method '{method}' on type {type_name}")]
    MethodOnNonInstance { method: String, type_name: String },
    #[error("Cannot compare {left} and {right} for {operation}")]
    CannotCompare {
        operation: String,
        left: String,
        right: String,
    },
    #[error("Class {class} has duplicate method '{method}'")]
    DuplicateMethod { class: String, method: String },
    #[error("Failed to write output: {message}")]
    Output { message: String },
}

impl RuntimeError {
    pub(crate) fn expect_method_arity(
        class: &str,
        method: &str,
        expected: usize,
        found: usize,
    ) -> Result<(), RuntimeError> {
        if expected == found {
            Ok(())
        } else {
            Err(RuntimeError::MethodArityMismatch {
                class: class.to_string(),
                method: method.to_string(),
                expected,
                found,
            })
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(error: std::io::Error) -> Self {
        RuntimeError::Output {
            message: error.to_string(),
        }
    }
}
