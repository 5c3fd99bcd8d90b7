use std::io::Write;

pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use error::Error;
pub use interpreter::Interpreter;
pub use runtime::{Closure, RuntimeError, Value};

/// Parses and runs `source`, printing to `output`. Returns the final global
/// scope.
pub fn run_source(source: &str, output: &mut dyn Write) -> Result<Closure, Error> {
    let program = parser::parse(source)?;
    let globals = Interpreter::new(output).run(&program)?;
    Ok(globals)
}
