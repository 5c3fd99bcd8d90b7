use std::io::Write;

use log::debug;

use crate::parser::ast::Program;
use crate::runtime::{CallContext, Closure, RuntimeError, Value};

mod runtime;

pub use runtime::Completion;

/// AST-walking interpreter.
///
/// Printed output goes to the sink given at construction; nothing is written
/// to process-wide stdout directly, so callers can capture it.
pub struct Interpreter<'w> {
    output: &'w mut dyn Write,
}

impl<'w> Interpreter<'w> {
    pub fn new(output: &'w mut dyn Write) -> Self {
        Self { output }
    }

    /// Runs a program against a fresh global scope and returns that scope.
    ///
    /// A top-level `return` ends the program early without an error.
    pub fn run(&mut self, program: &Program) -> Result<Closure, RuntimeError> {
        // Execution pipeline:
        // run -> exec_block (top-level statements) -> eval
        // -> call_method -> eval (method body).
        let mut globals = Closure::new();
        debug!("running {} top-level statements", program.statements.len());
        if let Completion::Return(value) = self.exec_block(&program.statements, &mut globals)? {
            debug!("program returned early with {value}");
        }
        self.output.flush()?;
        Ok(globals)
    }

    /// Text form used by `print` and `str()`. Instances with a zero-argument
    /// `__str__` render through it.
    pub fn render(&mut self, value: &Value) -> Result<String, RuntimeError> {
        match value.as_instance() {
            Some(instance) if instance.has_method("__str__", 0) => {
                let rendered = self.call_method(value, "__str__", Vec::new())?;
                self.render(&rendered)
            }
            _ => Ok(value.to_string()),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), RuntimeError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

impl CallContext for Interpreter<'_> {
    fn call_method(
        &mut self,
        receiver: &Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        self.invoke(receiver, method, args)
    }
}

#[cfg(test)]
mod tests;
