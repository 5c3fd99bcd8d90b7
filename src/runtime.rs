//! Runtime object model shared by the parser and the interpreter.
//!
//! Values are reference-counted handles over a closed set of object kinds.
//! Classes are built by the parser; instances and scopes live only while a
//! program runs.
pub mod class;
pub mod closure;
pub mod compare;
pub mod error;
pub mod value;

pub use class::{CallContext, Class, ClassInstance, Method};
pub use closure::Closure;
pub use error::RuntimeError;
pub use value::{Object, Value};
