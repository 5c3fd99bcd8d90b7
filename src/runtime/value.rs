use std::fmt;
use std::rc::Rc;

use crate::runtime::class::{Class, ClassInstance};

/// Heap object behind a [`Value`].
#[derive(Debug)]
pub enum Object {
    Number(i64),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(ClassInstance),
}

impl Object {
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Number(_) => "int",
            Object::String(_) => "str",
            Object::Bool(_) => "bool",
            Object::Class(_) => "class",
            Object::Instance(_) => "instance",
        }
    }
}

/// Host-level equality used to compare syntax trees. Primitives compare by
/// value, classes and instances by identity.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Number(a), Object::Number(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Class(a), Object::Class(b)) => Rc::ptr_eq(a, b),
            (Object::Instance(a), Object::Instance(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

/// Reference-counted handle to a runtime object, or no value at all.
///
/// Cloning a handle shares the object. Literal nodes rely on this to hand out
/// the same constant on every evaluation instead of allocating a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Value(Option<Rc<Object>>);

impl Value {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn from_object(object: Object) -> Self {
        Self(Some(Rc::new(object)))
    }

    pub fn number(value: i64) -> Self {
        Self::from_object(Object::Number(value))
    }

    pub fn string(value: String) -> Self {
        Self::from_object(Object::String(value))
    }

    pub fn boolean(value: bool) -> Self {
        Self::from_object(Object::Bool(value))
    }

    pub fn class(class: Rc<Class>) -> Self {
        Self::from_object(Object::Class(class))
    }

    pub fn instance(instance: ClassInstance) -> Self {
        Self::from_object(Object::Instance(instance))
    }

    pub fn object(&self) -> Option<&Object> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_number(&self) -> Option<i64> {
        match self.object()? {
            Object::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.object()? {
            Object::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.object()? {
            Object::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&ClassInstance> {
        match self.object()? {
            Object::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// True when both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self.object() {
            None => false,
            Some(Object::Number(value)) => *value != 0,
            Some(Object::String(value)) => !value.is_empty(),
            Some(Object::Bool(value)) => *value,
            Some(Object::Class(_) | Object::Instance(_)) => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.object().map_or("NoneType", Object::type_name)
    }
}

/// Plain text form of a value. Instances render as their address;
/// the interpreter consults a user `__str__` before falling back to this.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("None"),
            Some(object) => match object.as_ref() {
                Object::Number(value) => write!(f, "{value}"),
                Object::String(value) => f.write_str(value),
                Object::Bool(true) => f.write_str("True"),
                Object::Bool(false) => f.write_str("False"),
                Object::Class(class) => write!(f, "Class name {}", class.name()),
                Object::Instance(_) => write!(f, "{:p}", Rc::as_ptr(object)),
            },
        }
    }
}
