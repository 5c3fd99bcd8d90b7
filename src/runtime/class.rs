use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::parser::ast::Node;
use crate::runtime::closure::Closure;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

/// Name under which a method sees the instance it was called on.
pub const RECEIVER: &str = "self";

/// Callback used by runtime code that needs to run user methods, such as
/// comparisons falling back to `__lt__` and `__eq__`.
pub trait CallContext {
    fn call_method(
        &mut self,
        receiver: &Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

#[derive(Debug, PartialEq)]
pub struct Method {
    pub name: String,
    pub params: Vec<String>,
    pub body: Node,
}

impl Method {
    /// A leading `self` parameter is the receiver slot, filled by dispatch
    /// rather than by the caller's arguments.
    pub fn takes_receiver(&self) -> bool {
        self.params.first().is_some_and(|param| param == RECEIVER)
    }

    /// Parameters the caller has to supply.
    pub fn explicit_params(&self) -> &[String] {
        if self.takes_receiver() {
            &self.params[1..]
        } else {
            &self.params
        }
    }

    pub fn arity(&self) -> usize {
        self.explicit_params().len()
    }
}

/// User-defined class. Immutable once built.
#[derive(Debug, PartialEq)]
pub struct Class {
    name: String,
    parent: Option<Rc<Class>>,
    methods: FxHashMap<String, Method>,
}

impl Class {
    pub fn new(
        name: String,
        methods: Vec<Method>,
        parent: Option<Rc<Class>>,
    ) -> Result<Self, RuntimeError> {
        let mut table = FxHashMap::default();
        for method in methods {
            if table.contains_key(&method.name) {
                return Err(RuntimeError::DuplicateMethod {
                    class: name,
                    method: method.name,
                });
            }
            table.insert(method.name.clone(), method);
        }
        Ok(Self {
            name,
            parent,
            methods: table,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }

    /// Finds a method on this class or the nearest ancestor defining it.
    pub fn method(&self, name: &str) -> Option<&Method> {
        let mut class = self;
        loop {
            if let Some(method) = class.methods.get(name) {
                return Some(method);
            }
            class = class.parent.as_deref()?;
        }
    }
}

/// Object created from a class. Owns its field scope for its whole lifetime.
#[derive(Debug)]
pub struct ClassInstance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl ClassInstance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    pub fn has_method(&self, name: &str, arity: usize) -> bool {
        self.class
            .method(name)
            .is_some_and(|method| method.arity() == arity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: &[&str], result: i64) -> Method {
        Method {
            name: name.to_string(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body: Node::Return(Box::new(Node::number(result))),
        }
    }

    #[test]
    fn looks_up_methods_through_parents() {
        let base = Rc::new(
            Class::new(
                "A".to_string(),
                vec![method("f", &[], 1), method("g", &[], 10)],
                None,
            )
            .expect("base class"),
        );
        let derived =
            Class::new("B".to_string(), vec![method("f", &[], 2)], Some(base.clone()))
                .expect("derived class");

        assert_eq!(
            derived.method("f").map(|m| &m.body),
            Some(&Node::Return(Box::new(Node::number(2))))
        );
        assert_eq!(derived.method("g").map(|m| m.name.as_str()), Some("g"));
        assert!(derived.method("h").is_none());
        assert_eq!(derived.parent().map(|p| p.name()), Some("A"));
    }

    #[test]
    fn rejects_duplicate_methods() {
        let err = Class::new(
            "A".to_string(),
            vec![method("f", &[], 1), method("f", &["x"], 2)],
            None,
        )
        .expect_err("duplicate method");
        assert_eq!(
            err,
            RuntimeError::DuplicateMethod {
                class: "A".to_string(),
                method: "f".to_string(),
            }
        );
    }

    #[test]
    fn receiver_parameter_does_not_count_toward_arity() {
        assert_eq!(method("__init__", &["self", "v"], 0).arity(), 1);
        assert_eq!(method("f", &["a", "b"], 0).arity(), 2);
        assert_eq!(method("g", &[], 0).arity(), 0);

        let class = Rc::new(
            Class::new("C".to_string(), vec![method("__eq__", &["self", "other"], 0)], None)
                .expect("class"),
        );
        let instance = ClassInstance::new(class);
        assert!(instance.has_method("__eq__", 1));
        assert!(!instance.has_method("__eq__", 2));
        assert!(!instance.has_method("__lt__", 1));
    }
}
