//! Ordering and equality between runtime values.
//!
//! Only `less` and `equal` inspect operands. The other relations are built
//! from those two, so a user class gets all six comparison operators by
//! defining `__lt__` and `__eq__`.

use std::cmp::Ordering;

use crate::parser::ast::Comparator;
use crate::runtime::class::CallContext;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{Object, Value};

fn compare_primitives(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    match (lhs.object()?, rhs.object()?) {
        (Object::Bool(a), Object::Bool(b)) => Some(a.cmp(b)),
        (Object::Number(a), Object::Number(b)) => Some(a.cmp(b)),
        (Object::String(a), Object::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn call_dunder(
    lhs: &Value,
    rhs: &Value,
    method: &str,
    context: &mut dyn CallContext,
) -> Result<Option<bool>, RuntimeError> {
    match lhs.as_instance() {
        Some(instance) if instance.has_method(method, 1) => {
            let result = context.call_method(lhs, method, vec![rhs.clone()])?;
            Ok(Some(result.is_truthy()))
        }
        _ => Ok(None),
    }
}

fn cannot_compare(operation: &str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::CannotCompare {
        operation: operation.to_string(),
        left: lhs.type_name().to_string(),
        right: rhs.type_name().to_string(),
    }
}

pub fn less(lhs: &Value, rhs: &Value, context: &mut dyn CallContext) -> Result<bool, RuntimeError> {
    if let Some(ordering) = compare_primitives(lhs, rhs) {
        return Ok(ordering == Ordering::Less);
    }
    if let Some(result) = call_dunder(lhs, rhs, "__lt__", context)? {
        return Ok(result);
    }
    Err(cannot_compare("less", lhs, rhs))
}

pub fn equal(lhs: &Value, rhs: &Value, context: &mut dyn CallContext) -> Result<bool, RuntimeError> {
    if let Some(ordering) = compare_primitives(lhs, rhs) {
        return Ok(ordering == Ordering::Equal);
    }
    if let Some(result) = call_dunder(lhs, rhs, "__eq__", context)? {
        return Ok(result);
    }
    if lhs.is_none() && rhs.is_none() {
        return Ok(true);
    }
    Err(cannot_compare("equality", lhs, rhs))
}

pub fn not_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn CallContext,
) -> Result<bool, RuntimeError> {
    Ok(!equal(lhs, rhs, context)?)
}

pub fn greater(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn CallContext,
) -> Result<bool, RuntimeError> {
    Ok(!less(lhs, rhs, context)? && !equal(lhs, rhs, context)?)
}

pub fn less_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn CallContext,
) -> Result<bool, RuntimeError> {
    Ok(less(lhs, rhs, context)? || equal(lhs, rhs, context)?)
}

pub fn greater_or_equal(
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn CallContext,
) -> Result<bool, RuntimeError> {
    Ok(!less(lhs, rhs, context)?)
}

pub fn compare(
    op: Comparator,
    lhs: &Value,
    rhs: &Value,
    context: &mut dyn CallContext,
) -> Result<bool, RuntimeError> {
    match op {
        Comparator::Less => less(lhs, rhs, context),
        Comparator::LessEqual => less_or_equal(lhs, rhs, context),
        Comparator::Greater => greater(lhs, rhs, context),
        Comparator::GreaterEqual => greater_or_equal(lhs, rhs, context),
        Comparator::Equal => equal(lhs, rhs, context),
        Comparator::NotEqual => not_equal(lhs, rhs, context),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Context for values that never reach user methods.
    struct NoMethods;

    impl CallContext for NoMethods {
        fn call_method(
            &mut self,
            _receiver: &Value,
            method: &str,
            _args: Vec<Value>,
        ) -> Result<Value, RuntimeError> {
            panic!("unexpected call to {method}");
        }
    }

    fn string(text: &str) -> Value {
        Value::string(text.to_string())
    }

    #[test]
    fn orders_primitives_of_the_same_kind() {
        let cx = &mut NoMethods;
        assert!(less(&Value::number(1), &Value::number(2), cx).expect("numbers"));
        assert!(!less(&Value::number(2), &Value::number(2), cx).expect("numbers"));
        assert!(less(&string("abc"), &string("abd"), cx).expect("strings"));
        assert!(less(&Value::boolean(false), &Value::boolean(true), cx).expect("bools"));
    }

    #[test]
    fn equality_holds_for_every_primitive_kind() {
        let cx = &mut NoMethods;
        for value in [
            Value::number(5),
            string("x"),
            Value::boolean(true),
            Value::none(),
        ] {
            assert!(equal(&value, &value, cx).expect("comparable"));
            assert!(!not_equal(&value, &value, cx).expect("comparable"));
        }
    }

    #[test]
    fn derives_remaining_relations() {
        let cx = &mut NoMethods;
        let (one, two) = (Value::number(1), Value::number(2));
        let cases = [
            (Comparator::Less, true, false, false),
            (Comparator::LessEqual, true, true, false),
            (Comparator::Greater, false, false, true),
            (Comparator::GreaterEqual, false, true, true),
            (Comparator::Equal, false, true, false),
            (Comparator::NotEqual, true, false, true),
        ];
        for (op, lt, eq, gt) in cases {
            assert_eq!(compare(op, &one, &two, cx).expect("compare"), lt, "{op:?} 1 2");
            assert_eq!(compare(op, &two, &two, cx).expect("compare"), eq, "{op:?} 2 2");
            assert_eq!(compare(op, &two, &one, cx).expect("compare"), gt, "{op:?} 2 1");
        }
    }

    #[test]
    fn mixed_kinds_cannot_be_compared() {
        let cx = &mut NoMethods;
        let err = less(&Value::number(1), &string("1"), cx).expect_err("mixed kinds");
        assert_eq!(
            err,
            RuntimeError::CannotCompare {
                operation: "less".to_string(),
                left: "int".to_string(),
                right: "str".to_string(),
            }
        );
        assert!(equal(&Value::boolean(true), &Value::number(1), cx).is_err());
        assert!(less(&Value::none(), &Value::none(), cx).is_err());
        assert!(equal(&Value::none(), &Value::number(0), cx).is_err());
    }
}
