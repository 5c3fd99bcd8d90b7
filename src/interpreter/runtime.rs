use std::rc::Rc;

use log::debug;

use crate::parser::ast::{BinaryOperator, LogicalOperator, Node, UnaryOperator};
use crate::runtime::class::RECEIVER;
use crate::runtime::closure::expect_instance;
use crate::runtime::compare;
use crate::runtime::{ClassInstance, Closure, RuntimeError, Value};

use super::Interpreter;

/// Outcome of evaluating a node.
///
/// `Return` is not an error: it carries the returned value up through the
/// enclosing blocks until the method call that owns them.
#[derive(Debug)]
pub enum Completion {
    Normal(Value),
    Return(Value),
}

/// Unwraps a normal completion, or hands an early return straight back to
/// the caller.
macro_rules! value {
    ($completion:expr) => {
        match $completion? {
            Completion::Normal(value) => value,
            Completion::Return(value) => return Ok(Completion::Return(value)),
        }
    };
}

impl Interpreter<'_> {
    pub(super) fn exec_block(
        &mut self,
        body: &[Node],
        closure: &mut Closure,
    ) -> Result<Completion, RuntimeError> {
        // Execute statements in order until one returns, then bubble that up.
        for statement in body {
            value!(self.eval(statement, closure));
        }
        Ok(Completion::Normal(Value::none()))
    }

    pub fn eval(&mut self, node: &Node, closure: &mut Closure) -> Result<Completion, RuntimeError> {
        let value = match node {
            Node::Constant(value) => value.clone(),
            Node::None => Value::none(),
            Node::VariableValue(path) => closure.lookup(path)?,
            Node::Binary { op, left, right } => {
                let left = value!(self.eval(left, closure));
                let right = value!(self.eval(right, closure));
                binary(*op, &left, &right)?
            }
            Node::Unary { op, operand } => {
                let operand = value!(self.eval(operand, closure));
                unary(*op, &operand)?
            }
            Node::Logical { op, left, right } => {
                // Both sides are always evaluated.
                let left = value!(self.eval(left, closure)).is_truthy();
                let right = value!(self.eval(right, closure)).is_truthy();
                Value::boolean(match op {
                    LogicalOperator::And => left && right,
                    LogicalOperator::Or => left || right,
                })
            }
            Node::Comparison { op, left, right } => {
                let left = value!(self.eval(left, closure));
                let right = value!(self.eval(right, closure));
                Value::boolean(compare::compare(*op, &left, &right, self)?)
            }
            Node::Assign { name, value } => {
                let value = value!(self.eval(value, closure));
                closure.insert(name.clone(), value.clone());
                value
            }
            Node::FieldAssign {
                object,
                field,
                value,
            } => {
                let value = value!(self.eval(value, closure));
                let target = closure.lookup(object)?;
                expect_instance(&target, object)?
                    .fields_mut()
                    .insert(field.clone(), value.clone());
                value
            }
            Node::Compound(body) => return self.exec_block(body, closure),
            Node::Print(args) => {
                let mut rendered = Vec::with_capacity(args.len());
                for arg in args {
                    let value = value!(self.eval(arg, closure));
                    rendered.push(self.render(&value)?);
                }
                self.write_line(&rendered.join(" "))?;
                Value::none()
            }
            Node::MethodCall {
                object,
                method,
                args,
            } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(value!(self.eval(arg, closure)));
                }
                let receiver = value!(self.eval(object, closure));
                self.invoke(&receiver, method, values)?
            }
            Node::NewInstance { class, args } => {
                debug!("creating instance of {}", class.name());
                let instance = Value::instance(ClassInstance::new(Rc::clone(class)));
                if class.method("__init__").is_some() {
                    let mut values = Vec::with_capacity(args.len());
                    for arg in args {
                        values.push(value!(self.eval(arg, closure)));
                    }
                    self.invoke(&instance, "__init__", values)?;
                }
                instance
            }
            Node::Stringify(operand) => {
                let operand = value!(self.eval(operand, closure));
                Value::string(self.render(&operand)?)
            }
            Node::Return(value) => {
                let value = value!(self.eval(value, closure));
                return Ok(Completion::Return(value));
            }
            Node::ClassDefinition(class) => {
                closure.insert(class.name(), Value::class(Rc::clone(class)));
                Value::none()
            }
            Node::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                let condition = value!(self.eval(condition, closure));
                if condition.is_truthy() {
                    value!(self.eval(then_body, closure));
                } else if let Some(else_body) = else_body {
                    value!(self.eval(else_body, closure));
                }
                Value::none()
            }
        };
        Ok(Completion::Normal(value))
    }

    /// Dispatches `method` on an instance with a fresh local scope.
    ///
    /// The scope binds `self` to the receiver and each explicit parameter to
    /// its argument. The caller's scope is not visible inside the body.
    pub(super) fn invoke(
        &mut self,
        receiver: &Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let instance = receiver
            .as_instance()
            .ok_or_else(|| RuntimeError::MethodOnNonInstance {
                method: method.to_string(),
                type_name: receiver.type_name().to_string(),
            })?;
        let class = Rc::clone(instance.class());
        let target = class
            .method(method)
            .ok_or_else(|| RuntimeError::UndefinedMethod {
                class: class.name().to_string(),
                method: method.to_string(),
            })?;
        RuntimeError::expect_method_arity(class.name(), method, target.arity(), args.len())?;
        debug!("calling {}.{method} with {} argument(s)", class.name(), args.len());

        let mut locals = Closure::new();
        locals.insert(RECEIVER, receiver.clone());
        for (param, arg) in target.explicit_params().iter().zip(args) {
            locals.insert(param.clone(), arg);
        }
        match self.eval(&target.body, &mut locals)? {
            Completion::Return(value) => Ok(value),
            Completion::Normal(_) => Ok(Value::none()),
        }
    }
}

fn binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    if let (BinaryOperator::Add, Some(left), Some(right)) = (op, left.as_str(), right.as_str()) {
        return Ok(Value::string(format!("{left}{right}")));
    }

    let (Some(lhs), Some(rhs)) = (left.as_number(), right.as_number()) else {
        return Err(RuntimeError::UnsupportedOperands {
            operation: op.name().to_string(),
            left: left.type_name().to_string(),
            right: right.type_name().to_string(),
        });
    };
    let result = match op {
        BinaryOperator::Add => lhs.wrapping_add(rhs),
        BinaryOperator::Sub => lhs.wrapping_sub(rhs),
        BinaryOperator::Mul => lhs.wrapping_mul(rhs),
        BinaryOperator::Div => {
            if rhs == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
    };
    Ok(Value::number(result))
}

fn unary(op: UnaryOperator, operand: &Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOperator::Not => Ok(Value::boolean(!operand.is_truthy())),
        UnaryOperator::Negate | UnaryOperator::Positive => {
            let value = operand
                .as_number()
                .ok_or_else(|| RuntimeError::UnsupportedOperand {
                    operation: match op {
                        UnaryOperator::Negate => "negation",
                        _ => "unary plus",
                    }
                    .to_string(),
                    type_name: operand.type_name().to_string(),
                })?;
            Ok(Value::number(match op {
                UnaryOperator::Negate => value.wrapping_neg(),
                _ => value,
            }))
        }
    }
}
