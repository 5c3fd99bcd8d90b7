//! Syntax tree produced by the parser and walked by the interpreter.
//!
//! Every node owns its children. Class definitions are the one place where
//! runtime data appears in the tree: the parser builds the `Class` up front so
//! base classes and constructor calls resolve at parse time.

use std::rc::Rc;

use crate::runtime::{Class, Value};

#[derive(Debug, PartialEq)]
pub enum Node {
    /// Number, string or boolean literal. The object is allocated once at
    /// parse time and every evaluation hands out the same shared handle.
    Constant(Value),
    None,
    VariableValue(Vec<String>),
    Binary {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<Node>,
    },
    Logical {
        op: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Comparison {
        op: Comparator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign {
        name: String,
        value: Box<Node>,
    },
    FieldAssign {
        object: Vec<String>,
        field: String,
        value: Box<Node>,
    },
    Compound(Vec<Node>),
    Print(Vec<Node>),
    MethodCall {
        object: Box<Node>,
        method: String,
        args: Vec<Node>,
    },
    NewInstance {
        class: Rc<Class>,
        args: Vec<Node>,
    },
    Stringify(Box<Node>),
    Return(Box<Node>),
    ClassDefinition(Rc<Class>),
    IfElse {
        condition: Box<Node>,
        then_body: Box<Node>,
        else_body: Option<Box<Node>>,
    },
}

impl Node {
    pub fn number(value: i64) -> Self {
        Node::Constant(Value::number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::Constant(Value::string(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Node::Constant(Value::boolean(value))
    }

    pub fn variable<S: Into<String>>(path: impl IntoIterator<Item = S>) -> Self {
        Node::VariableValue(path.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperator::Add => "addition",
            BinaryOperator::Sub => "subtraction",
            BinaryOperator::Mul => "multiplication",
            BinaryOperator::Div => "division",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Negate,
    Positive,
    Not,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Comparator {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, PartialEq)]
pub struct Program {
    pub statements: Vec<Node>,
}
