use std::rc::Rc;

use log::debug;
use rustc_hash::FxHashMap;

use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::runtime::{Class, Method};

pub mod ast;
pub mod error;

pub use error::{ParseError, ParseResult};

use ast::{BinaryOperator, Comparator, LogicalOperator, Node, Program, UnaryOperator};

/// Name of the built-in string conversion, parsed into `Node::Stringify`.
const STR: &str = "str";

/// Recursive-descent parser with one token of lookahead.
///
/// Tokens are pulled from the lexer on demand. Classes are registered as soon
/// as their definition is parsed, so later code can inherit from them and
/// call their constructors.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    classes: FxHashMap<String, Rc<Class>>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> ParseResult<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            classes: FxHashMap::default(),
        })
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !matches!(self.current.kind, TokenKind::EOF) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Node> {
        match self.current.kind {
            TokenKind::Class => self.parse_class_definition(),
            TokenKind::If => self.parse_if(),
            _ => {
                let statement = self.parse_simple_statement()?;
                self.consume(TokenKind::Newline)?;
                Ok(statement)
            }
        }
    }

    fn parse_class_definition(&mut self) -> ParseResult<Node> {
        let line = self.current.span.line;
        self.consume(TokenKind::Class)?;
        let name = self.expect_identifier()?;

        let parent = if matches!(self.current.kind, TokenKind::LParen) {
            self.advance()?;
            let base = self.expect_identifier()?;
            self.consume(TokenKind::RParen)?;
            let class = self
                .classes
                .get(&base)
                .cloned()
                .ok_or(ParseError::UndeclaredBaseClass { name: base, line })?;
            Some(class)
        } else {
            None
        };

        self.consume(TokenKind::Colon)?;
        self.consume(TokenKind::Newline)?;
        self.consume(TokenKind::Indent)?;
        let mut methods = Vec::new();
        while matches!(self.current.kind, TokenKind::Def) {
            methods.push(self.parse_method()?);
        }
        self.consume(TokenKind::Dedent)?;

        if self.classes.contains_key(&name) {
            return Err(ParseError::DuplicateClass { name, line });
        }
        let class = Class::new(name.clone(), methods, parent)
            .map_err(|source| ParseError::InvalidClass { source, line })?;
        let class = Rc::new(class);
        debug!(
            "declared class {name} (parent: {})",
            class.parent().map_or("none", |parent| parent.name())
        );
        self.classes.insert(name, Rc::clone(&class));
        Ok(Node::ClassDefinition(class))
    }

    fn parse_method(&mut self) -> ParseResult<Method> {
        self.consume(TokenKind::Def)?;
        let name = self.expect_identifier()?;
        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !matches!(self.current.kind, TokenKind::RParen) {
            params.push(self.expect_identifier()?);
            while matches!(self.current.kind, TokenKind::Comma) {
                self.advance()?;
                params.push(self.expect_identifier()?);
            }
        }
        self.consume(TokenKind::RParen)?;
        self.consume(TokenKind::Colon)?;
        let body = self.parse_block()?;
        Ok(Method { name, params, body })
    }

    fn parse_if(&mut self) -> ParseResult<Node> {
        self.consume(TokenKind::If)?;
        let condition = self.parse_logical()?;
        self.consume(TokenKind::Colon)?;
        let then_body = self.parse_block()?;
        let else_body = if matches!(self.current.kind, TokenKind::Else) {
            self.advance()?;
            self.consume(TokenKind::Colon)?;
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };
        Ok(Node::IfElse {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Node> {
        self.consume(TokenKind::Newline)?;
        self.consume(TokenKind::Indent)?;
        let mut body = Vec::new();
        while !matches!(self.current.kind, TokenKind::Dedent | TokenKind::EOF) {
            body.push(self.parse_statement()?);
        }
        self.consume(TokenKind::Dedent)?;
        Ok(Node::Compound(body))
    }

    fn parse_simple_statement(&mut self) -> ParseResult<Node> {
        match self.current.kind {
            TokenKind::Return => {
                self.advance()?;
                Ok(Node::Return(Box::new(self.parse_logical()?)))
            }
            TokenKind::Print => {
                self.advance()?;
                if matches!(self.current.kind, TokenKind::Newline) {
                    return Ok(Node::Print(Vec::new()));
                }
                Ok(Node::Print(self.parse_call_args()?))
            }
            _ => self.parse_assignment_or_call(),
        }
    }

    fn parse_assignment_or_call(&mut self) -> ParseResult<Node> {
        let span = self.current.span;
        let mut path = self.parse_dotted_path()?;
        // Non-empty by construction.
        let name = path.pop().unwrap_or_default();

        if matches!(self.current.kind, TokenKind::Equal) {
            self.advance()?;
            let value = Box::new(self.parse_logical()?);
            return Ok(if path.is_empty() {
                Node::Assign { name, value }
            } else {
                Node::FieldAssign {
                    object: path,
                    field: name,
                    value,
                }
            });
        }

        let args = self.parse_call_args()?;
        let call = self.build_call(path, name, args, span)?;
        self.parse_method_chain(call)
    }

    /// `receiver.m(args).n(args)...` after a call or parenthesized expression.
    fn parse_method_chain(&mut self, mut receiver: Node) -> ParseResult<Node> {
        while matches!(self.current.kind, TokenKind::Dot) {
            self.advance()?;
            let method = self.expect_identifier()?;
            let args = self.parse_call_args()?;
            receiver = Node::MethodCall {
                object: Box::new(receiver),
                method,
                args,
            };
        }
        Ok(receiver)
    }

    fn parse_dotted_path(&mut self) -> ParseResult<Vec<String>> {
        let mut path = vec![self.expect_identifier()?];
        while matches!(self.current.kind, TokenKind::Dot) {
            self.advance()?;
            path.push(self.expect_identifier()?);
        }
        Ok(path)
    }

    fn parse_call_args(&mut self) -> ParseResult<Vec<Node>> {
        self.consume(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.current.kind, TokenKind::RParen) {
            args.push(self.parse_logical()?);
            while matches!(self.current.kind, TokenKind::Comma) {
                self.advance()?;
                args.push(self.parse_logical()?);
            }
        }
        self.consume(TokenKind::RParen)?;
        Ok(args)
    }

    /// `a.b.m(args)` calls `m` on `a.b`. A bare `Name(args)` constructs a
    /// declared class, and `str(x)` converts to a string.
    fn build_call(
        &self,
        object: Vec<String>,
        name: String,
        args: Vec<Node>,
        span: Span,
    ) -> ParseResult<Node> {
        if !object.is_empty() {
            return Ok(Node::MethodCall {
                object: Box::new(Node::VariableValue(object)),
                method: name,
                args,
            });
        }
        if let Some(class) = self.classes.get(&name) {
            return Ok(Node::NewInstance {
                class: Rc::clone(class),
                args,
            });
        }
        if name == STR {
            let [arg]: [Node; 1] = args.try_into().map_err(|args: Vec<Node>| {
                ParseError::StrArity {
                    found: args.len(),
                    line: span.line,
                }
            })?;
            return Ok(Node::Stringify(Box::new(arg)));
        }
        Err(ParseError::NotCallable {
            name,
            line: span.line,
        })
    }

    fn parse_logical(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_and()?;
        while matches!(self.current.kind, TokenKind::Or) {
            self.advance()?;
            let right = self.parse_and()?;
            expr = Node::Logical {
                op: LogicalOperator::Or,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_not()?;
        while matches!(self.current.kind, TokenKind::And) {
            self.advance()?;
            let right = self.parse_not()?;
            expr = Node::Logical {
                op: LogicalOperator::And,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_not(&mut self) -> ParseResult<Node> {
        if matches!(self.current.kind, TokenKind::Not) {
            self.advance()?;
            let operand = self.parse_not()?;
            return Ok(Node::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Node> {
        let left = self.parse_expression()?;
        let op = match self.current.kind {
            TokenKind::Less => Comparator::Less,
            TokenKind::LessEqual => Comparator::LessEqual,
            TokenKind::Greater => Comparator::Greater,
            TokenKind::GreaterEqual => Comparator::GreaterEqual,
            TokenKind::EqualEqual => Comparator::Equal,
            TokenKind::NotEqual => Comparator::NotEqual,
            _ => return Ok(left),
        };
        self.advance()?;
        let right = self.parse_expression()?;
        Ok(Node::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_expression(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_term()?;
            expr = Node::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_factor()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_factor()?;
            expr = Node::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_factor(&mut self) -> ParseResult<Node> {
        let span = self.current.span;
        match &self.current.kind {
            TokenKind::Plus | TokenKind::Minus => {
                let op = if matches!(self.current.kind, TokenKind::Plus) {
                    UnaryOperator::Positive
                } else {
                    UnaryOperator::Negate
                };
                self.advance()?;
                let operand = self.parse_factor()?;
                Ok(Node::Unary {
                    op,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Integer(value) => {
                let value = *value;
                self.advance()?;
                Ok(Node::number(value))
            }
            TokenKind::String(text) => {
                let text = text.to_string();
                self.advance()?;
                Ok(Node::string(text))
            }
            TokenKind::True | TokenKind::False => {
                let value = matches!(self.current.kind, TokenKind::True);
                self.advance()?;
                Ok(Node::boolean(value))
            }
            TokenKind::None => {
                self.advance()?;
                Ok(Node::None)
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_logical()?;
                self.consume(TokenKind::RParen)?;
                self.parse_method_chain(expr)
            }
            TokenKind::Identifier(_) => {
                let mut path = self.parse_dotted_path()?;
                if !matches!(self.current.kind, TokenKind::LParen) {
                    return Ok(Node::VariableValue(path));
                }
                let name = path.pop().unwrap_or_default();
                let args = self.parse_call_args()?;
                let call = self.build_call(path, name, args, span)?;
                self.parse_method_chain(call)
            }
            _ => Err(self.error("expression")),
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        if let TokenKind::Identifier(name) = self.current.kind {
            let name = name.to_string();
            self.advance()?;
            Ok(name)
        } else {
            Err(self.error("identifier"))
        }
    }

    fn consume(&mut self, expected: TokenKind<'static>) -> ParseResult<Token<'a>> {
        if self.current.kind == expected {
            self.advance()
        } else {
            Err(self.error(&expected.to_string()))
        }
    }

    fn advance(&mut self) -> ParseResult<Token<'a>> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn error(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.current.kind.to_string(),
            line: self.current.span.line,
            column: self.current.span.column,
        }
    }
}

pub fn parse(input: &str) -> ParseResult<Program> {
    Parser::new(input)?.parse_program()
}
