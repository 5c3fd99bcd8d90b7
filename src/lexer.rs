use std::borrow::Cow;

use log::trace;

pub mod error;
pub mod reader;
pub mod token;

pub use error::{LexError, LexResult};
pub use token::{Span, Token, TokenKind};

use reader::{Reader, Symbol};

/// Pull-based tokenizer. Produces one token per call and keeps no history.
///
/// Indentation changes are reported one step at a time: a line that closes
/// three blocks yields three `Dedent` tokens over three calls.
pub struct Lexer<'a> {
    reader: Reader<'a>,
    indent: usize,
    started: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            reader: Reader::new(input),
            indent: 0,
            started: false,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        if !self.started {
            self.started = true;
            self.reader.advance_line()?;
        }
        let token = self.scan()?;
        trace!("token {:?} at {}", token.kind, token.span);
        Ok(token)
    }

    fn scan(&mut self) -> LexResult<Token<'a>> {
        let level = self.reader.indent();
        if self.indent < level {
            self.indent += 1;
            return Ok(Token::new(TokenKind::Indent, self.reader.span()));
        }
        if self.indent > level {
            self.indent -= 1;
            return Ok(Token::new(TokenKind::Dedent, self.reader.span()));
        }

        loop {
            let span = self.reader.span();
            match self.reader.peek() {
                Symbol::Eof => return Ok(Token::new(TokenKind::EOF, span)),
                Symbol::EndOfLine => {
                    self.reader.advance_line()?;
                    return Ok(Token::new(TokenKind::Newline, span));
                }
                Symbol::Char(c) if c.is_whitespace() => {
                    self.reader.bump();
                }
                Symbol::Char(c) if c.is_ascii_digit() => return self.read_integer(span),
                Symbol::Char(c) if c.is_alphabetic() || c == '_' => {
                    return Ok(self.read_identifier(span));
                }
                Symbol::Char(quote @ ('"' | '\'')) => return self.read_string(quote, span),
                Symbol::Char(c) => return self.read_operator(c, span),
            }
        }
    }

    fn read_identifier(&mut self, span: Span) -> Token<'a> {
        let start = self.reader.position();
        while let Symbol::Char(c) = self.reader.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.reader.bump();
            } else {
                break;
            }
        }
        let ident = self.reader.slice(start, self.reader.position());
        Token::new(TokenKind::keyword(ident), span)
    }

    fn read_integer(&mut self, span: Span) -> LexResult<Token<'a>> {
        let start = self.reader.position();
        while let Symbol::Char(c) = self.reader.peek() {
            if c.is_ascii_digit() {
                self.reader.bump();
            } else {
                break;
            }
        }
        let literal = self.reader.slice(start, self.reader.position());
        let value = literal
            .parse::<i64>()
            .map_err(|_| LexError::InvalidIntegerLiteral {
                literal: literal.to_string(),
                line: span.line,
                column: span.column,
            })?;
        Ok(Token::new(TokenKind::Integer(value), span))
    }

    fn read_string(&mut self, quote: char, span: Span) -> LexResult<Token<'a>> {
        self.reader.bump(); // Opening quote
        let start = self.reader.position();
        // Stays borrowed from the source until the first escape sequence.
        let mut owned: Option<String> = None;
        loop {
            let position = self.reader.position();
            match self.reader.bump() {
                Symbol::Char(c) if c == quote => {
                    let text = match owned {
                        Some(text) => Cow::Owned(text),
                        None => Cow::Borrowed(self.reader.slice(start, position)),
                    };
                    return Ok(Token::new(TokenKind::String(text), span));
                }
                Symbol::Char('\\') => {
                    let escaped = match self.reader.bump() {
                        Symbol::Char('n') => '\n',
                        Symbol::Char('t') => '\t',
                        Symbol::Char(c) => c,
                        Symbol::EndOfLine | Symbol::Eof => break,
                    };
                    owned
                        .get_or_insert_with(|| self.reader.slice(start, position).to_string())
                        .push(escaped);
                }
                Symbol::Char(c) => {
                    if let Some(text) = owned.as_mut() {
                        text.push(c);
                    }
                }
                Symbol::EndOfLine | Symbol::Eof => break,
            }
        }
        Err(LexError::UnterminatedString {
            line: span.line,
            column: span.column,
        })
    }

    fn read_operator(&mut self, first: char, span: Span) -> LexResult<Token<'a>> {
        self.reader.bump();
        let kind = match first {
            '=' if self.followed_by_equal() => TokenKind::EqualEqual,
            '=' => TokenKind::Equal,
            '<' if self.followed_by_equal() => TokenKind::LessEqual,
            '<' => TokenKind::Less,
            '>' if self.followed_by_equal() => TokenKind::GreaterEqual,
            '>' => TokenKind::Greater,
            '!' if self.followed_by_equal() => TokenKind::NotEqual,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: first,
                    line: span.line,
                    column: span.column,
                });
            }
        };
        Ok(Token::new(kind, span))
    }

    fn followed_by_equal(&mut self) -> bool {
        if self.reader.peek() == Symbol::Char('=') {
            self.reader.bump();
            true
        } else {
            false
        }
    }
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::EOF);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}
