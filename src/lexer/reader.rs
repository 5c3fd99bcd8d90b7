//! Line-oriented character source for the lexer.
//!
//! The reader hands out one logical line at a time with its leading spaces
//! already stripped and converted into an indentation level. Lines that hold
//! only whitespace are skipped entirely, so they never produce tokens.

use std::str::Lines;

use super::error::{LexError, LexResult};
use super::token::Span;

/// One step of the character stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Char(char),
    EndOfLine,
    Eof,
}

pub struct Reader<'a> {
    lines: Lines<'a>,
    line: &'a str,
    position: usize,
    line_number: usize,
    leading_spaces: usize,
    indent: usize,
    eof: bool,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned before the first line.
    ///
    /// Call [`Reader::advance_line`] once before reading characters.
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line: "",
            position: 0,
            line_number: 0,
            leading_spaces: 0,
            indent: 0,
            eof: false,
        }
    }

    pub fn peek(&self) -> Symbol {
        if self.eof {
            return Symbol::Eof;
        }
        match self.line[self.position..].chars().next() {
            Some(c) => Symbol::Char(c),
            None => Symbol::EndOfLine,
        }
    }

    /// Consumes and returns the current symbol. End of line and end of input
    /// are sticky: only [`Reader::advance_line`] moves past them.
    pub fn bump(&mut self) -> Symbol {
        let symbol = self.peek();
        if let Symbol::Char(c) = symbol {
            self.position += c.len_utf8();
        }
        symbol
    }

    /// Loads the next line with non-whitespace content.
    ///
    /// At end of input the indentation level drops to zero so the lexer can
    /// close every open block before reporting `EOF`.
    pub fn advance_line(&mut self) -> LexResult<()> {
        for raw in self.lines.by_ref() {
            self.line_number += 1;
            if raw.trim().is_empty() {
                continue;
            }

            let content = raw.trim_start_matches(' ');
            let spaces = raw.len() - content.len();
            if spaces % 2 == 1 {
                return Err(LexError::OddIndentation {
                    count: spaces,
                    line: self.line_number,
                });
            }

            self.line = content;
            self.position = 0;
            self.leading_spaces = spaces;
            self.indent = spaces / 2;
            return Ok(());
        }

        self.eof = true;
        self.line = "";
        self.position = 0;
        self.leading_spaces = 0;
        self.indent = 0;
        Ok(())
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Text of the current line between two byte positions.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.line[start..end]
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn span(&self) -> Span {
        Span {
            line: self.line_number,
            column: self.leading_spaces + self.position + 1,
        }
    }
}
