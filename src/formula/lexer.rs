//! Lexer for harmonic formulas.
//!
//! Converts formula text into a stream of [`Token`]s. Accepts the JavaScript
//! spellings the preset formulas were first written in (`===`, `**`,
//! `Math.PI`) alongside the plain forms.

use super::error::CompileError;
use super::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    col: self.col,
                });
                break;
            }

            let ch = self.peek();
            let token = match ch {
                '+' => self.single_char(TokenKind::Plus),
                '-' => self.single_char(TokenKind::Minus),
                '/' => self.single_char(TokenKind::Slash),
                '%' => self.single_char(TokenKind::Percent),
                '^' => self.single_char(TokenKind::Caret),
                '(' => self.single_char(TokenKind::LParen),
                ')' => self.single_char(TokenKind::RParen),
                ',' => self.single_char(TokenKind::Comma),
                '?' => self.single_char(TokenKind::Question),
                ':' => self.single_char(TokenKind::Colon),
                '*' => self.lex_star(),
                '=' => self.lex_equals()?,
                '!' => self.lex_bang(),
                '<' => self.lex_ordering(TokenKind::Lt, TokenKind::LtEq),
                '>' => self.lex_ordering(TokenKind::Gt, TokenKind::GtEq),
                '&' => self.lex_doubled('&', TokenKind::AndAnd)?,
                '|' => self.lex_doubled('|', TokenKind::OrOr)?,
                '0'..='9' => self.lex_number()?,
                '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.lex_number()?,
                'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
                _ => {
                    return Err(CompileError::lex(
                        format!("unexpected character: '{ch}'"),
                        self.line,
                        self.col,
                    ));
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn matches(&mut self, expected: char) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_whitespace() {
            self.advance();
        }
    }

    fn single_char(&mut self, kind: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        Token { kind, line, col }
    }

    /// `*` or `**`.
    fn lex_star(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        let kind = if self.matches('*') {
            TokenKind::Caret
        } else {
            TokenKind::Star
        };
        Token { kind, line, col }
    }

    /// `==` or `===`. A lone `=` is an error: formulas have no assignment.
    fn lex_equals(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        self.advance();
        if !self.matches('=') {
            return Err(CompileError::lex(
                "unexpected '=', use '==' to compare",
                line,
                col,
            ));
        }
        self.matches('=');
        Ok(Token {
            kind: TokenKind::EqEq,
            line,
            col,
        })
    }

    /// `!`, `!=` or `!==`.
    fn lex_bang(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        let kind = if self.matches('=') {
            self.matches('=');
            TokenKind::BangEq
        } else {
            TokenKind::Bang
        };
        Token { kind, line, col }
    }

    fn lex_ordering(&mut self, strict: TokenKind, inclusive: TokenKind) -> Token {
        let line = self.line;
        let col = self.col;
        self.advance();
        let kind = if self.matches('=') { inclusive } else { strict };
        Token { kind, line, col }
    }

    fn lex_doubled(&mut self, ch: char, kind: TokenKind) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        self.advance();
        if self.matches(ch) {
            Ok(Token { kind, line, col })
        } else {
            Err(CompileError::lex(
                format!("expected '{ch}{ch}', found single '{ch}'"),
                line,
                col,
            ))
        }
    }

    fn lex_number(&mut self) -> Result<Token, CompileError> {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            s.push(self.advance());
        }

        if !self.is_at_end() && self.peek() == '.' {
            s.push(self.advance());
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                s.push(self.advance());
            }
        }

        // Exponent only when a digit follows, so `2e` stays `2` then `e`.
        if !self.is_at_end() && matches!(self.peek(), 'e' | 'E') {
            let signed = matches!(self.peek_next(), Some('+') | Some('-'));
            let digit_at = if signed { self.pos + 2 } else { self.pos + 1 };
            if self
                .chars
                .get(digit_at)
                .is_some_and(|c| c.is_ascii_digit())
            {
                s.push(self.advance());
                if signed {
                    s.push(self.advance());
                }
                while !self.is_at_end() && self.peek().is_ascii_digit() {
                    s.push(self.advance());
                }
            }
        }

        let val: f64 = s
            .parse()
            .map_err(|_| CompileError::lex(format!("invalid number: {s}"), line, col))?;
        Ok(Token {
            kind: TokenKind::Number(val),
            line,
            col,
        })
    }

    /// Identifiers may be dotted (`Math.sin`) so JS-style names lex as one token.
    fn lex_ident(&mut self) -> Token {
        let line = self.line;
        let col = self.col;
        let mut s = String::new();

        loop {
            while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == '_')
            {
                s.push(self.advance());
            }
            let dotted = !self.is_at_end()
                && self.peek() == '.'
                && self
                    .peek_next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
            if !dotted {
                break;
            }
            s.push(self.advance());
        }

        Token {
            kind: TokenKind::Ident(s),
            line,
            col,
        }
    }
}
