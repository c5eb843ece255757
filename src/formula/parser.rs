//! Recursive-descent parser for harmonic formulas.
//!
//! Precedence, lowest first:
//!
//! ```text
//! conditional  := or ( '?' conditional ':' conditional )?
//! or           := and ( '||' and )*
//! and          := equality ( '&&' equality )*
//! equality     := comparison ( ( '==' | '!=' ) comparison )*
//! comparison   := additive ( ( '<' | '<=' | '>' | '>=' ) additive )*
//! additive     := term ( ( '+' | '-' ) term )*
//! term         := unary ( ( '*' | '/' | '%' ) unary )*
//! unary        := ( '-' | '+' | '!' ) unary | power
//! power        := primary ( '^' unary )?
//! primary      := number | 'n' | constant | function '(' args ')' | '(' conditional ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-1^2`
//! is `-(1^2)` and `(-1)^n` needs its parentheses.

use super::ast::{constant, BinaryOp, Expr, Function, UnaryOp};
use super::error::CompileError;
use super::token::{Token, TokenKind};

/// Name of the free variable.
pub const HARMONIC_VARIABLE: &str = "n";

/// Deepest nesting of parentheses, ternaries and prefix operators accepted.
pub const MAX_NESTING: usize = 256;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse a complete formula. Trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, CompileError> {
        if self.check(&TokenKind::Eof) {
            let t = self.peek();
            return Err(CompileError::parse("empty formula", t.line, t.col));
        }

        let expr = self.parse_conditional()?;

        if !self.check(&TokenKind::Eof) {
            let t = self.peek();
            return Err(CompileError::parse(
                format!("unexpected token after expression: {:?}", t.kind),
                t.line,
                t.col,
            ));
        }

        Ok(expr)
    }

    fn parse_conditional(&mut self) -> Result<Expr, CompileError> {
        self.descend()?;
        let expr = self.parse_ternary();
        self.depth -= 1;
        expr
    }

    fn parse_ternary(&mut self) -> Result<Expr, CompileError> {
        let cond = self.parse_or()?;
        if !self.check(&TokenKind::Question) {
            return Ok(cond);
        }
        self.advance();
        let then = self.parse_conditional()?;
        self.expect(TokenKind::Colon)?;
        let otherwise = self.parse_conditional()?;
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_and()?;
        while self.check(&TokenKind::OrOr) {
            self.advance();
            let rhs = self.parse_and()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_equality()?;
        while self.check(&TokenKind::AndAnd) {
            self.advance();
            let rhs = self.parse_equality()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::BangEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        self.descend()?;
        let expr = self.parse_prefixed();
        self.depth -= 1;
        expr
    }

    fn parse_prefixed(&mut self) -> Result<Expr, CompileError> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, CompileError> {
        let base = self.parse_primary()?;
        if !self.check(&TokenKind::Caret) {
            return Ok(base);
        }
        self.advance();
        // Exponent goes back through unary so `2^-n` works and `a^b^c` nests right.
        let exponent = self.parse_unary()?;
        Ok(binary(BinaryOp::Pow, base, exponent))
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Number(v) => {
                self.advance();
                Ok(Expr::Number(v))
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.parse_identifier(&name, t.line, t.col)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_conditional()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Eof => Err(CompileError::parse(
                "unexpected end of formula",
                t.line,
                t.col,
            )),
            other => Err(CompileError::parse(
                format!("expected expression, got {other:?}"),
                t.line,
                t.col,
            )),
        }
    }

    fn parse_identifier(
        &mut self,
        name: &str,
        line: usize,
        col: usize,
    ) -> Result<Expr, CompileError> {
        if self.check(&TokenKind::LParen) {
            let func = Function::from_name(name).ok_or_else(|| {
                CompileError::parse(format!("unknown function: {name}"), line, col)
            })?;
            self.advance();
            let args = self.parse_arguments()?;
            if args.len() != func.arity() {
                return Err(CompileError::parse(
                    format!(
                        "{name} takes {} argument(s), got {}",
                        func.arity(),
                        args.len()
                    ),
                    line,
                    col,
                ));
            }
            return Ok(Expr::Call { func, args });
        }

        if name == HARMONIC_VARIABLE {
            return Ok(Expr::Harmonic);
        }

        constant(name)
            .map(Expr::Number)
            .ok_or_else(|| CompileError::parse(format!("unknown identifier: {name}"), line, col))
    }

    /// Parse a comma-separated argument list; the opening `(` is already consumed.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, CompileError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            self.advance();
            return Ok(args);
        }
        loop {
            args.push(self.parse_conditional()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect(TokenKind::RParen)?;
            return Ok(args);
        }
    }

    /// Enter one nesting level. The matching decrement is done by the caller.
    fn descend(&mut self) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            let t = self.peek();
            return Err(CompileError::parse(
                format!("formula nested deeper than {MAX_NESTING} levels"),
                t.line,
                t.col,
            ));
        }
        Ok(())
    }

    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), CompileError> {
        let t = self.peek();
        if t.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(CompileError::parse(
                format!("expected {:?}, got {:?}", kind, t.kind),
                t.line,
                t.col,
            ))
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
