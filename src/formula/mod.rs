//! Formula compiler — text → tokens → expression tree → callable of the harmonic index.
//!
//! Formulas are arithmetic expressions in one free variable `n`, the harmonic
//! index. They are parsed, never executed as code: the [`Evaluator`] seam
//! exists so a caller can swap the expression language without touching the
//! synth.

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::Expr;
pub use error::{CompileError, ErrorKind};

use lexer::Lexer;
use parser::Parser;

/// A compiled formula: maps a harmonic index to a coefficient value.
///
/// Non-finite results are returned unchanged; callers store them as-is.
pub type HarmonicFn = Box<dyn Fn(u32) -> f32>;

/// Compiles formula text into a [`HarmonicFn`].
pub trait Evaluator {
    fn compile(&self, source: &str) -> Result<HarmonicFn, CompileError>;
}

/// The default evaluator: a recursive-descent parser over
/// `+ - * / % ^`, comparisons, `?:`, `n`, `pi`, `e` and the usual math functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// Parse formula text into an expression tree.
    pub fn parse(source: &str) -> Result<Expr, CompileError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        let mut parser = Parser::new(tokens);
        parser.parse()
    }
}

impl Evaluator for ExpressionEvaluator {
    fn compile(&self, source: &str) -> Result<HarmonicFn, CompileError> {
        let expr = Self::parse(source)?;
        Ok(Box::new(move |n| expr.eval(f64::from(n)) as f32))
    }
}
