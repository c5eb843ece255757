//! Tree-walking evaluation of formula expressions.
//!
//! Evaluation never fails. Division by zero, negative bases with fractional
//! exponents and the like produce non-finite values that are returned as-is.

use super::ast::{BinaryOp, Expr, Function, UnaryOp};

fn truth(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

fn from_bool(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl Expr {
    /// Evaluate the expression at harmonic index `n`.
    pub fn eval(&self, n: f64) -> f64 {
        match self {
            Expr::Number(v) => *v,
            Expr::Harmonic => n,
            Expr::Unary { op, operand } => {
                let v = operand.eval(n);
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                    UnaryOp::Not => from_bool(!truth(v)),
                }
            }
            Expr::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, n),
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => {
                if truth(cond.eval(n)) {
                    then.eval(n)
                } else {
                    otherwise.eval(n)
                }
            }
            Expr::Call { func, args } => eval_call(*func, args, n),
        }
    }
}

fn eval_binary(op: BinaryOp, lhs: &Expr, rhs: &Expr, n: f64) -> f64 {
    // Short-circuit forms first.
    match op {
        BinaryOp::And => return from_bool(truth(lhs.eval(n)) && truth(rhs.eval(n))),
        BinaryOp::Or => return from_bool(truth(lhs.eval(n)) || truth(rhs.eval(n))),
        _ => {}
    }

    let a = lhs.eval(n);
    let b = rhs.eval(n);
    match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        BinaryOp::Pow => a.powf(b),
        BinaryOp::Eq => from_bool(a == b),
        BinaryOp::Ne => from_bool(a != b),
        BinaryOp::Lt => from_bool(a < b),
        BinaryOp::Le => from_bool(a <= b),
        BinaryOp::Gt => from_bool(a > b),
        BinaryOp::Ge => from_bool(a >= b),
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn eval_call(func: Function, args: &[Expr], n: f64) -> f64 {
    // Arity is checked by the parser.
    let x = args[0].eval(n);
    match func {
        Function::Sin => x.sin(),
        Function::Cos => x.cos(),
        Function::Tan => x.tan(),
        Function::Asin => x.asin(),
        Function::Acos => x.acos(),
        Function::Atan => x.atan(),
        Function::Sqrt => x.sqrt(),
        Function::Abs => x.abs(),
        Function::Exp => x.exp(),
        Function::Ln => x.ln(),
        Function::Log10 => x.log10(),
        Function::Floor => x.floor(),
        Function::Ceil => x.ceil(),
        Function::Round => x.round(),
        Function::Sign => {
            if x == 0.0 || x.is_nan() {
                x
            } else {
                x.signum()
            }
        }
        Function::Pow => x.powf(args[1].eval(n)),
        Function::Min => x.min(args[1].eval(n)),
        Function::Max => x.max(args[1].eval(n)),
    }
}
