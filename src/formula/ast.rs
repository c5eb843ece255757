//! Abstract syntax tree for harmonic formulas.
//!
//! Constants (`pi`, `e`) are folded to numbers by the parser, so the only
//! free variable left in a tree is the harmonic index.

/// A formula expression in the harmonic index `n`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    /// The harmonic index `n`.
    Harmonic,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `cond ? then : otherwise`; any non-zero condition is true.
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        func: Function,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Built-in functions callable from a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sqrt,
    Abs,
    Exp,
    Ln,
    Log10,
    Floor,
    Ceil,
    Round,
    Sign,
    Pow,
    Min,
    Max,
}

impl Function {
    /// Resolve a function by name. Accepts the `Math.` prefix.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("Math.").unwrap_or(name);
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "log10" => Self::Log10,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "sign" => Self::Sign,
            "pow" => Self::Pow,
            "min" => Self::Min,
            "max" => Self::Max,
            _ => return None,
        };
        Some(func)
    }

    /// Number of arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            Self::Pow | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }
}

/// Resolve a named constant. Accepts `pi`, `PI`, `e`, `E` and `Math.`-prefixed forms.
pub fn constant(name: &str) -> Option<f64> {
    match name.strip_prefix("Math.").unwrap_or(name) {
        "pi" | "PI" => Some(std::f64::consts::PI),
        "e" | "E" => Some(std::f64::consts::E),
        "tau" => Some(std::f64::consts::TAU),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_names_resolve_with_and_without_math_prefix() {
        assert_eq!(Function::from_name("sin"), Some(Function::Sin));
        assert_eq!(Function::from_name("Math.sin"), Some(Function::Sin));
        assert_eq!(Function::from_name("log"), Some(Function::Ln));
        assert_eq!(Function::from_name("frobnicate"), None);
    }

    #[test]
    fn arity() {
        assert_eq!(Function::Pow.arity(), 2);
        assert_eq!(Function::Sqrt.arity(), 1);
    }

    #[test]
    fn constants() {
        assert_eq!(constant("Math.PI"), Some(std::f64::consts::PI));
        assert_eq!(constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(constant("n"), None);
    }
}
