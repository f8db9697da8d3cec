use std::{convert::Infallible, fmt, str::FromStr};

use fixpoint_core::Model;

use crate::{ParseError, parse};

/// An expression tree in the single variable `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal or named constant.
    Num(f64),
    /// The variable `x`.
    Var,
    /// Unary negation.
    Neg(Box<Expr>),
    /// A binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
    /// A call of a built-in function.
    Call(Func, Box<Expr>),
}

/// Binary operators, in the order they bind (loosest first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in functions of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Acot,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
}

impl Func {
    /// Looks up a function by the name used in source text.
    ///
    /// `log` is the natural logarithm, matching NumPy and SymPy.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "cot" => Self::Cot,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            "acot" | "arccot" => Self::Acot,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Ln,
            "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "abs" => Self::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Returns the canonical name used when printing.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Cot => "cot",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Acot => "acot",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
        }
    }

    /// Applies the function to a value.
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Sec => v.cos().recip(),
            Self::Csc => v.sin().recip(),
            Self::Cot => v.tan().recip(),
            Self::Asin => v.asin(),
            Self::Acos => v.acos(),
            Self::Atan => v.atan(),
            Self::Acot => v.recip().atan(),
            Self::Sinh => v.sinh(),
            Self::Cosh => v.cosh(),
            Self::Tanh => v.tanh(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
            Self::Log10 => v.log10(),
            Self::Sqrt => v.sqrt(),
            Self::Abs => v.abs(),
        }
    }
}

impl Expr {
    /// Shorthand for `Expr::Num`.
    #[must_use]
    pub fn num(value: f64) -> Self {
        Self::Num(value)
    }

    /// Builds a binary node.
    #[must_use]
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Builds a function call node.
    #[must_use]
    pub fn call(func: Func, arg: Expr) -> Self {
        Self::Call(func, Box::new(arg))
    }

    /// Negates an expression, folding double negation and literals.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::Neg(inner) => *inner,
            Self::Num(v) => Self::Num(-v),
            other => Self::Neg(Box::new(other)),
        }
    }

    /// Returns true if `x` appears anywhere in the expression.
    #[must_use]
    pub fn has_var(&self) -> bool {
        match self {
            Self::Num(_) => false,
            Self::Var => true,
            Self::Neg(inner) | Self::Call(_, inner) => inner.has_var(),
            Self::Binary(_, lhs, rhs) => lhs.has_var() || rhs.has_var(),
        }
    }

    /// Evaluates the expression at `x`.
    ///
    /// Evaluation never fails: domain errors surface as NaN or infinity,
    /// which callers are expected to check.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Num(v) => *v,
            Self::Var => x,
            Self::Neg(inner) => -inner.eval(x),
            Self::Call(func, arg) => func.apply(arg.eval(x)),
            Self::Binary(op, lhs, rhs) => {
                let (a, b) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                }
            }
        }
    }

    /// Binding strength used to decide where parentheses are needed.
    fn precedence(&self) -> u8 {
        match self {
            Self::Binary(BinOp::Add | BinOp::Sub, ..) => 1,
            Self::Binary(BinOp::Mul | BinOp::Div, ..) => 2,
            Self::Neg(_) => 3,
            Self::Num(v) if v.is_sign_negative() => 3,
            Self::Binary(BinOp::Pow, ..) => 4,
            Self::Num(_) | Self::Var | Self::Call(..) => 5,
        }
    }

    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "(")?;
            fmt::Display::fmt(self, f)?;
            write!(f, ")")
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(v) => write!(f, "{v}"),
            Self::Var => write!(f, "x"),
            Self::Neg(inner) => {
                write!(f, "-")?;
                inner.fmt_at(f, 3)
            }
            Self::Call(func, arg) => write!(f, "{}({arg})", func.name()),
            Self::Binary(op, lhs, rhs) => {
                let (symbol, left_min, right_min) = match op {
                    BinOp::Add => (" + ", 1, 1),
                    BinOp::Sub => (" - ", 1, 2),
                    BinOp::Mul => ("*", 2, 2),
                    BinOp::Div => ("/", 2, 3),
                    BinOp::Pow => ("^", 5, 4),
                };
                lhs.fmt_at(f, left_min)?;
                write!(f, "{symbol}")?;
                rhs.fmt_at(f, right_min)
            }
        }
    }
}

impl FromStr for Expr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// An expression is a model from `x` to its value.
impl Model for Expr {
    type Input = f64;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, input: &f64) -> Result<f64, Self::Error> {
        Ok(self.eval(*input))
    }
}
