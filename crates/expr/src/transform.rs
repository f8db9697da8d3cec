//! Rewrites of `f(x) = 0` into an iteration map `x = g(x)`.
//!
//! Two rewrites are available:
//!
//! - [`Transform::Relaxation`]: `g(x) = x - f(x)`, valid for any `f`.
//! - [`Transform::Isolate`]: picks the first additive term of `f` that
//!   contains `x`, moves everything else to the other side, and peels that
//!   term apart with inverse operations until `x` stands alone.
//!
//! Isolating through `sin`, `cos`, and friends restricts the domain of the
//! resulting `g` to the principal branch of the inverse.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{BinOp, Expr, Func};

/// Errors produced while rewriting `f(x) = 0` as `x = g(x)`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("no term of f(x) contains x")]
    NoVariable,

    #[error("Cannot isolate {term}")]
    CannotIsolate { term: String },
}

/// How to derive the iteration map `g` from `f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    /// `g(x) = x - f(x)`.
    #[default]
    Relaxation,
    /// Solve `f(x) = 0` for one occurrence of `x`.
    Isolate,
}

impl Transform {
    /// Derives `g` from `f`.
    ///
    /// # Errors
    ///
    /// Returns an error if [`Transform::Isolate`] cannot invert the chosen term.
    pub fn apply(self, f: &Expr) -> Result<Expr, TransformError> {
        match self {
            Self::Relaxation => Ok(Expr::binary(BinOp::Sub, Expr::Var, f.clone())),
            Self::Isolate => isolate(f),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relaxation => write!(f, "relaxation"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "relaxation" | "relax" => Ok(Self::Relaxation),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!(
                "unknown transform '{other}', expected 'relaxation' or 'isolate'"
            )),
        }
    }
}

/// A term of a flattened sum, with its sign.
struct Term {
    negative: bool,
    expr: Expr,
}

impl Term {
    fn signed(self) -> Expr {
        if self.negative {
            self.expr.negate()
        } else {
            self.expr
        }
    }
}

fn isolate(f: &Expr) -> Result<Expr, TransformError> {
    let mut terms = Vec::new();
    flatten_sum(f, false, &mut terms);

    let index = terms
        .iter()
        .position(|term| term.expr.has_var())
        .ok_or(TransformError::NoVariable)?;
    let chosen = terms.remove(index).signed();

    // chosen + rest = 0  =>  chosen = -rest
    let mut lhs = match sum(terms) {
        Some(rest) => rest.negate(),
        None => Expr::num(0.0),
    };
    let mut rhs = chosen;

    loop {
        rhs = match rhs {
            Expr::Var => return Ok(lhs),
            Expr::Neg(inner) => {
                lhs = lhs.negate();
                *inner
            }
            Expr::Binary(op, a, b) => {
                let (next, inverted) = invert_binary(op, *a, *b, lhs)?;
                lhs = inverted;
                next
            }
            Expr::Call(func, arg) => {
                lhs = invert_call(func, *arg.clone(), lhs)?;
                *arg
            }
            // Unreachable in practice: the peeled side always contains `x`.
            Expr::Num(value) => {
                return Err(TransformError::CannotIsolate {
                    term: Expr::Num(value).to_string(),
                });
            }
        };
    }
}

/// Inverts `a op b = lhs` for whichever operand holds `x`.
///
/// Returns the operand still containing `x` and the new left-hand side.
fn invert_binary(op: BinOp, a: Expr, b: Expr, lhs: Expr) -> Result<(Expr, Expr), TransformError> {
    let a_var = a.has_var();
    let b_var = b.has_var();

    if a_var && b_var {
        return Err(TransformError::CannotIsolate {
            term: Expr::binary(op, a, b).to_string(),
        });
    }

    let result = match (op, a_var) {
        // h + c = L  =>  h = L - c
        (BinOp::Add, true) => (a, Expr::binary(BinOp::Sub, lhs, b)),
        (BinOp::Add, false) => (b, Expr::binary(BinOp::Sub, lhs, a)),
        // h - c = L  =>  h = L + c
        (BinOp::Sub, true) => (a, Expr::binary(BinOp::Add, lhs, b)),
        // c - h = L  =>  h = c - L
        (BinOp::Sub, false) => (b, Expr::binary(BinOp::Sub, a, lhs)),
        // h * c = L  =>  h = L / c
        (BinOp::Mul, true) => (a, Expr::binary(BinOp::Div, lhs, b)),
        (BinOp::Mul, false) => (b, Expr::binary(BinOp::Div, lhs, a)),
        // h / c = L  =>  h = L * c
        (BinOp::Div, true) => (a, Expr::binary(BinOp::Mul, lhs, b)),
        // c / h = L  =>  h = c / L
        (BinOp::Div, false) => (b, Expr::binary(BinOp::Div, a, lhs)),
        // h ^ c = L  =>  h = L ^ (1 / c)
        (BinOp::Pow, true) => (
            a,
            Expr::binary(
                BinOp::Pow,
                lhs,
                Expr::binary(BinOp::Div, Expr::num(1.0), b),
            ),
        ),
        // c ^ h = L  =>  h = log(L) / log(c)
        (BinOp::Pow, false) => (
            b,
            Expr::binary(
                BinOp::Div,
                Expr::call(Func::Ln, lhs),
                Expr::call(Func::Ln, a),
            ),
        ),
    };

    Ok(result)
}

/// Inverts `func(arg) = lhs`, returning the expression `arg` must equal.
fn invert_call(func: Func, arg: Expr, lhs: Expr) -> Result<Expr, TransformError> {
    let reciprocal = |l: Expr| Expr::binary(BinOp::Div, Expr::num(1.0), l);

    let inverted = match func {
        Func::Sin => Expr::call(Func::Asin, lhs),
        Func::Cos => Expr::call(Func::Acos, lhs),
        Func::Tan => Expr::call(Func::Atan, lhs),
        Func::Cot => Expr::call(Func::Acot, lhs),
        Func::Sec => Expr::call(Func::Acos, reciprocal(lhs)),
        Func::Csc => Expr::call(Func::Asin, reciprocal(lhs)),
        Func::Asin => Expr::call(Func::Sin, lhs),
        Func::Acos => Expr::call(Func::Cos, lhs),
        Func::Atan => Expr::call(Func::Tan, lhs),
        Func::Acot => Expr::call(Func::Cot, lhs),
        Func::Ln => Expr::call(Func::Exp, lhs),
        Func::Exp => Expr::call(Func::Ln, lhs),
        Func::Log10 => Expr::binary(BinOp::Pow, Expr::num(10.0), lhs),
        Func::Sqrt => Expr::binary(BinOp::Pow, lhs, Expr::num(2.0)),
        Func::Sinh | Func::Cosh | Func::Tanh | Func::Abs => {
            return Err(TransformError::CannotIsolate {
                term: Expr::call(func, arg).to_string(),
            });
        }
    };

    Ok(inverted)
}

fn flatten_sum(expr: &Expr, negative: bool, out: &mut Vec<Term>) {
    match expr {
        Expr::Binary(BinOp::Add, a, b) => {
            flatten_sum(a, negative, out);
            flatten_sum(b, negative, out);
        }
        Expr::Binary(BinOp::Sub, a, b) => {
            flatten_sum(a, negative, out);
            flatten_sum(b, !negative, out);
        }
        other => out.push(Term {
            negative,
            expr: other.clone(),
        }),
    }
}

/// Rebuilds a sum from signed terms, or `None` if there are none.
fn sum(terms: Vec<Term>) -> Option<Expr> {
    let mut iter = terms.into_iter();
    let first = iter.next()?.signed();

    Some(iter.fold(first, |acc, term| {
        let op = if term.negative { BinOp::Sub } else { BinOp::Add };
        Expr::binary(op, acc, term.expr)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn g_of(f: &str, transform: Transform) -> Expr {
        let f: Expr = f.parse().expect("valid expression");
        transform.apply(&f).expect("should transform")
    }

    /// Checks that `x = g(x)` holds wherever `f(x) = 0`.
    fn assert_fixed_point(g: &Expr, root: f64) {
        assert_relative_eq!(g.eval(root), root, epsilon = 1e-9);
    }

    #[test]
    fn relaxation_subtracts_f() {
        let g = g_of("x^2 - 2", Transform::Relaxation);
        assert_eq!(g.to_string(), "x - (x^2 - 2)");
        assert_fixed_point(&g, 2.0_f64.sqrt());
    }

    #[test]
    fn isolates_linear_term() {
        let g = g_of("3*x - 6", Transform::Isolate);
        assert_eq!(g.to_string(), "6/3");
        assert_fixed_point(&g, 2.0);
    }

    #[test]
    fn isolates_through_functions() {
        // cos(x) - x = 0 is solved by the Dottie number.
        let dottie = 0.739_085_133_215_160_6;
        let g = g_of("cos(x) - x", Transform::Isolate);
        assert_eq!(g.to_string(), "acos(x)");
        assert_fixed_point(&g, dottie);
    }

    #[test]
    fn isolates_through_powers_and_negation() {
        let g = g_of("2 - x^2", Transform::Isolate);
        assert_eq!(g.to_string(), "2^(1/2)");
        assert_fixed_point(&g, 2.0_f64.sqrt());

        let g = g_of("exp(x) - 5", Transform::Isolate);
        assert_fixed_point(&g, 5.0_f64.ln());
    }

    #[test]
    fn keeps_other_x_terms_on_the_right() {
        // sin(cos(x)) + 3x + x = 0  =>  x = acos(asin(-(3x + x)))
        let g = g_of("sin(cos(x)) + 3*x + x", Transform::Isolate);
        assert_eq!(g.to_string(), "acos(asin(-(3*x + x)))");
    }

    #[test]
    fn reports_unsupported_terms() {
        let f: Expr = "sinh(x) + 1".parse().expect("valid");
        assert_eq!(
            Transform::Isolate.apply(&f),
            Err(TransformError::CannotIsolate {
                term: "sinh(x)".into()
            })
        );

        let f: Expr = "x*sin(x) - 1".parse().expect("valid");
        assert!(matches!(
            Transform::Isolate.apply(&f),
            Err(TransformError::CannotIsolate { .. })
        ));

        let f: Expr = "2 + 3".parse().expect("valid");
        assert_eq!(Transform::Isolate.apply(&f), Err(TransformError::NoVariable));
    }

    #[test]
    fn parses_names() {
        assert_eq!("Isolate".parse::<Transform>(), Ok(Transform::Isolate));
        assert_eq!("relax".parse::<Transform>(), Ok(Transform::Relaxation));
        assert!("newton".parse::<Transform>().is_err());
        assert_eq!(Transform::default().to_string(), "relaxation");
    }
}
