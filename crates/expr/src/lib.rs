//! Expressions in one variable, `x`.
//!
//! The solver service receives the function `f(x)` as free text. This crate
//! turns that text into an [`Expr`] tree, evaluates it, and rewrites
//! `f(x) = 0` into an iteration map `x = g(x)`.
//!
//! # Modules
//!
//! - `lex`: splits source text into tokens
//! - `parse`: recursive-descent parser producing an [`Expr`]
//! - [`transform`]: the `f(x) = 0 -> x = g(x)` rewrites
//!
//! # Example
//!
//! ```
//! use fixpoint_expr::{Expr, Transform};
//!
//! let f: Expr = "cos(x) - x".parse().unwrap();
//! let g = Transform::Relaxation.apply(&f).unwrap();
//! assert_eq!(g.to_string(), "x - (cos(x) - x)");
//! ```

mod error;
mod expr;
mod lex;
mod parse;

pub mod transform;

pub use error::ParseError;
pub use expr::{BinOp, Expr, Func};
pub use parse::{MAX_DEPTH, parse};
pub use transform::{Transform, TransformError};
