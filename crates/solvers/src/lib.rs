//! Numerical solvers for the Fixpoint workspace.
//!
//! # Solvers
//!
//! - [`fixed_point`]: fixed-point iteration `x_{n+1} = g(x_n)` with residual
//!   and step convergence checks, patience, and non-finite guards
//!
//! Solvers take [`Model`]s for the functions they evaluate and report
//! progress to an [`Observer`].
//!
//! [`Model`]: fixpoint_core::Model
//! [`Observer`]: fixpoint_core::Observer

pub mod fixed_point;
