//! Core traits and types for the Fixpoint workspace.
//!
//! This crate defines the shared abstractions that the solver, the HTTP
//! service, and the request/render handler build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Observer`]: receives events and optionally returns control actions

mod model;
mod observer;

pub use model::Model;
pub use observer::Observer;
