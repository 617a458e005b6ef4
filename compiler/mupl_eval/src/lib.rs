#![deny(clippy::arithmetic_side_effects)]
//! MUPL Eval - Tree-walking evaluators.
//!
//! Two evaluation strategies over the same `Expr` trees:
//!
//! - [`eval`] / [`eval_in`]: closures snapshot the **entire** defining
//!   environment, so closure size grows with environment depth.
//! - [`eval_free_vars`] / [`eval_free_vars_in`]: runs on trees annotated by
//!   `mupl_analysis`; closures capture **only** the bindings named in each
//!   function's free-variable set.
//!
//! Both share one dispatch skeleton, parameterized by a capture mode, so the
//! strategies cannot drift apart. For any closed source expression the two
//! paths produce observably equal results.
//!
//! # Failure modes
//!
//! Evaluation is total over well-formed inputs; everything else surfaces as
//! a typed [`EvalError`]. `Add` uses checked arithmetic (`IntegerOverflow`
//! rather than wrapping), and recursion is bounded by an explicit depth
//! limit (`RecursionLimit`) with `stacker` growing the native stack beneath
//! it, so deep-but-legal programs never crash the host.

mod capture;
mod errors;
mod eval;
mod stack;

pub use errors::{EvalError, EvalResult};
pub use eval::{eval, eval_free_vars, eval_free_vars_in, eval_in, MAX_EVAL_DEPTH};
pub use stack::ensure_sufficient_stack;
