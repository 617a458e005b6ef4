//! MUPL IR - Expression tree and value model.
//!
//! This crate contains the core data structures shared by the analysis pass
//! and the evaluators:
//! - `Expr`: the closed expression sum type, including the value-only
//!   variants (`Closure`) and the analysis-produced variant (`FunFree`)
//! - `Env`: the immutable, ordered binding list used for lexical scoping
//! - Cons-list encoding helpers (`to_mupl_list` / `from_mupl_list`)
//! - Derived-form builders (`sugar`)
//!
//! # Design Philosophy
//!
//! - **Trees are immutable**: every child is an `Rc<Expr>`, so cloning a
//!   value (a closure, a pair) is a pointer bump, never a deep copy.
//! - **Environments are persistent**: extending an `Env` pushes a binding in
//!   front of a shared tail. Nothing is ever mutated in place, which is what
//!   makes lexical scoping under recursion correct.
//! - **Evaluation results are expressions**: `Int`, `Pair`, `Unit`, and
//!   `Closure` are the only variants an evaluator may return.

mod env;
mod expr;
mod list;
pub mod sugar;

pub use env::{Bindings, Env};
pub use expr::Expr;
pub use list::{from_mupl_list, to_mupl_list, MalformedList};
