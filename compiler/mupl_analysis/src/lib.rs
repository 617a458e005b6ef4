//! MUPL Analysis - Free-variable annotation pass.
//!
//! Sits between the IR and the free-variable evaluator: a whole-tree,
//! bottom-up rewrite that replaces every `Fun` node with a `FunFree` node
//! carrying the set of variables its body uses but does not bind itself.
//! The free-variable evaluator uses that set to capture a minimal closure
//! environment instead of snapshotting the whole defining environment.
//!
//! The pass runs once, over a whole source program, before evaluation.
//! Trees must not be mixed across the boundary: the plain evaluator rejects
//! `FunFree` nodes and the free-variable evaluator rejects `Fun` nodes.

mod free_vars;

pub use free_vars::{compute_free_vars, free_vars, AnalysisError};
