//! Evaluation errors.
//!
//! Every failure aborts the current `eval*` call and propagates to the
//! caller as a value; the language has no effects to roll back, so there is
//! no partial-result or retry semantics.

use thiserror::Error;

use mupl_ir::Expr;

/// Result of evaluation.
pub type EvalResult = Result<Expr, EvalError>;

/// Evaluation-time failure of a closed-form tree.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// `lookup` exhausted the environment.
    #[error("unbound variable during evaluation: {name}")]
    UnboundVariable { name: String },

    /// An operand had the wrong value kind for its context.
    #[error("{context} applied to non-{expected}: got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
        context: &'static str,
    },

    /// The free-variable evaluator met a raw `Fun` node; the tree skipped
    /// the analysis pass.
    #[error("function has not been through free-variable analysis")]
    UnanalyzedFunction,

    /// The plain evaluator met a `FunFree` node; annotated trees belong to
    /// the free-variable evaluator.
    #[error("free-variable-annotated function passed to the plain evaluator")]
    AnnotatedFunction,

    /// Checked arithmetic overflowed. Identical policy in both evaluators.
    #[error("integer overflow in {context}")]
    IntegerOverflow { context: &'static str },

    /// Evaluation recursed past the depth limit.
    #[error("maximum recursion depth exceeded (limit: {limit})")]
    RecursionLimit { limit: usize },
}

/// `UnboundVariable` for `name`.
pub(crate) fn unbound_variable(name: &str) -> EvalError {
    EvalError::UnboundVariable {
        name: name.to_string(),
    }
}

/// `TypeMismatch` with the offending node kind.
pub(crate) fn type_mismatch(
    context: &'static str,
    expected: &'static str,
    got: &'static str,
) -> EvalError {
    EvalError::TypeMismatch {
        expected,
        got,
        context,
    }
}
