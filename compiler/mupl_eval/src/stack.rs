//! Stack safety for deep recursion.
//!
//! Evaluation recursion depth equals AST nesting depth, so a deep but legal
//! program can outrun the host thread's stack long before it reaches the
//! evaluator's own depth limit. `stacker` grows the stack on demand, leaving
//! `EvalError::RecursionLimit` as the only depth-related failure mode.

/// Ensure sufficient stack space is available before executing `f`, growing
/// the stack if needed.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available (100KB red zone).
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing (1MB).
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
