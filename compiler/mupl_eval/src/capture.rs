//! Capture modes.
//!
//! The one place the two evaluation strategies differ is how a function
//! node becomes a closure. `CaptureMode` isolates that difference as enum
//! dispatch, so the dispatch skeleton in `eval` stays shared and the
//! strategies cannot drift apart.

use std::collections::BTreeSet;
use std::rc::Rc;

use mupl_ir::{Env, Expr};

use crate::errors::{unbound_variable, EvalError, EvalResult};

/// How a function node captures its defining environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CaptureMode {
    /// Snapshot the entire environment: closure size is proportional to
    /// environment depth. Accepts `Fun` nodes only.
    Full,
    /// Capture only the bindings in the function's free-variable set,
    /// resolved at closure-creation time. Accepts `FunFree` nodes only.
    FreeVars,
}

impl CaptureMode {
    /// Close over a raw `Fun` node.
    pub(crate) fn close_over_plain(self, fun: &Expr, env: &Env) -> EvalResult {
        match self {
            CaptureMode::Full => Ok(Expr::Closure {
                env: env.clone(),
                fun: Rc::new(fun.clone()),
            }),
            CaptureMode::FreeVars => Err(EvalError::UnanalyzedFunction),
        }
    }

    /// Close over a `FunFree` node annotated with `free_vars`.
    ///
    /// Every free name must be bound at closure-creation time; for a closed
    /// program the analysis guarantees it is.
    pub(crate) fn close_over_annotated(
        self,
        fun: &Expr,
        free_vars: &BTreeSet<String>,
        env: &Env,
    ) -> EvalResult {
        match self {
            CaptureMode::Full => Err(EvalError::AnnotatedFunction),
            CaptureMode::FreeVars => {
                let mut captured = Env::new();
                for name in free_vars {
                    let value = env
                        .lookup(name)
                        .cloned()
                        .ok_or_else(|| unbound_variable(name))?;
                    captured = captured.bind(name.clone(), value);
                }
                Ok(Expr::Closure {
                    env: captured,
                    fun: Rc::new(fun.clone()),
                })
            }
        }
    }
}
