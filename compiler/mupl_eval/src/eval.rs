//! The shared dispatch skeleton and the two public evaluators.
//!
//! Every rule here is strategy-independent; the single point where the
//! naive and free-variable evaluators differ (what a function node captures)
//! is delegated to `CaptureMode`. Call-environment reconstruction is shared:
//! start from the closure's environment, bind the self-name to the closure
//! when present, then bind the parameter, so the parameter shadows the
//! self-name if they collide.

use mupl_ir::{Env, Expr};

use crate::capture::CaptureMode;
use crate::errors::{type_mismatch, unbound_variable, EvalError, EvalResult};
use crate::stack::ensure_sufficient_stack;

/// Recursion depth limit for a single `eval*` call.
///
/// The native stack grows beneath this (see `ensure_sufficient_stack`), so
/// hitting the limit means runaway recursion, not a large program.
pub const MAX_EVAL_DEPTH: usize = 10_000;

/// Evaluate a source expression in the empty environment.
///
/// Closures capture their entire defining environment.
pub fn eval(expr: &Expr) -> EvalResult {
    eval_in(expr, &Env::new())
}

/// Evaluate a source expression under `env`.
pub fn eval_in(expr: &Expr, env: &Env) -> EvalResult {
    eval_node(expr, env, CaptureMode::Full, 0)
}

/// Evaluate a free-variable-annotated expression in the empty environment.
///
/// The tree must have been through `mupl_analysis` first: closures capture
/// only the bindings in each function's free-variable set, and a raw `Fun`
/// node is an `UnanalyzedFunction` error.
pub fn eval_free_vars(expr: &Expr) -> EvalResult {
    eval_free_vars_in(expr, &Env::new())
}

/// Evaluate a free-variable-annotated expression under `env`.
pub fn eval_free_vars_in(expr: &Expr, env: &Env) -> EvalResult {
    eval_node(expr, env, CaptureMode::FreeVars, 0)
}

fn eval_node(expr: &Expr, env: &Env, mode: CaptureMode, depth: usize) -> EvalResult {
    if depth >= MAX_EVAL_DEPTH {
        return Err(EvalError::RecursionLimit {
            limit: MAX_EVAL_DEPTH,
        });
    }
    let next = depth.saturating_add(1);

    ensure_sufficient_stack(|| match expr {
        Expr::Var(name) => env
            .lookup(name)
            .cloned()
            .ok_or_else(|| unbound_variable(name)),

        // Already values; closures re-evaluate to themselves.
        Expr::Int(_) | Expr::Unit | Expr::Closure { .. } => Ok(expr.clone()),

        Expr::Fun { .. } => mode.close_over_plain(expr, env),

        Expr::FunFree { free_vars, .. } => mode.close_over_annotated(expr, free_vars, env),

        Expr::Add(lhs, rhs) => {
            let lhs = eval_int(lhs, env, mode, next, "add")?;
            let rhs = eval_int(rhs, env, mode, next, "add")?;
            lhs.checked_add(rhs)
                .map(Expr::Int)
                .ok_or(EvalError::IntegerOverflow { context: "add" })
        }

        Expr::IfGreater {
            lhs,
            rhs,
            then,
            otherwise,
        } => {
            let lhs = eval_int(lhs, env, mode, next, "ifgreater")?;
            let rhs = eval_int(rhs, env, mode, next, "ifgreater")?;
            let taken = if lhs > rhs { then } else { otherwise };
            eval_node(taken, env, mode, next)
        }

        Expr::Let { name, value, body } => {
            let bound = eval_node(value, env, mode, next)?;
            eval_node(body, &env.bind(name.clone(), bound), mode, next)
        }

        Expr::Call { callee, arg } => eval_call(callee, arg, env, mode, next),

        Expr::Pair(first, second) => {
            let first = eval_node(first, env, mode, next)?;
            let second = eval_node(second, env, mode, next)?;
            Ok(Expr::pair(first, second))
        }

        Expr::Fst(inner) => match eval_node(inner, env, mode, next)? {
            Expr::Pair(first, _) => Ok((*first).clone()),
            other => Err(type_mismatch("fst", "pair", other.type_name())),
        },

        Expr::Snd(inner) => match eval_node(inner, env, mode, next)? {
            Expr::Pair(_, second) => Ok((*second).clone()),
            other => Err(type_mismatch("snd", "pair", other.type_name())),
        },

        Expr::IsUnit(inner) => {
            let value = eval_node(inner, env, mode, next)?;
            Ok(Expr::Int(i64::from(matches!(value, Expr::Unit))))
        }
    })
}

/// Evaluate an operand that must reduce to an integer.
fn eval_int(
    expr: &Expr,
    env: &Env,
    mode: CaptureMode,
    depth: usize,
    context: &'static str,
) -> Result<i64, EvalError> {
    match eval_node(expr, env, mode, depth)? {
        Expr::Int(value) => Ok(value),
        other => Err(type_mismatch(context, "int", other.type_name())),
    }
}

/// Apply a closure: evaluate callee and argument in the caller's
/// environment, then the body in the closure's environment extended with
/// the self-name (when present) and the parameter, in that order.
fn eval_call(callee: &Expr, arg: &Expr, env: &Env, mode: CaptureMode, depth: usize) -> EvalResult {
    let callee_value = eval_node(callee, env, mode, depth)?;
    let arg_value = eval_node(arg, env, mode, depth)?;

    let Expr::Closure {
        env: closure_env,
        fun,
    } = &callee_value
    else {
        return Err(type_mismatch("call", "closure", callee_value.type_name()));
    };

    let (self_name, param, body) = match fun.as_ref() {
        Expr::Fun {
            self_name,
            param,
            body,
        }
        | Expr::FunFree {
            self_name,
            param,
            body,
            ..
        } => (self_name, param, body),
        // A closure built by evaluation always wraps a function node, but
        // `Closure` is an ordinary variant a host could assemble by hand.
        other => return Err(type_mismatch("call", "fun", other.type_name())),
    };

    let mut call_env = closure_env.clone();
    if let Some(name) = self_name {
        // Self-binding happens at call time, not closure-creation time, so
        // a recursive closure never has to contain itself.
        call_env = call_env.bind(name.clone(), callee_value.clone());
    }
    call_env = call_env.bind(param.clone(), arg_value);

    eval_node(body, &call_env, mode, depth)
}
