//! The free-variable computation.
//!
//! Every rule unions the free sets of sub-expressions; the binding forms
//! subtract the names they introduce:
//! - `Fun`: the body's set minus the formal parameter and (when present)
//!   the function's own name.
//! - `Let`: the bound name is removed from the body's set only; the name
//!   may still occur free inside the bound value itself.
//!
//! Sets are `BTreeSet` so that downstream capture order, node equality, and
//! rendered output are deterministic.

use std::collections::BTreeSet;
use std::rc::Rc;

use thiserror::Error;

use mupl_ir::Expr;

/// Input that is not a source program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A `Closure` appeared in the input; analysis runs before evaluation,
    /// so evaluated values cannot occur in a source tree.
    #[error("closure value in source program; analysis runs before evaluation")]
    ValueInSource,
    /// A `FunFree` appeared in the input; the tree has already been through
    /// this pass.
    #[error("function is already annotated with its free variables")]
    AlreadyAnalyzed,
}

/// Rewrite every `Fun` in `expr` into a `FunFree` annotated with its
/// free-variable set.
///
/// The output tree has the same shape as the input everywhere else and is
/// the only form the free-variable evaluator accepts.
pub fn compute_free_vars(expr: &Expr) -> Result<Expr, AnalysisError> {
    analyze(expr).map(|(rewritten, _)| rewritten)
}

/// The free-variable set of `expr` as a whole.
///
/// For a closed expression this is empty.
pub fn free_vars(expr: &Expr) -> Result<BTreeSet<String>, AnalysisError> {
    analyze(expr).map(|(_, free)| free)
}

/// Bottom-up traversal returning the rewritten tree together with its
/// free-variable set.
fn analyze(expr: &Expr) -> Result<(Expr, BTreeSet<String>), AnalysisError> {
    match expr {
        Expr::Var(name) => Ok((expr.clone(), BTreeSet::from([name.clone()]))),

        Expr::Int(_) | Expr::Unit => Ok((expr.clone(), BTreeSet::new())),

        Expr::Add(lhs, rhs) => {
            let (lhs, lhs_free) = analyze(lhs)?;
            let (rhs, rhs_free) = analyze(rhs)?;
            Ok((Expr::add(lhs, rhs), union(lhs_free, rhs_free)))
        }

        Expr::IfGreater {
            lhs,
            rhs,
            then,
            otherwise,
        } => {
            let (lhs, lhs_free) = analyze(lhs)?;
            let (rhs, rhs_free) = analyze(rhs)?;
            let (then, then_free) = analyze(then)?;
            let (otherwise, otherwise_free) = analyze(otherwise)?;
            let free = union(union(lhs_free, rhs_free), union(then_free, otherwise_free));
            Ok((Expr::if_greater(lhs, rhs, then, otherwise), free))
        }

        Expr::Fun {
            self_name,
            param,
            body,
        } => {
            let (body, mut free) = analyze(body)?;
            free.remove(param);
            if let Some(name) = self_name {
                free.remove(name);
            }
            let annotated = Expr::FunFree {
                self_name: self_name.clone(),
                param: param.clone(),
                body: Rc::new(body),
                free_vars: free.clone(),
            };
            Ok((annotated, free))
        }

        Expr::Call { callee, arg } => {
            let (callee, callee_free) = analyze(callee)?;
            let (arg, arg_free) = analyze(arg)?;
            Ok((Expr::call(callee, arg), union(callee_free, arg_free)))
        }

        Expr::Let { name, value, body } => {
            let (value, value_free) = analyze(value)?;
            let (body, mut body_free) = analyze(body)?;
            body_free.remove(name);
            Ok((
                Expr::mlet(name.clone(), value, body),
                union(value_free, body_free),
            ))
        }

        Expr::Pair(first, second) => {
            let (first, first_free) = analyze(first)?;
            let (second, second_free) = analyze(second)?;
            Ok((Expr::pair(first, second), union(first_free, second_free)))
        }

        Expr::Fst(inner) => {
            let (inner, free) = analyze(inner)?;
            Ok((Expr::fst(inner), free))
        }

        Expr::Snd(inner) => {
            let (inner, free) = analyze(inner)?;
            Ok((Expr::snd(inner), free))
        }

        Expr::IsUnit(inner) => {
            let (inner, free) = analyze(inner)?;
            Ok((Expr::is_unit(inner), free))
        }

        Expr::Closure { .. } => Err(AnalysisError::ValueInSource),

        Expr::FunFree { .. } => Err(AnalysisError::AlreadyAnalyzed),
    }
}

fn union(mut lhs: BTreeSet<String>, rhs: BTreeSet<String>) -> BTreeSet<String> {
    lhs.extend(rhs);
    lhs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    /// Pull the annotation off a `FunFree` node.
    fn annotation(expr: &Expr) -> &BTreeSet<String> {
        match expr {
            Expr::FunFree { free_vars, .. } => free_vars,
            other => panic!("expected an annotated function, got {other}"),
        }
    }

    #[test]
    fn test_var_is_free_in_itself() {
        assert_eq!(free_vars(&Expr::var("x")), Ok(names(&["x"])));
    }

    #[test]
    fn test_literals_have_no_free_vars() {
        assert_eq!(free_vars(&Expr::int(5)), Ok(BTreeSet::new()));
        assert_eq!(free_vars(&Expr::Unit), Ok(BTreeSet::new()));
    }

    #[test]
    fn test_leaves_are_unchanged() {
        assert_eq!(compute_free_vars(&Expr::var("x")), Ok(Expr::var("x")));
        assert_eq!(compute_free_vars(&Expr::int(5)), Ok(Expr::int(5)));
    }

    #[test]
    fn test_param_is_not_free() {
        let fun = Expr::lambda("x", Expr::add(Expr::var("x"), Expr::var("y")));
        let annotated = compute_free_vars(&fun).unwrap();
        assert_eq!(annotation(&annotated), &names(&["y"]));
    }

    #[test]
    fn test_self_name_is_not_free() {
        let fun = Expr::named_fun(
            "f",
            "x",
            Expr::call(Expr::var("f"), Expr::add(Expr::var("x"), Expr::var("y"))),
        );
        let annotated = compute_free_vars(&fun).unwrap();
        assert_eq!(annotation(&annotated), &names(&["y"]));
    }

    #[test]
    fn test_let_scopes_body_but_not_value() {
        // `x` is free in the bound value even though the let binds `x`
        // for the body.
        let expr = Expr::mlet("x", Expr::var("x"), Expr::add(Expr::var("x"), Expr::var("y")));
        assert_eq!(free_vars(&expr), Ok(names(&["x", "y"])));
    }

    #[test]
    fn test_ifgreater_unions_all_four() {
        let expr = Expr::if_greater(
            Expr::var("a"),
            Expr::var("b"),
            Expr::var("c"),
            Expr::var("d"),
        );
        assert_eq!(free_vars(&expr), Ok(names(&["a", "b", "c", "d"])));
    }

    #[test]
    fn test_nested_funs_are_all_annotated() {
        // fun(_, x, fun(_, y, x + y + z)): inner is free in {x, z},
        // outer in {z}.
        let inner = Expr::lambda(
            "y",
            Expr::add(Expr::add(Expr::var("x"), Expr::var("y")), Expr::var("z")),
        );
        let outer = Expr::lambda("x", inner);
        let annotated = compute_free_vars(&outer).unwrap();
        assert_eq!(annotation(&annotated), &names(&["z"]));
        let Expr::FunFree { body, .. } = &annotated else {
            panic!("outer fun should be annotated");
        };
        assert_eq!(annotation(body), &names(&["x", "z"]));
    }

    #[test]
    fn test_projections_pass_sets_through() {
        assert_eq!(
            free_vars(&Expr::fst(Expr::var("p"))),
            Ok(names(&["p"]))
        );
        assert_eq!(
            free_vars(&Expr::is_unit(Expr::snd(Expr::var("p")))),
            Ok(names(&["p"]))
        );
    }

    #[test]
    fn test_closure_input_is_rejected() {
        let closure = Expr::Closure {
            env: mupl_ir::Env::new(),
            fun: std::rc::Rc::new(Expr::lambda("x", Expr::var("x"))),
        };
        assert_eq!(
            compute_free_vars(&closure),
            Err(AnalysisError::ValueInSource)
        );
    }

    #[test]
    fn test_annotated_input_is_rejected() {
        let fun = Expr::lambda("x", Expr::var("x"));
        let annotated = compute_free_vars(&fun).unwrap();
        assert_eq!(
            compute_free_vars(&annotated),
            Err(AnalysisError::AlreadyAnalyzed)
        );
    }
}
