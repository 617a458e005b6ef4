//! Property-based tests for the two evaluation paths.
//!
//! These use proptest to generate random expression trees and verify:
//! 1. Path agreement: for any generated tree, closed by binding its free
//!    variables to integer constants, the plain evaluator and the
//!    analyze-then-evaluate path produce observably equal results — errors
//!    included.
//! 2. List round-trip: decoding an encoded sequence returns the sequence.
//!
//! Closure equality here is observational, as the language defines it: two
//! closures agree when their parameter, self-name, and bodies (modulo the
//! free-variable annotation) match, and their captured environments agree on
//! every name the body is free in.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::rc::Rc;

use proptest::prelude::*;

use mupl_analysis::{compute_free_vars, free_vars};
use mupl_eval::{eval, eval_free_vars, EvalResult};
use mupl_ir::sugar::mlet_star;
use mupl_ir::{from_mupl_list, to_mupl_list, Expr};

// -- Generation Strategies --

/// Small shared pool so generated trees actually reference each other's
/// bindings instead of every name being unique.
fn name_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["x", "y", "z", "f", "g"]).prop_map(str::to_string)
}

fn expr_strategy() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-100i64..100).prop_map(Expr::int),
        Just(Expr::Unit),
        name_strategy().prop_map(Expr::var),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::add(a, b)),
            (inner.clone(), inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, t, e)| Expr::if_greater(a, b, t, e)),
            (name_strategy(), inner.clone()).prop_map(|(p, b)| Expr::lambda(p, b)),
            (name_strategy(), name_strategy(), inner.clone())
                .prop_map(|(n, p, b)| Expr::named_fun(n, p, b)),
            (inner.clone(), inner.clone()).prop_map(|(c, a)| Expr::call(c, a)),
            (name_strategy(), inner.clone(), inner.clone())
                .prop_map(|(n, v, b)| Expr::mlet(n, v, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Expr::pair(a, b)),
            inner.clone().prop_map(Expr::fst),
            inner.clone().prop_map(Expr::snd),
            inner.prop_map(Expr::is_unit),
        ]
    })
}

/// Close an arbitrary tree by binding every free variable to an integer
/// constant in an outer `let` chain.
fn close(expr: Expr) -> Expr {
    let free = free_vars(&expr).expect("generated trees are source programs");
    mlet_star(free.into_iter().map(|name| (name, Expr::int(7))), expr)
}

// -- Observational Equality --

/// Drop free-variable annotations, turning `FunFree` back into `Fun`.
fn strip(expr: &Expr) -> Expr {
    match expr {
        Expr::Var(_) | Expr::Int(_) | Expr::Unit => expr.clone(),
        Expr::Add(a, b) => Expr::add(strip(a), strip(b)),
        Expr::IfGreater {
            lhs,
            rhs,
            then,
            otherwise,
        } => Expr::if_greater(strip(lhs), strip(rhs), strip(then), strip(otherwise)),
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
        } => Expr::Fun {
            self_name: self_name.clone(),
            param: param.clone(),
            body: Rc::new(strip(body)),
        },
        Expr::Call { callee, arg } => Expr::call(strip(callee), strip(arg)),
        Expr::Let { name, value, body } => Expr::mlet(name.clone(), strip(value), strip(body)),
        Expr::Pair(a, b) => Expr::pair(strip(a), strip(b)),
        Expr::Fst(e) => Expr::fst(strip(e)),
        Expr::Snd(e) => Expr::snd(strip(e)),
        Expr::IsUnit(e) => Expr::is_unit(strip(e)),
        Expr::Closure { env, fun } => Expr::Closure {
            env: env.iter().map(|(n, v)| (n, strip(v))).collect(),
            fun: Rc::new(strip(fun)),
        },
    }
}

fn observably_eq(a: &Expr, b: &Expr) -> bool {
    match (a, b) {
        (Expr::Int(x), Expr::Int(y)) => x == y,
        (Expr::Unit, Expr::Unit) => true,
        (Expr::Pair(a1, a2), Expr::Pair(b1, b2)) => {
            observably_eq(a1, b1) && observably_eq(a2, b2)
        }
        (
            Expr::Closure {
                env: env_a,
                fun: fun_a,
            },
            Expr::Closure {
                env: env_b,
                fun: fun_b,
            },
        ) => {
            let fun_a = strip(fun_a);
            let fun_b = strip(fun_b);
            if fun_a != fun_b {
                return false;
            }
            // The environments need only agree on names the function can
            // actually look up: its own free variables.
            free_vars(&fun_a)
                .expect("stripped functions are source programs")
                .iter()
                .all(|name| match (env_a.lookup(name), env_b.lookup(name)) {
                    (Some(va), Some(vb)) => observably_eq(va, vb),
                    _ => false,
                })
        }
        _ => false,
    }
}

fn results_agree(plain: &EvalResult, optimized: &EvalResult) -> bool {
    match (plain, optimized) {
        (Ok(a), Ok(b)) => observably_eq(a, b),
        (Err(a), Err(b)) => a == b,
        _ => false,
    }
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_eval_paths_agree_on_closed_trees(expr in expr_strategy()) {
        let closed = close(expr);
        let plain = eval(&closed);
        let annotated = compute_free_vars(&closed).unwrap();
        let optimized = eval_free_vars(&annotated);
        prop_assert!(
            results_agree(&plain, &optimized),
            "paths disagree on {closed}: plain {plain:?}, free-vars {optimized:?}"
        );
    }

    #[test]
    fn prop_list_round_trip(values in prop::collection::vec(any::<i64>(), 0..32)) {
        let items: Vec<Expr> = values.into_iter().map(Expr::int).collect();
        prop_assert_eq!(from_mupl_list(&to_mupl_list(&items)), Ok(items));
    }
}
