//! Derived forms.
//!
//! None of these are primitives: each builder expands to core expressions,
//! so both evaluators handle them with no extra cases. `map_fun` and
//! `map_add_n` form the tiny "standard library" shipped with the language.

use crate::expr::Expr;

/// `if cond is unit then `then` else `otherwise``.
///
/// Expands to `ifgreater(isunit(cond), int(0), then, otherwise)`.
pub fn if_unit(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
    Expr::if_greater(Expr::is_unit(cond), Expr::int(0), then, otherwise)
}

/// Sequential local bindings: each binding is in scope for all later
/// bindings and for `body`. An empty list yields `body` unchanged.
pub fn mlet_star<S: Into<String>>(
    bindings: impl IntoIterator<Item = (S, Expr)>,
    body: Expr,
) -> Expr {
    let bindings: Vec<(S, Expr)> = bindings.into_iter().collect();
    bindings
        .into_iter()
        .rev()
        .fold(body, |body, (name, value)| Expr::mlet(name, value, body))
}

/// `if e1 == e2 then e3 else e4`, with `e1` and `e2` each evaluated once.
///
/// Binds both operands, then tests `>` in both directions: equal means
/// neither is greater. The bound names start with `_` to keep them out of
/// the way of user programs.
pub fn if_eq(e1: Expr, e2: Expr, e3: Expr, e4: Expr) -> Expr {
    mlet_star(
        [("_x", e1), ("_y", e2)],
        Expr::if_greater(
            Expr::var("_x"),
            Expr::var("_y"),
            e4.clone(),
            Expr::if_greater(Expr::var("_y"), Expr::var("_x"), e4, e3),
        ),
    )
}

/// Curried `map` over cons lists: takes a one-argument function, returns a
/// function that applies it to every element of a list.
pub fn map_fun() -> Expr {
    Expr::lambda(
        "f",
        Expr::named_fun(
            "go",
            "xs",
            if_unit(
                Expr::var("xs"),
                Expr::Unit,
                Expr::pair(
                    Expr::call(Expr::var("f"), Expr::fst(Expr::var("xs"))),
                    Expr::call(Expr::var("go"), Expr::snd(Expr::var("xs"))),
                ),
            ),
        ),
    )
}

/// Curried "add n to every element": takes an integer, returns a function
/// over integer lists. Built on [`map_fun`] through a `let` binding.
pub fn map_add_n() -> Expr {
    Expr::mlet(
        "map",
        map_fun(),
        Expr::lambda(
            "n",
            Expr::lambda(
                "xs",
                Expr::call(
                    Expr::call(
                        Expr::var("map"),
                        Expr::lambda("x", Expr::add(Expr::var("x"), Expr::var("n"))),
                    ),
                    Expr::var("xs"),
                ),
            ),
        ),
    )
}
