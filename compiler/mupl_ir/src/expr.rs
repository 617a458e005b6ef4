//! Expression types.
//!
//! `Expr` is the single sum type for MUPL: source programs, intermediate
//! results, and final values are all expression trees. The evaluators uphold
//! the invariant that results are always one of the value variants (`Int`,
//! `Pair`, `Unit`, `Closure`).
//!
//! Children are `Rc<Expr>` so that values clone cheaply and closure
//! environments share structure with the trees they captured.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::env::Env;

/// Expression variants.
///
/// The enum is closed: evaluators match exhaustively, so adding a variant is
/// a compile error at every dispatch site rather than a silent fallthrough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// Reference to a bound identifier.
    Var(String),

    /// Integer constant.
    Int(i64),

    /// Sum of two expressions; both operands must evaluate to `Int`.
    Add(Rc<Expr>, Rc<Expr>),

    /// `if lhs > rhs then `then` else `otherwise``; only the taken branch
    /// is evaluated.
    IfGreater {
        lhs: Rc<Expr>,
        rhs: Rc<Expr>,
        then: Rc<Expr>,
        otherwise: Rc<Expr>,
    },

    /// A single-parameter function. `self_name` is present when the body may
    /// refer to the function itself by name.
    Fun {
        self_name: Option<String>,
        param: String,
        body: Rc<Expr>,
    },

    /// Function application; `callee` must evaluate to a `Closure`.
    Call { callee: Rc<Expr>, arg: Rc<Expr> },

    /// Non-recursive local binding: `value` is evaluated in the current
    /// environment, then `body` with `name` bound in front.
    Let {
        name: String,
        value: Rc<Expr>,
        body: Rc<Expr>,
    },

    /// 2-tuple construction.
    Pair(Rc<Expr>, Rc<Expr>),

    /// First projection; operand must evaluate to a `Pair`.
    Fst(Rc<Expr>),

    /// Second projection; operand must evaluate to a `Pair`.
    Snd(Rc<Expr>),

    /// The nullary unit value; also the end-of-list marker.
    Unit,

    /// Evaluates to `Int(1)` if the operand evaluates to `Unit`, else
    /// `Int(0)`.
    IsUnit(Rc<Expr>),

    /// A function value: the function node plus the bindings it closed over.
    ///
    /// Never written in source programs; produced only by evaluation.
    Closure { env: Env, fun: Rc<Expr> },

    /// A function annotated with its free-variable set.
    ///
    /// Never written in source programs; produced only by the free-variable
    /// analysis pass. Behaviorally a `Fun`, but the free-variable evaluator
    /// uses `free_vars` to capture a minimal environment.
    FunFree {
        self_name: Option<String>,
        param: String,
        body: Rc<Expr>,
        free_vars: BTreeSet<String>,
    },
}

impl Expr {
    /// Variable reference.
    pub fn var(name: impl Into<String>) -> Expr {
        Expr::Var(name.into())
    }

    /// Integer constant.
    pub fn int(value: i64) -> Expr {
        Expr::Int(value)
    }

    /// Sum of two expressions.
    pub fn add(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Add(Rc::new(lhs), Rc::new(rhs))
    }

    /// Conditional on `lhs > rhs`.
    pub fn if_greater(lhs: Expr, rhs: Expr, then: Expr, otherwise: Expr) -> Expr {
        Expr::IfGreater {
            lhs: Rc::new(lhs),
            rhs: Rc::new(rhs),
            then: Rc::new(then),
            otherwise: Rc::new(otherwise),
        }
    }

    /// Anonymous, non-recursive function.
    pub fn lambda(param: impl Into<String>, body: Expr) -> Expr {
        Expr::Fun {
            self_name: None,
            param: param.into(),
            body: Rc::new(body),
        }
    }

    /// Function that may refer to itself as `self_name` inside `body`.
    pub fn named_fun(self_name: impl Into<String>, param: impl Into<String>, body: Expr) -> Expr {
        Expr::Fun {
            self_name: Some(self_name.into()),
            param: param.into(),
            body: Rc::new(body),
        }
    }

    /// Function application.
    pub fn call(callee: Expr, arg: Expr) -> Expr {
        Expr::Call {
            callee: Rc::new(callee),
            arg: Rc::new(arg),
        }
    }

    /// Local binding (`let name = value in body`).
    pub fn mlet(name: impl Into<String>, value: Expr, body: Expr) -> Expr {
        Expr::Let {
            name: name.into(),
            value: Rc::new(value),
            body: Rc::new(body),
        }
    }

    /// 2-tuple construction.
    pub fn pair(first: Expr, second: Expr) -> Expr {
        Expr::Pair(Rc::new(first), Rc::new(second))
    }

    /// First projection.
    pub fn fst(pair: Expr) -> Expr {
        Expr::Fst(Rc::new(pair))
    }

    /// Second projection.
    pub fn snd(pair: Expr) -> Expr {
        Expr::Snd(Rc::new(pair))
    }

    /// Unit test producing `Int(1)` or `Int(0)`.
    pub fn is_unit(e: Expr) -> Expr {
        Expr::IsUnit(Rc::new(e))
    }

    /// Name of this node kind, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Var(_) => "var",
            Expr::Int(_) => "int",
            Expr::Add(..) => "add",
            Expr::IfGreater { .. } => "ifgreater",
            Expr::Fun { .. } => "fun",
            Expr::Call { .. } => "call",
            Expr::Let { .. } => "let",
            Expr::Pair(..) => "pair",
            Expr::Fst(_) => "fst",
            Expr::Snd(_) => "snd",
            Expr::Unit => "unit",
            Expr::IsUnit(_) => "isunit",
            Expr::Closure { .. } => "closure",
            Expr::FunFree { .. } => "fun-free",
        }
    }

    /// Whether this expression is a fully-evaluated value.
    ///
    /// Values are `Int`, `Unit`, `Closure`, and pairs of values. Everything
    /// else still requires evaluation.
    pub fn is_value(&self) -> bool {
        match self {
            Expr::Int(_) | Expr::Unit | Expr::Closure { .. } => true,
            Expr::Pair(first, second) => first.is_value() && second.is_value(),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "var({name})"),
            Expr::Int(value) => write!(f, "int({value})"),
            Expr::Add(lhs, rhs) => write!(f, "add({lhs}, {rhs})"),
            Expr::IfGreater {
                lhs,
                rhs,
                then,
                otherwise,
            } => write!(f, "ifgreater({lhs}, {rhs}, {then}, {otherwise})"),
            Expr::Fun {
                self_name,
                param,
                body,
            } => match self_name {
                Some(name) => write!(f, "fun({name}, {param}, {body})"),
                None => write!(f, "fun(_, {param}, {body})"),
            },
            Expr::Call { callee, arg } => write!(f, "call({callee}, {arg})"),
            Expr::Let { name, value, body } => write!(f, "let({name}, {value}, {body})"),
            Expr::Pair(first, second) => write!(f, "pair({first}, {second})"),
            Expr::Fst(e) => write!(f, "fst({e})"),
            Expr::Snd(e) => write!(f, "snd({e})"),
            Expr::Unit => write!(f, "unit"),
            Expr::IsUnit(e) => write!(f, "isunit({e})"),
            Expr::Closure { env, fun } => write!(f, "closure({env}, {fun})"),
            Expr::FunFree {
                self_name,
                param,
                body,
                free_vars,
            } => {
                match self_name {
                    Some(name) => write!(f, "fun*({name}, {param}, {body}, {{")?,
                    None => write!(f, "fun*(_, {param}, {body}, {{")?,
                }
                for (i, name) in free_vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}")?;
                }
                write!(f, "}})")
            }
        }
    }
}
