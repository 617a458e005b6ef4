//! Ordered binding environments.
//!
//! `Env` is an immutable association list: lookup walks from the front and
//! returns the first match, so a newer binding of a name shadows an older
//! one. Extension pushes a binding in front of an `Rc`-shared tail, so
//! environments that diverge after a common prefix share that prefix.
//!
//! `Rc` (not `Arc`) is deliberate: evaluation is single-threaded.

use std::fmt;
use std::rc::Rc;

use crate::expr::Expr;

/// An immutable, ordered list of `(name, value)` bindings.
///
/// Closures hold an `Env` snapshot of their defining context; `Let` and
/// function calls extend an `Env` without touching the original.
#[derive(Clone, Debug, Default)]
pub struct Env {
    head: Option<Rc<Binding>>,
}

#[derive(Debug)]
struct Binding {
    name: String,
    value: Expr,
    next: Option<Rc<Binding>>,
}

impl Env {
    /// The empty environment.
    pub fn new() -> Env {
        Env { head: None }
    }

    /// Return a new environment with `name` bound in front.
    ///
    /// The receiver is unchanged; the new environment shares its tail.
    pub fn bind(&self, name: impl Into<String>, value: Expr) -> Env {
        Env {
            head: Some(Rc::new(Binding {
                name: name.into(),
                value,
                next: self.head.clone(),
            })),
        }
    }

    /// Look up the first binding of `name`, front to back.
    pub fn lookup(&self, name: &str) -> Option<&Expr> {
        self.iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    /// Iterate bindings front to back (nearest binding first).
    pub fn iter(&self) -> Bindings<'_> {
        Bindings {
            current: self.head.as_deref(),
        }
    }

    /// Number of bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the environment has no bindings at all.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Builds an environment where the *first* pair ends up in front, i.e. it
/// shadows any later pair with the same name.
impl<S: Into<String>> FromIterator<(S, Expr)> for Env {
    fn from_iter<I: IntoIterator<Item = (S, Expr)>>(iter: I) -> Env {
        let pairs: Vec<(S, Expr)> = iter.into_iter().collect();
        let mut env = Env::new();
        for (name, value) in pairs.into_iter().rev() {
            env = env.bind(name, value);
        }
        env
    }
}

/// Structural equality over the binding sequence, order included.
impl PartialEq for Env {
    fn eq(&self, other: &Env) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Env {}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        write!(f, "]")
    }
}

/// Front-to-back iterator over an environment's bindings.
pub struct Bindings<'a> {
    current: Option<&'a Binding>,
}

impl<'a> Iterator for Bindings<'a> {
    type Item = (&'a str, &'a Expr);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.current?;
        self.current = binding.next.as_deref();
        Some((binding.name.as_str(), &binding.value))
    }
}
