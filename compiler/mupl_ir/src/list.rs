//! Cons-list encoding.
//!
//! MUPL has no list type of its own; a sequence `[e0, e1, ..., en]` is
//! encoded as `pair(e0, pair(e1, ... pair(en, unit)))` and the empty
//! sequence is `unit`. These helpers convert between that encoding and a
//! native `Vec<Expr>` and are exact inverses on well-formed lists.

use thiserror::Error;

use crate::expr::Expr;

/// A list spine contained something other than `Pair` or `Unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("malformed MUPL list: expected pair or unit, got {got}")]
pub struct MalformedList {
    /// Kind of the offending node.
    pub got: &'static str,
}

/// Encode a native sequence as a MUPL cons list.
pub fn to_mupl_list(items: &[Expr]) -> Expr {
    items
        .iter()
        .rev()
        .fold(Expr::Unit, |tail, item| Expr::pair(item.clone(), tail))
}

/// Decode a MUPL cons list into a native sequence.
///
/// Walks the `snd` spine; every node must be a `Pair` until the terminating
/// `Unit`. Elements themselves are not inspected.
pub fn from_mupl_list(list: &Expr) -> Result<Vec<Expr>, MalformedList> {
    let mut items = Vec::new();
    let mut current = list;
    loop {
        match current {
            Expr::Unit => return Ok(items),
            Expr::Pair(first, rest) => {
                items.push((**first).clone());
                current = rest;
            }
            other => {
                return Err(MalformedList {
                    got: other.type_name(),
                })
            }
        }
    }
}
