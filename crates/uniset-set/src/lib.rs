//! uniset-set - The code-point/string set value and its algebra.
//!
//! This is the **SetBuilder** the parsing pipeline treats as an opaque
//! collaborator: a mutable, ordered, disjoint union of inclusive
//! code-point ranges plus a side set of strings of length other than
//! one. The parser never inspects a [`CodePointSet`]'s internals beyond
//! the operations in [`SetBuilder`]; it only calls them while walking the
//! grammar.

mod case;
mod set;

pub use case::CaseMode;
pub use set::{CodePointSet, SetBuilder, MAX_CODE_POINT, U_ETHER};
