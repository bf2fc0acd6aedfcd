//! uniset-props - The Unicode property database the core treats as an
//! opaque **PropertyResolver**.
//!
//! Real implementations of this contract are backed by generated tables
//! derived from the Unicode Character Database; building those tables is
//! explicitly out of scope for the parsing core (see the OUT OF SCOPE
//! section this crate's parent repository documents). What lives here is
//! a small, honest, *curated* resolver: general category and a handful
//! of scripts are computed from `std::char` classification and a short
//! hand-written block table, not from UCD data files. It is enough to
//! make `\p{...}` queries resolve to something real end to end, and its
//! narrowness is called out wherever it bites.

mod names;
mod resolver;

pub use resolver::{unicode32_set, DefaultPropertyResolver, PropertyResolver};
