//! The concrete [`CodePointSet`] and the [`SetBuilder`] operations the
//! parser drives it through.

use std::collections::BTreeSet;

use uniset_util::ParseError;

use crate::case::CaseMode;

/// Highest valid Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Sentinel for the "anchor" introduced by a trailing `$` in a set
/// (`[abc$]`). It is a non-code-point marker outside `0..=0x10FFFF`; we
/// store it as a side flag on [`CodePointSet`] rather than widening the
/// range domain, per the implementation note in the design docs.
pub const U_ETHER: i64 = -1;

/// The operations the parser performs on a set value as it walks the
/// grammar. Implemented here by [`CodePointSet`]; kept as a trait so the
/// parser crate depends only on the contract, not the representation.
pub trait SetBuilder {
    /// Empties the set back to its initial state. No-op if frozen.
    fn clear(&mut self);
    /// Adds a single code point.
    fn add(&mut self, cp: u32) -> Result<(), ParseError>;
    /// Adds an inclusive range `lo..=hi`. Errors if `lo > hi`.
    fn add_range(&mut self, lo: u32, hi: u32) -> Result<(), ParseError>;
    /// Adds a multi-code-point (or zero-code-point) string member.
    fn add_string(&mut self, s: impl Into<String>) -> Result<(), ParseError>;
    /// Adds the anchor sentinel (`$]`).
    fn add_anchor(&mut self) -> Result<(), ParseError>;
    /// In-place union with `other`.
    fn union_with(&mut self, other: &Self) -> Result<(), ParseError>;
    /// In-place intersection with `other`.
    fn intersect_with(&mut self, other: &Self) -> Result<(), ParseError>;
    /// In-place set difference, removing members of `other`.
    fn subtract(&mut self, other: &Self) -> Result<(), ParseError>;
    /// Complements the code-point ranges within `0..=MAX_CODE_POINT` and
    /// drops every string member (strings have no complement).
    fn complement_code_points(&mut self) -> Result<(), ParseError>;
    /// Renders a canonical bracketed pattern for this set's current
    /// value, independent of however it was originally spelled.
    fn to_pattern(&self, escape_unprintable: bool) -> String;
    /// True once [`SetBuilder::freeze`] has been called; further mutation
    /// is rejected with [`ParseError::NoWritePermission`].
    fn is_frozen(&self) -> bool;
    /// Freezes the set against further mutation.
    fn freeze(&mut self);
    /// Augments the set with case variants per `mode`.
    fn apply_case_closure(&mut self, mode: CaseMode) -> Result<(), ParseError>;
}

/// A mutable ordered disjoint union of inclusive code-point ranges, plus
/// a side set of strings of length != 1.
///
/// Invariants (maintained here, never by callers): `ranges` is sorted by
/// start, pairwise disjoint, and non-adjacent (adjacent ranges are
/// always merged on insertion).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodePointSet {
    ranges: Vec<(u32, u32)>,
    strings: BTreeSet<String>,
    has_anchor: bool,
    frozen: bool,
}

impl CodePointSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A set containing the single inclusive range `lo..=hi`.
    pub fn from_range(lo: u32, hi: u32) -> Result<Self, ParseError> {
        let mut s = Self::new();
        s.add_range(lo, hi)?;
        Ok(s)
    }

    /// Iterates the set's disjoint ranges in ascending order.
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// Iterates the set's string members in sorted order.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_str())
    }

    /// True if this set carries the `$]` anchor sentinel.
    pub fn has_anchor(&self) -> bool {
        self.has_anchor
    }

    /// True if `cp` is a member of the code-point part of the set.
    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if cp < lo {
                    std::cmp::Ordering::Greater
                } else if cp > hi {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// True if the set has no code points, no strings, and no anchor.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.strings.is_empty() && !self.has_anchor
    }

    fn check_writable(&self) -> Result<(), ParseError> {
        if self.frozen {
            Err(ParseError::NoWritePermission(
                "set is frozen".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn insert_range(&mut self, lo: u32, hi: u32) {
        let mut all: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len() + 1);
        all.extend_from_slice(&self.ranges);
        all.push((lo, hi));
        all.sort_by_key(|&(lo, _)| lo);

        let mut out: Vec<(u32, u32)> = Vec::with_capacity(all.len());
        for (lo, hi) in all {
            match out.last_mut() {
                Some((_, phi)) if touches(*phi, lo) => {
                    *phi = (*phi).max(hi);
                }
                _ => out.push((lo, hi)),
            }
        }
        self.ranges = out;
    }
}

/// True if a range ending at `prev_hi` overlaps or is immediately
/// adjacent to one starting at `next_lo` (both already known sorted).
fn touches(prev_hi: u32, next_lo: u32) -> bool {
    next_lo <= prev_hi || (prev_hi != u32::MAX && prev_hi + 1 == next_lo)
}

impl SetBuilder for CodePointSet {
    fn clear(&mut self) {
        self.ranges.clear();
        self.strings.clear();
        self.has_anchor = false;
    }

    fn add(&mut self, cp: u32) -> Result<(), ParseError> {
        self.add_range(cp, cp)
    }

    fn add_range(&mut self, lo: u32, hi: u32) -> Result<(), ParseError> {
        self.check_writable()?;
        if lo > hi {
            return Err(ParseError::IllegalArgument(format!(
                "range start U+{:04X} exceeds range end U+{:04X}",
                lo, hi
            )));
        }
        if hi > MAX_CODE_POINT {
            return Err(ParseError::IllegalArgument(format!(
                "code point U+{:04X} exceeds U+10FFFF",
                hi
            )));
        }
        self.insert_range(lo, hi);
        Ok(())
    }

    fn add_string(&mut self, s: impl Into<String>) -> Result<(), ParseError> {
        self.check_writable()?;
        self.strings.insert(s.into());
        Ok(())
    }

    fn add_anchor(&mut self) -> Result<(), ParseError> {
        self.check_writable()?;
        self.has_anchor = true;
        Ok(())
    }

    fn union_with(&mut self, other: &Self) -> Result<(), ParseError> {
        self.check_writable()?;
        for &(lo, hi) in &other.ranges {
            self.insert_range(lo, hi);
        }
        for s in &other.strings {
            self.strings.insert(s.clone());
        }
        self.has_anchor = self.has_anchor || other.has_anchor;
        Ok(())
    }

    fn intersect_with(&mut self, other: &Self) -> Result<(), ParseError> {
        self.check_writable()?;
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (alo, ahi) = self.ranges[i];
            let (blo, bhi) = other.ranges[j];
            let lo = alo.max(blo);
            let hi = ahi.min(bhi);
            if lo <= hi {
                result.push((lo, hi));
            }
            if ahi < bhi {
                i += 1;
            } else {
                j += 1;
            }
        }
        self.ranges = result;
        self.strings.retain(|s| other.strings.contains(s));
        self.has_anchor = self.has_anchor && other.has_anchor;
        Ok(())
    }

    fn subtract(&mut self, other: &Self) -> Result<(), ParseError> {
        self.check_writable()?;
        let mut result = Vec::new();
        for &(mut lo, hi) in &self.ranges {
            for &(blo, bhi) in &other.ranges {
                if blo > hi || bhi < lo {
                    continue;
                }
                if blo > lo {
                    result.push((lo, blo - 1));
                }
                lo = bhi.saturating_add(1).max(lo);
                if lo > hi {
                    break;
                }
            }
            if lo <= hi {
                result.push((lo, hi));
            }
        }
        self.ranges = result;
        self.strings.retain(|s| !other.strings.contains(s));
        if other.has_anchor {
            self.has_anchor = false;
        }
        Ok(())
    }

    fn complement_code_points(&mut self) -> Result<(), ParseError> {
        self.check_writable()?;
        let mut complement = Vec::new();
        let mut next_lo = 0u32;
        for &(lo, hi) in &self.ranges {
            if lo > next_lo {
                complement.push((next_lo, lo - 1));
            }
            next_lo = hi.saturating_add(1);
            if hi == MAX_CODE_POINT {
                next_lo = MAX_CODE_POINT + 1;
            }
        }
        if next_lo <= MAX_CODE_POINT {
            complement.push((next_lo, MAX_CODE_POINT));
        }
        self.ranges = complement;
        self.strings.clear();
        Ok(())
    }

    fn to_pattern(&self, escape_unprintable: bool) -> String {
        let mut out = String::from("[");
        for &(lo, hi) in &self.ranges {
            push_escaped_cp(&mut out, lo, escape_unprintable);
            if lo != hi {
                out.push('-');
                push_escaped_cp(&mut out, hi, escape_unprintable);
            }
        }
        for s in &self.strings {
            out.push('{');
            for c in s.chars() {
                push_escaped_char(&mut out, c, escape_unprintable);
            }
            out.push('}');
        }
        if self.has_anchor {
            out.push('$');
        }
        out.push(']');
        out
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn freeze(&mut self) {
        self.frozen = true;
    }

    fn apply_case_closure(&mut self, mode: CaseMode) -> Result<(), ParseError> {
        self.check_writable()?;
        if !mode.is_active() {
            return Ok(());
        }
        let mut additions: Vec<u32> = Vec::new();
        for &(lo, hi) in &self.ranges {
            for cp in lo..=hi {
                if let Some(c) = char::from_u32(cp) {
                    for folded in c.to_lowercase().chain(c.to_uppercase()) {
                        additions.push(folded as u32);
                    }
                }
            }
        }
        for cp in additions {
            self.insert_range(cp, cp);
        }
        if mode == CaseMode::AddCaseMappings {
            // Reverse direction: anything that maps *to* an existing
            // member under simple case folding. Approximated the same
            // way: ASCII and the common Latin-1 pairs are symmetric
            // under `to_lowercase`/`to_uppercase`, so a second pass over
            // the now-expanded set already covers this for that subset.
            let snapshot = self.ranges.clone();
            for &(lo, hi) in &snapshot {
                for cp in lo..=hi {
                    if let Some(c) = char::from_u32(cp) {
                        for folded in c.to_lowercase().chain(c.to_uppercase()) {
                            self.insert_range(folded as u32, folded as u32);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn push_escaped_cp(out: &mut String, cp: u32, escape_unprintable: bool) {
    if let Some(c) = char::from_u32(cp) {
        push_escaped_char(out, c, escape_unprintable);
    } else {
        out.push_str(&format!("\\U{:08X}", cp));
    }
}

fn push_escaped_char(out: &mut String, c: char, escape_unprintable: bool) {
    match c {
        '[' | ']' | '{' | '}' | '-' | '&' | '^' | '$' | '\\' | ':' => {
            out.push('\\');
            out.push(c);
        }
        c if escape_unprintable && (c as u32) < 0x20 => {
            out.push_str(&format!("\\u{:04X}", c as u32));
        }
        c if escape_unprintable && (c as u32) > 0x7E => {
            if (c as u32) > 0xFFFF {
                out.push_str(&format!("\\U{:08X}", c as u32));
            } else {
                out.push_str(&format!("\\u{:04X}", c as u32));
            }
        }
        c => out.push(c),
    }
}
