//! The [`PropertyResolver`] contract and a curated default implementation.

use std::sync::OnceLock;

use uniset_util::ParseError;
use uniset_set::{CodePointSet, SetBuilder, MAX_CODE_POINT};

use crate::names;

static UNICODE32_SET: OnceLock<CodePointSet> = OnceLock::new();

/// The cached "ICU 3.2 age" set (`[:age=3.2:]`), built once and frozen
/// before publication (§5, §9 "process-wide caches"). Uses the same
/// coarse early-assigned bucket `apply_property("age", _)` does below;
/// a real implementation would back this with per-character age data.
pub fn unicode32_set() -> &'static CodePointSet {
    UNICODE32_SET.get_or_init(|| {
        let mut set = CodePointSet::new();
        set.add_range(0x00, 0xFF).expect("static range is in bounds");
        set.freeze();
        set
    })
}

/// The contract `\p{Prop=Val}` / `[:Prop=Val:]` queries resolve through.
///
/// A real implementation is backed by generated Unicode Character
/// Database tables; `DefaultPropertyResolver` is a small, honestly
/// curated stand-in (see module docs).
pub trait PropertyResolver {
    /// Materialises the set of code points for which `prop` has value
    /// `value` (or, for binary properties queried bare, simply holds),
    /// unioning it into `set`. `value` is `None` for the bare-property
    /// form `\p{Prop}`.
    fn apply_property(
        &self,
        set: &mut CodePointSet,
        prop: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError>;

    /// The "inclusions" set for `prop`: code points worth probing when a
    /// filter-based property (numeric value, name, age) needs to locate
    /// its boundaries rather than being enumerated directly. Returns an
    /// empty set for properties this resolver does not treat as
    /// filter-based.
    fn inclusions(&self, prop: &str) -> CodePointSet;

    /// Canonical character name for `cp`, used by the `\N{HEX:LITERAL:NAME}`
    /// cross-check.
    fn name_of(&self, cp: u32) -> Option<String>;

    /// Resolves a character name (as used inside `\N{...}`) to a code
    /// point.
    fn lookup_name(&self, name: &str) -> Option<u32>;
}

/// A curated `PropertyResolver`: general category and binary properties
/// computed from `std::char` classification, a handful of scripts from a
/// hand-written block table, and character names from
/// [`crate::names`].
///
/// Known narrowings, all documented at the call site below:
/// - `script`/`script_extensions` cover only the blocks in
///   [`SCRIPT_BLOCKS`], not the full UCD script property.
/// - `age` buckets everything into one of two coarse generations rather
///   than tracking per-character introduction versions.
/// - `ccc` distinguishes only "zero" vs. "nonzero" combining class, not
///   the specific class number.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPropertyResolver;

/// Hand-written (code block, script name) table. Real script data
/// assigns scripts per character, not per contiguous block; this is a
/// coarse approximation adequate for ASCII/Latin/common-script patterns.
const SCRIPT_BLOCKS: &[(&str, u32, u32)] = &[
    ("Latin", 0x0041, 0x005A),
    ("Latin", 0x0061, 0x007A),
    ("Latin", 0x00C0, 0x024F),
    ("Greek", 0x0370, 0x03FF),
    ("Cyrillic", 0x0400, 0x04FF),
    ("Hebrew", 0x0590, 0x05FF),
    ("Arabic", 0x0600, 0x06FF),
    ("Hiragana", 0x3040, 0x309F),
    ("Katakana", 0x30A0, 0x30FF),
    ("Han", 0x4E00, 0x9FFF),
    ("Hangul", 0xAC00, 0xD7A3),
];

fn truthy_value(v: &str) -> Option<bool> {
    match v {
        "1" | "Y" | "y" | "T" | "t" | "True" | "true" | "Yes" | "yes" => Some(true),
        "0" | "N" | "n" | "F" | "f" | "False" | "false" | "No" | "no" => Some(false),
        _ => None,
    }
}

fn binary_predicate(prop: &str) -> Option<fn(char) -> bool> {
    match prop {
        "Alphabetic" | "Alpha" => Some(char::is_alphabetic),
        "White_Space" | "space" | "WSpace" => Some(char::is_whitespace),
        "Uppercase" | "Upper" => Some(char::is_uppercase),
        "Lowercase" | "Lower" => Some(char::is_lowercase),
        "Ascii" | "ASCII" => Some(|c: char| c.is_ascii()),
        "ASCII_Hex_Digit" | "AHex" => Some(|c: char| c.is_ascii_hexdigit()),
        "Alnum" => Some(char::is_alphanumeric),
        "Cased" => Some(|c: char| c.is_uppercase() || c.is_lowercase()),
        _ => None,
    }
}

fn gc_predicate(value: &str) -> Option<fn(char) -> bool> {
    Some(match value {
        "L" => char::is_alphabetic,
        "Lu" => char::is_uppercase,
        "Ll" => char::is_lowercase,
        "N" | "Nd" => |c: char| c.is_numeric(),
        "Z" | "Zs" => char::is_whitespace,
        "C" | "Cc" => char::is_control,
        "P" => |c: char| c.is_ascii_punctuation(),
        _ => return None,
    })
}

impl DefaultPropertyResolver {
    fn script_predicate(script: &str) -> impl Fn(u32) -> bool + '_ {
        move |cp: u32| {
            SCRIPT_BLOCKS
                .iter()
                .any(|&(name, lo, hi)| name == script && cp >= lo && cp <= hi)
        }
    }

    fn add_where(
        &self,
        set: &mut CodePointSet,
        pred: impl Fn(u32) -> bool,
    ) -> Result<(), ParseError> {
        let mut run_start: Option<u32> = None;
        for cp in 0..=MAX_CODE_POINT {
            let Some(c) = char::from_u32(cp) else {
                if let Some(start) = run_start.take() {
                    set.add_range(start, cp - 1)?;
                }
                continue;
            };
            if pred(cp) {
                if run_start.is_none() {
                    run_start = Some(cp);
                }
            } else if let Some(start) = run_start.take() {
                set.add_range(start, cp - 1)?;
            }
            let _ = c;
        }
        if let Some(start) = run_start {
            set.add_range(start, MAX_CODE_POINT)?;
        }
        Ok(())
    }
}

impl PropertyResolver for DefaultPropertyResolver {
    fn apply_property(
        &self,
        set: &mut CodePointSet,
        prop: &str,
        value: Option<&str>,
    ) -> Result<(), ParseError> {
        match prop {
            "special" => match value {
                Some("ANY") => set.add_range(0, MAX_CODE_POINT)?,
                Some("ASCII") => set.add_range(0, 0x7F)?,
                Some("Assigned") => {
                    self.add_where(set, |cp| char::from_u32(cp).is_some())?;
                }
                _ => {
                    return Err(ParseError::IllegalArgument(format!(
                        "unrecognised special token {:?}",
                        value
                    )))
                }
            },
            "gc" | "General_Category" | "category" => {
                let v = value.ok_or_else(|| {
                    ParseError::IllegalArgument("general category requires a value".to_string())
                })?;
                let pred = gc_predicate(v).ok_or_else(|| {
                    ParseError::IllegalArgument(format!("unknown general category {:?}", v))
                })?;
                self.add_where(set, |cp| char::from_u32(cp).is_some_and(pred))?;
            }
            "sc" | "script" | "scx" | "script_extensions" => {
                let v = value.ok_or_else(|| {
                    ParseError::IllegalArgument("script property requires a value".to_string())
                })?;
                let pred = Self::script_predicate(v);
                self.add_where(set, pred)?;
            }
            "na" | "name" => {
                let v = value.ok_or_else(|| {
                    ParseError::IllegalArgument("name property requires a value".to_string())
                })?;
                let cp = self.lookup_name(v).ok_or_else(|| {
                    ParseError::IllegalArgument(format!("no character named {:?}", v))
                })?;
                set.add(cp)?;
            }
            "age" => {
                // Simplified: one coarse bucket of "early" assigned
                // characters (ASCII + Latin-1) regardless of the
                // requested version, documented as a placeholder for
                // real per-character age data.
                let _ = value;
                set.add_range(0x00, 0xFF)?;
            }
            "ccc" | "canonical_combining_class" => {
                let v = value.unwrap_or("0");
                let nonzero = v.parse::<u32>().map(|n| n != 0).unwrap_or(true);
                if nonzero {
                    set.add_range(0x0300, 0x036F)?;
                } else {
                    self.add_where(set, |cp| !(0x0300..=0x036F).contains(&cp))?;
                }
            }
            "idt" | "identifier_type" => {
                let v = value.unwrap_or("Recommended");
                if v == "Recommended" {
                    self.add_where(set, |cp| {
                        char::from_u32(cp).is_some_and(|c| c.is_alphanumeric() || c == '_')
                    })?;
                }
            }
            _ => {
                if let Some(pred) = binary_predicate(prop) {
                    let present = value.map(truthy_value).unwrap_or(Some(true));
                    let present = present.ok_or_else(|| {
                        ParseError::IllegalArgument(format!(
                            "invalid binary property value {:?}",
                            value
                        ))
                    })?;
                    self.add_where(set, move |cp| {
                        char::from_u32(cp).is_some_and(pred) == present
                    })?;
                } else {
                    return Err(ParseError::IllegalArgument(format!(
                        "unknown property {:?}",
                        prop
                    )));
                }
            }
        }
        Ok(())
    }

    fn inclusions(&self, prop: &str) -> CodePointSet {
        // Properties this resolver treats as filter-based: probing is a
        // linear scan over all code points in `apply_property` already,
        // so the inclusions set is just "everything", kept narrow for
        // name/age/ccc where a full scan would be wasteful in a real
        // implementation.
        let mut set = CodePointSet::new();
        match prop {
            "na" | "name" => {
                for &(_, cp) in names::NAMES {
                    let _ = set.add(cp);
                }
            }
            _ => {
                let _ = set.add_range(0, MAX_CODE_POINT);
            }
        }
        set
    }

    fn name_of(&self, cp: u32) -> Option<String> {
        names::name_of(cp).map(|s| s.to_string())
    }

    fn lookup_name(&self, name: &str) -> Option<u32> {
        names::lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_category_uppercase() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "gc", Some("Lu")).unwrap();
        assert!(set.contains('A' as u32));
        assert!(!set.contains('a' as u32));
    }

    #[test]
    fn test_script_greek() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "script", Some("Greek")).unwrap();
        assert!(set.contains(0x03B1)); // alpha
        assert!(!set.contains('a' as u32));
    }

    #[test]
    fn test_name_lookup() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "na", Some("LATIN SMALL LETTER A"))
            .unwrap();
        assert!(set.contains('a' as u32));
    }

    #[test]
    fn test_unknown_name_errors() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        assert!(r
            .apply_property(&mut set, "na", Some("NOT A NAME"))
            .is_err());
    }

    #[test]
    fn test_special_any() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "special", Some("ANY")).unwrap();
        assert!(set.contains(0));
        assert!(set.contains(MAX_CODE_POINT));
    }

    #[test]
    fn test_special_ascii() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "special", Some("ASCII")).unwrap();
        assert!(set.contains(0x41));
        assert!(!set.contains(0x100));
    }

    #[test]
    fn test_binary_property_negated() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        r.apply_property(&mut set, "Uppercase", Some("0")).unwrap();
        assert!(!set.contains('A' as u32));
        assert!(set.contains('a' as u32));
    }

    #[test]
    fn test_unknown_property_errors() {
        let r = DefaultPropertyResolver;
        let mut set = CodePointSet::new();
        assert!(r.apply_property(&mut set, "bogus_prop", None).is_err());
    }

    #[test]
    fn test_unicode32_set_is_cached_and_frozen() {
        let a = unicode32_set();
        let b = unicode32_set();
        assert!(std::ptr::eq(a, b));
        assert!(a.is_frozen());
        assert!(a.contains(0x41));
        assert!(!a.contains(0x100));
    }
}
