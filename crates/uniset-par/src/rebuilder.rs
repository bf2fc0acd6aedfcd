//! PatternRebuilder (§4.5): canonical code-point/string escaping, and the
//! "regenerate from the final set value, whichever of the direct or
//! complemented form is shorter" rule a pure-ranges frame uses in place
//! of structure-preserving text.

use uniset_lex::unicode::is_set_syntax_char;
use uniset_set::{CodePointSet, SetBuilder};

/// Appends `cp`'s canonical rendering: printable ASCII verbatim except
/// set-syntax characters (backslash-escaped), anything else as `\uXXXX`
/// (BMP) or `\UXXXXXXXX`.
pub fn append_escaped_cp(out: &mut String, cp: u32) {
    match char::from_u32(cp) {
        Some(c) if is_set_syntax_char(c) => {
            out.push('\\');
            out.push(c);
        }
        Some(c) if (0x20..=0x7E).contains(&cp) => out.push(c),
        _ if cp <= 0xFFFF => out.push_str(&format!("\\u{:04X}", cp)),
        _ => out.push_str(&format!("\\U{:08X}", cp)),
    }
}

/// Appends a `{...}`-wrapped string literal, its interior characters
/// escaped identically to [`append_escaped_cp`].
pub fn append_escaped_string(out: &mut String, s: &str) {
    out.push('{');
    for c in s.chars() {
        append_escaped_cp(out, c as u32);
    }
    out.push('}');
}

/// Regenerates a canonical pattern from a set's final value, independent
/// of how it was originally spelled. Tries both the direct form and (when
/// the set carries no strings or anchor, which have no complement) the
/// complemented form, and keeps whichever is shorter — this is how a
/// union of plain ranges like `[^a-cA-C]` round-trips back to the short
/// complemented spelling instead of enumerating everything it doesn't
/// contain.
pub fn canonical_pattern(set: &CodePointSet) -> String {
    let direct = set.to_pattern(true);
    if set.strings().next().is_some() || set.has_anchor() {
        return direct;
    }
    let mut complement = set.clone();
    complement
        .complement_code_points()
        .expect("a non-frozen clone never fails to complement");
    let complement_body = complement.to_pattern(true);
    let complemented = format!("[^{}", &complement_body[1..]);
    if complemented.len() < direct.len() {
        complemented
    } else {
        direct
    }
}
