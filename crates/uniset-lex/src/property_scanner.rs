//! Scans a `[:...:]`, `\p{...}` / `\P{...}`, or `\N{...}` query and
//! resolves it to a set (or, for `\N`, a single code point) via an
//! external [`PropertyResolver`].

use uniset_props::PropertyResolver;
use uniset_set::{CodePointSet, SetBuilder};
use uniset_util::ParseError;

use crate::char_stream::{CharStream, PARSE_ESCAPES};

/// Which of the three query spellings introduced this scan. `\P{...}`
/// carries its own exterior negation; `[:...:]` discovers it from a
/// leading `^` inside the scan itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    /// `[:...:]`, negation spelled `[:^...:]`.
    Posix,
    /// `\p{...}`.
    PerlPositive,
    /// `\P{...}`, always exterior-negated.
    PerlNegative,
}

pub struct PropertyQueryScanner;

impl PropertyQueryScanner {
    /// Scans a property query body and resolves it to a set.
    ///
    /// `cs` must be positioned just past the opening delimiter (`[:` or
    /// `{`); this consumes through and including the closing delimiter
    /// (`:]` or `}`).
    pub fn scan(
        cs: &mut CharStream,
        form: QueryForm,
        resolver: &dyn PropertyResolver,
    ) -> Result<CodePointSet, ParseError> {
        let offset = cs.byte_offset();
        let mut exterior_negated = form == QueryForm::PerlNegative;

        if form == QueryForm::Posix && cs.peek_raw() == Some('^') {
            cs.next_raw();
            exterior_negated = true;
        }

        let body = Self::read_body(cs, form, offset)?;
        let (prop, value, interior_negated) = Self::split_body(&body);

        if exterior_negated && interior_negated {
            return Err(ParseError::MalformedSet {
                offset,
                reason: "doubly-negated property query (both \\P and \\u2260)".to_string(),
            });
        }

        let (prop, value) = Self::resolve_bare_form(prop, value);

        let mut set = CodePointSet::new();
        resolver.apply_property(&mut set, &prop, value.as_deref())?;

        if exterior_negated != interior_negated {
            set.complement_code_points()?;
        }
        Ok(set)
    }

    /// Scans a `\N{...}` named-character escape, returning the resolved
    /// code point. Supports the bare `\N{NAME}` form and the ICU
    /// extension `\N{HEX:LITERAL:NAME}`, which cross-checks the
    /// resolved name against the supplied hex and literal code points
    /// (any disagreement is an error).
    pub fn scan_named(
        cs: &mut CharStream,
        resolver: &dyn PropertyResolver,
    ) -> Result<u32, ParseError> {
        let offset = cs.byte_offset();
        let body = Self::read_body(cs, QueryForm::PerlPositive, offset)?;

        if let Some((hex_part, rest)) = body.split_once(':') {
            let Some((literal_part, name_part)) = rest.split_once(':') else {
                return Err(ParseError::MalformedSet {
                    offset,
                    reason: "malformed \\N{HEX:LITERAL:NAME} annotation".to_string(),
                });
            };
            let hex_cp = u32::from_str_radix(hex_part.trim(), 16).map_err(|_| {
                ParseError::IllegalArgument(format!(
                    "invalid hex in \\N{{...}} annotation: {:?}",
                    hex_part
                ))
            })?;
            let literal_cp = literal_part.trim().chars().next().map(|c| c as u32);
            let resolved = resolver.lookup_name(name_part.trim()).ok_or_else(|| {
                ParseError::IllegalArgument(format!(
                    "no character named {:?}",
                    name_part.trim()
                ))
            })?;
            if resolved != hex_cp || literal_cp != Some(resolved) {
                return Err(ParseError::IllegalArgument(format!(
                    "\\N{{...}} cross-check failed: hex U+{:04X}, literal {:?}, name resolves to U+{:04X}",
                    hex_cp, literal_part, resolved
                )));
            }
            Ok(resolved)
        } else {
            resolver.lookup_name(body.trim()).ok_or_else(|| {
                ParseError::IllegalArgument(format!("no character named {:?}", body.trim()))
            })
        }
    }

    fn read_body(cs: &mut CharStream, form: QueryForm, offset: usize) -> Result<String, ParseError> {
        let mut body = String::new();
        loop {
            if form == QueryForm::Posix {
                if cs.peek_raw() == Some(':') {
                    let save = cs.pos();
                    cs.next_raw();
                    if cs.peek_raw() == Some(']') {
                        cs.next_raw();
                        return Ok(body);
                    }
                    cs.set_pos(save);
                }
            } else if cs.peek_raw() == Some('}') {
                cs.next_raw();
                return Ok(body);
            }

            if cs.at_end() {
                return Err(ParseError::MalformedSet {
                    offset,
                    reason: "unterminated property query".to_string(),
                });
            }

            match cs.next(PARSE_ESCAPES)? {
                Some((cp, _)) => {
                    let c = char::from_u32(cp).ok_or_else(|| {
                        ParseError::IllegalArgument(format!(
                            "invalid code point U+{:X} inside property query",
                            cp
                        ))
                    })?;
                    body.push(c);
                }
                None => {
                    return Err(ParseError::MalformedSet {
                        offset,
                        reason: "unterminated property query".to_string(),
                    })
                }
            }
        }
    }

    /// Splits a query body on `=` or `≠` (U+2260), returning
    /// `(prop, value, interior_negated)`.
    fn split_body(body: &str) -> (&str, Option<&str>, bool) {
        if let Some(idx) = body.find('\u{2260}') {
            let (prop, rest) = body.split_at(idx);
            (prop.trim(), Some(rest['\u{2260}'.len_utf8()..].trim()), true)
        } else if let Some((prop, value)) = body.split_once('=') {
            (prop.trim(), Some(value.trim()), false)
        } else {
            (body.trim(), None, false)
        }
    }

    /// Canonicalises the bare `\p{Prop}` form: general-category values,
    /// script values, binary properties (value implied `1`), and the
    /// special tokens `ANY`/`ASCII`/`Assigned` are all spelled as a bare
    /// property name with no `=value`.
    fn resolve_bare_form(prop: &str, value: Option<&str>) -> (String, Option<String>) {
        if value.is_some() {
            return (prop.to_string(), value.map(|v| v.to_string()));
        }
        match prop {
            "ANY" | "ASCII" | "Assigned" => ("special".to_string(), Some(prop.to_string())),
            _ if is_general_category_value(prop) => ("gc".to_string(), Some(prop.to_string())),
            _ if is_known_script_value(prop) => ("script".to_string(), Some(prop.to_string())),
            _ => (prop.to_string(), Some("1".to_string())),
        }
    }
}

fn is_general_category_value(v: &str) -> bool {
    matches!(
        v,
        "L" | "Lu" | "Ll" | "Lt" | "Lm" | "Lo" | "N" | "Nd" | "Nl" | "No" | "P" | "Z" | "Zs" | "C"
            | "Cc"
    )
}

fn is_known_script_value(v: &str) -> bool {
    matches!(
        v,
        "Latin" | "Greek" | "Cyrillic" | "Hebrew" | "Arabic" | "Hiragana" | "Katakana" | "Han"
            | "Hangul"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniset_props::DefaultPropertyResolver;

    #[test]
    fn test_posix_bare_general_category() {
        let mut cs = CharStream::new("Lu:]");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::Posix, &r).unwrap();
        assert!(set.contains('A' as u32));
        assert!(!set.contains('a' as u32));
    }

    #[test]
    fn test_posix_negated() {
        let mut cs = CharStream::new("^Lu:]");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::Posix, &r).unwrap();
        assert!(!set.contains('A' as u32));
        assert!(set.contains('a' as u32));
    }

    #[test]
    fn test_perl_positive_with_value() {
        let mut cs = CharStream::new("script=Greek}");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::PerlPositive, &r).unwrap();
        assert!(set.contains(0x03B1));
    }

    #[test]
    fn test_perl_negative() {
        let mut cs = CharStream::new("Lu}");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::PerlNegative, &r).unwrap();
        assert!(!set.contains('A' as u32));
    }

    #[test]
    fn test_not_equal_operator() {
        let mut cs = CharStream::new("script\u{2260}Greek}");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::PerlPositive, &r).unwrap();
        assert!(!set.contains(0x03B1));
    }

    #[test]
    fn test_double_negation_is_error() {
        let mut cs = CharStream::new("script\u{2260}Greek}");
        let r = DefaultPropertyResolver;
        let err = PropertyQueryScanner::scan(&mut cs, QueryForm::PerlNegative, &r);
        assert!(err.is_err());
    }

    #[test]
    fn test_scan_named_bare() {
        let mut cs = CharStream::new("LATIN SMALL LETTER A}");
        let r = DefaultPropertyResolver;
        let cp = PropertyQueryScanner::scan_named(&mut cs, &r).unwrap();
        assert_eq!(cp, 'a' as u32);
    }

    #[test]
    fn test_scan_named_with_cross_check() {
        let mut cs = CharStream::new("61:a:LATIN SMALL LETTER A}");
        let r = DefaultPropertyResolver;
        let cp = PropertyQueryScanner::scan_named(&mut cs, &r).unwrap();
        assert_eq!(cp, 'a' as u32);
    }

    #[test]
    fn test_scan_named_cross_check_mismatch() {
        let mut cs = CharStream::new("62:a:LATIN SMALL LETTER A}");
        let r = DefaultPropertyResolver;
        assert!(PropertyQueryScanner::scan_named(&mut cs, &r).is_err());
    }

    #[test]
    fn test_unterminated_query_is_malformed() {
        let mut cs = CharStream::new("Lu");
        let r = DefaultPropertyResolver;
        assert!(PropertyQueryScanner::scan(&mut cs, QueryForm::PerlPositive, &r).is_err());
    }

    #[test]
    fn test_bare_binary_property_implies_value_1() {
        let mut cs = CharStream::new("Uppercase}");
        let r = DefaultPropertyResolver;
        let set = PropertyQueryScanner::scan(&mut cs, QueryForm::PerlPositive, &r).unwrap();
        assert!(set.contains('A' as u32));
        assert!(!set.contains('a' as u32));
    }
}
