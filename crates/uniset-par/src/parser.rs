//! The recursive-descent Parser (§4.4): walks the Lexer's tokens into a
//! [`CodePointSet`] while incrementally rebuilding a normalised pattern
//! string alongside it.
//!
//! Each grammar production below returns the piece of a set it produced
//! together with the text that renders it. A `Restriction`'s left-hand
//! side is unioned directly into the enclosing Union's running set, and
//! every subsequent `&`/`-` applies directly to that same set — so a
//! Restriction can see and affect code points already contributed by
//! earlier sibling Terms, matching the historical in-place-mutation
//! semantics (see the grounding ledger).

use uniset_lex::{LexicalElement, SetOp, Token};
use uniset_set::{CodePointSet, SetBuilder};
use uniset_util::ParseError;

use crate::lexer::Lexer;
use crate::options::ParseOptions;
use crate::rebuilder::{append_escaped_cp, append_escaped_string, canonical_pattern};

/// Recursion limit on nested `[...]` restrictions, matching the design
/// notes' `MAX_DEPTH`.
pub const MAX_DEPTH: usize = 100;

/// Parses one `UnicodeSet` production and returns only its value —
/// the form `Lexer::evaluate_variable` needs, which has no use for the
/// rebuilt text of a variable's own expansion.
pub fn parse_unicode_set(lexer: &mut Lexer) -> Result<CodePointSet, ParseError> {
    let (set, _pretty) = parse_unicode_set_with_options(lexer, &ParseOptions::default())?;
    Ok(set)
}

/// Parses one `UnicodeSet` production under the given options, returning
/// both the resolved set and its normalised rebuilt pattern. The entry
/// point `apply_pattern`/`apply_pattern_ignore_space` use.
pub fn parse_unicode_set_with_options(
    lexer: &mut Lexer,
    options: &ParseOptions,
) -> Result<(CodePointSet, String), ParseError> {
    parse_unicode_set_inner(lexer, 0, options)
}

fn parse_unicode_set_inner(
    lexer: &mut Lexer,
    depth: usize,
    options: &ParseOptions,
) -> Result<(CodePointSet, String), ParseError> {
    if depth > MAX_DEPTH {
        return Err(ParseError::MalformedSet {
            offset: lexer.byte_offset(),
            reason: format!("set nesting exceeds the limit of {}", MAX_DEPTH),
        });
    }

    let la = lexer.lookahead()?;

    // Atomic alternatives (a property query, or a variable already bound
    // to a set) always rebuild as their own original source text — they
    // are never the frame that decides direct-vs-complement canonical
    // regeneration, only `[...]` is.
    if matches!(la.kind, LexicalElement::PropertyQuery(_))
        || matches!(la.kind, LexicalElement::Variable { set: Some(_), .. })
    {
        let mut set = match la.kind {
            LexicalElement::PropertyQuery(s) => s,
            LexicalElement::Variable { set: Some(s), .. } => s,
            _ => unreachable!("matched above"),
        };
        let pretty = la.source_text;
        lexer.advance()?;
        set.apply_case_closure(options.case_mode)?;
        return Ok((set, pretty));
    }

    if !la.kind.is_operator(SetOp::LBracket) {
        return Err(ParseError::MalformedSet {
            offset: lexer.byte_offset(),
            reason: format!(
                "expected a property query, '\\N{{...}}', a set-valued variable, or '[' but found {:?}",
                la.kind
            ),
        });
    }

    lexer.advance()?;
    let mut set = CodePointSet::new();
    let mut pretty = String::from("[");
    let mut is_complement = false;
    if lexer.accept_set_operator(SetOp::Caret)? {
        pretty.push('^');
        is_complement = true;
    }
    let mut has_restriction = false;
    parse_union(lexer, &mut set, &mut pretty, depth, &mut has_restriction, options)?;
    if !lexer.accept_set_operator(SetOp::RBracket)? {
        return Err(ParseError::MalformedSet {
            offset: lexer.byte_offset(),
            reason: "expected ']' to close the set".to_string(),
        });
    }
    pretty.push(']');

    set.apply_case_closure(options.case_mode)?;
    if is_complement {
        set.complement_code_points()?;
    }
    let rebuilt = if has_restriction {
        pretty
    } else {
        canonical_pattern(&set)
    };
    Ok((set, rebuilt))
}

fn parse_union(
    lexer: &mut Lexer,
    set: &mut CodePointSet,
    pretty: &mut String,
    depth: usize,
    has_restriction: &mut bool,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    // Union ::= ('-')? Terms ('-')?
    if lexer.accept_set_operator(SetOp::Minus)? {
        set.add('-' as u32)?;
        pretty.push_str("\\-");
    }

    loop {
        if lexer.at_end()? {
            break;
        }
        if lexer.lookahead()?.kind.is_operator(SetOp::Minus) {
            // A HYPHEN-MINUS reached here (not consumed by a Term) is the
            // trailing UnescapedHyphenMinus; by the historical-
            // compatibility rule it is emitted unescaped.
            lexer.advance()?;
            pretty.push('-');
            set.add('-' as u32)?;
            return Ok(());
        }
        if lexer.lookahead()?.kind.is_operator(SetOp::Dollar)
            && lexer.lookahead2()?.kind.is_operator(SetOp::RBracket)
        {
            lexer.advance()?;
            pretty.push('$');
            set.add_anchor()?;
            *has_restriction = true;
            return Ok(());
        }
        if lexer.lookahead()?.kind.is_operator(SetOp::RBracket) {
            break;
        }
        parse_term(lexer, set, pretty, depth, has_restriction, options)?;
    }
    Ok(())
}

fn parse_term(
    lexer: &mut Lexer,
    set: &mut CodePointSet,
    pretty: &mut String,
    depth: usize,
    has_restriction: &mut bool,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    let la = lexer.lookahead()?;
    let is_restriction_start = la.kind.is_operator(SetOp::LBracket)
        || matches!(la.kind, LexicalElement::PropertyQuery(_))
        || matches!(la.kind, LexicalElement::Variable { set: Some(_), .. });

    if is_restriction_start {
        *has_restriction = true;
        parse_restriction(lexer, set, pretty, depth, options)
    } else {
        parse_elements(lexer, set, pretty)
    }
}

fn parse_restriction(
    lexer: &mut Lexer,
    set: &mut CodePointSet,
    pretty: &mut String,
    depth: usize,
    options: &ParseOptions,
) -> Result<(), ParseError> {
    // Restriction ::= UnicodeSet RightHandSides
    // RightHandSides ::= ε | '&' UnicodeSet RightHandSides | '-' UnicodeSet RightHandSides
    //
    // The left-hand side is unioned directly into the enclosing Union's
    // running `set`, and every subsequent `&`/`-` then applies directly to
    // that same `set` — not to an isolated local — so a Restriction can
    // see and affect code points already contributed by earlier sibling
    // Terms in the same Union, matching the historical in-place-mutation
    // model exactly (e.g. `[a[b]-[a]]` removes the `a` added by the first
    // Term, yielding `{b}`, not `{a,b}`).
    let (lhs, lhs_text) = parse_unicode_set_inner(lexer, depth + 1, options)?;
    pretty.push_str(&lhs_text);
    set.union_with(&lhs)?;

    loop {
        if lexer.accept_set_operator(SetOp::Amp)? {
            pretty.push('&');
            let (rhs, rhs_text) = parse_unicode_set_inner(lexer, depth + 1, options)?;
            pretty.push_str(&rhs_text);
            set.intersect_with(&rhs)?;
        } else if lexer.lookahead()?.kind.is_operator(SetOp::Minus) {
            if lexer.lookahead2()?.kind.is_operator(SetOp::RBracket) {
                // The '-' belongs to the enclosing Union as a trailing
                // literal hyphen; leave it for parse_union to consume.
                break;
            }
            lexer.advance()?;
            pretty.push('-');
            let (rhs, rhs_text) = parse_unicode_set_inner(lexer, depth + 1, options)?;
            pretty.push_str(&rhs_text);
            set.subtract(&rhs)?;
        } else {
            break;
        }
    }

    Ok(())
}

fn parse_elements(
    lexer: &mut Lexer,
    set: &mut CodePointSet,
    pretty: &mut String,
) -> Result<(), ParseError> {
    // Elements ::= Element | RangeElement '-' RangeElement
    // Element  ::= RangeElement | string-literal
    let tok = lexer.advance()?;
    if let LexicalElement::StringLiteral(s) = &tok.kind {
        set.add_string(s.clone())?;
        append_escaped_string(pretty, s);
        return Ok(());
    }

    let first = element_code_point(&tok)?;
    append_escaped_cp(pretty, first);

    if !lexer.lookahead()?.kind.is_operator(SetOp::Minus) {
        set.add(first)?;
        return Ok(());
    }
    if lexer.lookahead2()?.kind.is_operator(SetOp::RBracket) {
        // Trailing UnescapedHyphenMinus belongs to the Union, not a Range;
        // this Elements production is just the singleton `first`.
        set.add(first)?;
        return Ok(());
    }

    lexer.advance()?; // consume the range '-'
    pretty.push('-');
    let last_tok = lexer.advance()?;
    let last = element_code_point(&last_tok)?;
    if last <= first {
        return Err(ParseError::IllegalArgument(format!(
            "range start U+{:04X} is not less than range end U+{:04X}",
            first, last
        )));
    }
    append_escaped_cp(pretty, last);
    set.add_range(first, last)?;
    Ok(())
}

/// Extracts the code point a [`RangeElement`] token carries. `$` is
/// accepted here too — historically ICU treats a bare `$` not caught by
/// the anchor or variable-reference rules as a literal dollar sign.
fn element_code_point(tok: &Token) -> Result<u32, ParseError> {
    match &tok.kind {
        LexicalElement::LiteralElement(cp)
        | LexicalElement::EscapedElement(cp)
        | LexicalElement::NamedElement(cp)
        | LexicalElement::BracketedElement(cp) => Ok(*cp),
        LexicalElement::SetOperator(SetOp::Dollar) => Ok('$' as u32),
        other => Err(ParseError::MalformedSet {
            offset: tok.pos_after,
            reason: format!("expected a range element or string literal but found {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniset_props::DefaultPropertyResolver;

    fn parse(source: &str) -> (CodePointSet, String) {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new(source, None, &resolver, true);
        parse_unicode_set_with_options(&mut lexer, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_scenario_1_simple_range() {
        let (set, rebuilt) = parse("[a-z]");
        assert!(set.contains('m' as u32));
        assert!(!set.contains('A' as u32));
        assert_eq!(rebuilt, "[a-z]");
    }

    #[test]
    fn test_scenario_2_complement_of_two_ranges() {
        let (set, rebuilt) = parse("[^a-cA-C]");
        assert!(!set.contains('a' as u32));
        assert!(!set.contains('B' as u32));
        assert!(set.contains('d' as u32));
        assert_eq!(rebuilt, "[^A-Ca-c]");
    }

    #[test]
    fn test_scenario_3_nested_difference() {
        let (set, rebuilt) = parse("[[a-z]-[aeiou]]");
        assert!(set.contains('b' as u32));
        assert!(!set.contains('a' as u32));
        assert_eq!(rebuilt, "[[a-z]-[aeiou]]");
    }

    #[test]
    fn test_scenario_4_nested_intersection() {
        let (set, rebuilt) = parse("[[a-z]&[m-q]]");
        assert!(set.contains('n' as u32));
        assert!(!set.contains('a' as u32));
        assert!(!set.contains('z' as u32));
        assert_eq!(rebuilt, "[[a-z]&[m-q]]");
    }

    #[test]
    fn test_scenario_5_strings_and_code_point() {
        let (set, rebuilt) = parse("[{foo}{bar}a]");
        assert!(set.contains('a' as u32));
        assert_eq!(set.strings().collect::<Vec<_>>(), vec!["bar", "foo"]);
        assert_eq!(rebuilt, "[a{bar}{foo}]");
    }

    #[test]
    fn test_scenario_6_property_query_and_range_intersection() {
        let (_set, rebuilt) = parse("[\\p{L}&[\\u0000-\\u00FF]]");
        assert_eq!(rebuilt, "[\\p{L}&[\\u0000-\\u00FF]]");
    }

    #[test]
    fn test_scenario_8_trailing_literal_hyphen_canonical() {
        let (set, rebuilt) = parse("[a-]");
        assert!(set.contains('a' as u32));
        assert!(set.contains('-' as u32));
        assert_eq!(rebuilt, "[\\-a]");
    }

    #[test]
    fn test_scenario_9_named_element_range() {
        let (set, rebuilt) = parse("[\\N{LATIN SMALL LETTER A}-\\N{LATIN SMALL LETTER C}]");
        assert!(set.contains('b' as u32));
        assert_eq!(rebuilt, "[a-c]");
    }

    #[test]
    fn test_scenario_11_reversed_range_is_illegal_argument() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[x-a]", None, &resolver, true);
        let err = parse_unicode_set_with_options(&mut lexer, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::IllegalArgument(_)));
    }

    #[test]
    fn test_scenario_12_unterminated_string_is_malformed_set() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[{abc", None, &resolver, true);
        let err = parse_unicode_set_with_options(&mut lexer, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedSet { .. }));
    }

    #[test]
    fn test_case_insensitive_closure_before_complement() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[^abc]", None, &resolver, true);
        let opts = ParseOptions {
            ignore_space: true,
            case_mode: CaseMode::CaseInsensitive,
        };
        let (set, _) = parse_unicode_set_with_options(&mut lexer, &opts).unwrap();
        assert!(!set.contains('a' as u32));
        assert!(!set.contains('A' as u32));
        assert!(set.contains('d' as u32));
    }

    #[test]
    fn test_depth_limit_exceeded_is_malformed_set() {
        let mut pattern = String::new();
        for _ in 0..=MAX_DEPTH + 1 {
            pattern.push('[');
        }
        pattern.push('a');
        for _ in 0..=MAX_DEPTH + 1 {
            pattern.push(']');
        }
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new(&pattern, None, &resolver, true);
        let err = parse_unicode_set_with_options(&mut lexer, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedSet { .. }));
    }

    #[test]
    fn test_anchor_sets_u_ether_and_restriction_flag() {
        let (set, rebuilt) = parse("[ab$]");
        assert!(set.has_anchor());
        assert_eq!(rebuilt, "[ab$]");
    }

    #[test]
    fn test_restriction_mutates_enclosing_union_in_place() {
        // A Restriction shares the enclosing Union's running set: the
        // preceding sibling Term "a" is visible to, and can be stripped
        // by, the Restriction's own '-' operator.
        let (set, _) = parse("[a[b]-[a]]");
        assert!(!set.contains('a' as u32));
        assert!(set.contains('b' as u32));
    }

    use uniset_set::CaseMode;
}
