//! Boundary API (§4.6): the entry points a caller outside this crate
//! actually drives a parse through, built on top of [`Lexer`] and
//! [`parser`].

use uniset_lex::unicode::is_pattern_whitespace;
use uniset_props::{DefaultPropertyResolver, PropertyResolver};
use uniset_set::CodePointSet;
use uniset_symtab::SymbolTable;
use uniset_util::ParseError;

use crate::lexer::Lexer;
use crate::options::ParseOptions;
use crate::parser::parse_unicode_set_with_options;

/// True if `pattern[pos..]` looks like it could start a `UnicodeSet`
/// pattern — a `[`, or one of the property-query introducers. Cheap
/// enough to call before committing to a full parse (e.g. to decide
/// whether a token in some larger grammar is a set literal at all).
pub fn resembles_pattern(pattern: &str, pos: usize) -> bool {
    let rest = &pattern[pos.min(pattern.len())..];
    let mut chars = rest.chars();
    match chars.next() {
        Some('[') => true,
        Some('\\') => matches!(chars.next(), Some('p') | Some('P') | Some('N')),
        _ => false,
    }
}

/// Parses the entire string as one `UnicodeSet` pattern, with no symbol
/// table and the given options. Errors if anything is left over once
/// the set closes.
pub fn apply_pattern(
    pattern: &str,
    options: &ParseOptions,
) -> Result<(CodePointSet, String), ParseError> {
    let resolver = DefaultPropertyResolver;
    let mut lexer = Lexer::new(pattern, None, &resolver, options.ignore_space);
    let result = parse_unicode_set_with_options(&mut lexer, options)?;
    // Trailing pattern-whitespace is always tolerated here, independent of
    // whether `options.ignore_space` was set for the parse itself — the
    // original's `applyPattern` unconditionally skips whitespace after
    // `applyPatternIgnoreSpace` returns, before checking for leftovers.
    let rest = pattern[lexer.byte_offset()..].trim_start_matches(is_pattern_whitespace);
    if rest.is_empty() {
        Ok(result)
    } else {
        Err(ParseError::IllegalArgument(format!(
            "unexpected characters after set expression: {:?}",
            rest
        )))
    }
}

/// Parses one `UnicodeSet` pattern starting at `*pos`, advancing `*pos`
/// past the consumed text and leaving any trailing input for the caller
/// — the form a larger grammar embedding a set literal needs. Always
/// honours pattern-whitespace skipping regardless of `options.ignore_space`,
/// matching the historical "ignore space" entry point's name.
pub fn apply_pattern_ignore_space(
    pattern: &str,
    pos: &mut usize,
    symbols: Option<&dyn SymbolTable>,
    options: &ParseOptions,
    resolver: &dyn PropertyResolver,
) -> Result<(CodePointSet, String), ParseError> {
    let rest = &pattern[*pos..];
    let mut lexer = Lexer::new(rest, symbols, resolver, true);
    let opts = ParseOptions {
        ignore_space: true,
        ..*options
    };
    let result = parse_unicode_set_with_options(&mut lexer, &opts)?;
    *pos += lexer.byte_offset();
    Ok(result)
}

/// Resolves a bare `property=value` (or bare binary/general-category/
/// script alias) directly against a [`PropertyResolver`], bypassing the
/// Lexer/Parser entirely — the form `[:...:]`/`\p{...}` use internally,
/// exposed for callers that already have a parsed `(prop, value)` pair
/// and don't want to round-trip it through pattern text.
pub fn apply_property_alias(
    prop: &str,
    value: Option<&str>,
) -> Result<CodePointSet, ParseError> {
    let resolver = DefaultPropertyResolver;
    let mut set = CodePointSet::new();
    resolver.apply_property(&mut set, prop, value)?;
    Ok(set)
}
