//! uniset-par - The stateful Lexer and recursive-descent Parser for a
//! set-expression pattern, plus the Boundary API a caller actually
//! drives a parse through.
//!
//! `uniset_lex` holds everything that never needs to recurse back into
//! a parser: `CharStream`, the `LexicalElement`/`Token` vocabulary, and
//! `PropertyQueryScanner`. The stateful `Lexer` lives here instead,
//! alongside the `Parser`, because `Lexer::evaluate_variable` must
//! recursively invoke `parser::parse_unicode_set` when a variable's
//! right-hand side is itself a `[...]` expression (design notes,
//! "non-recursive variable expansion") — putting `Lexer` in `uniset_lex`
//! would make that a dependency cycle between the two crates.

mod boundary;
mod lexer;
mod options;
mod parser;
mod rebuilder;

pub use boundary::{apply_pattern, apply_pattern_ignore_space, apply_property_alias, resembles_pattern};
pub use lexer::Lexer;
pub use options::{
    ParseOptions, ADD_CASE_MAPPINGS, CASE_INSENSITIVE, CaseMode, IGNORE_SPACE, SIMPLE_CASE_INSENSITIVE,
};
pub use parser::{parse_unicode_set, parse_unicode_set_with_options, MAX_DEPTH};
pub use rebuilder::{append_escaped_cp, append_escaped_string, canonical_pattern};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use uniset_symtab::SimpleSymbolTable;

    #[test]
    fn test_end_to_end_simple_range() {
        let (set, rebuilt) = apply_pattern("[a-z]", &ParseOptions::default()).unwrap();
        assert!(set.contains('q' as u32));
        assert_eq!(rebuilt, "[a-z]");
    }

    #[test]
    fn test_end_to_end_with_variable() {
        use uniset_props::DefaultPropertyResolver;

        let mut symbols = SimpleSymbolTable::new();
        symbols.add_entry("Vowel", "[aeiou]").unwrap();

        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[$Vowel-[a]]", Some(&symbols), &resolver, true);
        let (set, rebuilt) =
            parse_unicode_set_with_options(&mut lexer, &ParseOptions::default()).unwrap();
        assert!(set.contains('e' as u32));
        assert!(!set.contains('a' as u32));
        assert_eq!(rebuilt, "[$Vowel-[a]]");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let (_, rebuilt1) = apply_pattern("[^a-cA-C]", &ParseOptions::default()).unwrap();
        let (_, rebuilt2) = apply_pattern(&rebuilt1, &ParseOptions::default()).unwrap();
        assert_eq!(rebuilt1, rebuilt2);
    }

    #[test]
    fn test_complement_is_idempotent() {
        let (once, _) = apply_pattern("[^a-z]", &ParseOptions::default()).unwrap();
        let (plain, _) = apply_pattern("[a-z]", &ParseOptions::default()).unwrap();
        assert_ne!(once, plain);
        let (twice, _) = apply_pattern("[^[^a-z]]", &ParseOptions::default()).unwrap();
        assert_eq!(twice, plain);
    }
}
