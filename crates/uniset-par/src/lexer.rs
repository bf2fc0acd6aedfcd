//! The stateful token-producing Lexer.
//!
//! `uniset_lex::CharStream` only ever moves forward by one code point or
//! escape; everything stateful — two-token lookahead, the dispatch table
//! that decides what kind of element starts at the cursor, and variable
//! evaluation — lives here, next to the Parser it recurses into. See the
//! crate-level docs on why the two live together.

use uniset_lex::{unicode, CharStream, LexicalElement, PropertyQueryScanner, QueryForm, SetOp, Token};
use uniset_lex::{PARSE_ESCAPES, SKIP_WHITESPACE};
use uniset_props::PropertyResolver;
use uniset_symtab::SymbolTable;
use uniset_util::ParseError;

use crate::parser::parse_unicode_set;

/// Produces [`Token`]s from a set-expression pattern, with two tokens of
/// lookahead and non-recursive `$name` resolution.
///
/// `symbols` is `None` for the nested lexer `evaluate_variable` builds
/// over a variable's expansion text — the non-recursive-evaluation rule
/// from the design notes: a variable's right-hand side may not itself
/// reference another variable.
pub struct Lexer<'a> {
    cs: CharStream<'a>,
    symbols: Option<&'a dyn SymbolTable>,
    resolver: &'a dyn PropertyResolver,
    ignore_space: bool,
    la1: Option<Token>,
    la2: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(
        source: &'a str,
        symbols: Option<&'a dyn SymbolTable>,
        resolver: &'a dyn PropertyResolver,
        ignore_space: bool,
    ) -> Self {
        Self {
            cs: CharStream::new(source),
            symbols,
            resolver,
            ignore_space,
            la1: None,
            la2: None,
        }
    }

    /// Builds the nested lexer `evaluate_variable` uses to scan a
    /// variable's expansion text. No symbol table: expansions do not
    /// chain.
    fn for_variable_expansion(source: &'a str, resolver: &'a dyn PropertyResolver) -> Self {
        Self {
            cs: CharStream::for_variable_expansion(source),
            symbols: None,
            resolver,
            ignore_space: true,
            la1: None,
            la2: None,
        }
    }

    fn options(&self) -> u8 {
        if self.ignore_space {
            SKIP_WHITESPACE
        } else {
            0
        }
    }

    /// The byte offset of the lexer's current (post-lookahead) position,
    /// for error reporting.
    pub fn byte_offset(&self) -> usize {
        self.cs.byte_offset()
    }

    /// Returns the next token without consuming it, scanning it the
    /// first time it is asked for.
    pub fn lookahead(&mut self) -> Result<Token, ParseError> {
        if self.la1.is_none() {
            self.la1 = Some(self.scan_token()?);
        }
        Ok(self.la1.clone().expect("just filled"))
    }

    /// Returns the token after next, without consuming either. Needed for
    /// the parser's LL(2) decision around `-`.
    pub fn lookahead2(&mut self) -> Result<Token, ParseError> {
        self.lookahead()?;
        if self.la2.is_none() {
            self.la2 = Some(self.scan_token()?);
        }
        Ok(self.la2.clone().expect("just filled"))
    }

    /// Consumes and returns the current lookahead token.
    pub fn advance(&mut self) -> Result<Token, ParseError> {
        let tok = self.lookahead()?;
        self.la1 = self.la2.take();
        Ok(tok)
    }

    /// True once the lookahead token is [`LexicalElement::EndOfText`].
    pub fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.lookahead()?.kind.is_end())
    }

    /// Consumes the lookahead token if it is the given set operator.
    pub fn accept_set_operator(&mut self, op: SetOp) -> Result<bool, ParseError> {
        if self.lookahead()?.kind.is_operator(op) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Errors with [`ParseError::MalformedVariableDefinition`] unless the
    /// lexer has nothing left to scan. Used after a variable's expansion
    /// parses as a complete `[...]` set, to reject trailing garbage.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.at_end()? {
            Ok(())
        } else {
            Err(ParseError::MalformedVariableDefinition(
                "variable expansion has trailing characters after its set expression".to_string(),
            ))
        }
    }

    /// The `next_token` algorithm: skip ignored whitespace, read one raw
    /// code point, and dispatch on it. Each branch below corresponds to a
    /// numbered step in the design notes.
    fn scan_token(&mut self) -> Result<Token, ParseError> {
        let options = self.options();
        self.cs.skip_ignored(options);
        let start = self.cs.byte_offset();

        if self.cs.at_end() {
            return Ok(Token::end_of_text(start));
        }

        let before_c1 = self.cs.pos();
        let c1 = self.cs.next_raw().expect("checked at_end above");

        // Step 4: two-character lookahead for the property-query
        // introducers `[:`, `\p`, `\P`, `\N`.
        if c1 == '[' && self.cs.peek_raw() == Some(':') {
            self.cs.next_raw();
            let set = PropertyQueryScanner::scan(&mut self.cs, QueryForm::Posix, self.resolver)?;
            return Ok(self.finish(start, LexicalElement::PropertyQuery(set)));
        }
        if c1 == '\\' {
            match self.cs.peek_raw() {
                Some('p') => {
                    self.cs.next_raw();
                    self.expect_brace_open(start)?;
                    let set =
                        PropertyQueryScanner::scan(&mut self.cs, QueryForm::PerlPositive, self.resolver)?;
                    return Ok(self.finish(start, LexicalElement::PropertyQuery(set)));
                }
                Some('P') => {
                    self.cs.next_raw();
                    self.expect_brace_open(start)?;
                    let set =
                        PropertyQueryScanner::scan(&mut self.cs, QueryForm::PerlNegative, self.resolver)?;
                    return Ok(self.finish(start, LexicalElement::PropertyQuery(set)));
                }
                Some('N') => {
                    self.cs.next_raw();
                    self.expect_brace_open(start)?;
                    let cp = PropertyQueryScanner::scan_named(&mut self.cs, self.resolver)?;
                    return Ok(self.finish(start, LexicalElement::NamedElement(cp)));
                }
                _ => {}
            }
        }

        // Step 5: `$name` variable reference.
        if c1 == '$' {
            if let Some(symbols) = self.symbols {
                let text = self.cs.source();
                let mut pos = self.cs.byte_offset();
                let name = symbols.parse_reference(text, &mut pos, text.len());
                if !name.is_empty() {
                    let advance_by = pos - self.cs.byte_offset();
                    self.cs.jumpahead(advance_by);
                    let pos_after = self.cs.byte_offset();
                    if let Some(set) = symbols.lookup_set(&name) {
                        let set = set.clone();
                        return Ok(Token::new(
                            LexicalElement::Variable {
                                set: Some(set),
                                name: name.clone(),
                            },
                            pos_after,
                            format!("${}", name),
                        ));
                    }
                    if let Some(expansion) = symbols.lookup(&name) {
                        let expansion = expansion.to_string();
                        return self.evaluate_variable(&name, &expansion, pos_after);
                    }
                    return Err(ParseError::UndefinedVariable(name));
                }
            }
        }

        // Step 6: single-character set operators (including `$` when it
        // was not the start of a bound variable reference).
        if let Some(op) = SetOp::from_char(c1) {
            return Ok(self.finish(start, LexicalElement::SetOperator(op)));
        }

        // Step 7: `\` that was not one of the property-query introducers
        // above — re-read from the backslash as a full escape sequence.
        if c1 == '\\' {
            self.cs.set_pos(before_c1);
            return match self.cs.next(PARSE_ESCAPES)? {
                Some((cp, _)) => Ok(self.finish(start, LexicalElement::EscapedElement(cp))),
                None => unreachable!("already confirmed input remains"),
            };
        }

        // Step 8: `{...}` bracketed element or string literal.
        if c1 == '{' {
            return self.scan_braced_element(start);
        }

        // Step 9: fall through to a bare literal code point.
        Ok(self.finish(start, LexicalElement::LiteralElement(c1 as u32)))
    }

    fn finish(&self, start: usize, kind: LexicalElement) -> Token {
        let pos_after = self.cs.byte_offset();
        let text = self.cs.source()[start..pos_after].to_string();
        Token::new(kind, pos_after, text)
    }

    fn expect_brace_open(&mut self, start: usize) -> Result<(), ParseError> {
        if self.cs.next_raw() == Some('{') {
            Ok(())
        } else {
            Err(ParseError::MalformedSet {
                offset: start,
                reason: "expected '{' after property-query introducer".to_string(),
            })
        }
    }

    /// Collects the body of a `{...}` element. A body that decodes to
    /// exactly one code point is a [`LexicalElement::BracketedElement`]
    /// (braces used purely to disambiguate, e.g. `{-}` for a literal
    /// hyphen); anything else is a [`LexicalElement::StringLiteral`].
    ///
    /// Pattern whitespace inside the braces is rejected outright. Real
    /// set-expression implementations have historically treated this as
    /// a transitional warning before promoting it to an error; there is
    /// no transitional period to honour here, so it is simply an error.
    fn scan_braced_element(&mut self, start: usize) -> Result<Token, ParseError> {
        let mut text = String::new();
        loop {
            if self.cs.at_end() {
                return Err(ParseError::MalformedSet {
                    offset: start,
                    reason: "unterminated string literal".to_string(),
                });
            }
            if self.cs.peek_raw() == Some('}') {
                self.cs.next_raw();
                break;
            }
            if self.cs.peek_raw() == Some('\\') && self.cs.peek_raw_at(1) == Some('N') {
                self.cs.next_raw();
                self.cs.next_raw();
                self.expect_brace_open(start)?;
                let cp = PropertyQueryScanner::scan_named(&mut self.cs, self.resolver)?;
                let c = char::from_u32(cp).ok_or_else(|| {
                    ParseError::IllegalArgument(format!(
                        "invalid code point U+{:X} from \\N{{...}}",
                        cp
                    ))
                })?;
                text.push(c);
                continue;
            }
            if let Some(c) = self.cs.peek_raw() {
                if unicode::is_pattern_whitespace(c) {
                    return Err(ParseError::MalformedSet {
                        offset: self.cs.byte_offset(),
                        reason: "pattern whitespace is not permitted inside a string literal"
                            .to_string(),
                    });
                }
            }
            match self.cs.next(PARSE_ESCAPES)? {
                Some((cp, _)) => {
                    let c = char::from_u32(cp).ok_or_else(|| {
                        ParseError::IllegalArgument(format!(
                            "invalid code point U+{:X} inside string literal",
                            cp
                        ))
                    })?;
                    text.push(c);
                }
                None => {
                    return Err(ParseError::MalformedSet {
                        offset: start,
                        reason: "unterminated string literal".to_string(),
                    })
                }
            }
        }

        let pos_after = self.cs.byte_offset();
        let source_text = self.cs.source()[start..pos_after].to_string();
        let mut chars = text.chars();
        let kind = match (chars.next(), chars.next()) {
            (Some(c), None) => LexicalElement::BracketedElement(c as u32),
            _ => LexicalElement::StringLiteral(text),
        };
        Ok(Token::new(kind, pos_after, source_text))
    }

    /// Non-recursive variable evaluation (design notes §4.2.1): lex the
    /// expansion text with a fresh, symbol-less lexer. If it begins with
    /// `[`, the whole expansion must be a complete set expression, parsed
    /// by recursing into the Parser. Otherwise the expansion must lex to
    /// exactly one token, whose category the `$name` reference inherits
    /// (with its source text overridden to `"$name"`).
    fn evaluate_variable(
        &mut self,
        name: &str,
        expansion: &str,
        pos_after: usize,
    ) -> Result<Token, ParseError> {
        let mut nested = Lexer::for_variable_expansion(expansion, self.resolver);
        let first = nested.lookahead()?;

        if first.kind.is_operator(SetOp::LBracket) {
            let set = parse_unicode_set(&mut nested)?;
            nested.expect_end()?;
            return Ok(Token::new(
                LexicalElement::Variable {
                    set: Some(set),
                    name: name.to_string(),
                },
                pos_after,
                format!("${}", name),
            ));
        }

        let tok = nested.advance()?;
        if tok.kind.is_end() {
            return Err(ParseError::MalformedVariableDefinition(format!(
                "variable ${} has an empty expansion",
                name
            )));
        }
        if !nested.at_end()? {
            return Err(ParseError::MalformedVariableDefinition(format!(
                "variable ${} expands to more than one lexical element",
                name
            )));
        }
        Ok(Token::new(tok.kind, pos_after, format!("${}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uniset_props::DefaultPropertyResolver;
    use uniset_symtab::SimpleSymbolTable;

    fn lex_all(source: &str) -> Vec<LexicalElement> {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new(source, None, &resolver, true);
        let mut out = Vec::new();
        loop {
            let tok = lexer.advance().unwrap();
            if tok.kind.is_end() {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn test_simple_range_tokens() {
        let toks = lex_all("[a-z]");
        assert_eq!(
            toks,
            vec![
                LexicalElement::SetOperator(SetOp::LBracket),
                LexicalElement::LiteralElement('a' as u32),
                LexicalElement::SetOperator(SetOp::Minus),
                LexicalElement::LiteralElement('z' as u32),
                LexicalElement::SetOperator(SetOp::RBracket),
            ]
        );
    }

    #[test]
    fn test_escaped_element() {
        let toks = lex_all("[\\u0041]");
        assert_eq!(
            toks,
            vec![
                LexicalElement::SetOperator(SetOp::LBracket),
                LexicalElement::EscapedElement(0x41),
                LexicalElement::SetOperator(SetOp::RBracket),
            ]
        );
    }

    #[test]
    fn test_posix_property_query() {
        let toks = lex_all("[[:Lu:]]");
        assert!(matches!(toks[1], LexicalElement::PropertyQuery(_)));
    }

    #[test]
    fn test_perl_property_query() {
        let toks = lex_all("[\\p{Lu}]");
        assert!(matches!(toks[1], LexicalElement::PropertyQuery(_)));
    }

    #[test]
    fn test_named_element() {
        let toks = lex_all("[\\N{LATIN SMALL LETTER A}]");
        assert_eq!(toks[1], LexicalElement::NamedElement('a' as u32));
    }

    #[test]
    fn test_string_literal() {
        let toks = lex_all("[{foo}]");
        assert_eq!(
            toks[1],
            LexicalElement::StringLiteral("foo".to_string())
        );
    }

    #[test]
    fn test_bracketed_single_char_element() {
        let toks = lex_all("[{-}]");
        assert_eq!(toks[1], LexicalElement::BracketedElement('-' as u32));
    }

    #[test]
    fn test_whitespace_in_braces_is_error() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[{a b}]", None, &resolver, true);
        lexer.advance().unwrap();
        assert!(lexer.advance().is_err());
    }

    #[test]
    fn test_variable_bound_to_set() {
        let resolver = DefaultPropertyResolver;
        let mut symbols = SimpleSymbolTable::new();
        let mut set = uniset_set::CodePointSet::new();
        uniset_set::SetBuilder::add_range(&mut set, 'a' as u32, 'z' as u32).unwrap();
        symbols.add_entry_set("Lower", set).unwrap();

        let mut lexer = Lexer::new("[$Lower]", Some(&symbols), &resolver, true);
        lexer.advance().unwrap();
        let tok = lexer.advance().unwrap();
        assert!(matches!(tok.kind, LexicalElement::Variable { set: Some(_), .. }));
        assert_eq!(tok.source_text, "$Lower");
    }

    #[test]
    fn test_variable_expands_to_single_literal() {
        let resolver = DefaultPropertyResolver;
        let mut symbols = SimpleSymbolTable::new();
        symbols.add_entry("Vowel", "a").unwrap();

        let mut lexer = Lexer::new("[$Vowel]", Some(&symbols), &resolver, true);
        lexer.advance().unwrap();
        let tok = lexer.advance().unwrap();
        assert_eq!(tok.kind, LexicalElement::LiteralElement('a' as u32));
        assert_eq!(tok.source_text, "$Vowel");
    }

    #[test]
    fn test_variable_expands_to_set_expression() {
        let resolver = DefaultPropertyResolver;
        let mut symbols = SimpleSymbolTable::new();
        symbols.add_entry("Lower", "[a-z]").unwrap();

        let mut lexer = Lexer::new("[$Lower]", Some(&symbols), &resolver, true);
        lexer.advance().unwrap();
        let tok = lexer.advance().unwrap();
        assert!(matches!(tok.kind, LexicalElement::Variable { set: Some(_), .. }));
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let resolver = DefaultPropertyResolver;
        let symbols = SimpleSymbolTable::new();
        let mut lexer = Lexer::new("[$Nope]", Some(&symbols), &resolver, true);
        lexer.advance().unwrap();
        assert!(lexer.advance().is_err());
    }

    #[test]
    fn test_dollar_without_symbol_table_is_operator() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[a$]", None, &resolver, true);
        lexer.advance().unwrap();
        lexer.advance().unwrap();
        let tok = lexer.advance().unwrap();
        assert_eq!(tok.kind, LexicalElement::SetOperator(SetOp::Dollar));
    }

    #[test]
    fn test_lookahead_does_not_consume() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[ab]", None, &resolver, true);
        let la = lexer.lookahead().unwrap();
        assert_eq!(la.kind, LexicalElement::SetOperator(SetOp::LBracket));
        let again = lexer.lookahead().unwrap();
        assert_eq!(again.kind, la.kind);
    }

    #[test]
    fn test_lookahead2() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[ab]", None, &resolver, true);
        assert_eq!(
            lexer.lookahead().unwrap().kind,
            LexicalElement::SetOperator(SetOp::LBracket)
        );
        assert_eq!(
            lexer.lookahead2().unwrap().kind,
            LexicalElement::LiteralElement('a' as u32)
        );
    }

    #[test]
    fn test_accept_set_operator() {
        let resolver = DefaultPropertyResolver;
        let mut lexer = Lexer::new("[a-z]", None, &resolver, true);
        assert!(lexer.accept_set_operator(SetOp::LBracket).unwrap());
        assert!(!lexer.accept_set_operator(SetOp::Minus).unwrap());
    }

    #[test]
    fn test_ignore_space_skips_whitespace() {
        let toks = lex_all("[ a - z ]");
        assert_eq!(
            toks,
            vec![
                LexicalElement::SetOperator(SetOp::LBracket),
                LexicalElement::LiteralElement('a' as u32),
                LexicalElement::SetOperator(SetOp::Minus),
                LexicalElement::LiteralElement('z' as u32),
                LexicalElement::SetOperator(SetOp::RBracket),
            ]
        );
    }
}
