//! Cursor over a set-expression pattern with escape decoding.
//!
//! `CharStream` wraps a [`Cursor`] the way `lexer::core::Lexer` wraps one
//! for a general-purpose language, but the unit of movement is a decoded
//! *code point*, not a raw token: callers ask for the next code point and
//! say whether escapes and leading whitespace should be honoured for this
//! particular call, rather than the stream deciding unilaterally.

use uniset_util::ParseError;

use crate::cursor::{Cursor, CursorSnapshot};
use crate::unicode;

/// Request escape-sequence decoding for this call to [`CharStream::next`].
pub const PARSE_ESCAPES: u8 = 1 << 0;
/// Skip leading pattern-whitespace before reading the code point.
pub const SKIP_WHITESPACE: u8 = 1 << 1;

/// An opaque bookmark into a [`CharStream`]. Obtained from [`CharStream::pos`]
/// and restored with [`CharStream::set_pos`]; callers must not construct one
/// by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos(CursorSnapshot);

/// A cursor over pattern text that decodes code points and escapes on
/// demand.
///
/// A `CharStream` constructed over the textual expansion of a variable
/// (see `Lexer::evaluate_variable` in the sibling `lexer` module) is
/// marked `is_variable_stream`; [`CharStream::in_variable`] reports that
/// for the lifetime of the stream, matching the spec's "peek through a
/// variable expansion" mode — in this design the whole nested stream
/// *is* that expansion, so the flag never changes mid-stream.
pub struct CharStream<'a> {
    cursor: Cursor<'a>,
    is_variable_stream: bool,
}

impl<'a> CharStream<'a> {
    /// Creates a stream over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            is_variable_stream: false,
        }
    }

    /// Creates a stream over the textual right-hand side of a variable
    /// binding. `in_variable` reports `true` for the whole lifetime of
    /// the returned stream.
    pub fn for_variable_expansion(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            is_variable_stream: true,
        }
    }

    /// True if this stream is lexing the textual expansion of a `$name`
    /// variable rather than the top-level pattern.
    pub fn in_variable(&self) -> bool {
        self.is_variable_stream
    }

    /// True if there is no more input.
    pub fn at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Opaque bookmark for the current position.
    pub fn pos(&self) -> Pos {
        Pos(self.cursor.snapshot())
    }

    /// Restores a bookmark obtained from [`CharStream::pos`].
    pub fn set_pos(&mut self, pos: Pos) {
        self.cursor.restore(pos.0);
    }

    /// Raw byte offset of the current position, for error reporting and
    /// for `Lexer::jumpahead`.
    pub fn byte_offset(&self) -> usize {
        self.cursor.position()
    }

    /// The full source text this stream was constructed over. Used by
    /// `Lexer` to hand a `&str` plus byte cursor to
    /// `SymbolTable::parse_reference`, which scans identifiers directly
    /// rather than going through `CharStream`.
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Advances the raw code-unit index by `n` bytes, bypassing escape
    /// and whitespace handling. Used when the SymbolTable has already
    /// consumed a range of the source ahead of the stream (`parse_reference`
    /// advances past an identifier before the Lexer resumes scanning).
    pub fn jumpahead(&mut self, n: usize) {
        self.cursor.advance_bytes(n);
    }

    /// Advances past pattern-whitespace without producing a code point.
    pub fn skip_ignored(&mut self, options: u8) {
        if options & SKIP_WHITESPACE == 0 {
            return;
        }
        while !self.cursor.is_at_end() && unicode::is_pattern_whitespace(self.cursor.current_char())
        {
            self.cursor.advance();
        }
    }

    /// Advances one code point or one escape sequence, honouring
    /// `options`. Returns `None` at end of input, `Some((cp, escaped))`
    /// otherwise — `escaped` is true iff the code point came from a `\`
    /// sequence rather than appearing literally.
    pub fn next(&mut self, options: u8) -> Result<Option<(u32, bool)>, ParseError> {
        self.skip_ignored(options);
        if self.cursor.is_at_end() {
            return Ok(None);
        }
        let c = self.cursor.current_char();
        if c == '\\' && options & PARSE_ESCAPES != 0 {
            self.cursor.advance();
            let cp = self.parse_escape()?;
            return Ok(Some((cp, true)));
        }
        self.cursor.advance();
        Ok(Some((c as u32, false)))
    }

    /// Reads one raw code point with no escape interpretation and no
    /// whitespace skipping — used by the Lexer's `next_token` dispatch,
    /// which must see `\` itself to decide what construct follows.
    pub fn next_raw(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            return None;
        }
        let c = self.cursor.current_char();
        self.cursor.advance();
        Some(c)
    }

    /// Peeks the raw code point at the current position without moving.
    pub fn peek_raw(&self) -> Option<char> {
        if self.cursor.is_at_end() {
            None
        } else {
            Some(self.cursor.current_char())
        }
    }

    /// Peeks `offset` raw code points ahead without moving.
    pub fn peek_raw_at(&self, offset: usize) -> Option<char> {
        let c = self.cursor.peek_char(offset);
        if self.cursor.position() + offset >= self.cursor.source().len() && c == '\0' {
            None
        } else {
            Some(c)
        }
    }

    /// Decodes one escape body (the cursor must be positioned just past
    /// the leading `\`). Historical Unicode-rules syntax:
    /// `\uXXXX` (4 hex), `\UXXXXXXXX` (8 hex), `\xHH` (2 hex),
    /// `\x{HEX...}` (1-6 hex, braced), `\n` `\r` `\t`, `\\`, `\'`, `\"`,
    /// and "self-quoted" `\c` for any other character `c`.
    fn parse_escape(&mut self) -> Result<u32, ParseError> {
        let offset = self.cursor.position();
        let Some(c) = self.next_raw() else {
            return Err(ParseError::MalformedSet {
                offset,
                reason: "trailing backslash with nothing to escape".to_string(),
            });
        };
        match c {
            'u' => self.parse_fixed_hex_escape(4, offset),
            'U' => self.parse_fixed_hex_escape(8, offset),
            'x' => {
                if self.peek_raw() == Some('{') {
                    self.parse_braced_hex_escape(offset)
                } else {
                    self.parse_fixed_hex_escape(2, offset)
                }
            }
            'n' => Ok('\n' as u32),
            'r' => Ok('\r' as u32),
            't' => Ok('\t' as u32),
            'a' => Ok(0x07),
            'b' => Ok(0x08),
            'f' => Ok(0x0C),
            'v' => Ok(0x0B),
            other => Ok(other as u32),
        }
    }

    fn parse_fixed_hex_escape(&mut self, digits: usize, offset: usize) -> Result<u32, ParseError> {
        let rest = self.cursor.remaining();
        match unicode::parse_fixed_hex(rest, digits) {
            Some((cp, consumed)) => {
                self.cursor.advance_bytes(consumed);
                Ok(cp)
            }
            None => Err(ParseError::IllegalArgument(format!(
                "invalid \\{} escape at offset {}: expected {} hex digits",
                if digits == 4 { "u" } else { "U" },
                offset,
                digits
            ))),
        }
    }

    fn parse_braced_hex_escape(&mut self, offset: usize) -> Result<u32, ParseError> {
        // current char is '{'
        self.cursor.advance();
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '}' {
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            return Err(ParseError::MalformedSet {
                offset,
                reason: "unterminated \\x{...} escape".to_string(),
            });
        }
        let hex = self.cursor.slice_from(start);
        self.cursor.advance(); // consume '}'
        unicode::parse_hex_run(hex).ok_or_else(|| {
            ParseError::IllegalArgument(format!(
                "invalid \\x{{...}} escape at offset {}: {:?} is not 1-6 hex digits",
                offset, hex
            ))
        })
    }
}
