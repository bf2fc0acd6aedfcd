//! uniset-symtab - The rule-builder's **SymbolTable** contract.
//!
//! The parsing core only ever reads through [`SymbolTable`]; it never
//! binds a variable itself (see the concurrency notes: "the parser never
//! binds variables"). [`SimpleSymbolTable`] is the one concrete
//! implementation this repository ships — a flat name-to-binding map a
//! caller populates ahead of time, then hands to `apply_pattern` as a
//! read-only borrow for the duration of a single parse.

use indexmap::IndexMap;
use uniset_set::CodePointSet;
use uniset_util::ParseError;

/// A variable's right-hand side: either unparsed source text (lexed on
/// first reference, per the non-recursive variable-evaluation rule) or
/// an already-materialised set value.
#[derive(Debug, Clone)]
pub enum Binding {
    /// The textual right-hand side of `$name = <text>`, re-lexed (with
    /// variable expansion disabled) every time `$name` is referenced.
    Source(String),
    /// A set value bound directly, without parsing — the case
    /// `lookup_set` exists to serve.
    Set(CodePointSet),
}

/// The contract the core's Lexer consults to resolve `$name` references.
///
/// An implementer owns the entries; the core only reads. `parse_reference`
/// intentionally mutates `pos` (not `self`) — the core's CharStream
/// resumes scanning from wherever the identifier ended.
pub trait SymbolTable {
    /// Scans an identifier in `text[*pos..limit]`, advancing `*pos` past
    /// it. An identifier starts with an ID-start code point and
    /// continues with ID-part code points. Returns the empty string
    /// (and leaves `*pos` unchanged) if `text[*pos]` is not an
    /// identifier start.
    fn parse_reference(&self, text: &str, pos: &mut usize, limit: usize) -> String;

    /// The unparsed source text of `name`'s most recent binding, if any.
    fn lookup(&self, name: &str) -> Option<&str>;

    /// The pre-parsed set value of `name`'s binding, if it was bound
    /// directly as a set rather than as source text.
    fn lookup_set(&self, name: &str) -> Option<&CodePointSet>;

    /// Reserved for a matcher-valued binding keyed by code point rather
    /// than name; vestigial in this core (see the open-questions note),
    /// always `None`.
    fn lookup_matcher(&self, _cp: u32) -> Option<()> {
        None
    }
}

/// A flat, insertion-ordered symbol table a caller populates before
/// parsing. Order is preserved (via [`IndexMap`]) purely so that
/// diagnostics and rebuilt patterns referencing multiple variables are
/// reproducible across runs.
#[derive(Debug, Default, Clone)]
pub struct SimpleSymbolTable {
    entries: IndexMap<String, Binding>,
    read_only: bool,
}

impl SimpleSymbolTable {
    /// An empty, writable symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this table read-only; further `add_*` calls fail with
    /// [`ParseError::NoWritePermission`].
    pub fn make_read_only(&mut self) {
        self.read_only = true;
    }

    /// Binds `name` to unparsed source text `source`. Fails with
    /// [`ParseError::VariableRedefinition`] if `name` is already bound,
    /// or [`ParseError::NoWritePermission`] if the table is read-only.
    pub fn add_entry(&mut self, name: impl Into<String>, source: impl Into<String>) -> Result<(), ParseError> {
        self.insert(name.into(), Binding::Source(source.into()))
    }

    /// Binds `name` directly to a pre-parsed set value.
    pub fn add_entry_set(&mut self, name: impl Into<String>, set: CodePointSet) -> Result<(), ParseError> {
        self.insert(name.into(), Binding::Set(set))
    }

    fn insert(&mut self, name: String, binding: Binding) -> Result<(), ParseError> {
        if self.read_only {
            return Err(ParseError::NoWritePermission(name));
        }
        if self.entries.contains_key(&name) {
            return Err(ParseError::VariableRedefinition(name));
        }
        self.entries.insert(name, binding);
        Ok(())
    }
}

fn is_id_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

impl SymbolTable for SimpleSymbolTable {
    fn parse_reference(&self, text: &str, pos: &mut usize, limit: usize) -> String {
        let slice = &text[*pos..limit.min(text.len())];
        let mut chars = slice.char_indices();
        let Some((_, first)) = chars.next() else {
            return String::new();
        };
        if !is_id_start(first) {
            return String::new();
        }
        let mut end = first.len_utf8();
        for (idx, c) in chars {
            if !is_id_continue(c) {
                break;
            }
            end = idx + c.len_utf8();
        }
        *pos += end;
        slice[..end].to_string()
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match self.entries.get(name) {
            Some(Binding::Source(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn lookup_set(&self, name: &str) -> Option<&CodePointSet> {
        match self.entries.get(name) {
            Some(Binding::Set(s)) => Some(s),
            _ => None,
        }
    }
}
