//! The tagged token value the Lexer produces and the Parser consumes.

use uniset_set::CodePointSet;

/// The single-character operators with syntactic meaning in a set
/// expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    LBracket,
    RBracket,
    Caret,
    Amp,
    Minus,
    Dollar,
}

impl SetOp {
    /// Maps a raw code point to the operator it denotes, if any.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '[' => SetOp::LBracket,
            ']' => SetOp::RBracket,
            '^' => SetOp::Caret,
            '&' => SetOp::Amp,
            '-' => SetOp::Minus,
            '$' => SetOp::Dollar,
            _ => return None,
        })
    }

    /// The character this operator was lexed from.
    pub fn as_char(self) -> char {
        match self {
            SetOp::LBracket => '[',
            SetOp::RBracket => ']',
            SetOp::Caret => '^',
            SetOp::Amp => '&',
            SetOp::Minus => '-',
            SetOp::Dollar => '$',
        }
    }
}

/// A categorised lexical element, the unit the Parser sees.
///
/// `Variable`'s two fields capture the "pointer-owned vs. value-owned"
/// duality the design calls out: when the bound name resolved to a
/// pre-parsed set, `set` holds a clone of it (small enough here not to
/// need the reference-counted-handle trick real implementations use for
/// large sets); when it resolved to source text that lexed to a single
/// *other* token, `set` is `None` and the element has already been
/// replaced by that inner token's kind via [`LexicalElement::with_source`].
#[derive(Debug, Clone, PartialEq)]
pub enum LexicalElement {
    SetOperator(SetOp),
    LiteralElement(u32),
    EscapedElement(u32),
    NamedElement(u32),
    BracketedElement(u32),
    StringLiteral(String),
    PropertyQuery(CodePointSet),
    Variable {
        set: Option<CodePointSet>,
        name: String,
    },
    EndOfText,
}

impl LexicalElement {
    /// True for the sentinel that marks "no more input".
    pub fn is_end(&self) -> bool {
        matches!(self, LexicalElement::EndOfText)
    }

    /// True if this element is exactly the given set-operator.
    pub fn is_operator(&self, op: SetOp) -> bool {
        matches!(self, LexicalElement::SetOperator(o) if *o == op)
    }
}

/// A lexed token together with the bookkeeping the Parser and
/// PatternRebuilder need: the byte offset just past the token (so the
/// Parser can resynchronise after copying cached lookahead), and the
/// exact source slice that produced it (overridden to `"$name"` for a
/// variable substitution, per the variable-evaluation rule).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: LexicalElement,
    pub pos_after: usize,
    pub source_text: String,
}

impl Token {
    pub fn new(kind: LexicalElement, pos_after: usize, source_text: impl Into<String>) -> Self {
        Self {
            kind,
            pos_after,
            source_text: source_text.into(),
        }
    }

    pub fn end_of_text(pos_after: usize) -> Self {
        Self::new(LexicalElement::EndOfText, pos_after, "")
    }
}
