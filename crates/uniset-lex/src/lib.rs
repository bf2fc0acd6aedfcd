//! uniset-lex - Character stream and property-query scanning for a
//! set-expression pattern.
//!
//! This crate holds the pieces of the pipeline that never need to call
//! back into the parser: [`cursor::Cursor`] (the raw UTF-8 cursor),
//! [`char_stream::CharStream`] (escape-aware code-point reading),
//! [`element`] (the tagged token shape the parser consumes), and
//! [`property_scanner::PropertyQueryScanner`] (the `[:…:]` / `\p{…}` /
//! `\N{…}` sub-scanner).
//!
//! The stateful token-producing Lexer itself — the thing with
//! `lookahead`/`lookahead2`/`advance` — lives one crate up, in
//! `uniset-par`, alongside the Parser. That split looks odd at first:
//! the design calls the Lexer and the Parser separate components. But
//! variable evaluation (§4.2.1 in the design notes) requires the Lexer
//! to invoke `Parser::parse_unicode_set` recursively when a variable's
//! expansion begins with `[`. Putting that invocation here would make
//! this crate depend on its own downstream consumer. Keeping the
//! mutually-recursive pair together in one crate is the textbook
//! compiler answer to that; a clean two-crate split would have to
//! duplicate one side or route through a trait object for no benefit.

pub mod char_stream;
pub mod cursor;
pub mod element;
pub mod property_scanner;
pub mod unicode;

pub use char_stream::{CharStream, Pos, PARSE_ESCAPES, SKIP_WHITESPACE};
pub use element::{LexicalElement, SetOp, Token};
pub use property_scanner::{PropertyQueryScanner, QueryForm};
