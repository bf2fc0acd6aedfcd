//! uniset-util - Shared foundation types for the set-expression pipeline
//!
//! This crate holds the pieces every stage of a set-expression pipeline
//! (char stream, lexer, parser, rebuilder) needs and none of them owns on
//! its own:
//!
//! - [`span`]: byte-offset source locations (`Span`, `FileId`) attached to
//!   every token and diagnostic.
//! - [`diagnostic`]: a `Handler`/`Diagnostic`/`DiagnosticBuilder` stack for
//!   collecting and rendering errors without panicking mid-parse.
//! - [`error`]: the [`error::ParseError`] enum shared by every layer, with
//!   one variant per status code a pattern parser's external collaborators
//!   (symbol table, property resolver) can report.
//!
//! None of these types are specific to Unicode set expressions; they are
//! the same kind of ambient infrastructure a hand-rolled recursive-descent
//! parser needs regardless of what grammar it parses.

pub mod diagnostic;
pub mod error;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::{DiagnosticError, DiagnosticResult, ParseError, ParseResult};
pub use span::{FileId, Span};
