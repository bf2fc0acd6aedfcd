//! Core error types for the uniset-util crate
//!
//! This module defines the [`ParseError`] enum, the error type threaded
//! through the char stream, lexer, and parser layers of a set-expression
//! pipeline, plus a small [`DiagnosticError`] for the diagnostic renderer
//! itself.

use thiserror::Error;

/// Errors a set-expression pipeline can report.
///
/// Each variant corresponds to one of the status codes a pattern parser's
/// external collaborators (symbol table, property resolver) can surface,
/// plus the parser's own grammar violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A public entry point received an invalid argument: a null or
    /// zero-length pattern, or start/limit indices outside the source.
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// The pattern text does not conform to set-expression grammar.
    #[error("malformed set at offset {offset}: {reason}")]
    MalformedSet { offset: usize, reason: String },

    /// A `$name = ...` binding was not well-formed.
    #[error("malformed variable definition: {0}")]
    MalformedVariableDefinition(String),

    /// `$name` did not resolve through the active symbol table.
    #[error("undefined variable: ${0}")]
    UndefinedVariable(String),

    /// The symbol table refused to bind a new variable (read-only table).
    #[error("no write permission for variable: ${0}")]
    NoWritePermission(String),

    /// A backing collection could not grow to hold the requested data.
    #[error("memory allocation failed: {0}")]
    MemoryAllocation(String),

    /// `$name` was already bound and redefinition is not permitted here.
    #[error("variable already defined: ${0}")]
    VariableRedefinition(String),
}

impl ParseError {
    /// The stable diagnostic code associated with this error's category.
    pub fn code(&self) -> crate::diagnostic::DiagnosticCode {
        use crate::diagnostic::DiagnosticCode as C;
        match self {
            ParseError::IllegalArgument(_) => C::E_ILLEGAL_ARGUMENT,
            ParseError::MalformedSet { .. } => C::E_MALFORMED_SET,
            ParseError::MalformedVariableDefinition(_) => C::E_MALFORMED_VARIABLE_DEFINITION,
            ParseError::UndefinedVariable(_) => C::E_UNDEFINED_VARIABLE,
            ParseError::NoWritePermission(_) => C::E_NO_WRITE_PERMISSION,
            ParseError::MemoryAllocation(_) => C::E_MEMORY_ALLOCATION,
            ParseError::VariableRedefinition(_) => C::E_VARIABLE_REDEFINITION,
        }
    }
}

/// Error type for diagnostic rendering operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagnosticError {
    /// Failed to format a diagnostic for display
    #[error("failed to format diagnostic: {0}")]
    FormatFailed(String),

    /// A diagnostic code string did not parse back into a `DiagnosticCode`
    #[error("invalid diagnostic code: {0}")]
    InvalidCode(String),
}

/// Result type alias for set-expression parsing operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for diagnostic operations
pub type DiagnosticResult<T> = std::result::Result<T, DiagnosticError>;
