//! Diagnostic codes for categorizing pattern-parsing errors.
//!
//! This module provides the [`DiagnosticCode`] type for uniquely identifying
//! diagnostic messages, enabling users to look up documentation and suppress
//! specific warnings.
//!
//! # Examples
//!
//! ```
//! use uniset_util::diagnostic::DiagnosticCode;
//!
//! let code = DiagnosticCode::E_MALFORMED_SET;
//! assert_eq!(code.prefix(), "E");
//! assert_eq!(code.as_str(), "E2001");
//! ```

/// A unique code identifying a diagnostic message
///
/// Diagnostic codes follow the format `{prefix}{number}` where:
/// - `prefix` is typically "E" for errors or "W" for warnings
/// - `number` is a 4-digit number (padded with zeros)
///
/// This allows users to reference specific diagnostics in documentation
/// and suppression attributes.
///
/// # Examples
///
/// ```
/// use uniset_util::diagnostic::DiagnosticCode;
///
/// let code = DiagnosticCode::new("E", 1);
/// assert_eq!(code.as_str(), "E0001");
///
/// let malformed = DiagnosticCode::E_MALFORMED_SET;
/// assert_eq!(malformed.prefix(), "E");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    /// The prefix (e.g., "E" for error, "W" for warning)
    pub prefix: &'static str,
    /// The numeric identifier
    pub number: u32,
}

impl DiagnosticCode {
    /// Create a new diagnostic code
    #[inline]
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        Self { prefix, number }
    }

    /// Get the prefix (e.g., "E" for error, "W" for warning)
    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// Get the numeric identifier
    #[inline]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Get the full code string (e.g., "E0001", "W0001")
    pub fn as_str(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }

    // =========================================================================
    // PATTERN-PARSING ERROR CODES
    //
    // These mirror the UErrorCode family a set-expression parser reports
    // through its collaborators (illegal argument, malformed pattern, unknown
    // variable, and so on). 1xxx is the char-stream/lexer layer, 2xxx the
    // parser grammar, 3xxx the symbol table, 9xxx resource exhaustion.
    // =========================================================================

    /// E1001: an argument to a public entry point was invalid (null pattern,
    /// empty source, bad boundary indices).
    pub const E_ILLEGAL_ARGUMENT: Self = Self::new("E", 1001);

    /// E2001: the pattern text violates set-expression grammar (unbalanced
    /// brackets, operator in the wrong position, range with reversed bounds).
    pub const E_MALFORMED_SET: Self = Self::new("E", 2001);

    /// E2002: a `\p{...}` or `[:...:]` property shorthand did not name a
    /// known property or property value.
    pub const E_MALFORMED_SET_PROPERTY: Self = Self::new("E", 2002);

    /// E2003: parse recursion exceeded the nested-set depth limit.
    pub const E_MALFORMED_SET_DEPTH: Self = Self::new("E", 2003);

    /// E3001: `$name = ...` variable definition syntax is malformed.
    pub const E_MALFORMED_VARIABLE_DEFINITION: Self = Self::new("E", 3001);

    /// E3002: `$name` referenced a symbol the symbol table does not know.
    pub const E_UNDEFINED_VARIABLE: Self = Self::new("E", 3002);

    /// E3003: a symbol table rejected a definition because it is read-only.
    pub const E_NO_WRITE_PERMISSION: Self = Self::new("E", 3003);

    /// E3004: a symbol table already has a binding for this name.
    pub const E_VARIABLE_REDEFINITION: Self = Self::new("E", 3004);

    /// E9001: a backing allocation (range list, string set) could not grow.
    pub const E_MEMORY_ALLOCATION: Self = Self::new("E", 9001);
}

impl std::fmt::Debug for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DiagnosticCode({})", self.as_str())
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Standalone constant exports for convenience
pub const E_ILLEGAL_ARGUMENT: DiagnosticCode = DiagnosticCode::E_ILLEGAL_ARGUMENT;
pub const E_MALFORMED_SET: DiagnosticCode = DiagnosticCode::E_MALFORMED_SET;
pub const E_MALFORMED_SET_PROPERTY: DiagnosticCode = DiagnosticCode::E_MALFORMED_SET_PROPERTY;
pub const E_MALFORMED_SET_DEPTH: DiagnosticCode = DiagnosticCode::E_MALFORMED_SET_DEPTH;
pub const E_MALFORMED_VARIABLE_DEFINITION: DiagnosticCode =
    DiagnosticCode::E_MALFORMED_VARIABLE_DEFINITION;
pub const E_UNDEFINED_VARIABLE: DiagnosticCode = DiagnosticCode::E_UNDEFINED_VARIABLE;
pub const E_NO_WRITE_PERMISSION: DiagnosticCode = DiagnosticCode::E_NO_WRITE_PERMISSION;
pub const E_VARIABLE_REDEFINITION: DiagnosticCode = DiagnosticCode::E_VARIABLE_REDEFINITION;
pub const E_MEMORY_ALLOCATION: DiagnosticCode = DiagnosticCode::E_MEMORY_ALLOCATION;
