//! Case-folding modes recognised by [`crate::SetBuilder::apply_case_closure`].

/// How a set should be augmented with case variants during finalisation.
///
/// Mirrors the configuration bits `CaseInsensitive`, `AddCaseMappings`,
/// `SimpleCaseInsensitive` folded into the pattern options word; `None`
/// is the default, no-op mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// No case folding performed.
    #[default]
    None,
    /// Full case-insensitive closure: every member gains every code point
    /// that full case-folds equal to it.
    CaseInsensitive,
    /// Like `CaseInsensitive`, but also adds the reverse direction
    /// (code points that map *to* a member under case folding).
    AddCaseMappings,
    /// Simple (1:1) case mappings only, no special-casing expansions.
    Simple,
}

impl CaseMode {
    /// Whether this mode requires any closure work at all.
    pub fn is_active(self) -> bool {
        !matches!(self, CaseMode::None)
    }
}
