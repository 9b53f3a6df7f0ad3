//! What the reconciler found before deciding to fetch.

use std::fmt;

/// Assessment of a local file against its remote variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantState {
    /// Nothing at the target path.
    Missing,
    /// A file exists but does not match; the reason says which check failed.
    Stale(String),
    /// Size and digest both match.
    Satisfied,
}

impl VariantState {
    /// Whether a transfer is required.
    pub fn needs_fetch(&self) -> bool {
        !matches!(self, VariantState::Satisfied)
    }
}

impl fmt::Display for VariantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantState::Missing => write!(f, "missing"),
            VariantState::Stale(reason) => write!(f, "stale ({})", reason),
            VariantState::Satisfied => write!(f, "satisfied"),
        }
    }
}
