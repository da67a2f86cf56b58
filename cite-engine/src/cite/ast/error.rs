//! Error types for the citation engine.
//!
//! The recognizers and the matcher never fail: malformed input degrades to
//! partial structure or to membership in the unmatched/unused result sets.
//! The only errors that propagate to callers are configuration mistakes.

use std::fmt;

/// Errors raised by the style catalog and the style learner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// The requested built-in style name is not in the catalog.
    UnknownStyle(String),
    /// The learner was given no example entries to learn from.
    EmptyExamples,
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::UnknownStyle(name) => {
                write!(f, "Unknown citation style: '{}'", name)
            }
            StyleError::EmptyExamples => {
                write!(f, "Style learning requires at least one example entry")
            }
        }
    }
}

impl std::error::Error for StyleError {}

/// Failure reported by an injected DOI resolver.
///
/// The engine absorbs these: a failed resolution leaves the `doi` field
/// absent and the pipeline continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveError(pub String);

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DOI resolution failed: {}", self.0)
    }
}

impl std::error::Error for ResolveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_names_the_style() {
        let err = StyleError::UnknownStyle("turabian".to_string());
        assert!(err.to_string().contains("turabian"));
    }
}
