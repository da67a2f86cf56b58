//! In-text citation markers.
//!
//! These nodes are intentionally lightweight: the tokenizer produces them
//! directly from the body text and every later stage (matching, rendering,
//! reporting) treats them as read-only values.

use crate::cite::ast::span::Span;
use serde::{Deserialize, Serialize};

/// Classification of an in-text citation marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationVariant {
    /// `(Smith, 2020)`, `(Smith & Jones, 2020)`, narrative `Smith (2020)`.
    AuthorYear,
    /// `[1]`, `[1, 2]`, `[1-3]`, superscript `^1,2`.
    Numeric,
}

/// One in-text citation marker found in the body text.
///
/// Exactly one of (`authors` + `year`) or `numeric_ids` is populated,
/// according to `variant`. A parenthetical group with semicolon-separated
/// segments emits one citation per segment, all sharing the region `span`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InTextCitation {
    /// Region of the body text the marker occupies.
    pub span: Span,
    pub variant: CitationVariant,
    /// Explicit author surnames, in marker order. Empty for numeric markers.
    pub authors: Vec<String>,
    pub year: Option<i32>,
    /// Ascending, deduplicated reference positions (1-based), ranges expanded.
    pub numeric_ids: Vec<u32>,
    /// Original substring of the whole delimited region.
    pub raw_text: String,
    /// Narrative form (`Smith (2020)`) rather than parenthetical.
    pub narrative: bool,
    /// The marker carried an "et al." continuation; `authors` keeps only the
    /// explicit names, more may exist than modeled.
    pub et_al: bool,
    /// Word-aligned snippet of surrounding body text, captured at tokenize
    /// time for reporting.
    pub context: String,
}

impl InTextCitation {
    /// Build an author-year citation; numeric ids stay empty.
    pub fn author_year(span: Span, authors: Vec<String>, year: i32, raw_text: String) -> Self {
        Self {
            span,
            variant: CitationVariant::AuthorYear,
            authors,
            year: Some(year),
            numeric_ids: Vec::new(),
            raw_text,
            narrative: false,
            et_al: false,
            context: String::new(),
        }
    }

    /// Build a numeric citation; the author fields stay empty.
    pub fn numeric(span: Span, ids: Vec<u32>, raw_text: String) -> Self {
        Self {
            span,
            variant: CitationVariant::Numeric,
            authors: Vec::new(),
            year: None,
            numeric_ids: ids,
            raw_text,
            narrative: false,
            et_al: false,
            context: String::new(),
        }
    }

    /// First explicit author surname, when the marker names one.
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.variant, CitationVariant::Numeric)
    }
}
