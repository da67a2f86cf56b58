//! Structured bibliographic records parsed from reference-list entries.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::cite::ast::span::Span;

/// Stable identity of a reference entry: its position in the reference list
/// at parse time. Never changes, even when rendering reorders the list.
pub type ReferenceId = usize;

/// The renderable fields of a reference entry. Style grammars order these
/// into slots; the parser reports which span of an entry produced each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Authors,
    Year,
    Title,
    Container,
    /// Volume together with its parenthesized issue, when present.
    Volume,
    Pages,
    Publisher,
    Doi,
}

/// One author of a reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub surname: String,
    /// Given names or initials as written ("J.", "J. M.", "John").
    pub given: Option<String>,
}

impl Author {
    pub fn new(surname: impl Into<String>, given: Option<String>) -> Self {
        Self {
            surname: surname.into(),
            given,
        }
    }

    /// Initials derived from the given-name part ("John Michael" -> "J. M.").
    /// Already-abbreviated given names pass through with periods normalized.
    pub fn initials(&self) -> Option<String> {
        let given = self.given.as_deref()?;
        let mut initials = Vec::new();
        for word in given.split([' ', '.']) {
            let word = word.trim_matches(',');
            if let Some(first) = word.chars().next() {
                if first.is_alphabetic() {
                    initials.push(format!("{}.", first.to_uppercase()));
                }
            }
        }
        if initials.is_empty() {
            None
        } else {
            Some(initials.join(" "))
        }
    }
}

/// One full bibliographic record from the reference list.
///
/// Any field the parsing heuristics cannot locate is left absent rather than
/// guessed; rendering skips absent fields together with their separators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub id: ReferenceId,
    pub authors: Vec<Author>,
    pub year: Option<i32>,
    pub title: Option<String>,
    /// Journal or book title.
    pub container: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub publisher: Option<String>,
    /// URL form, e.g. `https://doi.org/10.1000/xyz`.
    pub doi: Option<String>,
    /// Original entry text, always populated.
    pub raw_text: String,
}

impl ReferenceEntry {
    /// An entry with only `id` and `raw_text` populated; the heuristic chain
    /// fills in whatever it can recover.
    pub fn bare(id: ReferenceId, raw_text: impl Into<String>) -> Self {
        Self {
            id,
            authors: Vec::new(),
            year: None,
            title: None,
            container: None,
            volume: None,
            issue: None,
            pages: None,
            publisher: None,
            doi: None,
            raw_text: raw_text.into(),
        }
    }

    pub fn first_author(&self) -> Option<&Author> {
        self.authors.first()
    }

    /// True when the heuristic chain recovered neither authors nor title.
    pub fn is_opaque(&self) -> bool {
        self.authors.is_empty() && self.title.is_none()
    }
}

/// Result of matching in-text citations against the reference list.
///
/// All collections are ordered so two runs over the same input produce
/// identical results. Numeric ids inside a combined marker are evaluated
/// independently: a partially-matched marker keeps its matched ids in
/// `citation_matches` and records the dangling ones in
/// `unmatched_numeric_ids`; the span lands in `unmatched_citations` only
/// when no id (or no author-year candidate) matched at all.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    /// Matched reference ids per citation span. At most one entry for an
    /// author-year citation; one per resolved id for numeric markers.
    pub citation_matches: BTreeMap<Span, Vec<ReferenceId>>,
    /// Citation spans with zero matched references.
    pub unmatched_citations: BTreeSet<Span>,
    /// Numeric ids that resolved to no reference, per span.
    pub unmatched_numeric_ids: BTreeMap<Span, Vec<u32>>,
    /// Reference ids never matched by any citation.
    pub unused_references: BTreeSet<ReferenceId>,
}

impl MatchResult {
    /// Ids of references matched by at least one citation.
    pub fn cited_ids(&self) -> BTreeSet<ReferenceId> {
        self.citation_matches.values().flatten().copied().collect()
    }
}
