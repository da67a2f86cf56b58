//! Validation reporting.
//!
//! Converts a [`MatchResult`] plus the citations and references it was
//! computed from into a serializable report: counts, unmatched citations
//! with their context snippets, unused references, and the advisory checks
//! (duplicates, incomplete entries, near-miss suggestions). Near-misses are
//! hints only; they never turn into matches, so the matcher stays exact and
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::cite::ast::{
    CitationVariant, InTextCitation, MatchResult, ReferenceEntry, ReferenceId, Span,
};
use crate::cite::matching::normalize_name;

/// Surname edit distance up to this is reported as a possible misspelling.
const SUGGESTION_EDIT_DISTANCE: usize = 2;
/// Title edit distance up to this marks two references as likely duplicates.
const DUPLICATE_TITLE_DISTANCE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total_citations: usize,
    pub total_references: usize,
    pub matched_citations: usize,
    pub unmatched: Vec<UnmatchedCitation>,
    pub unmatched_numeric: Vec<UnmatchedNumericIds>,
    pub unused: Vec<UnusedReference>,
    pub duplicates: Vec<DuplicatePair>,
    pub incomplete: Vec<IncompleteReference>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedCitation {
    pub span: Span,
    pub raw_text: String,
    /// Surrounding body text captured by the tokenizer.
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedNumericIds {
    pub span: Span,
    pub ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnusedReference {
    pub id: ReferenceId,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub first: ReferenceId,
    pub second: ReferenceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncompleteKind {
    /// Neither authors nor title could be recovered.
    Unparsed,
    MissingYear,
    MissingTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncompleteReference {
    pub id: ReferenceId,
    pub kind: IncompleteKind,
}

/// Near-miss between an unmatched citation and a reference: small surname
/// edit distance and/or a year off by one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub span: Span,
    pub citation_author: String,
    pub reference_id: ReferenceId,
    pub reference_author: String,
    pub note: String,
}

/// Build the report. Pure and deterministic; no I/O.
pub fn validate_report(
    matches: &MatchResult,
    citations: &[InTextCitation],
    references: &[ReferenceEntry],
) -> Report {
    let matched_citations = citations
        .iter()
        .filter(|c| matches.citation_matches.contains_key(&c.span))
        .count();

    let mut unmatched = Vec::new();
    for span in &matches.unmatched_citations {
        if let Some(citation) = citations.iter().find(|c| c.span == *span) {
            unmatched.push(UnmatchedCitation {
                span: *span,
                raw_text: citation.raw_text.clone(),
                context: citation.context.clone(),
            });
        }
    }

    let unmatched_numeric = matches
        .unmatched_numeric_ids
        .iter()
        .map(|(span, ids)| UnmatchedNumericIds {
            span: *span,
            ids: ids.clone(),
        })
        .collect();

    let unused = matches
        .unused_references
        .iter()
        .filter_map(|id| references.iter().find(|r| r.id == *id))
        .map(|r| UnusedReference {
            id: r.id,
            raw_text: r.raw_text.clone(),
        })
        .collect();

    Report {
        total_citations: citations.len(),
        total_references: references.len(),
        matched_citations,
        unmatched,
        unmatched_numeric,
        unused,
        duplicates: find_duplicates(references),
        incomplete: find_incomplete(references),
        suggestions: find_suggestions(matches, citations, references),
    }
}

/// References with the same normalized first-author surname and year, and
/// near-identical titles, are likely the same work entered twice.
fn find_duplicates(references: &[ReferenceEntry]) -> Vec<DuplicatePair> {
    let mut pairs = Vec::new();
    for (i, a) in references.iter().enumerate() {
        for b in &references[i + 1..] {
            let same_author = match (a.first_author(), b.first_author()) {
                (Some(x), Some(y)) => normalize_name(&x.surname) == normalize_name(&y.surname),
                _ => false,
            };
            if !same_author || a.year != b.year || a.year.is_none() {
                continue;
            }
            let titles_close = match (&a.title, &b.title) {
                (Some(x), Some(y)) => {
                    levenshtein(&normalize_name(x), &normalize_name(y))
                        <= DUPLICATE_TITLE_DISTANCE
                }
                (None, None) => true,
                _ => false,
            };
            if titles_close {
                pairs.push(DuplicatePair {
                    first: a.id,
                    second: b.id,
                });
            }
        }
    }
    pairs
}

fn find_incomplete(references: &[ReferenceEntry]) -> Vec<IncompleteReference> {
    let mut issues = Vec::new();
    for entry in references {
        if entry.is_opaque() {
            issues.push(IncompleteReference {
                id: entry.id,
                kind: IncompleteKind::Unparsed,
            });
            continue;
        }
        if entry.year.is_none() {
            issues.push(IncompleteReference {
                id: entry.id,
                kind: IncompleteKind::MissingYear,
            });
        }
        if entry.title.is_none() {
            issues.push(IncompleteReference {
                id: entry.id,
                kind: IncompleteKind::MissingTitle,
            });
        }
    }
    issues
}

fn find_suggestions(
    matches: &MatchResult,
    citations: &[InTextCitation],
    references: &[ReferenceEntry],
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    for span in &matches.unmatched_citations {
        let Some(citation) = citations
            .iter()
            .find(|c| c.span == *span && c.variant == CitationVariant::AuthorYear)
        else {
            continue;
        };
        let (Some(author), Some(year)) = (citation.first_author(), citation.year) else {
            continue;
        };
        let cited_author = normalize_name(author);

        for reference in references {
            let Some(ref_author) = reference.first_author() else {
                continue;
            };
            let Some(ref_year) = reference.year else {
                continue;
            };
            if (year - ref_year).abs() > 1 {
                continue;
            }
            let ref_surname = normalize_name(&ref_author.surname);
            let distance = levenshtein(&cited_author, &ref_surname);
            if distance > SUGGESTION_EDIT_DISTANCE {
                continue;
            }
            let note = if distance > 0 && year != ref_year {
                "author spelling and year both differ slightly"
            } else if distance > 0 {
                "possible author spelling difference"
            } else {
                "year differs by one"
            };
            suggestions.push(Suggestion {
                span: *span,
                citation_author: author.to_string(),
                reference_id: reference.id,
                reference_author: ref_author.surname.clone(),
                note: note.to_string(),
            });
        }
    }
    suggestions
}

/// Classic two-row edit distance; inputs are short normalized names.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::matching::match_citations;
    use crate::cite::parsing::parse_references;
    use crate::cite::tokenizing::tokenize_citations;

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("smith", "smith"), 0);
        assert_eq!(levenshtein("smith", "smyth"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
    }

    #[test]
    fn test_spelling_near_miss_is_a_suggestion_not_a_match() {
        let body = "As shown (Smyth, 2020).";
        let citations = tokenize_citations(body);
        let references = parse_references(&[
            "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
        ]);
        let matches = match_citations(&citations, &references);
        let report = validate_report(&matches, &citations, &references);

        assert_eq!(report.matched_citations, 0);
        assert_eq!(report.unmatched.len(), 1);
        assert_eq!(report.suggestions.len(), 1);
        assert_eq!(report.suggestions[0].reference_id, 0);
        assert!(report.suggestions[0].note.contains("spelling"));
    }

    #[test]
    fn test_duplicate_detection() {
        let references = parse_references(&[
            "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
            "Smith, J. (2020). A study of thing. Journal X, 3(2), 10-20.".to_string(),
        ]);
        let report = validate_report(&MatchResult::default(), &[], &references);
        assert_eq!(
            report.duplicates,
            vec![DuplicatePair { first: 0, second: 1 }]
        );
    }

    #[test]
    fn test_incomplete_detection() {
        let references = parse_references(&["???".to_string()]);
        let report = validate_report(&MatchResult::default(), &[], &references);
        assert_eq!(report.incomplete.len(), 1);
        assert_eq!(report.incomplete[0].kind, IncompleteKind::Unparsed);
    }

    #[test]
    fn test_report_serializes() {
        let report = validate_report(&MatchResult::default(), &[], &[]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"total_citations\":0"));
    }
}
