//! Cross-reference matcher.
//!
//! Pairs each in-text citation with a reference entry, or records it as
//! unmatched. The matcher is total: malformed input never raises, all
//! failure is membership in the unmatched/unused result sets. All result
//! collections are ordered, so identical inputs produce identical results.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;

use crate::cite::ast::{InTextCitation, MatchResult, ReferenceEntry, ReferenceId};

/// Match citations against the reference list.
///
/// Author-year rule: the reference's year equals the citation's year and the
/// first-author surnames are equal after normalization (case fold, diacritic
/// strip, dash/apostrophe fold). Among tied candidates the one whose full
/// author list covers all the citation's explicit authors wins, then the
/// lowest id. Numeric rule: each id is a 1-based position in the reference
/// list as ordered; ids outside `[1, len]` are recorded per span.
pub fn match_citations(
    citations: &[InTextCitation],
    references: &[ReferenceEntry],
) -> MatchResult {
    let mut result = MatchResult::default();

    for citation in citations {
        if citation.is_numeric() {
            match_numeric(citation, references, &mut result);
        } else {
            match_author_year(citation, references, &mut result);
        }
    }

    let cited = result.cited_ids();
    result.unused_references = references
        .iter()
        .map(|r| r.id)
        .filter(|id| !cited.contains(id))
        .collect();

    result
}

fn match_numeric(
    citation: &InTextCitation,
    references: &[ReferenceEntry],
    result: &mut MatchResult,
) {
    let mut matched = Vec::new();
    let mut dangling = Vec::new();
    for &id in &citation.numeric_ids {
        let position = id as usize;
        if position >= 1 && position <= references.len() {
            matched.push(references[position - 1].id);
        } else {
            dangling.push(id);
        }
    }

    if !dangling.is_empty() {
        result
            .unmatched_numeric_ids
            .entry(citation.span)
            .or_default()
            .extend(dangling);
    }
    if matched.is_empty() {
        result.unmatched_citations.insert(citation.span);
    } else {
        result
            .citation_matches
            .entry(citation.span)
            .or_default()
            .extend(matched);
    }
}

fn match_author_year(
    citation: &InTextCitation,
    references: &[ReferenceEntry],
    result: &mut MatchResult,
) {
    match find_reference(citation, references) {
        Some(id) => {
            result
                .citation_matches
                .entry(citation.span)
                .or_default()
                .push(id);
        }
        None => {
            // Citations grouped in one marker share a span; the span counts
            // as unmatched as soon as any segment found nothing.
            result.unmatched_citations.insert(citation.span);
        }
    }
}

/// Candidate selection plus the superset-then-lowest-id tie-break. The
/// renderer reuses this to attribute a reference to each citation inside a
/// grouped marker.
pub(crate) fn find_reference(
    citation: &InTextCitation,
    references: &[ReferenceEntry],
) -> Option<ReferenceId> {
    let first_author = normalize_name(citation.first_author()?);
    let year = citation.year?;

    let mut candidates: Vec<&ReferenceEntry> = references
        .iter()
        .filter(|r| r.year == Some(year))
        .filter(|r| {
            r.first_author()
                .is_some_and(|a| normalize_name(&a.surname) == first_author)
        })
        .collect();

    // Entries the parser could not structure still participate through
    // their raw text.
    if candidates.is_empty() {
        let year_text = year.to_string();
        candidates = references
            .iter()
            .filter(|r| r.is_opaque())
            .filter(|r| {
                let raw = normalize_name(&r.raw_text);
                raw.contains(&first_author) && r.raw_text.contains(&year_text)
            })
            .collect();
    }

    let cited: BTreeSet<String> = citation.authors.iter().map(|a| normalize_name(a)).collect();
    candidates.sort_by_key(|r| {
        let surnames: BTreeSet<String> =
            r.authors.iter().map(|a| normalize_name(&a.surname)).collect();
        let covers_all = cited.is_subset(&surnames);
        (!covers_all, r.id)
    });
    candidates.first().map(|r| r.id)
}

/// Normalization used for all name comparison: case fold, NFD decomposition
/// with combining marks stripped, and the Unicode dash/apostrophe variants
/// word processors substitute folded to ASCII.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .map(|c| match c {
            '‐' | '‑' | '‒' | '–' | '—' => '-',
            '’' | 'ʼ' => '\'',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::ast::{Author, Span};

    fn reference(id: usize, surname: &str, year: i32) -> ReferenceEntry {
        let mut entry = ReferenceEntry::bare(id, format!("{surname} ({year})"));
        entry.authors = vec![Author::new(surname, None)];
        entry.year = Some(year);
        entry
    }

    fn author_year(start: usize, surname: &str, year: i32) -> InTextCitation {
        InTextCitation::author_year(
            Span::new(start, start + 10),
            vec![surname.to_string()],
            year,
            format!("({surname}, {year})"),
        )
    }

    #[test]
    fn test_exact_author_year_match() {
        let refs = vec![reference(0, "Smith", 2020)];
        let result = match_citations(&[author_year(0, "Smith", 2020)], &refs);
        assert_eq!(
            result.citation_matches.get(&Span::new(0, 10)),
            Some(&vec![0])
        );
        assert!(result.unmatched_citations.is_empty());
        assert!(result.unused_references.is_empty());
    }

    #[test]
    fn test_diacritics_fold_in_comparison() {
        let refs = vec![reference(0, "Gómez", 2018)];
        let result = match_citations(&[author_year(0, "Gomez", 2018)], &refs);
        assert!(result.unmatched_citations.is_empty());
    }

    #[test]
    fn test_year_mismatch_is_unmatched() {
        let refs = vec![reference(0, "Smith", 2019)];
        let result = match_citations(&[author_year(0, "Smith", 2020)], &refs);
        assert!(result.unmatched_citations.contains(&Span::new(0, 10)));
        assert_eq!(result.unused_references, BTreeSet::from([0]));
    }

    #[test]
    fn test_tie_break_prefers_author_superset() {
        let mut shorter = reference(0, "Smith", 2020);
        shorter.authors = vec![Author::new("Smith", None), Author::new("Lee", None)];
        let mut fuller = reference(1, "Smith", 2020);
        fuller.authors = vec![Author::new("Smith", None), Author::new("Jones", None)];

        let mut citation = author_year(0, "Smith", 2020);
        citation.authors = vec!["Smith".to_string(), "Jones".to_string()];

        let result = match_citations(&[citation], &[shorter, fuller]);
        assert_eq!(
            result.citation_matches.get(&Span::new(0, 10)),
            Some(&vec![1])
        );
    }

    #[test]
    fn test_tie_break_falls_back_to_lowest_id() {
        let refs = vec![reference(0, "Smith", 2020), reference(1, "Smith", 2020)];
        let result = match_citations(&[author_year(0, "Smith", 2020)], &refs);
        assert_eq!(
            result.citation_matches.get(&Span::new(0, 10)),
            Some(&vec![0])
        );
        assert_eq!(result.unused_references, BTreeSet::from([1]));
    }

    #[test]
    fn test_numeric_out_of_range_per_id() {
        let refs = vec![reference(0, "Smith", 2020)];
        let citation = InTextCitation::numeric(Span::new(0, 6), vec![1, 2], "[1, 2]".to_string());
        let result = match_citations(&[citation], &refs);
        assert_eq!(
            result.citation_matches.get(&Span::new(0, 6)),
            Some(&vec![0])
        );
        assert_eq!(
            result.unmatched_numeric_ids.get(&Span::new(0, 6)),
            Some(&vec![2])
        );
        assert!(result.unmatched_citations.is_empty());
    }

    #[test]
    fn test_opaque_reference_matches_by_raw_text() {
        let opaque = ReferenceEntry::bare(0, "Smith and colleagues, untitled memo, 2020");
        let result = match_citations(&[author_year(0, "Smith", 2020)], &[opaque]);
        assert!(result.unmatched_citations.is_empty());
    }

    #[test]
    fn test_deterministic_over_repeated_runs() {
        let refs = vec![
            reference(0, "Smith", 2020),
            reference(1, "Jones", 2019),
            reference(2, "Smith", 2020),
        ];
        let citations = vec![
            author_year(0, "Smith", 2020),
            author_year(20, "Jones", 2019),
            author_year(40, "Brown", 2001),
        ];
        let first = match_citations(&citations, &refs);
        let second = match_citations(&citations, &refs);
        assert_eq!(first, second);
    }
}
