//! End-to-end scenarios covering the documented contract of the pipeline.

use cite_engine::{
    build_style, learn_style, match_citations, parse_references, render, tokenize_citations,
    validate_report, Author, CitationVariant, ReferenceEntry, Span,
};

#[test]
fn test_author_year_citation_matches_reference() {
    let body = "(Smith, 2020)";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
    ]);

    assert_eq!(citations.len(), 1);
    assert_eq!(citations[0].variant, CitationVariant::AuthorYear);

    let result = match_citations(&citations, &references);
    assert_eq!(result.citation_matches.get(&citations[0].span), Some(&vec![0]));
    assert!(result.unmatched_citations.is_empty());
    assert!(result.unused_references.is_empty());
}

#[test]
fn test_partial_numeric_marker_records_each_id_independently() {
    let body = "[1, 2]";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
    ]);

    let result = match_citations(&citations, &references);
    let span = citations[0].span;
    // Id 1 contributes a match; id 2 specifically is recorded as dangling.
    assert_eq!(result.citation_matches.get(&span), Some(&vec![0]));
    assert_eq!(result.unmatched_numeric_ids.get(&span), Some(&vec![2]));
    assert!(result.unmatched_citations.is_empty());
    assert!(result.unused_references.is_empty());
}

#[test]
fn test_uncited_reference_is_reported_unused() {
    let citations = tokenize_citations("No citations in this text.");
    let references = parse_references(&["Jones, A. (2019). Unused entry.".to_string()]);

    let result = match_citations(&citations, &references);
    assert!(result.citation_matches.is_empty());
    assert_eq!(result.unused_references.iter().copied().collect::<Vec<_>>(), vec![0]);

    let report = validate_report(&result, &citations, &references);
    assert_eq!(report.total_references, 1);
    assert_eq!(report.unused.len(), 1);
    assert_eq!(report.unused[0].raw_text, "Jones, A. (2019). Unused entry.");
}

#[test]
fn test_single_example_learning_reproduces_the_example_verbatim() {
    let example = "A. Smith (2020), 'Title here,' J. Test, 1, 1-5.";
    let style = learn_style(&[example.to_string()]).unwrap();

    let mut entry = ReferenceEntry::bare(0, example);
    entry.authors = vec![Author::new("Smith", Some("A.".to_string()))];
    entry.year = Some(2020);
    entry.title = Some("Title here".to_string());
    entry.container = Some("J. Test".to_string());
    entry.volume = Some("1".to_string());
    entry.pages = Some("1-5".to_string());

    let rendered = cite_engine::cite::formats::render_entry(&entry, &style.reference);
    assert_eq!(rendered, example);
}

#[test]
fn test_full_pipeline_author_year_to_numeric() {
    let body = "First finding (Jones, 2019). Later work (Smith, 2020) agreed.";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
        "Jones, B. (2019). Earlier results. Journal Y, 1(1), 1-9.".to_string(),
    ]);

    let style = build_style("vancouver").unwrap();
    let rendered = render(&style, &citations, &references, body);

    // Jones is cited first, so it becomes [1] and leads the list.
    assert_eq!(
        rendered.body,
        "First finding [1]. Later work [2] agreed."
    );
    let lines: Vec<&str> = rendered.references.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Jones B."));
    assert!(lines[1].starts_with("Smith J."));
}

#[test]
fn test_full_pipeline_numeric_to_author_year() {
    let body = "Reported earlier [2] and confirmed [1].";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
        "Jones, B. (2019). Earlier results. Journal Y, 1(1), 1-9.".to_string(),
    ]);

    let style = build_style("apa").unwrap();
    let rendered = render(&style, &citations, &references, body);

    assert_eq!(
        rendered.body,
        "Reported earlier (Jones, 2019) and confirmed (Smith, 2020)."
    );
    // Author-year lists sort lexicographically by surname.
    let lines: Vec<&str> = rendered.references.lines().collect();
    assert!(lines[0].starts_with("Jones, B."));
    assert!(lines[1].starts_with("Smith, J."));
}

#[test]
fn test_unmatched_marker_keeps_its_original_text() {
    let body = "Unfindable claim (Nobody, 1999).";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
    ]);

    let style = build_style("vancouver").unwrap();
    let rendered = render(&style, &citations, &references, body);
    assert_eq!(rendered.body, body);
}

#[test]
fn test_report_counts_and_context() {
    let body = "One claim (Smith, 2020) and a stray one (Ghost, 2001) end here.";
    let citations = tokenize_citations(body);
    let references = parse_references(&[
        "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.".to_string(),
    ]);

    let result = match_citations(&citations, &references);
    let report = validate_report(&result, &citations, &references);

    assert_eq!(report.total_citations, 2);
    assert_eq!(report.total_references, 1);
    assert_eq!(report.matched_citations, 1);
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(report.unmatched[0].raw_text, "(Ghost, 2001)");
    assert!(report.unmatched[0].context.contains("stray"));
}

#[test]
fn test_spans_are_stable_identities() {
    let body = "(Smith, 2020) and [3]";
    let citations = tokenize_citations(body);
    for citation in &citations {
        assert_eq!(
            citation.span.slice(body),
            Some(citation.raw_text.as_str()),
            "span {} does not slice back to its raw text",
            Span::new(citation.span.start, citation.span.end)
        );
    }
}
