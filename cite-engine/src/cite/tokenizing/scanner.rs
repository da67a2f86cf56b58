//! Region scanning over body text.
//!
//! The scanner finds candidate marker regions (parenthesized, bracketed,
//! caret-superscript, and narrative `Name (year)` forms), classifies their
//! content, and emits citations in document order. Regions that classify as
//! neither numeric nor author-year are skipped without error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::classify::{classify_author_year, classify_numeric, MarkerContent};
use crate::cite::ast::{InTextCitation, Span};

/// Characters of context captured on each side of a marker, before widening
/// to word boundaries.
const CONTEXT_CHARS: usize = 80;

/// Narrative citation: `Smith (2020)`, `Smith & Jones (2020)`,
/// `Nasreddine et al. (2005a)`.
static NARRATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ([A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+
         (?:\s+(?:&|and)\s+[A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+)?
         (?:\s+et\s+al\.?,?)?)
        \s*\((\d{4}[a-z]?)\)",
    )
    .unwrap()
});

/// Superscript numeric marker in plain-text form: `^1`, `^1,2`, `^1-3`.
static SUPERSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^(\d+(?:\s*[-‐‑–—,]\s*\d+)*)").unwrap());

/// Scan body text and return every recognizable in-text citation, ordered
/// left to right by span. Pure function over the text; unclassifiable
/// regions are silently skipped.
pub fn tokenize_citations(body: &str) -> Vec<InTextCitation> {
    let mut citations = scan_narrative(body);
    let narrative_spans: Vec<Span> = citations.iter().map(|c| c.span).collect();

    for (span, content) in delimited_regions(body) {
        if narrative_spans.iter().any(|n| overlaps(*n, span)) {
            continue;
        }
        citations.extend(classify_region(body, span, content));
    }

    citations.extend(scan_superscript(body));

    citations.sort_by_key(|c| (c.span.start, c.span.end));
    for citation in &mut citations {
        citation.context = extract_context(body, citation.span);
    }
    citations
}

/// Find `(...)` and `[...]` regions: non-nested, single-line. Returns the
/// region span (delimiters included) and the interior content.
fn delimited_regions(body: &str) -> Vec<(Span, &str)> {
    let mut regions = Vec::new();
    let mut open: Option<(usize, char)> = None;

    for (idx, ch) in body.char_indices() {
        match ch {
            '(' | '[' => open = Some((idx, ch)),
            ')' | ']' => {
                if let Some((start, open_ch)) = open.take() {
                    let matches = (open_ch == '(' && ch == ')') || (open_ch == '[' && ch == ']');
                    if matches {
                        let span = Span::new(start, idx + 1);
                        regions.push((span, &body[start + 1..idx]));
                    }
                }
            }
            '\n' => open = None,
            _ => {}
        }
    }
    regions
}

/// Classify one delimited region into zero or more citations.
fn classify_region(body: &str, span: Span, content: &str) -> Vec<InTextCitation> {
    let raw = body[span.start..span.end].to_string();
    let parenthesized = raw.starts_with('(');

    if let Some(ids) = classify_numeric(content) {
        // A lone parenthesized 4-digit number is a year, not a reference
        // position ("(2020)" left over from text the narrative scan did not
        // claim).
        if parenthesized && ids.len() == 1 && (1000..=2999).contains(&ids[0]) {
            return Vec::new();
        }
        return vec![InTextCitation::numeric(span, ids, raw)];
    }

    // Author-year: every semicolon-separated segment is tried on its own, so
    // a group like "(Smith, 2020; Jones, 2021)" yields two citations sharing
    // the region span, and non-citation segments ("(MoCA; ...)") drop out
    // individually.
    let mut citations = Vec::new();
    for segment in content.split(';') {
        if let Some(MarkerContent::AuthorYear {
            authors,
            year,
            et_al,
        }) = classify_author_year(segment)
        {
            let mut citation = InTextCitation::author_year(span, authors, year, raw.clone());
            citation.et_al = et_al;
            citations.push(citation);
        }
    }
    citations
}

/// Narrative markers claim their span before region scanning so the bare
/// `(year)` parenthetical is not reconsidered on its own.
fn scan_narrative(body: &str) -> Vec<InTextCitation> {
    let mut citations = Vec::new();
    for caps in NARRATIVE_RE.captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let name_part = caps.get(1).unwrap().as_str();
        let year_part = caps.get(2).unwrap().as_str();

        let Ok(year) = year_part[..4].parse::<i32>() else {
            continue;
        };
        let et_al = name_part.contains("et al");
        let authors = split_narrative_names(name_part);
        if authors.is_empty() {
            continue;
        }

        let span = Span::new(whole.start(), whole.end());
        let mut citation =
            InTextCitation::author_year(span, authors, year, whole.as_str().to_string());
        citation.narrative = true;
        citation.et_al = et_al;
        citations.push(citation);
    }
    citations
}

fn split_narrative_names(name_part: &str) -> Vec<String> {
    let mut names = Vec::new();
    for word in name_part.split_whitespace() {
        let trimmed = word.trim_end_matches([',', '.']);
        match trimmed {
            "&" | "and" | "et" | "al" => continue,
            _ if trimmed.is_empty() => continue,
            _ => names.push(trimmed.to_string()),
        }
    }
    names
}

fn scan_superscript(body: &str) -> Vec<InTextCitation> {
    let mut citations = Vec::new();
    for caps in SUPERSCRIPT_RE.captures_iter(body) {
        let whole = caps.get(0).unwrap();
        let Some(ids) = classify_numeric(caps.get(1).unwrap().as_str()) else {
            continue;
        };
        let span = Span::new(whole.start(), whole.end());
        citations.push(InTextCitation::numeric(
            span,
            ids,
            whole.as_str().to_string(),
        ));
    }
    citations
}

fn overlaps(a: Span, b: Span) -> bool {
    a.start < b.end && b.start < a.end
}

/// Word-aligned snippet of text around a span, whitespace-normalized.
fn extract_context(body: &str, span: Span) -> String {
    let mut start = span.start.saturating_sub(CONTEXT_CHARS);
    while !body.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (span.end + CONTEXT_CHARS).min(body.len());
    while !body.is_char_boundary(end) {
        end += 1;
    }

    // Widen to word boundaries so the snippet never cuts a word in half.
    if start > 0 {
        if let Some(pos) = body[start..span.start].find(char::is_whitespace) {
            start += pos;
        }
    }
    if end < body.len() {
        if let Some(pos) = body[span.end..end].rfind(char::is_whitespace) {
            end = span.end + pos;
        }
    }

    body[start..end].split_whitespace().collect::<Vec<_>>().join(" ")
}
