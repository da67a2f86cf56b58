//! Per-entry parsing: the ranked heuristic chain.
//!
//! Priorities, highest first:
//!
//! 1. A trailing DOI is lifted out before anything else runs.
//! 2. Parenthesized year (`Smith, J. (2020). …`), the least ambiguous
//!    anchor, so it outranks every other shape.
//! 3. Bare year after the author list (`Smith, J., 2020. …`, Harvard).
//! 4. Vancouver/medical (`Smith J, Jones B. Title. Journal 2020;3(2):5-9.`):
//!    recognized by the author list ending in initials, with the year after
//!    the container.
//! 5. Fallback: first plausible year anywhere; authors guessed from the
//!    start of the entry only when it looks like a name list.
//!
//! Whatever a heuristic cannot locate stays absent; an entry yielding
//! neither authors nor title is kept with `raw_text` populated so it is
//! never silently dropped.

use std::ops::Range;

use super::authors::parse_author_list;
use super::fields::{
    find_sentence_end, normalize_pages, shifted, ANY_YEAR_RE, BARE_YEAR_RE, DOI_RE,
    NUMBERED_PREFIX_RE, PAGES_ONLY_RE, PAREN_YEAR_RE, VANCOUVER_RE, VANCOUVER_TAIL_RE,
    VOL_ISSUE_PAGES_RE, VOL_ONLY_RE, VOL_PAGES_RE,
};
use crate::cite::ast::{Field, ReferenceEntry, ReferenceId};

/// Parse result carrying the byte span each field was recovered from, in
/// entry coordinates. The style learner lifts literal separators out of the
/// gaps between these spans.
#[derive(Debug, Clone)]
pub(crate) struct ParsedEntry {
    pub entry: ReferenceEntry,
    pub spans: Vec<(Field, Range<usize>)>,
}

/// Parse pre-segmented reference entries into structured records, ids
/// assigned by position starting at 0. Never fails.
pub fn parse_references(entries: &[String]) -> Vec<ReferenceEntry> {
    entries
        .iter()
        .enumerate()
        .map(|(id, raw)| parse_entry(id, raw).entry)
        .collect()
}

/// Parse one entry, keeping field spans for the learner.
pub(crate) fn parse_entry(id: ReferenceId, raw: &str) -> ParsedEntry {
    let text = raw.trim();
    let mut entry = ReferenceEntry::bare(id, text);
    let mut spans: Vec<(Field, Range<usize>)> = Vec::new();

    // 1. DOI first, stripped from the text the other heuristics see.
    let mut end = text.len();
    if let Some(caps) = DOI_RE.captures(text) {
        let whole = caps.get(0).unwrap();
        let bare = caps
            .get(1)
            .unwrap()
            .as_str()
            .trim_end_matches(['.', ',', ';']);
        entry.doi = Some(format!("https://doi.org/{}", bare));
        spans.push((Field::Doi, whole.range()));
        // Trailing DOIs (the common case) are cut off; a mid-text DOI-like
        // string is left alone rather than splitting the entry.
        if text[whole.end()..].trim().len() <= 1 {
            end = whole.start();
        }
    }
    let head = text[..end].trim_end();

    // List numbering is presentation, not data.
    let offset = NUMBERED_PREFIX_RE
        .find(head)
        .map(|m| m.end())
        .unwrap_or(0);
    let body = &head[offset..];

    if let Some(caps) = PAREN_YEAR_RE.captures(body) {
        apply_author_year_shape(&mut entry, &mut spans, body, offset, &caps);
    } else if let Some(caps) = BARE_YEAR_RE.captures(body) {
        apply_author_year_shape(&mut entry, &mut spans, body, offset, &caps);
    } else if let Some(caps) = VANCOUVER_RE.captures(body) {
        apply_vancouver_shape(&mut entry, &mut spans, body, offset, &caps);
    } else {
        apply_fallback_shape(&mut entry, &mut spans, body, offset);
    }

    spans.sort_by_key(|(_, range)| range.start);
    ParsedEntry { entry, spans }
}

/// Shapes 2 and 3: authors, year, then title and tail.
fn apply_author_year_shape(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    body: &str,
    offset: usize,
    caps: &regex::Captures<'_>,
) {
    let authors_m = caps.name("authors").unwrap();
    let authors_text = authors_m.as_str().trim_end_matches([',', ' ']);
    entry.authors = parse_author_list(authors_text);
    if !entry.authors.is_empty() {
        spans.push((
            Field::Authors,
            shifted(authors_m.start()..authors_m.start() + authors_text.len(), offset),
        ));
    }

    let year_m = caps.name("year").unwrap();
    entry.year = year_m.as_str().parse().ok();
    spans.push((Field::Year, shifted(year_m.range(), offset)));

    let rest_start = caps.get(0).unwrap().end();
    parse_title_and_tail(entry, spans, body, rest_start, offset);
}

/// Shape 4: title already captured; year and volume data live in the tail.
fn apply_vancouver_shape(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    body: &str,
    offset: usize,
    caps: &regex::Captures<'_>,
) {
    let authors_m = caps.name("authors").unwrap();
    entry.authors = parse_author_list(authors_m.as_str());
    if !entry.authors.is_empty() {
        spans.push((Field::Authors, shifted(authors_m.range(), offset)));
    }

    let title_m = caps.name("title").unwrap();
    // Question/exclamation titles keep their terminator; a plain period is
    // the entry's separator, not part of the title.
    let kept = title_m.as_str();
    let title_text = if kept.ends_with('?') || kept.ends_with('!') {
        kept.to_string()
    } else {
        kept.trim_end_matches('.').to_string()
    };
    spans.push((
        Field::Title,
        shifted(title_m.start()..title_m.start() + title_text.len(), offset),
    ));
    entry.title = Some(title_text);

    let rest_start = title_m.end();
    let rest = &body[rest_start..];

    if let Some(year_m) = ANY_YEAR_RE.find(rest) {
        entry.year = year_m.as_str().parse().ok();
        spans.push((Field::Year, shifted(year_m.range(), rest_start + offset)));

        let container = rest[..year_m.start()].trim_matches([' ', '.', ';', ',']);
        if !container.is_empty() {
            let start = rest[..year_m.start()].find(container.chars().next().unwrap()).unwrap_or(0);
            spans.push((
                Field::Container,
                shifted(start..start + container.len(), rest_start + offset),
            ));
            entry.container = Some(container.to_string());
        }
    }

    if let Some(caps) = VANCOUVER_TAIL_RE.captures(rest) {
        let vol = caps.get(1).unwrap();
        entry.volume = Some(vol.as_str().to_string());
        if let Some(issue) = caps.get(2) {
            entry.issue = Some(issue.as_str().to_string());
        }
        let vol_end = caps
            .get(2)
            .map(|m| m.end() + 1)
            .unwrap_or_else(|| vol.end());
        spans.push((
            Field::Volume,
            shifted(vol.start()..vol_end, rest_start + offset),
        ));
        if let Some(pages) = caps.get(3) {
            entry.pages = Some(normalize_pages(pages.as_str()));
            spans.push((Field::Pages, shifted(pages.range(), rest_start + offset)));
        }
    }
}

/// Shape 5: best-effort extraction when no entry shape matched.
fn apply_fallback_shape(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    body: &str,
    offset: usize,
) {
    if let Some(year_m) = ANY_YEAR_RE.find(body) {
        entry.year = year_m.as_str().parse().ok();
        spans.push((Field::Year, shifted(year_m.range(), offset)));
    }

    // Authors only when the entry opens with something name-shaped: short,
    // capitalized, before the first period.
    if let Some(period) = body.find('.') {
        let candidate = &body[..period];
        if candidate.len() < 100 && looks_like_name_list(candidate) {
            entry.authors = parse_author_list(candidate);
            if !entry.authors.is_empty() {
                spans.push((Field::Authors, shifted(0..candidate.len(), offset)));
            }
        }
    }
}

fn looks_like_name_list(candidate: &str) -> bool {
    let words: Vec<&str> = candidate.split_whitespace().collect();
    if words.is_empty() || words.len() > 12 {
        return false;
    }
    // Name lists alternate capitalized words ("Smith J, Jones B"); require
    // two adjacent capitalized words so prose openings do not qualify.
    words.windows(2).any(|pair| {
        pair.iter().all(|w| {
            w.chars()
                .next()
                .is_some_and(|c| c.is_uppercase())
        })
    })
}

/// Title (plain or quoted) after the year, then container/volume/pages
/// from whatever follows the title's sentence end.
fn parse_title_and_tail(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    body: &str,
    rest_start: usize,
    offset: usize,
) {
    let rest = &body[rest_start..];
    let lead = rest.len() - rest.trim_start_matches([' ', '.', ',', ':', ';']).len();
    let rest = &rest[lead..];
    let rest_off = rest_start + lead + offset;
    if rest.is_empty() {
        return;
    }

    // Quoted titles win over the sentence-period scan.
    let quote_pairs: [(char, char); 4] = [('\'', '\''), ('"', '"'), ('‘', '’'), ('“', '”')];
    for (open, close) in quote_pairs {
        if let Some(stripped) = rest.strip_prefix(open) {
            if let Some(close_idx) = stripped.find(close) {
                let inner = &stripped[..close_idx];
                let title = inner.trim_end_matches([',', '.', ' ']);
                if !title.is_empty() {
                    let start = open.len_utf8();
                    spans.push((Field::Title, start + rest_off..start + title.len() + rest_off));
                    entry.title = Some(title.to_string());
                    let tail_start = start + close_idx + close.len_utf8();
                    parse_tail(entry, spans, &rest[tail_start..], tail_start + rest_off);
                    return;
                }
            }
        }
    }

    match find_sentence_end(rest) {
        Some(end) => {
            let title = rest[..end].trim_end();
            let keeps_terminator = matches!(&rest[end..end + 1], "?" | "!");
            let title_len = if keeps_terminator { end + 1 } else { title.len() };
            entry.title = Some(rest[..title_len].trim_end().to_string());
            spans.push((Field::Title, rest_off..rest_off + title_len));
            parse_tail(entry, spans, &rest[end + 1..], end + 1 + rest_off);
        }
        None => {
            let title = rest.trim_end();
            if !title.is_empty() {
                entry.title = Some(title.to_string());
                spans.push((Field::Title, rest_off..rest_off + title.len()));
            }
        }
    }
}

/// Container, volume(issue), and pages from the text after the title.
/// Attempts ranked most-specific first; a tail without any volume-like or
/// page-like token becomes the container (or, with a `City: Press` colon
/// and no digits, the publisher).
fn parse_tail(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    tail: &str,
    tail_off: usize,
) {
    let lead = tail.len() - tail.trim_start().len();
    let tail = tail.trim_start();
    let tail_off = tail_off + lead;
    if tail.is_empty() {
        return;
    }

    if let Some(caps) = VOL_ISSUE_PAGES_RE.captures(tail) {
        let vol = caps.get(1).unwrap();
        let issue = caps.get(2).unwrap();
        entry.volume = Some(vol.as_str().to_string());
        entry.issue = Some(issue.as_str().to_string());
        spans.push((Field::Volume, shifted(vol.start()..issue.end() + 1, tail_off)));
        if let Some(pages) = caps.get(3) {
            entry.pages = Some(normalize_pages(pages.as_str()));
            spans.push((Field::Pages, shifted(pages.range(), tail_off)));
        }
        set_container(entry, spans, tail, vol.start(), tail_off);
        return;
    }

    if let Some(caps) = VOL_PAGES_RE.captures(tail) {
        let vol = caps.get(1).unwrap();
        let pages = caps.get(2).unwrap();
        entry.volume = Some(vol.as_str().to_string());
        entry.pages = Some(normalize_pages(pages.as_str()));
        spans.push((Field::Volume, shifted(vol.range(), tail_off)));
        spans.push((Field::Pages, shifted(pages.range(), tail_off)));
        set_container(entry, spans, tail, vol.start(), tail_off);
        return;
    }

    if let Some(caps) = PAGES_ONLY_RE.captures(tail) {
        let pages = caps.get(1).unwrap();
        entry.pages = Some(normalize_pages(pages.as_str()));
        spans.push((Field::Pages, shifted(pages.range(), tail_off)));
        set_container(entry, spans, tail, caps.get(0).unwrap().start(), tail_off);
        return;
    }

    if let Some(caps) = VOL_ONLY_RE.captures(tail) {
        let vol = caps.get(1).unwrap();
        entry.volume = Some(vol.as_str().to_string());
        spans.push((Field::Volume, shifted(vol.range(), tail_off)));
        set_container(entry, spans, tail, caps.get(0).unwrap().start(), tail_off);
        return;
    }

    // No volume-ish anchor at all.
    let cleaned = tail.trim_end_matches([' ', '.', ';']);
    if cleaned.is_empty() {
        return;
    }
    if cleaned.contains(": ") && !cleaned.chars().any(|c| c.is_ascii_digit()) {
        entry.publisher = Some(cleaned.to_string());
        spans.push((Field::Publisher, tail_off..tail_off + cleaned.len()));
    } else {
        entry.container = Some(cleaned.to_string());
        spans.push((Field::Container, tail_off..tail_off + cleaned.len()));
    }
}

fn set_container(
    entry: &mut ReferenceEntry,
    spans: &mut Vec<(Field, Range<usize>)>,
    tail: &str,
    anchor: usize,
    tail_off: usize,
) {
    let before = tail[..anchor].trim_end_matches([' ', ',', '.', ';', ':']);
    if before.is_empty() {
        return;
    }
    entry.container = Some(before.to_string());
    spans.push((Field::Container, tail_off..tail_off + before.len()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apa_entry() {
        let parsed = parse_entry(0, "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.");
        let entry = parsed.entry;
        assert_eq!(entry.authors.len(), 1);
        assert_eq!(entry.authors[0].surname, "Smith");
        assert_eq!(entry.year, Some(2020));
        assert_eq!(entry.title.as_deref(), Some("A study of things"));
        assert_eq!(entry.container.as_deref(), Some("Journal X"));
        assert_eq!(entry.volume.as_deref(), Some("3"));
        assert_eq!(entry.issue.as_deref(), Some("2"));
        assert_eq!(entry.pages.as_deref(), Some("10-20"));
    }

    #[test]
    fn test_harvard_entry() {
        let parsed = parse_entry(0, "Salthouse, T. A., Babcock, R. L., 1991. Decomposing adult age differences. Dev. Psychol., 27, 763-776.");
        let entry = parsed.entry;
        assert_eq!(entry.authors.len(), 2);
        assert_eq!(entry.year, Some(1991));
        assert_eq!(entry.volume.as_deref(), Some("27"));
        assert_eq!(entry.pages.as_deref(), Some("763-776"));
    }

    #[test]
    fn test_vancouver_entry() {
        let parsed = parse_entry(0, "Smith J, Jones B. Sleep and memory. Sleep Med Rev 2019;44(2):101-110.");
        let entry = parsed.entry;
        assert_eq!(entry.authors.len(), 2);
        assert_eq!(entry.authors[0].surname, "Smith");
        assert_eq!(entry.title.as_deref(), Some("Sleep and memory"));
        assert_eq!(entry.year, Some(2019));
        assert_eq!(entry.container.as_deref(), Some("Sleep Med Rev"));
        assert_eq!(entry.volume.as_deref(), Some("44"));
        assert_eq!(entry.issue.as_deref(), Some("2"));
        assert_eq!(entry.pages.as_deref(), Some("101-110"));
    }

    #[test]
    fn test_doi_is_lifted_and_normalized() {
        let parsed = parse_entry(0, "Smith, J. (2020). Things. Journal X, 1, 2-3. https://doi.org/10.1000/xyz123");
        assert_eq!(
            parsed.entry.doi.as_deref(),
            Some("https://doi.org/10.1000/xyz123")
        );
        // The DOI does not leak into pages/container.
        assert_eq!(parsed.entry.pages.as_deref(), Some("2-3"));
    }

    #[test]
    fn test_bare_doi_form() {
        let parsed = parse_entry(0, "Smith, J. (2020). Things. Journal X. doi:10.1234/abc.def");
        assert_eq!(
            parsed.entry.doi.as_deref(),
            Some("https://doi.org/10.1234/abc.def")
        );
    }

    #[test]
    fn test_numbered_prefix_is_stripped() {
        let parsed = parse_entry(0, "3. Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.");
        assert_eq!(parsed.entry.authors[0].surname, "Smith");
    }

    #[test]
    fn test_book_entry_gets_publisher() {
        let parsed = parse_entry(0, "Smith, J. (2020). Book of things. New York: Academic Press.");
        assert_eq!(
            parsed.entry.publisher.as_deref(),
            Some("New York: Academic Press")
        );
        assert!(parsed.entry.container.is_none());
    }

    #[test]
    fn test_quoted_title() {
        let parsed = parse_entry(0, "A. Smith (2020), 'Title here,' J. Test, 1, 1-5.");
        let entry = parsed.entry;
        assert_eq!(entry.title.as_deref(), Some("Title here"));
        assert_eq!(entry.container.as_deref(), Some("J. Test"));
        assert_eq!(entry.volume.as_deref(), Some("1"));
        assert_eq!(entry.pages.as_deref(), Some("1-5"));
    }

    #[test]
    fn test_opaque_entry_keeps_raw_text() {
        let parsed = parse_entry(7, "???");
        assert!(parsed.entry.is_opaque());
        assert_eq!(parsed.entry.raw_text, "???");
        assert_eq!(parsed.entry.id, 7);
    }

    #[test]
    fn test_spans_point_into_raw_text() {
        let raw = "Smith, J. (2020). A study of things. Journal X, 3(2), 10-20.";
        let parsed = parse_entry(0, raw);
        for (field, range) in &parsed.spans {
            assert!(
                raw.get(range.clone()).is_some(),
                "span for {:?} out of bounds",
                field
            );
        }
        let year = parsed
            .spans
            .iter()
            .find(|(f, _)| *f == Field::Year)
            .unwrap();
        assert_eq!(&raw[year.1.clone()], "2020");
    }
}
