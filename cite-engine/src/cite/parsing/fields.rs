//! Field-extraction patterns for reference entries.
//!
//! Free-text reference entries have no fixed grammar across styles, so
//! extraction runs a ranked chain of entry-shape patterns (documented on
//! [`EntryShape`]) followed by tail heuristics for container, volume,
//! issue, and pages. Every pattern is a lazily compiled regex; anything a
//! pattern cannot locate stays absent.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Leading list numbering on an entry: `1.`, `[3]`, `12)`.
pub(super) static NUMBERED_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[?\d{1,3}[\])]?\.?\s+").unwrap());

/// Author-year shape with a parenthesized year: `Smith, J. (2020). …`
/// Highest-ranked because the parenthesized year is unambiguous.
pub(super) static PAREN_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<authors>[^()]+?)[\s,]*\((?P<year>\d{4})[a-z]?\)").unwrap());

/// Harvard shape with a bare year after the authors: `Smith, J., 2020. …`
pub(super) static BARE_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<authors>.+?),\s*(?P<year>(?:1[5-9]|20)\d{2})[a-z]?[.,]\s+").unwrap()
});

/// Vancouver/medical shape: authors end in initials, then title, then
/// `Journal Year;Volume(Issue):Pages`. The authors capture must end with
/// 1-4 capitals (the last author's initials).
pub(super) static VANCOUVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<authors>[^.]+?[A-Z]{1,4})\.\s+(?P<title>[A-ZÀ-Þ][^.?!]*[.?!])").unwrap()
});

/// Year anywhere, for the fallback shape.
pub(super) static ANY_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:1[5-9]|2[0-9])\d{2}\b").unwrap());

/// DOI in URL or bare form, optionally behind a `doi:` label.
pub(super) static DOI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:doi[:\s]*)?(?:https?://(?:dx\.)?doi\.org/)?(10\.\d{4,9}/[^\s\]>]+)")
        .unwrap()
});

/// `Volume(Issue)` optionally followed by `: pages` or `, pages`, with or
/// without a `pp.` label.
pub(super) static VOL_ISSUE_PAGES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d+)\s*\(([^)]+)\)\s*[:,.]?\s*(?:pp?\.\s*)?([eS]?\d+(?:\s*[-–]\s*[eS]?\d+)?)?\s*\.?\s*$",
    )
    .unwrap()
});

/// `Volume, pages` or `Volume: pages` with no issue.
pub(super) static VOL_PAGES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*[:,]\s*(?:pp?\.\s*)?([eS]?\d+(?:\s*[-–]\s*[eS]?\d+)?)\s*\.?\s*$").unwrap()
});

/// A page range on its own, optionally labeled `pp.`.
pub(super) static PAGES_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:pp?\.\s*)?([eS]?\d+\s*[-–]\s*[eS]?\d+)\s*\.?\s*$").unwrap());

/// A trailing lone volume/article number: `…, 3.`
pub(super) static VOL_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*(\d+)\s*\.?\s*$").unwrap());

/// Vancouver tail: `;Volume(Issue):Pages` after the year.
pub(super) static VANCOUVER_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r";\s*(\d+)\s*(?:\(([^)]+)\))?\s*:?\s*([eS]?\d+(?:\s*[-–]\s*[eS]?\d+)?)?").unwrap()
});

/// Find the end of a title: the first sentence-ending `.`, `?`, or `!` that
/// is not part of an initial or a known abbreviation. Returns the byte index
/// of the terminator.
pub(super) fn find_sentence_end(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    for (idx, ch) in text.char_indices() {
        match ch {
            '?' | '!' => return Some(idx),
            '.' => {
                // A period ends the sentence only before whitespace/end.
                let at_end = idx + 1 >= bytes.len();
                let before_space = !at_end && bytes[idx + 1].is_ascii_whitespace();
                if !(at_end || before_space) {
                    continue;
                }
                // "…J." or "…V1.0." style initials do not terminate.
                if is_initial_before(text, idx) {
                    continue;
                }
                return Some(idx);
            }
            _ => {}
        }
    }
    None
}

/// True when the character run before `period_idx` looks like a single
/// initial or abbreviation ("J", "Jr", "vol").
fn is_initial_before(text: &str, period_idx: usize) -> bool {
    let before = &text[..period_idx];
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == ',' || c == '(')
        .next()
        .unwrap_or("");
    let word = word.trim_matches('.');
    if word.len() == 1 && word.chars().all(|c| c.is_ascii_uppercase()) {
        return true;
    }
    matches!(word, "Jr" | "Sr" | "vol" | "no" | "ed" | "eds" | "pp" | "p")
}

/// Normalize a page range: Unicode dashes to hyphen-minus, spaces dropped.
pub(super) fn normalize_pages(pages: &str) -> String {
    pages
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '–' | '—' | '‐' | '‑' => '-',
            other => other,
        })
        .collect()
}

/// Shift a regex capture range by the offset of the text it matched within
/// the full entry, producing spans in entry coordinates.
pub(super) fn shifted(range: Range<usize>, offset: usize) -> Range<usize> {
    range.start + offset..range.end + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_end_skips_initials() {
        let text = "A study of things. Journal X";
        assert_eq!(find_sentence_end(text), Some(17));
        let text = "Advanced tools: V1.0 in use. The Insight J";
        assert_eq!(find_sentence_end(text), Some(27));
    }

    #[test]
    fn test_sentence_end_accepts_question_titles() {
        let text = "Do sleep complaints matter? Sleep, 3";
        assert_eq!(find_sentence_end(text), Some(26));
    }

    #[test]
    fn test_normalize_pages_folds_en_dash() {
        assert_eq!(normalize_pages("51–9"), "51-9");
        assert_eq!(normalize_pages("10 - 20"), "10-20");
    }
}
