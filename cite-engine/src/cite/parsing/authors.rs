//! Author-list splitting.
//!
//! Reference styles write authors three main ways, tried in order:
//! surname-comma-initials pairs ("Salthouse, T. A., Babcock, R. L."),
//! compact surname-initials ("Smith JA, Jones B"), and given-name-first
//! ("John Smith and Barbara Jones"). Each author splits into surname plus
//! given-name-or-initials; a part that fits no convention becomes a
//! surname-only author rather than being dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cite::ast::Author;

/// One "Surname, I. M." pair; surnames may be multi-word ("Van der Berg")
/// with hyphen/apostrophe variants. The periods after the initials are
/// mandatory: without them a compact list like "Smith JA, Jones B" would
/// false-match across author boundaries.
static SURNAME_INITIALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+(?:\s+[a-z]+)?(?:\s+[A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+)*),\s*((?:[A-Z]\.\s*)+)",
    )
    .unwrap()
});

/// Split an author-list string into structured authors.
pub(super) fn parse_author_list(text: &str) -> Vec<Author> {
    let text = text.trim().trim_end_matches([',', '.', ';']).trim();
    if text.is_empty() {
        return Vec::new();
    }

    // Surname-comma-initials pairs cover APA and Harvard author lists,
    // including the "&" before the final author.
    let pairs: Vec<Author> = SURNAME_INITIALS_RE
        .captures_iter(text)
        .map(|caps| {
            let surname = caps.get(1).unwrap().as_str().trim().to_string();
            let given = caps.get(2).unwrap().as_str().trim().trim_end_matches(',');
            Author::new(surname, Some(given.to_string()))
        })
        .collect();
    if !pairs.is_empty() {
        return pairs;
    }

    // Compact Vancouver list: "Smith JA, Jones B, Williams CD".
    if let Some(compact) = parse_compact_list(text) {
        return compact;
    }

    // Given-name-first, separated by "&" / "and" / commas.
    split_on_connectives(text)
        .into_iter()
        .map(parse_given_first)
        .collect()
}

/// All parts look like "Surname IN" (trailing run of 1-4 capitals)?
fn parse_compact_list(text: &str) -> Option<Vec<Author>> {
    let parts: Vec<&str> = text.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return None;
    }
    let mut authors = Vec::new();
    for part in &parts {
        let words: Vec<&str> = part.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }
        let last = words[words.len() - 1];
        if !is_initials_run(last) {
            return None;
        }
        let surname = words[..words.len() - 1].join(" ");
        authors.push(Author::new(surname, Some(last.to_string())));
    }
    Some(authors)
}

fn is_initials_run(word: &str) -> bool {
    let stripped: String = word.chars().filter(|c| *c != '.').collect();
    !stripped.is_empty()
        && stripped.len() <= 4
        && stripped.chars().all(|c| c.is_ascii_uppercase())
}

fn split_on_connectives(text: &str) -> Vec<String> {
    static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(?:and|&)\s+|\s*&\s*").unwrap());
    let mut parts = Vec::new();
    for chunk in AND_RE.split(text) {
        // A chunk with two or more commas is a comma-separated author list;
        // a single comma is a surname/given separator and stays intact.
        if chunk.matches(',').count() >= 2 {
            parts.extend(chunk.split(',').map(|p| p.trim().to_string()));
        } else {
            parts.push(chunk.trim().to_string());
        }
    }
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn parse_given_first(part: String) -> Author {
    let part = part.trim();
    if let Some((surname, given)) = part.split_once(',') {
        return Author::new(surname.trim(), non_empty(given));
    }
    let words: Vec<&str> = part.split_whitespace().collect();
    match words.len() {
        0 => Author::new(part, None),
        1 => Author::new(words[0], None),
        _ => {
            let last = words[words.len() - 1];
            if is_initials_run(last) {
                // "Smith JA" straggler.
                Author::new(words[..words.len() - 1].join(" "), Some(last.to_string()))
            } else {
                // "John Smith": last word is the surname.
                Author::new(last, Some(words[..words.len() - 1].join(" ")))
            }
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surnames(authors: &[Author]) -> Vec<&str> {
        authors.iter().map(|a| a.surname.as_str()).collect()
    }

    #[test]
    fn test_apa_pairs() {
        let authors = parse_author_list("Salthouse, T. A., Babcock, R. L.");
        assert_eq!(surnames(&authors), vec!["Salthouse", "Babcock"]);
        assert_eq!(authors[0].given.as_deref(), Some("T. A."));
    }

    #[test]
    fn test_ampersand_before_final_author() {
        let authors = parse_author_list("Cohen, S., & Hoberman, H. M.");
        assert_eq!(surnames(&authors), vec!["Cohen", "Hoberman"]);
    }

    #[test]
    fn test_vancouver_compact() {
        let authors = parse_author_list("Smith JA, Jones B, Williams CD");
        assert_eq!(surnames(&authors), vec!["Smith", "Jones", "Williams"]);
        assert_eq!(authors[0].given.as_deref(), Some("JA"));
    }

    #[test]
    fn test_given_first_with_and() {
        let authors = parse_author_list("John Smith and Barbara Jones");
        assert_eq!(surnames(&authors), vec!["Smith", "Jones"]);
        assert_eq!(authors[0].given.as_deref(), Some("John"));
    }

    #[test]
    fn test_multiword_surname_keeps_particles() {
        let authors = parse_author_list("Van der Berg JA");
        assert_eq!(surnames(&authors), vec!["Van der Berg"]);
    }

    #[test]
    fn test_single_name_survives() {
        let authors = parse_author_list("UNESCO");
        assert_eq!(surnames(&authors), vec!["UNESCO"]);
        assert!(authors[0].given.is_none());
    }
}
