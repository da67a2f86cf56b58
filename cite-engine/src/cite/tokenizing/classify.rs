//! Classification of marker-region content.
//!
//! A region is numeric when its content is a comma/range list of integers;
//! otherwise each semicolon-separated segment gets an author-year parse.
//! Content matching neither shape classifies as nothing at all: the
//! tokenizer is a best-effort recognizer and silently skips such regions.

use logos::Logos;

use super::tokens::MarkerToken;

/// Structured content of one classified marker segment.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum MarkerContent {
    /// Reference positions in marker order, deduplicated, ranges expanded.
    Numeric(Vec<u32>),
    AuthorYear {
        /// Explicit surnames in marker order.
        authors: Vec<String>,
        year: i32,
        et_al: bool,
    },
}

/// Try the numeric shape: `1`, `1, 2`, `1-3`, `1, 3-5`.
///
/// Ranges are inclusive and expand ascending; a reversed range disqualifies
/// the whole region. Duplicate ids collapse, first occurrence wins.
pub(super) fn classify_numeric(content: &str) -> Option<Vec<u32>> {
    let mut ids: Vec<u32> = Vec::new();
    let mut tokens = MarkerToken::lexer(content);

    // State machine over Number (Dash Number)? (Comma ...)* with no other
    // token kinds allowed.
    let mut pending: Option<u32> = None;
    let mut after_dash = false;
    let mut expect_number = true;
    while let Some(token) = tokens.next() {
        match token {
            Ok(MarkerToken::Number(n)) if expect_number => {
                let n = u32::try_from(n).ok()?;
                if after_dash {
                    let start = pending.take()?;
                    if n < start {
                        return None;
                    }
                    for id in start..=n {
                        push_unique(&mut ids, id);
                    }
                    after_dash = false;
                } else {
                    if let Some(prev) = pending.take() {
                        push_unique(&mut ids, prev);
                    }
                    pending = Some(n);
                }
                expect_number = false;
            }
            Ok(MarkerToken::Dash) if pending.is_some() && !after_dash => {
                after_dash = true;
                expect_number = true;
            }
            Ok(MarkerToken::Comma) if !expect_number => {
                if let Some(prev) = pending.take() {
                    push_unique(&mut ids, prev);
                }
                expect_number = true;
            }
            _ => return None,
        }
    }
    if after_dash || expect_number && pending.is_none() && ids.is_empty() {
        return None;
    }
    if expect_number && pending.is_none() && !ids.is_empty() {
        // Trailing comma.
        return None;
    }
    if let Some(prev) = pending.take() {
        push_unique(&mut ids, prev);
    }
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

fn push_unique(ids: &mut Vec<u32>, id: u32) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}

/// Try the author-year shape on one semicolon-separated segment.
///
/// The pattern is anchored at the *end* of the segment: one or more name
/// tokens joined by ",", "&", or "and", an optional "et al.", an optional
/// comma, then a 4-digit year. Leading tokens the pattern does not reach
/// are tolerated and ignored, so `(see Smith, 2020)` and
/// `(MoCA; Nasreddine et al., 2005)` still yield their citations.
pub(super) fn classify_author_year(segment: &str) -> Option<MarkerContent> {
    let mut tokens: Vec<(MarkerToken, std::ops::Range<usize>)> = Vec::new();
    let mut lexer = MarkerToken::lexer(segment);
    while let Some(token) = lexer.next() {
        let span = lexer.span();
        match token {
            Ok(token) => tokens.push((token, span)),
            // Unrecognized content (lowercase words, punctuation) is kept as
            // a gap so the backward walk below stops at it.
            Err(()) => tokens.push((MarkerToken::Period, span)),
        }
    }

    // The year must be the last token of the segment.
    let (last, _) = tokens.last()?;
    let year = last.year_value()?;
    let mut idx = tokens.len() - 1;

    // Optional comma between the author list and the year.
    if idx == 0 {
        return None;
    }
    idx -= 1;
    if tokens[idx].0 == MarkerToken::Comma {
        if idx == 0 {
            return None;
        }
        idx -= 1;
    }

    let mut et_al = false;
    if tokens[idx].0 == MarkerToken::EtAl {
        et_al = true;
        if idx == 0 {
            return None;
        }
        idx -= 1;
        // "Smith, et al." writes a comma before the continuation.
        if tokens[idx].0 == MarkerToken::Comma {
            if idx == 0 {
                return None;
            }
            idx -= 1;
        }
    }

    // Walk the author list backwards: Name (sep Name)*.
    let mut names_rev: Vec<String> = Vec::new();
    loop {
        let (token, span) = &tokens[idx];
        if *token != MarkerToken::Name {
            return None;
        }
        names_rev.push(segment[span.clone()].to_string());
        if idx == 0 {
            break;
        }
        let (sep, _) = &tokens[idx - 1];
        if sep.is_author_separator() && idx >= 2 && tokens[idx - 2].0 == MarkerToken::Name {
            idx -= 2;
        } else {
            break;
        }
    }

    names_rev.reverse();
    Some(MarkerContent::AuthorYear {
        authors: names_rev,
        year,
        et_al,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_id() {
        assert_eq!(classify_numeric("1"), Some(vec![1]));
    }

    #[test]
    fn test_comma_list_and_range() {
        assert_eq!(classify_numeric("1, 3-5"), Some(vec![1, 3, 4, 5]));
    }

    #[test]
    fn test_reversed_range_disqualifies() {
        assert_eq!(classify_numeric("3-1"), None);
    }

    #[test]
    fn test_trailing_comma_disqualifies() {
        assert_eq!(classify_numeric("1, 2,"), None);
    }

    #[test]
    fn test_words_are_not_numeric() {
        assert_eq!(classify_numeric("Smith, 2020"), None);
    }

    #[test]
    fn test_plain_author_year() {
        assert_eq!(
            classify_author_year("Smith, 2020"),
            Some(MarkerContent::AuthorYear {
                authors: vec!["Smith".to_string()],
                year: 2020,
                et_al: false,
            })
        );
    }

    #[test]
    fn test_ampersand_pair() {
        assert_eq!(
            classify_author_year("Smith & Jones, 2020"),
            Some(MarkerContent::AuthorYear {
                authors: vec!["Smith".to_string(), "Jones".to_string()],
                year: 2020,
                et_al: false,
            })
        );
    }

    #[test]
    fn test_et_al_keeps_explicit_names_only() {
        assert_eq!(
            classify_author_year("Nasreddine et al., 2005"),
            Some(MarkerContent::AuthorYear {
                authors: vec!["Nasreddine".to_string()],
                year: 2005,
                et_al: true,
            })
        );
    }

    #[test]
    fn test_leading_junk_is_ignored() {
        assert_eq!(
            classify_author_year("see Smith, 2020"),
            Some(MarkerContent::AuthorYear {
                authors: vec!["Smith".to_string()],
                year: 2020,
                et_al: false,
            })
        );
    }

    #[test]
    fn test_year_disambiguator_is_stripped() {
        assert_eq!(
            classify_author_year("Smith, 2020a"),
            Some(MarkerContent::AuthorYear {
                authors: vec!["Smith".to_string()],
                year: 2020,
                et_al: false,
            })
        );
    }

    #[test]
    fn test_no_year_no_citation() {
        assert_eq!(classify_author_year("MoCA"), None);
    }
}
