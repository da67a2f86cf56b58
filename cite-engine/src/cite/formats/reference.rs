//! Reference-entry rendering and reference-list ordering.

use crate::cite::ast::{Author, Field, MatchResult, ReferenceEntry, ReferenceId};
use crate::cite::matching::normalize_name;
use crate::cite::style::{NameFormat, ReferenceGrammar, StyleModel, TitleCase, VolumeIssue};

/// Render one entry under a reference grammar: slots in order, absent
/// fields skipped together with their leading separator.
pub fn render_entry(entry: &ReferenceEntry, grammar: &ReferenceGrammar) -> String {
    let mut out = String::new();
    let mut last_field = None;

    for slot in &grammar.slots {
        let Some(content) = field_content(entry, slot.field, grammar) else {
            continue;
        };
        if !out.is_empty() {
            out.push_str(&slot.sep);
        }
        out.push_str(&slot.label);
        match &slot.wrap {
            Some((open, close)) => {
                out.push_str(open);
                out.push_str(&content);
                // "Title?" inside a '."'-closing wrap must not double up.
                if content.ends_with(['?', '!']) && close.starts_with('.') {
                    out.push_str(&close[1..]);
                } else {
                    out.push_str(close);
                }
            }
            None => out.push_str(&content),
        }
        last_field = Some(slot.field);
    }

    // DOIs render bare, without terminal punctuation glued onto the URL.
    if last_field != Some(Field::Doi)
        && !out.is_empty()
        && !out.ends_with(['.', '?', '!'])
    {
        out.push_str(&grammar.terminal);
    }
    out
}

fn field_content(
    entry: &ReferenceEntry,
    field: Field,
    grammar: &ReferenceGrammar,
) -> Option<String> {
    match field {
        Field::Authors => {
            if entry.authors.is_empty() {
                None
            } else {
                Some(format_author_list(&entry.authors, grammar))
            }
        }
        Field::Year => entry.year.map(|y| y.to_string()),
        Field::Title => entry
            .title
            .as_deref()
            .map(|t| apply_case(t, grammar.title_case)),
        Field::Container => entry.container.clone(),
        Field::Volume => entry.volume.as_deref().map(|volume| {
            format_volume(volume, entry.issue.as_deref(), grammar.volume_issue)
        }),
        Field::Pages => entry.pages.clone(),
        Field::Publisher => entry.publisher.clone(),
        Field::Doi => entry.doi.clone(),
    }
}

fn format_volume(volume: &str, issue: Option<&str>, style: VolumeIssue) -> String {
    match (style, issue) {
        (VolumeIssue::Parenthesized, Some(issue)) => format!("{volume}({issue})"),
        (VolumeIssue::SpacedParen, Some(issue)) => format!("{volume} ({issue})"),
        (VolumeIssue::LabeledVolNo, Some(issue)) => format!("vol. {volume}, no. {issue}"),
        (VolumeIssue::LabeledVolNo, None) => format!("vol. {volume}"),
        (_, None) => volume.to_string(),
    }
}

/// Format the author list with the grammar's separators: two authors join
/// on the final separator alone, longer lists use it before the last name.
pub fn format_author_list(authors: &[Author], grammar: &ReferenceGrammar) -> String {
    let formatted: Vec<String> = authors
        .iter()
        .map(|a| format_author(a, grammar.name_format))
        .collect();
    match formatted.len() {
        0 => String::new(),
        1 => formatted.into_iter().next().unwrap(),
        2 => format!(
            "{}{}{}",
            formatted[0], grammar.final_author_sep, formatted[1]
        ),
        _ => {
            let (last, rest) = formatted.split_last().unwrap();
            format!(
                "{}{}{}",
                rest.join(&grammar.author_sep),
                grammar.final_author_sep,
                last
            )
        }
    }
}

fn format_author(author: &Author, format: NameFormat) -> String {
    let initials = author.initials();
    match format {
        NameFormat::SurnameInitials => match initials {
            Some(initials) => format!("{}, {}", author.surname, initials),
            None => author.surname.clone(),
        },
        NameFormat::SurnameInitialsCompact => match initials {
            Some(initials) => {
                let compact: String = initials.chars().filter(|c| c.is_alphabetic()).collect();
                format!("{} {}", author.surname, compact)
            }
            None => author.surname.clone(),
        },
        NameFormat::InitialsSurname => match initials {
            Some(initials) => format!("{} {}", initials, author.surname),
            None => author.surname.clone(),
        },
        NameFormat::SurnameGiven => match &author.given {
            Some(given) => format!("{}, {}", author.surname, given),
            None => author.surname.clone(),
        },
    }
}

/// Case transformation for titles. Sentence case is conservative: it only
/// guarantees the first letter, because capitalized words downstream may be
/// proper nouns or acronyms the model cannot identify.
fn apply_case(title: &str, case: TitleCase) -> String {
    match case {
        TitleCase::Preserve | TitleCase::Sentence => capitalize_first(title),
        TitleCase::AllCaps => title.to_uppercase(),
        TitleCase::Title => title
            .split(' ')
            .enumerate()
            .map(|(i, word)| {
                if i == 0 || word.len() > 3 {
                    capitalize_first(word)
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Ordering of the reference list under a style.
///
/// Author-year styles sort every entry by (first-author surname, year,
/// title). Numeric styles order by first appearance among the citations in
/// body order (the span-keyed match map iterates in document order), with
/// never-cited entries appended in original id order.
pub(crate) fn reference_order(
    style: &StyleModel,
    references: &[ReferenceEntry],
    matches: &MatchResult,
) -> Vec<ReferenceId> {
    if style.is_numeric() {
        let mut order: Vec<ReferenceId> = Vec::new();
        for ids in matches.citation_matches.values() {
            for id in ids {
                if !order.contains(id) {
                    order.push(*id);
                }
            }
        }
        for id in &matches.unused_references {
            if !order.contains(id) {
                order.push(*id);
            }
        }
        order
    } else {
        let mut entries: Vec<&ReferenceEntry> = references.iter().collect();
        entries.sort_by_cached_key(|entry| {
            let surname = entry
                .first_author()
                .map(|a| normalize_name(&a.surname))
                .unwrap_or_else(|| normalize_name(&entry.raw_text));
            let title = entry
                .title
                .as_deref()
                .map(normalize_name)
                .unwrap_or_default();
            (surname, entry.year.unwrap_or(i32::MAX), title)
        });
        entries.iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::style::build_style;

    fn sample_entry() -> ReferenceEntry {
        let mut entry = ReferenceEntry::bare(0, "");
        entry.authors = vec![
            Author::new("Smith", Some("J.".to_string())),
            Author::new("Jones", Some("B.".to_string())),
        ];
        entry.year = Some(2020);
        entry.title = Some("A study of things".to_string());
        entry.container = Some("Journal X".to_string());
        entry.volume = Some("3".to_string());
        entry.issue = Some("2".to_string());
        entry.pages = Some("10-20".to_string());
        entry
    }

    #[test]
    fn test_apa_entry_rendering() {
        let style = build_style("apa").unwrap();
        assert_eq!(
            render_entry(&sample_entry(), &style.reference),
            "Smith, J., & Jones, B. (2020). A study of things. Journal X, 3(2), 10-20."
        );
    }

    #[test]
    fn test_vancouver_entry_rendering() {
        let style = build_style("vancouver").unwrap();
        assert_eq!(
            render_entry(&sample_entry(), &style.reference),
            "Smith J, Jones B. A study of things. Journal X. 2020;3(2):10-20."
        );
    }

    #[test]
    fn test_ieee_entry_rendering() {
        let style = build_style("ieee").unwrap();
        assert_eq!(
            render_entry(&sample_entry(), &style.reference),
            "J. Smith and B. Jones, \"A study of things,\" Journal X, vol. 3, no. 2, pp. 10-20, 2020."
        );
    }

    #[test]
    fn test_absent_fields_leave_no_dangling_punctuation() {
        let style = build_style("apa").unwrap();
        let mut entry = sample_entry();
        entry.container = None;
        entry.volume = None;
        entry.issue = None;
        entry.pages = None;
        assert_eq!(
            render_entry(&entry, &style.reference),
            "Smith, J., & Jones, B. (2020). A study of things."
        );
    }

    #[test]
    fn test_title_only_entry_renders() {
        let style = build_style("apa").unwrap();
        let mut entry = ReferenceEntry::bare(0, "");
        entry.title = Some("Anonymous report".to_string());
        assert_eq!(render_entry(&entry, &style.reference), "Anonymous report.");
    }
}
