//! In-text marker rendering and body rewriting.
//!
//! The body is rewritten by walking citation spans left to right and
//! copying the interstitial text verbatim. Citations sharing one span (a
//! semicolon group) render as a single delimited group. A marker whose
//! citations all fail to resolve keeps its original text: rewriting never
//! destroys what it cannot improve.

use std::collections::BTreeMap;

use crate::cite::ast::{InTextCitation, ReferenceEntry, ReferenceId};
use crate::cite::matching::find_reference;
use crate::cite::style::{MarkerStyle, StyleModel};

/// Rewrite the body text, replacing each recognized marker with its
/// re-rendered form. `numbering` maps reference ids to the 1-based numbers
/// fixed by the rendered reference list.
pub(crate) fn render_body(
    style: &StyleModel,
    citations: &[InTextCitation],
    references: &[ReferenceEntry],
    body: &str,
    numbering: &BTreeMap<ReferenceId, usize>,
) -> String {
    let mut out = String::new();
    let mut pos = 0usize;
    let mut index = 0usize;

    while index < citations.len() {
        let span = citations[index].span;
        let mut group_end = index + 1;
        while group_end < citations.len() && citations[group_end].span == span {
            group_end += 1;
        }
        let group = &citations[index..group_end];
        index = group_end;

        // Overlapping or out-of-range spans cannot be rewritten safely.
        if span.start < pos || span.slice(body).is_none() {
            continue;
        }

        out.push_str(&body[pos..span.start]);
        out.push_str(&render_group(style, group, references, numbering));
        pos = span.end;
    }

    out.push_str(&body[pos..]);
    out
}

fn render_group(
    style: &StyleModel,
    group: &[InTextCitation],
    references: &[ReferenceEntry],
    numbering: &BTreeMap<ReferenceId, usize>,
) -> String {
    match style.in_text.marker {
        MarkerStyle::Numeric => render_numeric_group(style, group, references, numbering),
        MarkerStyle::AuthorYear => render_author_year_group(style, group, references),
    }
}

fn render_numeric_group(
    style: &StyleModel,
    group: &[InTextCitation],
    references: &[ReferenceEntry],
    numbering: &BTreeMap<ReferenceId, usize>,
) -> String {
    let mut numbers: Vec<u32> = Vec::new();
    for citation in group {
        if citation.is_numeric() {
            for &id in &citation.numeric_ids {
                let position = id as usize;
                let renumbered = (position >= 1 && position <= references.len())
                    .then(|| references[position - 1].id)
                    .and_then(|ref_id| numbering.get(&ref_id))
                    .map(|n| *n as u32);
                // A dangling id is preserved verbatim rather than dropped.
                numbers.push(renumbered.unwrap_or(id));
            }
        } else if let Some(ref_id) = find_reference(citation, references) {
            if let Some(n) = numbering.get(&ref_id) {
                numbers.push(*n as u32);
            }
        }
    }

    if numbers.is_empty() {
        return group[0].raw_text.clone();
    }

    let marker = format!(
        "{}{}{}",
        style.in_text.open,
        format_id_list(&numbers),
        style.in_text.close
    );
    // A narrative citation keeps its name part in front of the new marker.
    if group.len() == 1 && group[0].narrative {
        match narrative_prefix(&group[0].raw_text) {
            Some(prefix) => format!("{prefix} {marker}"),
            None => marker,
        }
    } else {
        marker
    }
}

fn render_author_year_group(
    style: &StyleModel,
    group: &[InTextCitation],
    references: &[ReferenceEntry],
) -> String {
    let mut parts: Vec<String> = Vec::new();
    for citation in group {
        if citation.is_numeric() {
            // Each id converts through the reference at that position;
            // "[1-3]" becomes a three-part author-year group.
            for &id in &citation.numeric_ids {
                let position = id as usize;
                if position >= 1 && position <= references.len() {
                    parts.extend(part_from_reference(style, &references[position - 1], None));
                }
            }
        } else {
            parts.extend(render_author_year_part(style, citation, references));
        }
    }
    if parts.is_empty() {
        return group[0].raw_text.clone();
    }

    if group.len() == 1 && group[0].narrative {
        let (names, year) = parts[0]
            .rsplit_once(&style.in_text.year_sep)
            .map(|(n, y)| (n.to_string(), y.to_string()))
            .unwrap_or_else(|| (parts[0].clone(), String::new()));
        if year.is_empty() {
            return parts[0].clone();
        }
        return format!("{names} ({year})");
    }

    format!(
        "{}{}{}",
        style.in_text.open,
        parts.join(&style.in_text.group_sep),
        style.in_text.close
    )
}

/// One author-year citation's "Authors, Year" text, resolved against its
/// matched reference when there is one, its own fields otherwise.
fn render_author_year_part(
    style: &StyleModel,
    citation: &InTextCitation,
    references: &[ReferenceEntry],
) -> Option<String> {
    match find_reference(citation, references) {
        Some(ref_id) => {
            let entry = references.iter().find(|r| r.id == ref_id)?;
            part_from_reference(style, entry, Some(citation))
        }
        None => format_marker_part(style, &citation.authors, citation.et_al, citation.year?),
    }
}

/// "Authors, Year" from a reference entry, borrowing the citing marker's
/// fields where the entry has gaps.
fn part_from_reference(
    style: &StyleModel,
    entry: &ReferenceEntry,
    citation: Option<&InTextCitation>,
) -> Option<String> {
    let year = entry.year.or(citation.and_then(|c| c.year))?;
    if entry.authors.is_empty() {
        let citation = citation?;
        format_marker_part(style, &citation.authors, citation.et_al, year)
    } else {
        let surnames: Vec<String> = entry.authors.iter().map(|a| a.surname.clone()).collect();
        format_marker_part(style, &surnames, false, year)
    }
}

fn format_marker_part(
    style: &StyleModel,
    surnames: &[String],
    et_al: bool,
    year: i32,
) -> Option<String> {
    let grammar = &style.in_text;
    let authors = if surnames.is_empty() {
        return None;
    } else if surnames.len() >= grammar.et_al_threshold || et_al {
        format!("{} et al.", surnames[0])
    } else if surnames.len() == 2 {
        format!("{}{}{}", surnames[0], grammar.two_author_sep, surnames[1])
    } else {
        surnames.join(&grammar.author_sep)
    };
    Some(format!("{}{}{}", authors, grammar.year_sep, year))
}

/// The name part of a narrative marker: everything before the final
/// parenthesis.
fn narrative_prefix(raw: &str) -> Option<&str> {
    raw.rfind('(').map(|idx| raw[..idx].trim_end())
}

/// Collapse ascending runs: three or more contiguous ids render as a
/// range, anything shorter stays a comma list.
pub(crate) fn format_id_list(ids: &[u32]) -> String {
    let mut sorted: Vec<u32> = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts: Vec<String> = Vec::new();
    let mut run_start = 0usize;
    for i in 0..=sorted.len() {
        let run_over = i == sorted.len() || (i > 0 && sorted[i] != sorted[i - 1] + 1);
        if run_over {
            let run = &sorted[run_start..i];
            if run.len() >= 3 {
                parts.push(format!("{}-{}", run[0], run[run.len() - 1]));
            } else {
                parts.extend(run.iter().map(u32::to_string));
            }
            run_start = i;
        }
    }
    parts.join(", ")
}
