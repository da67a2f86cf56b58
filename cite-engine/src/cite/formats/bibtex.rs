//! BibTeX export for parsed reference lists.
//!
//! Citation keys are first-author surname plus year, deduplicated with
//! letter suffixes. Titles are double-braced to preserve their casing, and
//! the common LaTeX special characters are escaped.

use super::ris::bare_doi;
use crate::cite::ast::ReferenceEntry;

/// Render the reference list as BibTeX entries.
pub fn to_bibtex(references: &[ReferenceEntry]) -> String {
    let mut used_keys: Vec<String> = Vec::new();
    let entries: Vec<String> = references
        .iter()
        .map(|entry| {
            let key = make_key(entry, &used_keys);
            used_keys.push(key.clone());
            render_entry(entry, &key)
        })
        .collect();
    entries.join("\n\n")
}

fn render_entry(entry: &ReferenceEntry, key: &str) -> String {
    let mut lines = vec![format!("@article{{{key},")];

    if !entry.authors.is_empty() {
        let authors = entry
            .authors
            .iter()
            .map(|a| match &a.given {
                Some(given) => format!("{}, {}", a.surname, given),
                None => a.surname.clone(),
            })
            .collect::<Vec<_>>()
            .join(" and ");
        lines.push(format!("  author = {{{}}},", escape_latex(&authors)));
    }
    if let Some(title) = &entry.title {
        lines.push(format!("  title = {{{{{}}}}},", escape_latex(title)));
    }
    if let Some(year) = entry.year {
        lines.push(format!("  year = {{{year}}},"));
    }
    if let Some(container) = &entry.container {
        lines.push(format!("  journal = {{{}}},", escape_latex(container)));
    }
    if let Some(volume) = &entry.volume {
        lines.push(format!("  volume = {{{volume}}},"));
    }
    if let Some(issue) = &entry.issue {
        lines.push(format!("  number = {{{issue}}},"));
    }
    if let Some(pages) = &entry.pages {
        lines.push(format!("  pages = {{{}}},", pages.replace('-', "--")));
    }
    if let Some(publisher) = &entry.publisher {
        lines.push(format!("  publisher = {{{}}},", escape_latex(publisher)));
    }
    if let Some(doi) = &entry.doi {
        lines.push(format!("  doi = {{{}}},", bare_doi(doi)));
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn make_key(entry: &ReferenceEntry, used: &[String]) -> String {
    let author_part: String = entry
        .first_author()
        .map(|a| a.surname.chars().filter(char::is_ascii_alphabetic).collect())
        .unwrap_or_default();
    let year_part = entry.year.map(|y| y.to_string()).unwrap_or_default();
    let mut base = format!("{}{}", author_part, year_part).to_lowercase();
    if base.is_empty() {
        base = format!("ref{}", entry.id);
    }

    if !used.contains(&base) {
        return base;
    }
    for suffix in 'a'..='z' {
        let candidate = format!("{base}{suffix}");
        if !used.contains(&candidate) {
            return candidate;
        }
    }
    format!("{base}-{}", entry.id)
}

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            other => out.push(other),
        }
    }
    out
}
