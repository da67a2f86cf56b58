//! RIS export for parsed reference lists.
//!
//! Every record is typed as a journal article; absent fields are omitted.
//! Page ranges split into the SP/EP tag pair.

use crate::cite::ast::ReferenceEntry;

/// Render the reference list as RIS records.
pub fn to_ris(references: &[ReferenceEntry]) -> String {
    let mut out = String::new();
    for entry in references {
        render_record(entry, &mut out);
    }
    out
}

fn render_record(entry: &ReferenceEntry, out: &mut String) {
    out.push_str("TY  - JOUR\n");

    for author in &entry.authors {
        match author.initials() {
            Some(initials) => {
                out.push_str(&format!("AU  - {}, {}\n", author.surname, initials))
            }
            None => out.push_str(&format!("AU  - {}\n", author.surname)),
        }
    }
    if let Some(title) = &entry.title {
        out.push_str(&format!("TI  - {title}\n"));
    }
    if let Some(year) = entry.year {
        out.push_str(&format!("PY  - {year}\n"));
    }
    if let Some(container) = &entry.container {
        out.push_str(&format!("JO  - {container}\n"));
    }
    if let Some(volume) = &entry.volume {
        out.push_str(&format!("VL  - {volume}\n"));
    }
    if let Some(issue) = &entry.issue {
        out.push_str(&format!("IS  - {issue}\n"));
    }
    if let Some(pages) = &entry.pages {
        match pages.split_once('-') {
            Some((start, end)) if !end.is_empty() => {
                out.push_str(&format!("SP  - {}\n", start.trim()));
                out.push_str(&format!("EP  - {}\n", end.trim()));
            }
            _ => out.push_str(&format!("SP  - {pages}\n")),
        }
    }
    if let Some(publisher) = &entry.publisher {
        out.push_str(&format!("PB  - {publisher}\n"));
    }
    if let Some(doi) = &entry.doi {
        out.push_str(&format!("DO  - {}\n", bare_doi(doi)));
        out.push_str(&format!("UR  - {doi}\n"));
    }

    out.push_str("ER  - \n\n");
}

/// The DOI without its URL prefix.
pub(crate) fn bare_doi(doi: &str) -> &str {
    doi.strip_prefix("https://doi.org/")
        .or_else(|| doi.strip_prefix("http://doi.org/"))
        .or_else(|| doi.strip_prefix("https://dx.doi.org/"))
        .unwrap_or(doi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cite::ast::Author;

    #[test]
    fn test_record_shape() {
        let mut entry = ReferenceEntry::bare(0, "");
        entry.authors = vec![Author::new("Smith", Some("J.".to_string()))];
        entry.year = Some(2020);
        entry.title = Some("A study of things".to_string());
        entry.container = Some("Journal X".to_string());
        entry.pages = Some("10-20".to_string());
        entry.doi = Some("https://doi.org/10.1000/xyz".to_string());

        let ris = to_ris(&[entry]);
        assert!(ris.starts_with("TY  - JOUR\n"));
        assert!(ris.contains("AU  - Smith, J.\n"));
        assert!(ris.contains("SP  - 10\n"));
        assert!(ris.contains("EP  - 20\n"));
        assert!(ris.contains("DO  - 10.1000/xyz\n"));
        assert!(ris.trim_end().ends_with("ER  -"));
    }
}
