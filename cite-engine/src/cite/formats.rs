//! Output formats: styled reference lists and rewritten body text, plus
//! RIS and BibTeX export.
//!
//! Reference ids are positions in the parsed list, so the reference slice
//! handed to [`render`] must be the parser's output (or preserve its ids).

pub mod bibtex;
pub mod marker;
pub mod reference;
pub mod ris;

use std::collections::BTreeMap;

use crate::cite::ast::{InTextCitation, ReferenceEntry, ReferenceId};
use crate::cite::matching::match_citations;
use crate::cite::style::StyleModel;

pub use bibtex::to_bibtex;
pub use reference::render_entry;
pub use ris::to_ris;

/// Output of a full render: the rewritten body and the reformatted
/// reference list (one entry per line, in the style's order).
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub body: String,
    pub references: String,
}

/// Render body text and reference list under a style.
///
/// For numeric styles the reference list is renumbered by first appearance
/// in the body and every numeric marker is rewritten to the new numbers;
/// author-year styles sort the list by (surname, year, title). Markers that
/// resolve to no reference keep their original text.
pub fn render(
    style: &StyleModel,
    citations: &[InTextCitation],
    references: &[ReferenceEntry],
    body: &str,
) -> Rendered {
    let matches = match_citations(citations, references);
    let order = reference::reference_order(style, references, &matches);

    let numbering: BTreeMap<ReferenceId, usize> = order
        .iter()
        .enumerate()
        .map(|(position, id)| (*id, position + 1))
        .collect();

    let reference_text = order
        .iter()
        .filter_map(|id| references.iter().find(|r| r.id == *id))
        .map(|entry| render_entry(entry, &style.reference))
        .collect::<Vec<_>>()
        .join("\n");

    let body_text = marker::render_body(style, citations, references, body, &numbering);

    Rendered {
        body: body_text,
        references: reference_text,
    }
}
