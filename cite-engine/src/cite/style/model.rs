//! Declarative style grammars.
//!
//! A [`StyleModel`] describes how one citation style writes in-text markers
//! and reference entries: delimiters, slot order, separators, name and case
//! conventions. Models are immutable once built; the learner produces new
//! instances rather than mutating anything shared.

use serde::{Deserialize, Serialize};

use crate::cite::ast::Field;

/// Where a model came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    BuiltIn(String),
    /// Learned from this many example entries.
    Learned(usize),
}

/// Marker system of a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerStyle {
    AuthorYear,
    Numeric,
}

/// Grammar for in-text markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InTextGrammar {
    pub marker: MarkerStyle,
    pub open: String,
    pub close: String,
    /// Between authors when three or more are written out.
    pub author_sep: String,
    /// Connective for exactly two authors: " & " or " and ".
    pub two_author_sep: String,
    /// Between the author list and the year ("" for styles without one).
    pub year_sep: String,
    /// Render "First et al." at this many authors or more.
    pub et_al_threshold: usize,
    /// Between grouped citations inside one delimiter pair.
    pub group_sep: String,
}

/// How a single author name renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameFormat {
    /// "Smith, J. M."
    SurnameInitials,
    /// "Smith JM"
    SurnameInitialsCompact,
    /// "J. M. Smith"
    InitialsSurname,
    /// "Smith, John"
    SurnameGiven,
}

/// Case rule applied to titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleCase {
    /// First word capitalized; capitalized words are left alone (proper
    /// nouns and acronyms cannot be told apart from styling).
    Sentence,
    /// Significant words capitalized.
    Title,
    AllCaps,
    /// No transformation.
    Preserve,
}

/// How volume and issue combine when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeIssue {
    /// "3(2)"
    Parenthesized,
    /// "3 (2)"
    SpacedParen,
    /// "vol. 3, no. 2"
    LabeledVolNo,
}

/// One field slot in a reference grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub field: Field,
    /// Literal separator preceding the slot; dropped when the field is
    /// absent or the slot renders first.
    pub sep: String,
    /// Literal label immediately before the content, e.g. "pp. ".
    pub label: String,
    /// Wrapping pair around the content, e.g. ("(", ")").
    pub wrap: Option<(String, String)>,
}

impl Slot {
    pub fn new(field: Field, sep: &str) -> Self {
        Self {
            field,
            sep: sep.to_string(),
            label: String::new(),
            wrap: None,
        }
    }

    pub fn labeled(field: Field, sep: &str, label: &str) -> Self {
        Self {
            field,
            sep: sep.to_string(),
            label: label.to_string(),
            wrap: None,
        }
    }

    pub fn wrapped(field: Field, sep: &str, open: &str, close: &str) -> Self {
        Self {
            field,
            sep: sep.to_string(),
            label: String::new(),
            wrap: Some((open.to_string(), close.to_string())),
        }
    }
}

/// Grammar for reference-list entries: ordered slots plus the conventions
/// the slots share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceGrammar {
    pub slots: Vec<Slot>,
    pub name_format: NameFormat,
    pub author_sep: String,
    pub final_author_sep: String,
    pub title_case: TitleCase,
    pub volume_issue: VolumeIssue,
    /// Terminal punctuation when the entry does not already end a sentence.
    pub terminal: String,
}

impl ReferenceGrammar {
    /// Slot for a field, when the grammar orders it.
    pub fn slot(&self, field: Field) -> Option<&Slot> {
        self.slots.iter().find(|s| s.field == field)
    }

    /// Field order of this grammar.
    pub fn field_order(&self) -> Vec<Field> {
        self.slots.iter().map(|s| s.field).collect()
    }
}

/// A complete, immutable citation style description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleModel {
    pub in_text: InTextGrammar,
    pub reference: ReferenceGrammar,
    pub provenance: Provenance,
}

impl StyleModel {
    pub fn is_numeric(&self) -> bool {
        matches!(self.in_text.marker, MarkerStyle::Numeric)
    }
}
