//! Built-in style catalog.
//!
//! Constructed once at first use and read-only from then on; `build_style`
//! hands out clones so callers can never touch the shared catalog.

use once_cell::sync::Lazy;

use super::model::{
    InTextGrammar, MarkerStyle, NameFormat, Provenance, ReferenceGrammar, Slot, StyleModel,
    TitleCase, VolumeIssue,
};
use crate::cite::ast::{Field, StyleError};

/// Catalog order is also the tie-break order for nearest-built-in lookups.
pub const STYLE_NAMES: [&str; 6] = [
    "apa",
    "mla",
    "chicago-author-date",
    "harvard",
    "vancouver",
    "ieee",
];

static CATALOG: Lazy<Vec<(&'static str, StyleModel)>> = Lazy::new(|| {
    vec![
        ("apa", apa()),
        ("mla", mla()),
        ("chicago-author-date", chicago()),
        ("harvard", harvard()),
        ("vancouver", vancouver()),
        ("ieee", ieee()),
    ]
});

/// Look up a built-in style by name (case-insensitive).
pub fn build_style(name: &str) -> Result<StyleModel, StyleError> {
    let wanted = name.trim().to_ascii_lowercase();
    CATALOG
        .iter()
        .find(|(key, _)| *key == wanted)
        .map(|(_, model)| model.clone())
        .ok_or(StyleError::UnknownStyle(name.to_string()))
}

/// Read-only view of the whole catalog, for nearest-built-in fallbacks.
pub(crate) fn builtin_styles() -> &'static [(&'static str, StyleModel)] {
    &CATALOG
}

fn author_year_marker(two_author_sep: &str, year_sep: &str, et_al_threshold: usize) -> InTextGrammar {
    InTextGrammar {
        marker: MarkerStyle::AuthorYear,
        open: "(".to_string(),
        close: ")".to_string(),
        author_sep: ", ".to_string(),
        two_author_sep: two_author_sep.to_string(),
        year_sep: year_sep.to_string(),
        et_al_threshold,
        group_sep: "; ".to_string(),
    }
}

fn numeric_marker() -> InTextGrammar {
    InTextGrammar {
        marker: MarkerStyle::Numeric,
        open: "[".to_string(),
        close: "]".to_string(),
        author_sep: ", ".to_string(),
        two_author_sep: " and ".to_string(),
        year_sep: String::new(),
        et_al_threshold: 2,
        group_sep: ", ".to_string(),
    }
}

/// Smith, J., & Jones, B. (2020). A study of things. Journal X, 3(2), 10-20.
fn apa() -> StyleModel {
    StyleModel {
        in_text: author_year_marker(" & ", ", ", 3),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::wrapped(Field::Year, " ", "(", ")"),
                Slot::new(Field::Title, ". "),
                Slot::new(Field::Container, ". "),
                Slot::new(Field::Volume, ", "),
                Slot::new(Field::Pages, ", "),
                Slot::new(Field::Publisher, ". "),
                Slot::new(Field::Doi, ". "),
            ],
            name_format: NameFormat::SurnameInitials,
            author_sep: ", ".to_string(),
            final_author_sep: ", & ".to_string(),
            title_case: TitleCase::Sentence,
            volume_issue: VolumeIssue::Parenthesized,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("apa".to_string()),
    }
}

/// Smith, John, and Barbara Jones. "A Study of Things." Journal X,
/// vol. 3, no. 2, 2020, pp. 10-20.
fn mla() -> StyleModel {
    StyleModel {
        in_text: author_year_marker(" and ", " ", 3),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::wrapped(Field::Title, ". ", "\"", ".\""),
                Slot::new(Field::Container, " "),
                Slot::new(Field::Volume, ", "),
                Slot::new(Field::Year, ", "),
                Slot::labeled(Field::Pages, ", ", "pp. "),
                Slot::new(Field::Publisher, ", "),
                Slot::new(Field::Doi, ", "),
            ],
            name_format: NameFormat::SurnameGiven,
            author_sep: ", ".to_string(),
            final_author_sep: ", and ".to_string(),
            title_case: TitleCase::Title,
            volume_issue: VolumeIssue::LabeledVolNo,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("mla".to_string()),
    }
}

/// Smith, John, and Barbara Jones. 2020. "A Study of Things." Journal X
/// 3 (2): 10-20.
fn chicago() -> StyleModel {
    StyleModel {
        in_text: author_year_marker(" and ", " ", 4),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::new(Field::Year, ". "),
                Slot::wrapped(Field::Title, ". ", "\"", ".\""),
                Slot::new(Field::Container, " "),
                Slot::new(Field::Volume, " "),
                Slot::new(Field::Pages, ": "),
                Slot::new(Field::Publisher, ". "),
                Slot::new(Field::Doi, ". "),
            ],
            name_format: NameFormat::SurnameGiven,
            author_sep: ", ".to_string(),
            final_author_sep: ", and ".to_string(),
            title_case: TitleCase::Title,
            volume_issue: VolumeIssue::SpacedParen,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("chicago-author-date".to_string()),
    }
}

/// Smith, J. and Jones, B., 2020. A study of things. Journal X, 3(2),
/// pp. 10-20.
fn harvard() -> StyleModel {
    StyleModel {
        in_text: author_year_marker(" and ", ", ", 4),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::new(Field::Year, ", "),
                Slot::new(Field::Title, ". "),
                Slot::new(Field::Container, ". "),
                Slot::new(Field::Volume, ", "),
                Slot::labeled(Field::Pages, ", ", "pp. "),
                Slot::new(Field::Publisher, ". "),
                Slot::new(Field::Doi, ". "),
            ],
            name_format: NameFormat::SurnameInitials,
            author_sep: ", ".to_string(),
            final_author_sep: " and ".to_string(),
            title_case: TitleCase::Sentence,
            volume_issue: VolumeIssue::Parenthesized,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("harvard".to_string()),
    }
}

/// Smith J, Jones B. A study of things. Journal X. 2020;3(2):10-20.
fn vancouver() -> StyleModel {
    StyleModel {
        in_text: numeric_marker(),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::new(Field::Title, ". "),
                Slot::new(Field::Container, ". "),
                Slot::new(Field::Year, ". "),
                Slot::new(Field::Volume, ";"),
                Slot::new(Field::Pages, ":"),
                Slot::new(Field::Publisher, ". "),
                Slot::new(Field::Doi, ". "),
            ],
            name_format: NameFormat::SurnameInitialsCompact,
            author_sep: ", ".to_string(),
            final_author_sep: ", ".to_string(),
            title_case: TitleCase::Sentence,
            volume_issue: VolumeIssue::Parenthesized,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("vancouver".to_string()),
    }
}

/// J. Smith and B. Jones, "A study of things," Journal X, vol. 3, no. 2,
/// pp. 10-20, 2020.
fn ieee() -> StyleModel {
    StyleModel {
        in_text: numeric_marker(),
        reference: ReferenceGrammar {
            slots: vec![
                Slot::new(Field::Authors, ""),
                Slot::wrapped(Field::Title, ", ", "\"", ",\""),
                Slot::new(Field::Container, " "),
                Slot::new(Field::Volume, ", "),
                Slot::labeled(Field::Pages, ", ", "pp. "),
                Slot::new(Field::Year, ", "),
                Slot::new(Field::Publisher, ", "),
                Slot::new(Field::Doi, ", "),
            ],
            name_format: NameFormat::InitialsSurname,
            author_sep: ", ".to_string(),
            final_author_sep: " and ".to_string(),
            title_case: TitleCase::Sentence,
            volume_issue: VolumeIssue::LabeledVolNo,
            terminal: ".".to_string(),
        },
        provenance: Provenance::BuiltIn("ieee".to_string()),
    }
}
