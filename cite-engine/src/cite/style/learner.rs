//! Style learning from example citations.
//!
//! The learner reuses the reference parser to recover structured fields
//! from each example, then lifts the style grammar out of the raw text:
//! slot order from the order fields appear, separators from the literal
//! substrings between field boundaries, casing from character-class
//! inspection of the title. With one example the grammar is taken verbatim;
//! with several, a feature is adopted only when the examples agree and
//! otherwise falls back to the nearest built-in's rule. Learning never
//! fails once it has at least one example, and never mutates a built-in.

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::builtin_styles;
use super::model::{
    InTextGrammar, MarkerStyle, NameFormat, Provenance, ReferenceGrammar, Slot, StyleModel,
    TitleCase, VolumeIssue,
};
use crate::cite::ast::{Field, StyleError};
use crate::cite::parsing::{parse_entry, ParsedEntry};
use crate::cite::tokenizing::tokenize_citations;

static INITIALS_SURNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[A-Z]\.\s*)+[A-ZÀ-Þ]\p{L}").unwrap());
static SURNAME_INITIALS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+,\s*(?:[A-Z]\.\s*)+").unwrap());
static SURNAME_GIVEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZÀ-Þ]\p{L}+,\s*[A-Z][a-z]+").unwrap());
static SURNAME_COMPACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZÀ-Þ][\p{L}'’ʼ‐‑–—\-]+\s+[A-Z]{1,4}(?:[,.]|$)").unwrap());
static MARKER_YEAR_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*\d{4}[a-z]?").unwrap());

/// Everything one example contributes to the learned grammar.
#[derive(Debug, Clone)]
struct Inference {
    slots: Vec<Slot>,
    terminal: String,
    name_format: Option<NameFormat>,
    final_author_sep: Option<String>,
    title_case: Option<TitleCase>,
    volume_issue: Option<VolumeIssue>,
}

/// Learn a style from example reference entries.
pub fn learn_style(examples: &[String]) -> Result<StyleModel, StyleError> {
    learn_style_with_markers(examples, &[])
}

/// Learn a style from example reference entries plus optional example
/// in-text markers that refine the in-text grammar.
pub fn learn_style_with_markers(
    examples: &[String],
    marker_examples: &[String],
) -> Result<StyleModel, StyleError> {
    if examples.is_empty() {
        return Err(StyleError::EmptyExamples);
    }

    let inferences: Vec<Inference> = examples
        .iter()
        .map(|example| parse_entry(0, example))
        .filter_map(|parsed| infer_one(&parsed))
        .collect();

    let consensus = merge(&inferences);
    let nearest = nearest_builtin(&consensus);

    // Slot order adopted from the examples when they agree; a separator the
    // examples disagree on is patched from the nearest built-in's slot for
    // that field (its order is kept from the examples).
    let slots = match &consensus.slots {
        Some(merged) => merged
            .iter()
            .map(|sc| {
                let fallback = nearest.reference.slot(sc.field);
                Slot {
                    field: sc.field,
                    sep: sc
                        .sep
                        .clone()
                        .or_else(|| fallback.map(|s| s.sep.clone()))
                        .unwrap_or_default(),
                    label: String::new(),
                    wrap: sc
                        .wrap
                        .clone()
                        .unwrap_or_else(|| fallback.and_then(|s| s.wrap.clone())),
                }
            })
            .collect(),
        None => nearest.reference.slots.clone(),
    };

    let reference = ReferenceGrammar {
        slots,
        name_format: consensus
            .name_format
            .unwrap_or(nearest.reference.name_format),
        author_sep: ", ".to_string(),
        final_author_sep: consensus
            .final_author_sep
            .clone()
            .unwrap_or_else(|| nearest.reference.final_author_sep.clone()),
        title_case: consensus.title_case.unwrap_or(nearest.reference.title_case),
        volume_issue: consensus
            .volume_issue
            .unwrap_or(nearest.reference.volume_issue),
        terminal: consensus
            .terminal
            .clone()
            .unwrap_or_else(|| nearest.reference.terminal.clone()),
    };

    let in_text = infer_in_text(marker_examples).unwrap_or_else(|| nearest.in_text.clone());

    Ok(StyleModel {
        in_text,
        reference,
        provenance: Provenance::Learned(examples.len()),
    })
}

/// Lift one example's grammar out of its parsed field spans.
fn infer_one(parsed: &ParsedEntry) -> Option<Inference> {
    if parsed.spans.is_empty() {
        return None;
    }
    let raw = parsed.entry.raw_text.as_str();

    let mut slots = Vec::new();
    let mut cursor = 0usize;
    for (field, range) in &parsed.spans {
        let (wrap, content_start, content_end) = detect_wrap(raw, range.start, range.end);
        let sep = raw.get(cursor..content_start).unwrap_or("").to_string();
        slots.push(Slot {
            field: *field,
            sep,
            label: String::new(),
            wrap,
        });
        cursor = content_end;
    }
    let terminal = raw.get(cursor..).unwrap_or("").trim_end().to_string();

    let authors_region = parsed
        .spans
        .iter()
        .find(|(field, _)| *field == Field::Authors)
        .and_then(|(_, range)| raw.get(range.clone()));
    let title_text = parsed.entry.title.as_deref();
    let volume_region = parsed
        .spans
        .iter()
        .find(|(field, _)| *field == Field::Volume)
        .and_then(|(_, range)| raw.get(range.clone()));

    Some(Inference {
        slots,
        terminal,
        name_format: authors_region.and_then(detect_name_format),
        final_author_sep: authors_region.and_then(detect_final_author_sep),
        title_case: title_text.map(detect_title_case),
        volume_issue: volume_region.and_then(detect_volume_issue),
    })
}

/// Wrap detection: the characters immediately around a field span must form
/// a matched pair. Returns the wrap and the span widened over it, so the
/// neighbouring separators exclude the pair.
fn detect_wrap(raw: &str, start: usize, end: usize) -> (Option<(String, String)>, usize, usize) {
    const PAIRS: [(char, char); 5] = [('(', ')'), ('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];
    let before = raw[..start].chars().next_back();
    let after = raw[end..].chars().next();
    if let (Some(open), Some(close)) = (before, after) {
        if PAIRS.contains(&(open, close)) {
            return (
                Some((open.to_string(), close.to_string())),
                start - open.len_utf8(),
                end + close.len_utf8(),
            );
        }
    }
    (None, start, end)
}

fn detect_name_format(region: &str) -> Option<NameFormat> {
    let region = region.trim();
    if INITIALS_SURNAME_RE.is_match(region) {
        Some(NameFormat::InitialsSurname)
    } else if SURNAME_INITIALS_RE.is_match(region) {
        Some(NameFormat::SurnameInitials)
    } else if SURNAME_GIVEN_RE.is_match(region) {
        Some(NameFormat::SurnameGiven)
    } else if SURNAME_COMPACT_RE.is_match(region) {
        Some(NameFormat::SurnameInitialsCompact)
    } else {
        None
    }
}

fn detect_final_author_sep(region: &str) -> Option<String> {
    for sep in [", & ", ", and ", " & ", " and "] {
        if region.contains(sep) {
            return Some(sep.to_string());
        }
    }
    None
}

/// Character-class inspection of the title: all-caps, title-case, or
/// sentence-case.
fn detect_title_case(title: &str) -> TitleCase {
    let letters: Vec<char> = title.chars().filter(|c| c.is_alphabetic()).collect();
    if !letters.is_empty() && letters.iter().all(|c| c.is_uppercase()) {
        return TitleCase::AllCaps;
    }
    let significant: Vec<&str> = title
        .split_whitespace()
        .skip(1)
        .filter(|w| w.len() > 3)
        .collect();
    let capitalized = significant
        .iter()
        .filter(|w| w.chars().next().is_some_and(|c| c.is_uppercase()))
        .count();
    if significant.len() >= 2 && capitalized == significant.len() {
        TitleCase::Title
    } else {
        TitleCase::Sentence
    }
}

fn detect_volume_issue(region: &str) -> Option<VolumeIssue> {
    if region.contains(" (") {
        Some(VolumeIssue::SpacedParen)
    } else if region.contains('(') {
        Some(VolumeIssue::Parenthesized)
    } else if region.chars().all(|c| c.is_ascii_digit()) {
        // A bare volume pins the unlabeled form; with no issue present it
        // renders as the digits alone.
        Some(VolumeIssue::Parenthesized)
    } else {
        None
    }
}

/// Per-slot consensus: order is fixed, but a separator or wrap the
/// examples disagree on stays `None` for the built-in fallback to fill.
#[derive(Debug, Clone)]
struct SlotConsensus {
    field: Field,
    sep: Option<String>,
    wrap: Option<Option<(String, String)>>,
}

/// Features every example agrees on. `None` marks a conflict (or nothing
/// inferred), which falls back to the nearest built-in.
#[derive(Debug, Default)]
struct Consensus {
    slots: Option<Vec<SlotConsensus>>,
    terminal: Option<String>,
    name_format: Option<NameFormat>,
    final_author_sep: Option<String>,
    title_case: Option<TitleCase>,
    volume_issue: Option<VolumeIssue>,
}

fn merge(inferences: &[Inference]) -> Consensus {
    let Some(first) = inferences.first() else {
        return Consensus::default();
    };

    let orders_agree = inferences
        .iter()
        .all(|inf| field_order(&inf.slots) == field_order(&first.slots));
    let slots = if orders_agree {
        let merged = first
            .slots
            .iter()
            .map(|slot| {
                let sep_agreed = inferences.iter().all(|inf| {
                    inf.slots
                        .iter()
                        .find(|s| s.field == slot.field)
                        .is_some_and(|s| s.sep == slot.sep)
                });
                let wrap_agreed = inferences.iter().all(|inf| {
                    inf.slots
                        .iter()
                        .find(|s| s.field == slot.field)
                        .is_some_and(|s| s.wrap == slot.wrap)
                });
                SlotConsensus {
                    field: slot.field,
                    sep: sep_agreed.then(|| slot.sep.clone()),
                    wrap: wrap_agreed.then(|| slot.wrap.clone()),
                }
            })
            .collect();
        Some(merged)
    } else {
        None
    };

    Consensus {
        slots,
        terminal: agreed(inferences, |inf| Some(inf.terminal.clone())),
        name_format: agreed(inferences, |inf| inf.name_format),
        final_author_sep: agreed(inferences, |inf| inf.final_author_sep.clone()),
        title_case: agreed(inferences, |inf| inf.title_case),
        volume_issue: agreed(inferences, |inf| inf.volume_issue),
    }
}

fn field_order(slots: &[Slot]) -> Vec<Field> {
    slots.iter().map(|s| s.field).collect()
}

/// The value every example that expressed an opinion agrees on.
fn agreed<T: PartialEq + Clone>(
    inferences: &[Inference],
    get: impl Fn(&Inference) -> Option<T>,
) -> Option<T> {
    let mut result: Option<T> = None;
    for inference in inferences {
        match (get(inference), &result) {
            (None, _) => {}
            (Some(value), None) => result = Some(value),
            (Some(value), Some(current)) if value == *current => {}
            _ => return None,
        }
    }
    result
}

/// The built-in agreeing with the most inferred features; catalog order
/// breaks ties (so an inference-free call lands on APA).
fn nearest_builtin(consensus: &Consensus) -> &'static StyleModel {
    let mut best: Option<(&'static StyleModel, usize)> = None;
    for (_, model) in builtin_styles() {
        let mut score = 0;
        if let Some(format) = consensus.name_format {
            if model.reference.name_format == format {
                score += 1;
            }
        }
        if let Some(case) = consensus.title_case {
            if model.reference.title_case == case {
                score += 1;
            }
        }
        if let Some(sep) = &consensus.final_author_sep {
            if &model.reference.final_author_sep == sep {
                score += 1;
            }
        }
        if let Some(vi) = consensus.volume_issue {
            if model.reference.volume_issue == vi {
                score += 1;
            }
        }
        if let Some(slots) = &consensus.slots {
            let order: Vec<Field> = slots.iter().map(|s| s.field).collect();
            if model.reference.field_order() == order {
                score += 1;
            }
        }
        let better = match best {
            None => true,
            Some((_, best_score)) => score > best_score,
        };
        if better {
            best = Some((model, score));
        }
    }
    best.map(|(model, _)| model).expect("catalog is never empty")
}

/// Infer the in-text grammar from example markers; `None` when no example
/// yields a recognizable citation.
fn infer_in_text(marker_examples: &[String]) -> Option<InTextGrammar> {
    let mut grammar: Option<InTextGrammar> = None;
    for example in marker_examples {
        let citations = tokenize_citations(example);
        let Some(citation) = citations.first() else {
            continue;
        };
        let raw = citation.raw_text.as_str();

        let numeric = citation.is_numeric();
        let open = raw.chars().next().filter(|c| ['(', '['].contains(c));
        let (open, close) = match open {
            Some('[') => ("[", "]"),
            _ => ("(", ")"),
        };
        let two_author_sep = if raw.contains(" & ") {
            " & "
        } else {
            " and "
        };
        let year_sep = if MARKER_YEAR_COMMA_RE.is_match(raw) {
            ", "
        } else {
            " "
        };

        let inferred = InTextGrammar {
            marker: if numeric {
                MarkerStyle::Numeric
            } else {
                MarkerStyle::AuthorYear
            },
            open: open.to_string(),
            close: close.to_string(),
            author_sep: ", ".to_string(),
            two_author_sep: two_author_sep.to_string(),
            year_sep: year_sep.to_string(),
            et_al_threshold: 3,
            group_sep: "; ".to_string(),
        };
        match &grammar {
            None => grammar = Some(inferred),
            // Disagreeing marker examples: keep the first, the reference
            // grammar is the load-bearing part.
            Some(_) => {}
        }
    }
    grammar
}
