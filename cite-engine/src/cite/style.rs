//! Style models: built-in catalog and example-driven learning.

pub mod catalog;
pub mod learner;
pub mod model;

pub use catalog::{build_style, STYLE_NAMES};
pub use learner::{learn_style, learn_style_with_markers};
pub use model::{
    InTextGrammar, MarkerStyle, NameFormat, Provenance, ReferenceGrammar, Slot, StyleModel,
    TitleCase, VolumeIssue,
};
