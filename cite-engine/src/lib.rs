//! # cite-engine
//!
//! Citation recognition and reformatting engine: finds in-text citation
//! markers in body text, parses free-text reference entries into
//! structured records, matches the two, and renders both back out under a
//! built-in or learned citation style.
//!
//! The whole engine is a pure, synchronous computation over two input
//! strings. The recognizers are best-effort by design: input that fits no
//! known citation shape degrades to partial structure or membership in the
//! unmatched/unused result sets, never an error. The only errors that
//! reach callers are configuration mistakes (an unknown style name, an
//! empty learning set), and the one blocking concern in the wider system
//! (DOI resolution) enters through the injected
//! [`DoiResolver`](cite::enrich::DoiResolver) trait.
//!
//! ```text
//! body text ──▶ tokenize_citations ──▶ [InTextCitation] ─┐
//!                                                        ├─▶ match_citations ──▶ validate_report
//! ref text ───▶ parse_references ───▶ [ReferenceEntry] ──┘
//!                                                        └─▶ render(style, …)
//! ```

pub mod cite;

pub use cite::ast::{
    Author, CitationVariant, Field, InTextCitation, MatchResult, ReferenceEntry, ReferenceId,
    ResolveError, Span, StyleError,
};
pub use cite::enrich::{enrich_references, DoiResolver, NullResolver};
pub use cite::formats::{render, to_bibtex, to_ris, Rendered};
pub use cite::matching::match_citations;
pub use cite::parsing::parse_references;
pub use cite::report::{validate_report, Report};
pub use cite::style::{
    build_style, learn_style, learn_style_with_markers, Provenance, StyleModel, STYLE_NAMES,
};
pub use cite::tokenizing::tokenize_citations;
