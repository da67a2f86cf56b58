//! Citation tokenizer: recognizes in-text citation markers.
//!
//! The tokenizer is a best-effort recognizer, not a strict grammar. It
//! scans for delimited regions and narrative markers, classifies each
//! candidate, and emits [`InTextCitation`](crate::cite::ast::InTextCitation)
//! values in document order. A region matching no known citation shape is
//! skipped without error; this silent-skip policy is an invariant, not an
//! accident.

mod classify;
mod scanner;
pub mod tokens;

pub use scanner::tokenize_citations;
pub use tokens::MarkerToken;
