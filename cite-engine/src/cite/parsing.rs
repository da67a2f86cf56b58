//! Reference parser: free-text entries to structured records.
//!
//! There is no fixed grammar across citation styles, so extraction runs a
//! ranked heuristic chain (see [`entry`] for the priority order) instead of
//! a single parser grammar. Two policies are invariants of this module:
//!
//! - **Absent over guessed**: any field the chain cannot locate is left
//!   absent; rendering handles absent fields by skipping them with their
//!   separators.
//! - **Never dropped**: an entry yielding no authors and no title is still
//!   kept with `raw_text` populated, so it participates in matching via
//!   raw-text heuristics and shows up in reports.

mod authors;
pub mod entry;
mod fields;

pub use entry::parse_references;

pub(crate) use entry::{parse_entry, ParsedEntry};
