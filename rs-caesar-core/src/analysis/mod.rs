//! Statistical analysis of candidate plaintexts.
//!
//! This module is organised leaf-first:
//! - Frequency tables over letters, digrams and trigrams (`frequency`)
//! - English-likeness scores built on those tables (`scorer`)
//! - The sweep over all shifts and its selection policies (`ranker`)
//! - Report and statistics views for callers (`report`)

/// Letter, digram and trigram frequency tables.
///
/// Tables are built fresh on each call from the letters of a text.
pub mod frequency;

/// Scores measuring how English-like a text is (lower is better).
pub mod scorer;

/// Sweep over the 25 shifts, ranking and arg-min selection.
///
/// Supports a sequential sweep and a multi-threaded one with identical output.
pub mod ranker;

/// Full analysis report, live statistics and text statistics.
pub mod report;
