//! Caesar-cipher shift recovery library.
//!
//! This crate provides the statistical engine used to break a Caesar cipher:
//! - Shift application preserving case and non-alphabetic characters
//! - Letter, digram and trigram frequency analysis
//! - English-likeness scoring (chi-squared, pattern and word heuristics)
//! - Ranking of the 25 candidate shifts
//!
//! Every operation is a pure function of its input. Callers own any state
//! (history, open files, UI) built on top of it.

/// Static reference data about English text.
pub mod alphabet;

/// Shift type and the rotation transform.
pub mod cipher;

/// Frequency tables, scoring, ranking and reporting.
///
/// Exposes the three operations callers rely on (`decode`, `rank_shifts`,
/// `best_shift`) together with the richer analysis views built on them.
pub mod analysis;

/// Error type shared by the whole crate.
pub mod error;

/// Built-in ciphertext samples.
pub mod samples;

pub use analysis::ranker::{best_shift, rank_shifts, top_candidates, ScoreResult};
pub use cipher::{decode, decode_raw, encode, Shift};
pub use error::CaesarError;
