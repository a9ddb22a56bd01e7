use serde::Serialize;

use crate::alphabet::{COMMON_DIGRAMS, COMMON_TRIGRAMS, COMMON_WORDS, ENGLISH_FREQUENCIES, LIVE_WORD_COUNT};
use super::frequency::{analyze, LetterFrequency};

/// Bonus granted per occurrence of a common digram.
pub const DIGRAM_BONUS: f64 = 2.0;
/// Bonus granted per occurrence of a common trigram.
pub const TRIGRAM_BONUS: f64 = 3.0;

/// Readability penalty for a one-character word.
const SHORT_WORD_PENALTY: i64 = 5;
/// Readability penalty for a word longer than [`LONG_WORD_LENGTH`].
const LONG_WORD_PENALTY: i64 = 3;
const LONG_WORD_LENGTH: usize = 15;

/// Starting value of the known-word score.
const WORD_SCORE_BASE: i64 = 50;
/// Amount removed from the known-word score per recognised word.
const WORD_MATCH_REWARD: i64 = 2;

/// Value of both word heuristics for a text with no words.
const NO_WORDS_SCORE: f64 = 100.0;

/// Counts non-overlapping occurrences of `needle`, scanning left to right.
///
/// `"AAAA"` contains `"AA"` twice, not three times.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
	if needle.is_empty() {
		return 0;
	}
	haystack.matches(needle).count()
}

/// Chi-squared distance between observed and English letter frequencies.
///
/// Sums `(observed - expected)² / expected` over the 26 letters. Letters with
/// a zero expected frequency would be skipped; the English table has none.
///
/// Returns `f64::INFINITY` for an empty table.
pub fn chi_squared(letters: &LetterFrequency) -> f64 {
	if letters.is_empty() {
		return f64::INFINITY;
	}

	letters
		.iter()
		.zip(ENGLISH_FREQUENCIES)
		.filter(|(_, expected)| *expected > 0.0)
		.map(|((_, observed), expected)| (observed - expected).powi(2) / expected)
		.sum()
}

/// Bonus for common English digrams and trigrams found in `text`.
///
/// Each pattern is counted independently on the uppercased text and weighted
/// by [`DIGRAM_BONUS`] or [`TRIGRAM_BONUS`].
pub fn pattern_bonus(text: &str) -> f64 {
	let upper = text.to_uppercase();
	let digrams: usize = COMMON_DIGRAMS.iter().map(|d| count_occurrences(&upper, d)).sum();
	let trigrams: usize = COMMON_TRIGRAMS.iter().map(|t| count_occurrences(&upper, t)).sum();
	digrams as f64 * DIGRAM_BONUS + trigrams as f64 * TRIGRAM_BONUS
}

/// Quality score of a candidate plaintext: chi-squared minus pattern bonus.
///
/// Lower is more English-like, and may be negative for text rich in common
/// patterns. Returns `f64::INFINITY` when `text` has no letters.
pub fn quality_score(text: &str) -> f64 {
	chi_squared(&analyze(text).letters) - pattern_bonus(text)
}

/// Penalty for implausible word lengths.
///
/// One-character words add 5, words longer than 15 characters add 3, and
/// every other word removes 1. The result never goes below 0.
/// A text with no words scores 100.
pub fn readability_penalty(text: &str) -> f64 {
	let mut words = text.split_whitespace().peekable();
	if words.peek().is_none() {
		return NO_WORDS_SCORE;
	}

	let score: i64 = words
		.map(|word| match word.chars().count() {
			0..=1 => SHORT_WORD_PENALTY,
			n if n > LONG_WORD_LENGTH => LONG_WORD_PENALTY,
			_ => -1,
		})
		.sum();

	score.max(0) as f64
}

/// Known-word score: 50 minus 2 per word found in [`COMMON_WORDS`].
///
/// Matching is exact on uppercased whitespace-separated tokens, so
/// punctuation attached to a word prevents the match. Floored at 0;
/// a text with no words scores 100.
pub fn word_score(text: &str) -> f64 {
	let upper = text.to_uppercase();
	let words: Vec<&str> = upper.split_whitespace().collect();
	if words.is_empty() {
		return NO_WORDS_SCORE;
	}

	let matches = words.iter().filter(|word| COMMON_WORDS.contains(*word)).count() as i64;
	(WORD_SCORE_BASE - matches * WORD_MATCH_REWARD).max(0) as f64
}

/// How many of the ten most common words appear anywhere in `text`.
///
/// Substring search on the uppercased text, used for live statistics.
pub fn live_word_matches(text: &str) -> usize {
	let upper = text.to_uppercase();
	COMMON_WORDS[..LIVE_WORD_COUNT].iter().filter(|word| upper.contains(*word)).count()
}

/// The three sub-scores of a candidate plaintext.
///
/// Their plain sum is the combined score used for ranking.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
	/// Chi-squared minus pattern bonus.
	pub quality: f64,
	/// Word-length penalty.
	pub readability: f64,
	/// Known-word score.
	pub word: f64,
}

impl ScoreBreakdown {
	/// Unweighted sum of the sub-scores (lower is better).
	pub fn total(&self) -> f64 {
		self.quality + self.readability + self.word
	}
}

/// Computes every sub-score of `text`.
pub fn combined_score(text: &str) -> ScoreBreakdown {
	ScoreBreakdown {
		quality: quality_score(text),
		readability: readability_penalty(text),
		word: word_score(text),
	}
}

/// Presence of common patterns in a candidate plaintext.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct PatternMatch {
	/// Number of distinct common digrams present.
	pub digrams: usize,
	/// Number of distinct common trigrams present.
	pub trigrams: usize,
	/// Patterns found per word.
	pub density: f64,
}

impl PatternMatch {
	/// Distinct digrams plus distinct trigrams.
	pub fn total(&self) -> usize {
		self.digrams + self.trigrams
	}
}

/// Counts which common digrams and trigrams occur in `text`, each at most once.
///
/// Density divides that total by the word count (at least 1).
pub fn pattern_matches(text: &str) -> PatternMatch {
	let upper = text.to_uppercase();
	let digrams = COMMON_DIGRAMS.iter().filter(|d| upper.contains(*d)).count();
	let trigrams = COMMON_TRIGRAMS.iter().filter(|t| upper.contains(*t)).count();
	let words = text.split_whitespace().count().max(1);

	PatternMatch {
		digrams,
		trigrams,
		density: (digrams + trigrams) as f64 / words as f64,
	}
}
