use std::collections::HashMap;

use serde::{Serialize, Serializer};

use crate::alphabet::{is_letter, letter_at, letter_index, LETTER_COUNT};

/// Number of entries kept in digram and trigram tables.
pub const NGRAM_TOP_K: usize = 10;

/// Observed letter frequencies of a text, in percent.
///
/// # Invariants
/// - When `total > 0`, the 26 percentages sum to 100 (within rounding).
/// - When `total == 0` the table is empty: there is no data, and any score
///   derived from it is undefined.
#[derive(Clone, Debug, PartialEq)]
pub struct LetterFrequency {
	/// Percentage per letter, zero-filled for absent letters.
	percentages: [f64; LETTER_COUNT],
	/// Number of letters counted.
	total: usize,
}

impl LetterFrequency {
	/// Builds the table from an uppercased letter stream.
	fn from_letters(letters: &[char]) -> Self {
		let mut counts = [0usize; LETTER_COUNT];
		for c in letters {
			if let Some(i) = letter_index(*c) {
				counts[i] += 1;
			}
		}

		let total = letters.len();
		let mut percentages = [0.0; LETTER_COUNT];
		if total > 0 {
			for (percentage, count) in percentages.iter_mut().zip(counts) {
				*percentage = count as f64 / total as f64 * 100.0;
			}
		}

		Self { percentages, total }
	}

	/// Returns `true` if the text had no letters.
	pub fn is_empty(&self) -> bool {
		self.total == 0
	}

	/// Number of letters the table was built from.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Observed percentage of `letter` (case-insensitive).
	///
	/// Returns `None` for non-letters and for an empty table.
	pub fn get(&self, letter: char) -> Option<f64> {
		if self.is_empty() {
			return None;
		}
		letter_index(letter).map(|i| self.percentages[i])
	}

	/// Iterates over `(letter, percentage)` pairs from `A` to `Z`.
	///
	/// Yields nothing for an empty table.
	pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
		let len = if self.is_empty() { 0 } else { LETTER_COUNT };
		self.percentages[..len].iter().enumerate().map(|(i, p)| (letter_at(i), *p))
	}

	/// Letters sorted by descending frequency, ties in alphabetical order.
	pub fn sorted_desc(&self) -> Vec<(char, f64)> {
		let mut sorted: Vec<(char, f64)> = self.iter().collect();
		sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
		sorted
	}
}

impl Serialize for LetterFrequency {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.iter().map(|(c, p)| (c.to_string(), p)))
	}
}

/// Most frequent n-grams of a text.
///
/// Entries are ordered by descending count. Equal counts keep the order in
/// which the n-grams were first met while scanning the text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NGramTable {
	entries: Vec<(String, usize)>,
}

impl NGramTable {
	/// Counts every overlapping window of `n` letters and keeps the top
	/// [`NGRAM_TOP_K`].
	fn from_letters(letters: &[char], n: usize) -> Self {
		if n == 0 || letters.len() < n {
			return Self::default();
		}

		// Vec keeps first-seen order, the map points into it
		let mut entries: Vec<(String, usize)> = Vec::new();
		let mut positions: HashMap<String, usize> = HashMap::new();
		for window in letters.windows(n) {
			let ngram: String = window.iter().collect();
			match positions.get(&ngram) {
				Some(&position) => entries[position].1 += 1,
				None => {
					positions.insert(ngram.clone(), entries.len());
					entries.push((ngram, 1));
				}
			}
		}

		// Stable: ties stay in first-seen order
		entries.sort_by(|a, b| b.1.cmp(&a.1));
		entries.truncate(NGRAM_TOP_K);

		Self { entries }
	}

	/// Returns `true` if no n-gram was observed.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Number of entries (at most [`NGRAM_TOP_K`]).
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Iterates over `(ngram, count)` in rank order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.entries.iter().map(|(ngram, count)| (ngram.as_str(), *count))
	}

	/// Count of `ngram` if it made it into the table.
	pub fn get(&self, ngram: &str) -> Option<usize> {
		self.entries.iter().find(|(key, _)| key == ngram).map(|(_, count)| *count)
	}

	/// The first `k` entries as a new table.
	pub fn top(&self, k: usize) -> Self {
		Self { entries: self.entries.iter().take(k).cloned().collect() }
	}
}

impl Serialize for NGramTable {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_map(self.iter())
	}
}

/// Letter, digram and trigram tables of one text.
#[derive(Serialize, Clone, Debug)]
pub struct FrequencyAnalysis {
	pub letters: LetterFrequency,
	pub digrams: NGramTable,
	pub trigrams: NGramTable,
}

/// Uppercased letters of `text`, in order. Everything else is dropped.
pub(crate) fn letter_stream(text: &str) -> Vec<char> {
	text.chars()
		.filter(|c| is_letter(*c))
		.map(|c| c.to_ascii_uppercase())
		.collect()
}

/// Computes the frequency tables of `text`.
///
/// Only letters are counted, case-insensitively. Digrams and trigrams are
/// overlapping windows over the letter stream, so `"AB CD"` yields the
/// digrams `AB`, `BC` and `CD`.
pub fn analyze(text: &str) -> FrequencyAnalysis {
	let letters = letter_stream(text);
	FrequencyAnalysis {
		letters: LetterFrequency::from_letters(&letters),
		digrams: NGramTable::from_letters(&letters, 2),
		trigrams: NGramTable::from_letters(&letters, 3),
	}
}
