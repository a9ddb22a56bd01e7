use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::alphabet::{expected_frequency, is_letter, LIVE_WORD_COUNT};
use crate::cipher::{decode, Shift};
use crate::error::CaesarError;
use super::frequency::{analyze, LetterFrequency, NGramTable};
use super::ranker::{has_letters, sort_by_score, ScoreResult, REPORT_TOP_N};
use super::scorer::{live_word_matches, quality_score, readability_penalty, word_score};

/// Number of n-grams per table kept in a report entry.
const REPORT_NGRAMS: usize = 5;
/// Letters listed in a frequency summary.
const SUMMARY_LETTERS: usize = 10;
/// Digrams listed in a frequency summary.
const SUMMARY_DIGRAMS: usize = 8;
/// Trigrams listed in a frequency summary.
const SUMMARY_TRIGRAMS: usize = 6;

const INPUT_PREVIEW_CHARS: usize = 100;
const CANDIDATE_PREVIEW_CHARS: usize = 80;

/// Runs of sentence terminators.
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Returns at most the first `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((index, _)) => &text[..index],
		None => text,
	}
}

/// Basic counts over a text.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStatistics {
	pub characters: usize,
	pub letters: usize,
	pub words: usize,
	/// Pieces obtained when splitting on `[.!?]+`.
	///
	/// A trailing terminator yields an empty last piece, so `"Hi. There."`
	/// counts 3.
	pub sentences: usize,
}

impl TextStatistics {
	pub fn of(text: &str) -> Self {
		Self {
			characters: text.chars().count(),
			letters: text.chars().filter(|c| is_letter(*c)).count(),
			words: text.split_whitespace().count(),
			sentences: SENTENCE_BREAK.split(text).count(),
		}
	}
}

/// Statistics shown after decoding with a chosen shift.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct LiveStats {
	pub shift: Shift,
	/// Characters in the ciphertext.
	pub length: usize,
	/// Letters in the ciphertext.
	pub letters: usize,
	/// Quality score of the decoded text.
	pub quality: f64,
	/// Common words found in the decoded text, out of `word_total`.
	pub word_matches: usize,
	pub word_total: usize,
	pub decoded: String,
}

impl LiveStats {
	/// Decodes `ciphertext` with `shift` and computes its statistics.
	pub fn compute(ciphertext: &str, shift: Shift) -> Self {
		let decoded = decode(ciphertext, shift);
		let statistics = TextStatistics::of(ciphertext);
		Self {
			shift,
			length: statistics.characters,
			letters: statistics.letters,
			quality: quality_score(&decoded),
			word_matches: live_word_matches(&decoded),
			word_total: LIVE_WORD_COUNT,
			decoded,
		}
	}
}

/// Observed frequency of a letter next to its English expectation.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct LetterDeviation {
	pub letter: char,
	pub observed: f64,
	/// `observed - expected`, in percentage points.
	pub deviation: f64,
}

/// Frequency view of a text: statistics, the most frequent letters with
/// their deviation from English, top n-grams and the quality of every shift.
#[derive(Serialize, Clone, Debug)]
pub struct FrequencySummary {
	pub statistics: TextStatistics,
	pub top_letters: Vec<LetterDeviation>,
	pub digrams: NGramTable,
	pub trigrams: NGramTable,
	pub shift_quality: Vec<(Shift, f64)>,
}

impl FrequencySummary {
	/// # Errors
	/// Returns `CaesarError::InsufficientData` if `text` has no letters.
	pub fn build(text: &str) -> Result<Self, CaesarError> {
		if !has_letters(text) {
			return Err(CaesarError::InsufficientData);
		}

		let analysis = analyze(text);
		let top_letters = analysis
			.letters
			.sorted_desc()
			.into_iter()
			.take(SUMMARY_LETTERS)
			.map(|(letter, observed)| LetterDeviation {
				letter,
				observed,
				deviation: observed - expected_frequency(letter).unwrap_or_default(),
			})
			.collect();

		Ok(Self {
			statistics: TextStatistics::of(text),
			top_letters,
			digrams: analysis.digrams.top(SUMMARY_DIGRAMS),
			trigrams: analysis.trigrams.top(SUMMARY_TRIGRAMS),
			shift_quality: Shift::all().map(|shift| (shift, quality_score(&decode(text, shift)))).collect(),
		})
	}
}

/// Analysis of the plaintext produced by one shift.
#[derive(Serialize, Clone, Debug)]
pub struct ShiftAnalysis {
	pub shift: Shift,
	pub decoded_text: String,
	pub quality_score: f64,
	pub readability_score: f64,
	pub word_score: f64,
	pub letter_frequency: LetterFrequency,
	pub top_digrams: NGramTable,
	pub top_trigrams: NGramTable,
}

impl ShiftAnalysis {
	fn compute(ciphertext: &str, shift: Shift) -> Self {
		let decoded_text = decode(ciphertext, shift);
		let analysis = analyze(&decoded_text);
		Self {
			shift,
			quality_score: quality_score(&decoded_text),
			readability_score: readability_penalty(&decoded_text),
			word_score: word_score(&decoded_text),
			letter_frequency: analysis.letters,
			top_digrams: analysis.digrams.top(REPORT_NGRAMS),
			top_trigrams: analysis.trigrams.top(REPORT_NGRAMS),
			decoded_text,
		}
	}

	/// Sum of the three sub-scores.
	pub fn combined_score(&self) -> f64 {
		self.quality_score + self.readability_score + self.word_score
	}
}

/// Serializes the per-shift entries as a map keyed `shift_1` .. `shift_25`.
fn serialize_by_shift<S: Serializer>(analysis: &[ShiftAnalysis], serializer: S) -> Result<S::Ok, S::Error> {
	let mut map = serializer.serialize_map(Some(analysis.len()))?;
	for entry in analysis {
		map.serialize_entry(&format!("shift_{}", entry.shift), entry)?;
	}
	map.end()
}

/// Full analysis of a ciphertext over every shift.
#[derive(Serialize, Clone, Debug)]
pub struct AnalysisReport {
	pub timestamp: DateTime<Local>,
	pub input_text: String,
	#[serde(serialize_with = "serialize_by_shift")]
	pub analysis: Vec<ShiftAnalysis>,
}

impl AnalysisReport {
	/// Builds a report stamped with the current local time.
	///
	/// # Errors
	/// Returns `CaesarError::InsufficientData` if `text` has no letters.
	pub fn build(text: &str) -> Result<Self, CaesarError> {
		Self::build_at(text, Local::now())
	}

	/// Builds a report with an explicit timestamp.
	pub fn build_at(text: &str, timestamp: DateTime<Local>) -> Result<Self, CaesarError> {
		if !has_letters(text) {
			return Err(CaesarError::InsufficientData);
		}

		Ok(Self {
			timestamp,
			input_text: text.to_owned(),
			analysis: Shift::all().map(|shift| ShiftAnalysis::compute(text, shift)).collect(),
		})
	}

	/// Every shift ranked by combined score, best first.
	pub fn candidates(&self) -> Vec<ScoreResult> {
		let mut candidates: Vec<ScoreResult> = self
			.analysis
			.iter()
			.map(|entry| ScoreResult {
				shift: entry.shift,
				score: entry.combined_score(),
				plaintext: entry.decoded_text.clone(),
			})
			.collect();
		sort_by_score(&mut candidates);
		candidates
	}

	/// Pretty-printed JSON export.
	pub fn to_json(&self) -> Result<String, CaesarError> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Plain-text export listing the five best candidates.
	pub fn to_text(&self) -> String {
		let mut text = String::from("CAESAR CIPHER ANALYSIS REPORT\n");
		text.push_str(&format!("Generated: {}\n", self.timestamp.to_rfc3339()));
		text.push_str(&"=".repeat(50));
		text.push_str("\n\n");

		text.push_str(&format!("Input Text Length: {} characters\n", self.input_text.chars().count()));
		text.push_str(&format!("Input Preview: {}...\n\n", preview(&self.input_text, INPUT_PREVIEW_CHARS)));

		text.push_str(&format!("TOP {} CANDIDATES:\n", REPORT_TOP_N));
		text.push_str(&"-".repeat(30));
		text.push('\n');

		for (rank, candidate) in self.candidates().iter().take(REPORT_TOP_N).enumerate() {
			text.push_str(&format!("\nRank {}: Shift {} (Score: {:.2})\n", rank + 1, candidate.shift, candidate.score));
			text.push_str(&format!("   {}...\n", preview(&candidate.plaintext, CANDIDATE_PREVIEW_CHARS)));
		}

		text
	}
}
