use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::alphabet::is_letter;
use crate::cipher::{decode, Shift};
use super::scorer::{combined_score, pattern_matches, quality_score, PatternMatch};

/// Number of candidates listed in a report.
pub const REPORT_TOP_N: usize = 5;
/// Number of candidates listed in the pattern view.
pub const PATTERN_VIEW_TOP_N: usize = 8;

/// Outcome of decoding a ciphertext with one shift.
///
/// # Invariants
/// - `plaintext == decode(ciphertext, shift)`
/// - `score` is the combined score of `plaintext` (lower is better)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScoreResult {
	pub shift: Shift,
	pub score: f64,
	pub plaintext: String,
}

impl ScoreResult {
	/// Display-only confidence, `max(0, 100 - score)`.
	///
	/// Never used to rank candidates.
	pub fn confidence(&self) -> f64 {
		(100.0 - self.score).max(0.0)
	}
}

/// A shift ranked by how many common patterns its plaintext contains.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PatternCandidate {
	pub shift: Shift,
	pub matches: PatternMatch,
	pub plaintext: String,
}

/// Options of a ranking pass.
///
/// # Invariants
/// - `limit`, when set, is within `1..=25`
#[derive(Clone, Debug, Default)]
pub struct RankOptions {
	/// Spread the sweep over worker threads. Output is identical either way.
	pub parallel: bool,

	/// Maximum number of candidates returned, all 25 when unset.
	limit: Option<usize>,
}

impl RankOptions {
	/// Returns the result limit, if any.
	pub fn limit(&self) -> Option<usize> {
		self.limit
	}

	/// Keeps only the `limit` best candidates.
	///
	/// # Errors
	/// Returns an error if `limit` is outside `1..=25`.
	pub fn set_limit(&mut self, limit: usize) -> Result<(), String> {
		let max = Shift::all().count();
		if !(1..=max).contains(&limit) {
			return Err(format!("Limit must be between 1 and {max}, got {limit}"));
		}
		self.limit = Some(limit);
		Ok(())
	}

	/// Returns every candidate again.
	pub fn clear_limit(&mut self) {
		self.limit = None;
	}
}

/// Returns `true` if `text` has at least one letter to analyse.
///
/// Empty and whitespace-only texts have none.
pub fn has_letters(text: &str) -> bool {
	text.chars().any(is_letter)
}

/// Decodes and scores `ciphertext` with a single shift.
fn evaluate(ciphertext: &str, shift: Shift) -> ScoreResult {
	let plaintext = decode(ciphertext, shift);
	let score = combined_score(&plaintext).total();
	trace!("shift {shift}: score {score:.3}");
	ScoreResult { shift, score, plaintext }
}

/// Scores every shift in ascending order.
fn sweep(ciphertext: &str) -> Vec<ScoreResult> {
	Shift::all().map(|shift| evaluate(ciphertext, shift)).collect()
}

/// Scores every shift on worker threads.
///
/// Shifts are split into one chunk per CPU (at most one per shift). Partial
/// results come back through a channel and are put back in ascending shift
/// order, so the output equals `sweep`.
fn sweep_parallel(ciphertext: &str) -> Vec<ScoreResult> {
	let shifts: Vec<Shift> = Shift::all().collect();
	let workers = num_cpus::get().clamp(1, shifts.len());
	let chunk_size = shifts.len().div_ceil(workers);
	let text: Arc<str> = Arc::from(ciphertext);

	let (tx, rx) = mpsc::channel();
	for chunk in shifts.chunks(chunk_size) {
		let tx = tx.clone();
		let text = Arc::clone(&text);
		let chunk: Vec<Shift> = chunk.to_vec();

		thread::spawn(move || {
			let partial: Vec<ScoreResult> = chunk.into_iter().map(|shift| evaluate(&text, shift)).collect();
			tx.send(partial).expect("Failed to send from thread");
		});
	}
	drop(tx);

	let mut results: Vec<ScoreResult> = rx.iter().flatten().collect();
	results.sort_by_key(|result| result.shift);
	complete_or_resweep(results, ciphertext)
}

/// Falls back to the sequential sweep when a worker died before sending its
/// chunk.
fn complete_or_resweep(results: Vec<ScoreResult>, ciphertext: &str) -> Vec<ScoreResult> {
	if results.len() == Shift::all().count() {
		return results;
	}
	warn!("parallel sweep returned {} of 25 shifts, rescoring sequentially", results.len());
	sweep(ciphertext)
}

/// Sorts ascending by score. Stable, so equal scores keep ascending shift order.
pub(crate) fn sort_by_score(results: &mut [ScoreResult]) {
	results.sort_by(|a, b| a.score.total_cmp(&b.score));
}

/// Picks the lowest score, scanning in order with a strict `<`.
///
/// A later equal score never displaces an earlier one.
fn select_best<T>(candidates: impl IntoIterator<Item = T>, score: impl Fn(&T) -> f64) -> Option<T> {
	let mut best: Option<(T, f64)> = None;
	for candidate in candidates {
		let value = score(&candidate);
		let better = match &best {
			Some((_, best_value)) => value < *best_value,
			None => true,
		};
		if better {
			best = Some((candidate, value));
		}
	}
	best.map(|(candidate, _)| candidate)
}

/// Ranks every shift of `ciphertext` according to `options`.
///
/// Returns the candidates sorted ascending by combined score (best first),
/// truncated to `options.limit()`. Returns an empty list when the ciphertext
/// has no letters.
pub fn rank_shifts_with(ciphertext: &str, options: &RankOptions) -> Vec<ScoreResult> {
	if !has_letters(ciphertext) {
		debug!("ranking skipped: no letters in input");
		return Vec::new();
	}

	let mut results = if options.parallel { sweep_parallel(ciphertext) } else { sweep(ciphertext) };
	sort_by_score(&mut results);
	if let Some(limit) = options.limit {
		results.truncate(limit);
	}

	if let Some(best) = results.first() {
		debug!("best shift {} with score {:.3}", best.shift, best.score);
	}
	results
}

/// Ranks all 25 shifts of `ciphertext`, best first.
///
/// Returns an empty list when the ciphertext has no letters.
pub fn rank_shifts(ciphertext: &str) -> Vec<ScoreResult> {
	rank_shifts_with(ciphertext, &RankOptions::default())
}

/// The `n` best candidates of `ciphertext`.
pub fn top_candidates(ciphertext: &str, n: usize) -> Vec<ScoreResult> {
	let mut results = rank_shifts(ciphertext);
	results.truncate(n);
	results
}

/// The candidate with the lowest combined score.
///
/// Ties go to the smallest shift. Returns `None` when the ciphertext has no
/// letters.
pub fn best_candidate(ciphertext: &str) -> Option<ScoreResult> {
	if !has_letters(ciphertext) {
		return None;
	}
	select_best(sweep(ciphertext), |result| result.score)
}

/// The most probable shift of `ciphertext`, or `None` if it cannot be
/// determined (no letters).
pub fn best_shift(ciphertext: &str) -> Option<Shift> {
	best_candidate(ciphertext).map(|result| result.shift)
}

/// Quick detection using the quality score alone, without the word heuristics.
pub fn quality_best_shift(ciphertext: &str) -> Option<Shift> {
	if !has_letters(ciphertext) {
		return None;
	}
	select_best(Shift::all(), |shift| quality_score(&decode(ciphertext, *shift)))
}

/// Ranks every shift by the number of distinct common patterns in its
/// plaintext, most first. Ties keep ascending shift order.
///
/// Returns an empty list when the ciphertext has no letters.
pub fn pattern_ranking(ciphertext: &str) -> Vec<PatternCandidate> {
	if !has_letters(ciphertext) {
		return Vec::new();
	}

	let mut candidates: Vec<PatternCandidate> = Shift::all()
		.map(|shift| {
			let plaintext = decode(ciphertext, shift);
			PatternCandidate { shift, matches: pattern_matches(&plaintext), plaintext }
		})
		.collect();
	candidates.sort_by(|a, b| b.matches.total().cmp(&a.matches.total()));
	candidates
}
