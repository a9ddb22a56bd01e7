use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use rs_caesar_core::analysis::report::preview;

/// Characters of input and output kept per entry.
const PREVIEW_CHARS: usize = 50;
/// Entries returned by `recent` by default.
pub const RECENT_ENTRIES: usize = 10;
/// Entries kept before the oldest ones are dropped.
pub const HISTORY_CAPACITY: usize = 1000;

/// One user action on the decoder.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HistoryEntry {
	/// Local time of day, `HH:MM:SS`.
	pub time: String,
	pub action: String,
	pub score: f64,
	pub input_preview: String,
	pub output_preview: String,
}

/// Append-only log of decoder actions.
///
/// Owned by the server; the analysis engine itself keeps no state.
/// Holds at most `capacity` entries: appending to a full log evicts the
/// oldest entry. Otherwise the log only shrinks through `clear`
/// (`DELETE /v1/history`).
#[derive(Debug)]
pub struct History {
	entries: VecDeque<HistoryEntry>,
	capacity: usize,
}

impl Default for History {
	fn default() -> Self {
		Self::with_capacity(HISTORY_CAPACITY)
	}
}

impl History {
	pub fn new() -> Self {
		Self::default()
	}

	/// Empty log keeping at most `capacity` entries (at least one).
	pub fn with_capacity(capacity: usize) -> Self {
		let capacity = capacity.max(1);
		Self { entries: VecDeque::new(), capacity }
	}

	/// Appends an entry stamped with the current local time.
	pub fn record(&mut self, action: &str, score: f64, input: &str, output: &str) {
		self.record_at(Local::now(), action, score, input, output);
	}

	/// Appends an entry with an explicit timestamp.
	pub fn record_at(&mut self, at: DateTime<Local>, action: &str, score: f64, input: &str, output: &str) {
		if self.entries.len() == self.capacity {
			self.entries.pop_front();
		}
		self.entries.push_back(HistoryEntry {
			time: at.format("%H:%M:%S").to_string(),
			action: action.to_owned(),
			score,
			input_preview: preview(input, PREVIEW_CHARS).to_owned(),
			output_preview: preview(output, PREVIEW_CHARS).to_owned(),
		});
	}

	/// Up to `n` entries, newest first.
	pub fn recent(&self, n: usize) -> Vec<&HistoryEntry> {
		self.entries.iter().rev().take(n).collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Exports the whole log as pretty JSON.
	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(&self.entries)
	}
}
