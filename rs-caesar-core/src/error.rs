use thiserror::Error;

/// Errors returned by the analysis engine.
///
/// Every operation is deterministic, so these are always caused by the
/// input and never worth retrying.
#[derive(Debug, Error)]
pub enum CaesarError {
	/// Shift outside `1..=25`.
	#[error("invalid shift {0}: expected a value between 1 and 25")]
	InvalidShift(i64),

	/// The text carries no letters, so no statistic can be computed.
	#[error("insufficient data: the text contains no letters")]
	InsufficientData,

	/// Report export failed.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}
