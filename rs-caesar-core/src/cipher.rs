use std::fmt;

use serde::{Deserialize, Serialize};

use crate::alphabet::LETTER_COUNT;
use crate::error::CaesarError;

/// A non-trivial Caesar shift.
///
/// # Invariants
/// - The wrapped value is always in `1..=25`. Shift 0 leaves the text
///   unchanged and is never a meaningful candidate.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i64", into = "u8")]
pub struct Shift(u8);

impl Shift {
	/// Smallest valid shift.
	pub const MIN: u8 = 1;
	/// Largest valid shift.
	pub const MAX: u8 = (LETTER_COUNT - 1) as u8;

	/// Creates a shift.
	///
	/// # Errors
	/// Returns `CaesarError::InvalidShift` when `value` is outside `1..=25`.
	pub fn new(value: i64) -> Result<Self, CaesarError> {
		if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
			Ok(Self(value as u8))
		} else {
			Err(CaesarError::InvalidShift(value))
		}
	}

	/// Raw shift value.
	pub fn value(self) -> u8 {
		self.0
	}

	/// The shift that undoes this one (`26 - s`).
	pub fn complement(self) -> Self {
		Self(LETTER_COUNT as u8 - self.0)
	}

	/// Every candidate shift, in ascending order.
	pub fn all() -> impl Iterator<Item = Shift> {
		(Self::MIN..=Self::MAX).map(Shift)
	}
}

impl TryFrom<i64> for Shift {
	type Error = CaesarError;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		Shift::new(value)
	}
}

impl From<Shift> for u8 {
	fn from(shift: Shift) -> Self {
		shift.0
	}
}

impl fmt::Display for Shift {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Rotates a single character back by `offset` positions.
///
/// Letters keep their case, anything else is returned as is.
fn rotate(c: char, offset: u8) -> char {
	let base = if c.is_ascii_uppercase() {
		b'A'
	} else if c.is_ascii_lowercase() {
		b'a'
	} else {
		return c;
	};
	let position = c as u8 - base;
	let rotated = (position + LETTER_COUNT as u8 - offset) % LETTER_COUNT as u8;
	(base + rotated) as char
}

/// Decodes `text` by moving every letter `shift` positions back in the alphabet.
///
/// Case is preserved, non-letters are copied unchanged.
/// Empty input gives an empty string.
pub fn decode(text: &str, shift: Shift) -> String {
	text.chars().map(|c| rotate(c, shift.0)).collect()
}

/// Encodes `text` by moving every letter `shift` positions forward.
///
/// Equivalent to `decode(text, shift.complement())`.
pub fn encode(text: &str, shift: Shift) -> String {
	decode(text, shift.complement())
}

/// Decodes with an unchecked shift value.
///
/// # Errors
/// Returns `CaesarError::InvalidShift` if `shift` is outside `1..=25`.
/// Values are never wrapped: 0 and 26 are rejected.
pub fn decode_raw(text: &str, shift: i64) -> Result<String, CaesarError> {
	Ok(decode(text, Shift::new(shift)?))
}
