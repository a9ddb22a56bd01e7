//! Reference statistics for English text.
//!
//! All tables are process-wide constants indexed by the zero-based position
//! of a letter in the Latin alphabet (`A` = 0 .. `Z` = 25).

/// Number of letters in the alphabet.
pub const LETTER_COUNT: usize = 26;

/// Expected frequency of each letter in English text, in percent.
///
/// Sums to roughly 100. No entry is zero, so every letter takes part in the
/// chi-squared computation.
pub const ENGLISH_FREQUENCIES: [f64; LETTER_COUNT] = [
	8.12,  // A
	1.49,  // B
	2.78,  // C
	4.25,  // D
	12.02, // E
	2.23,  // F
	2.02,  // G
	6.09,  // H
	6.97,  // I
	0.15,  // J
	0.77,  // K
	4.03,  // L
	2.41,  // M
	6.75,  // N
	7.51,  // O
	1.93,  // P
	0.10,  // Q
	5.99,  // R
	6.33,  // S
	9.06,  // T
	2.76,  // U
	0.98,  // V
	2.36,  // W
	0.15,  // X
	1.97,  // Y
	0.07,  // Z
];

/// Digrams that earn a pattern bonus.
pub const COMMON_DIGRAMS: [&str; 10] = ["TH", "HE", "IN", "ER", "AN", "ED", "ND", "TO", "EN", "TI"];

/// Trigrams that earn a pattern bonus.
pub const COMMON_TRIGRAMS: [&str; 10] = ["THE", "AND", "ING", "HER", "HAT", "HIS", "THA", "ERE", "FOR", "ENT"];

/// Common English words, most frequent first.
///
/// The known-word score uses the whole list; live statistics only the
/// first [`LIVE_WORD_COUNT`] entries.
pub const COMMON_WORDS: [&str; 20] = [
	"THE", "AND", "TO", "OF", "A", "IN", "FOR", "IS", "ON", "THAT",
	"WITH", "IT", "BE", "AS", "YOU", "HAVE", "ARE", "AT", "THIS", "OR",
];

/// Size of the word list shown in live statistics.
pub const LIVE_WORD_COUNT: usize = 10;

/// Returns `true` for the characters the cipher rotates (ASCII letters).
///
/// Any other code point, accented letters included, is left untouched.
pub fn is_letter(c: char) -> bool {
	c.is_ascii_alphabetic()
}

/// Zero-based alphabet position of `c`, ignoring case.
///
/// Returns `None` for non-letters.
pub fn letter_index(c: char) -> Option<usize> {
	if is_letter(c) {
		Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
	} else {
		None
	}
}

/// Uppercase letter at position `index` (`0..26`).
pub(crate) fn letter_at(index: usize) -> char {
	(b'A' + (index % LETTER_COUNT) as u8) as char
}

/// Expected English frequency (percent) of `c`, ignoring case.
pub fn expected_frequency(c: char) -> Option<f64> {
	letter_index(c).map(|i| ENGLISH_FREQUENCIES[i])
}
