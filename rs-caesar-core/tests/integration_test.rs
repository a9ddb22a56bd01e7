//! End-to-end tests for shift recovery.
//!
//! These tests exercise the public API only: decoding, ranking and the
//! arg-min selection, over generated and hand-written ciphertexts.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rs_caesar_core::analysis::frequency::analyze;
use rs_caesar_core::analysis::ranker::{pattern_ranking, rank_shifts_with, RankOptions, PATTERN_VIEW_TOP_N};
use rs_caesar_core::analysis::report::AnalysisReport;
use rs_caesar_core::samples::SAMPLES;
use rs_caesar_core::{best_shift, decode, decode_raw, encode, rank_shifts, top_candidates, CaesarError, Shift};

/// Printable ASCII strings from a fixed seed.
fn printable_texts() -> Vec<String> {
	let mut rng = StdRng::seed_from_u64(26);
	let mut texts: Vec<String> = (0..40)
		.map(|_| {
			let len = rng.random_range(0..120);
			(0..len).map(|_| rng.random_range(0x20u8..0x7f) as char).collect()
		})
		.collect();
	texts.push((0x20u8..0x7f).map(|b| b as char).collect());
	texts.push(String::new());
	texts
}

#[test]
fn test_round_trip_all_shifts() {
	for text in printable_texts() {
		for shift in Shift::all() {
			let decoded = decode(&text, shift);
			assert_eq!(decode(&decoded, shift.complement()), text, "shift {shift}");
			assert_eq!(encode(&decoded, shift), text, "shift {shift}");
		}
	}
}

#[test]
fn test_non_letters_and_case_preserved() {
	for text in printable_texts() {
		for shift in Shift::all() {
			let decoded = decode(&text, shift);
			assert_eq!(decoded.len(), text.len());
			for (original, output) in text.chars().zip(decoded.chars()) {
				if original.is_ascii_alphabetic() {
					assert_eq!(original.is_ascii_uppercase(), output.is_ascii_uppercase());
					assert_eq!(original.is_ascii_lowercase(), output.is_ascii_lowercase());
				} else {
					assert_eq!(original, output);
				}
			}
		}
	}
}

#[test]
fn test_letter_frequencies_total_100() {
	for text in ["abc", "ZZZZ", "TheQuickBrownFox", "xyz".repeat(97).as_str()] {
		let sum: f64 = analyze(text).letters.iter().map(|(_, p)| p).sum();
		assert!((sum - 100.0).abs() < 1e-9, "{text}: {sum}");
	}
}

#[test]
fn test_ranking_deterministic_and_sorted() {
	for sample in &SAMPLES {
		let first = rank_shifts(sample.ciphertext);
		let second = rank_shifts(sample.ciphertext);
		assert_eq!(first, second);
		assert_eq!(first.len(), 25);
		assert!(first.windows(2).all(|w| w[0].score <= w[1].score));
		assert_eq!(Some(first[0].shift), best_shift(sample.ciphertext));
	}
}

#[test]
fn test_parallel_ranking_identical() {
	let mut options = RankOptions::default();
	options.parallel = true;
	for sample in &SAMPLES {
		assert_eq!(rank_shifts_with(sample.ciphertext, &options), rank_shifts(sample.ciphertext));
	}
}

#[test]
fn test_hello_world() {
	let shift = Shift::new(3).unwrap();
	assert_eq!(decode("KHOOR ZRUOG", shift), "HELLO WORLD");
	assert_eq!(decode_raw("KHOOR ZRUOG", 3).unwrap(), "HELLO WORLD");

	let ranked = rank_shifts("KHOOR ZRUOG");
	let position = ranked.iter().position(|r| r.plaintext == "HELLO WORLD").unwrap();
	assert_eq!(ranked[position].shift, shift);
	assert!(position < 3);

	// With more text the letter distribution settles on the right shift
	let longer = "Khoor Zruog, wklv lv d whvw ri wkh Fdhvdu flskhu.";
	assert_eq!(best_shift(longer), Some(shift));
	assert_eq!(
		decode(longer, best_shift(longer).unwrap()),
		"Hello World, this is a test of the Caesar cipher."
	);
}

#[test]
fn test_two_word_ciphertext_prefers_frequency_fit() {
	// Ten letters are too few for the chi-squared term:
	// "EBIIL TLOIA" (shift 6) fits English frequencies better than "HELLO WORLD"
	assert_eq!(best_shift("KHOOR ZRUOG"), Some(Shift::new(6).unwrap()));
}

#[test]
fn test_recovers_arbitrary_shift() {
	let plaintext = "We hold these truths to be self evident, that all men are created equal.";
	for shift in Shift::all() {
		let ciphertext = encode(plaintext, shift);
		assert_eq!(best_shift(&ciphertext), Some(shift));
		assert_eq!(top_candidates(&ciphertext, 1)[0].plaintext, plaintext);
	}
}

#[test]
fn test_empty_input_is_undetermined() {
	assert!(rank_shifts("").is_empty());
	assert!(rank_shifts("  \n ").is_empty());
	assert_eq!(best_shift(""), None);
	assert!(top_candidates("", 5).is_empty());
	assert!(matches!(AnalysisReport::build(""), Err(CaesarError::InsufficientData)));
}

#[test]
fn test_repeated_letter_sweep() {
	let text = "A".repeat(40);
	let ranked = rank_shifts(&text);
	assert_eq!(ranked.len(), 25);
	assert!(ranked.iter().all(|r| r.score.is_finite()));
	assert!(ranked.iter().all(|r| r.confidence() == 0.0));
}

#[test]
fn test_invalid_shift_rejected() {
	for value in [0, 26, -1, 100] {
		assert!(matches!(decode_raw("abc", value), Err(CaesarError::InvalidShift(v)) if v == value));
	}
}

#[test]
fn test_pattern_view() {
	let ranking = pattern_ranking(SAMPLES[1].ciphertext);
	assert_eq!(ranking[0].shift.value(), 3);
	assert!(ranking.len() >= PATTERN_VIEW_TOP_N);
}
