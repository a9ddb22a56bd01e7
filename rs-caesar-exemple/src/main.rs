use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use rs_caesar_core::analysis::ranker::{
    pattern_ranking, rank_shifts_with, RankOptions, PATTERN_VIEW_TOP_N, REPORT_TOP_N,
};
use rs_caesar_core::analysis::report::{AnalysisReport, LiveStats};
use rs_caesar_core::samples::random_sample;
use rs_caesar_core::{best_shift, decode_raw};

/// Recovers the shift of a Caesar ciphertext and prints the analysis.
#[derive(Parser, Debug)]
#[command(name = "rs-caesar-exemple")]
struct Args {
    /// File holding the ciphertext (a random built-in sample when omitted)
    file: Option<PathBuf>,

    /// Number of ranked candidates to print
    #[arg(short, long, default_value_t = REPORT_TOP_N)]
    limit: usize,

    /// Score the shifts on the calling thread only
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Read the ciphertext from the given file,
    // or pick one of the built-in samples
    let ciphertext = match &args.file {
        Some(path) => {
            info!("reading ciphertext from {}", path.display());
            fs::read_to_string(path)?.trim().to_owned()
        }
        None => {
            let sample = random_sample();
            println!("Using sample '{}'", sample.name);
            sample.ciphertext.to_owned()
        }
    };
    println!("Ciphertext: {ciphertext}\n");

    // Automatic detection: 'None' means the text has no letters
    let Some(shift) = best_shift(&ciphertext) else {
        println!("Not enough data to determine the shift");
        return Ok(());
    };
    let stats = LiveStats::compute(&ciphertext, shift);
    println!("Best shift: {shift}");
    println!("Plaintext: {}", stats.decoded);
    println!(
        "Quality score: {:.2} | Word matches: {}/{}\n",
        stats.quality, stats.word_matches, stats.word_total
    );

    // Ranking options: only keep the best candidates, computed on worker threads
    let mut options = RankOptions::default();
    options.set_limit(args.limit)?;
    options.parallel = !args.sequential;

    // A limit outside 1..=25 is refused
    match options.set_limit(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    for (rank, candidate) in rank_shifts_with(&ciphertext, &options).iter().enumerate() {
        println!(
            "Rank {}: shift {:2} (confidence {:.1}%) {}",
            rank + 1,
            candidate.shift,
            candidate.confidence(),
            candidate.plaintext
        );
    }
    println!();

    // Pattern view: shifts sorted by the number of common digrams and trigrams found
    for candidate in pattern_ranking(&ciphertext).iter().take(PATTERN_VIEW_TOP_N) {
        println!(
            "Shift {:2}: {:2} patterns (density: {:.3})",
            candidate.shift,
            candidate.matches.total(),
            candidate.matches.density
        );
    }
    println!();

    // Manual decoding rejects shift 0 instead of wrapping
    match decode_raw(&ciphertext, 0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }
    // The complement of the best shift encodes the plaintext back
    let back = decode_raw(&stats.decoded, shift.complement().value() as i64)?;
    println!("Round trip preserved: {}\n", back == ciphertext);

    // Full report, as plain text
    let report = AnalysisReport::build(&ciphertext)?;
    println!("{}", report.to_text());

    Ok(())
}
