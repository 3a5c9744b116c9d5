// Preprocessing stage: raw scrape -> cleaned, tokenized postings.
//
// Order matters and follows how the data is actually broken:
//   1. drop duplicate ids, duplicate descriptions, missing descriptions
//   2. drop non-English descriptions
//   3. infer posting dates, clean categorical columns, drop industry outliers
//   4. normalize descriptions, drop rows with too few tokens
//
// Nothing is written until every row has been processed.

use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::postings::io;
use crate::postings::models::{Posting, RawPosting};
use crate::preprocess::{dedupe, PreprocessStats, Preprocessor};

/// Clean raw rows in memory. Returns the surviving postings and the row
/// counts after each step.
pub fn clean(rows: Vec<RawPosting>) -> Result<(Vec<Posting>, PreprocessStats)> {
    let preprocessor = Preprocessor::new()?;
    let mut stats = PreprocessStats {
        raw: rows.len(),
        ..Default::default()
    };

    let rows = dedupe(rows);
    stats.after_dedupe = rows.len();
    info!(rows = rows.len(), "Removed duplicates and missing descriptions");

    let rows: Vec<RawPosting> = rows
        .into_iter()
        .filter(|row| preprocessor.keep_language(row))
        .collect();
    stats.after_language = rows.len();
    info!(rows = rows.len(), "Filtered out non-English descriptions");

    let rows: Vec<RawPosting> = rows
        .into_iter()
        .filter_map(|row| preprocessor.clean_fields(row))
        .collect();
    stats.after_industries = rows.len();
    info!(rows = rows.len(), "Inferred dates and cleaned fields");

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Preprocessing descriptions [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut postings = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(posting) = preprocessor.tokenize(row) {
            postings.push(posting);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    stats.after_tokens = postings.len();
    info!(rows = postings.len(), "Normalized descriptions");

    Ok((postings, stats))
}

/// Run the whole stage: read `raw_path`, clean, write `processed_path`.
pub fn run(raw_path: &Path, processed_path: &Path) -> Result<PreprocessStats> {
    println!("Loading raw postings from {}...", raw_path.display());
    let rows = io::read_raw(raw_path)?;

    let (postings, stats) = clean(rows)?;
    if postings.is_empty() {
        anyhow::bail!(
            "No postings survived preprocessing ({} raw rows), nothing to write",
            stats.raw
        );
    }

    io::write_processed(processed_path, &postings)?;
    Ok(stats)
}
