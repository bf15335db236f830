use anyhow::{bail, Context, Result};
use glob::glob;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

pub mod row;
pub mod text;
pub mod tweet;

pub use row::TweetRow;
pub use tweet::Tweet;

/// Expand `input_pattern`, normalize every matched line-delimited JSON tweet
/// file, and stack all rows into `output_csv` as one CSV with a single header
/// row and no index column. Returns the number of data rows written.
///
/// Refuses to overwrite: fails before reading any input if `output_csv`
/// already exists. Every file is mapped before anything is written, so a
/// parse failure produces no output at all; an interrupted write can still
/// leave a partial file at the destination.
pub fn normalize_to_csv<P: AsRef<Path>>(input_pattern: &str, output_csv: P) -> Result<usize> {
    let output_csv = output_csv.as_ref();
    if output_csv.exists() {
        bail!(
            "output csv `{}` already exists; delete it and try again",
            output_csv.display()
        );
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in
        glob(input_pattern).with_context(|| format!("invalid glob pattern `{}`", input_pattern))?
    {
        let path = entry.context("cannot read glob entry")?;
        if path.is_file() {
            paths.push(path);
        }
    }
    // directory-listing order is not guaranteed; sort for deterministic output
    paths.sort();
    if paths.is_empty() {
        bail!("no files matched pattern `{}`", input_pattern);
    }
    info!(files = paths.len(), pattern = %input_pattern, "normalizing tweet json");

    let mut rows: Vec<TweetRow> = Vec::new();
    for path in &paths {
        rows.extend(process_single_json(path)?);
    }

    let mut wtr = csv::Writer::from_path(output_csv)
        .with_context(|| format!("could not create `{}`", output_csv.display()))?;
    for row in &rows {
        wtr.serialize(row)
            .with_context(|| format!("failed to write row to `{}`", output_csv.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush `{}`", output_csv.display()))?;

    info!(rows = rows.len(), output = %output_csv.display(), "wrote combined csv");
    Ok(rows.len())
}

/// Parse one file as a sequence of independent JSON objects, one per line,
/// and map each record onto the fixed row schema. A malformed line fails the
/// whole run; blank lines are skipped.
#[instrument(level = "info", skip(path), fields(file = %path.display()))]
fn process_single_json(path: &Path) -> Result<Vec<TweetRow>> {
    let file = File::open(path).with_context(|| format!("failed to open `{}`", path.display()))?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line
            .with_context(|| format!("read error in `{}` at line {}", path.display(), idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let tweet: Tweet = serde_json::from_str(&line).with_context(|| {
            format!("JSON parse error in `{}` at line {}", path.display(), idx + 1)
        })?;
        rows.push(TweetRow::from_tweet(&tweet));
    }

    info!(rows = rows.len(), "normalized file");
    Ok(rows)
}
