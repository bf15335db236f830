use anyhow::{bail, Context, Result};
use csv::StringRecord;
use glob::glob;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, instrument};

/// File names exempt from parsing entirely. Their format predates the
/// timestamp fix and they are copied to the output directory byte-for-byte.
pub const PASSTHROUGH_FILES: &[&str] = &[
    "2012-waldo-canyon-fire-co.csv",
    "2013-yarnell-hill-az.csv",
    "2011-wallow-az.csv",
];

const TIMESTAMP_COLUMN: &str = "Timestamp";
const TWEET_ID_COLUMN: &str = "Tweet Id";

/// Per-file cleaning counts, reported as a diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanStats {
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_empty_timestamp: usize,
    pub duplicate_ids_removed: usize,
}

/// Clean every `*.csv` directly inside `input_dir` (non-recursive) into
/// `output_dir`, which must already exist — it is never created here.
/// Allow-listed legacy files are copied verbatim; everything else goes
/// through [`clean_file`].
pub fn clean_dir<P: AsRef<Path>, Q: AsRef<Path>>(input_dir: P, output_dir: Q) -> Result<()> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();
    if !output_dir.is_dir() {
        bail!(
            "output dir `{}` does not exist; create it and try again",
            output_dir.display()
        );
    }

    let pattern = format!("{}/{}", input_dir.display(), "*.csv");
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in glob(&pattern)
        .with_context(|| format!("invalid glob pattern `{}`", pattern))?
    {
        let path = entry.context("cannot read glob entry")?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    info!(files = paths.len(), input = %input_dir.display(), "cleaning csv files");

    for path in &paths {
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .with_context(|| format!("non-utf8 file name: `{}`", path.display()))?;
        let output_path = output_dir.join(file_name);

        if PASSTHROUGH_FILES.contains(&file_name) {
            fs::copy(path, &output_path).with_context(|| {
                format!(
                    "failed to copy `{}` to `{}`",
                    path.display(),
                    output_path.display()
                )
            })?;
            info!(file = %file_name, "copied verbatim");
            continue;
        }

        let stats = clean_file(path, &output_path)?;
        info!(
            file = %file_name,
            rows_in = stats.rows_in,
            rows_out = stats.rows_out,
            dropped_empty_timestamp = stats.dropped_empty_timestamp,
            duplicate_ids_removed = stats.duplicate_ids_removed,
            "cleaned file"
        );
    }

    Ok(())
}

/// Clean a single CSV: drop rows with an empty `Timestamp` cell, rewrite the
/// `+0000` offset marker to `UTC`, then deduplicate on `Tweet Id` keeping the
/// last occurrence. Surviving rows keep their relative order.
#[instrument(level = "info", skip(input_csv, output_csv), fields(file = %input_csv.as_ref().display()))]
pub fn clean_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_csv: P,
    output_csv: Q,
) -> Result<CleanStats> {
    let input_csv = input_csv.as_ref();
    let output_csv = output_csv.as_ref();

    let mut rdr = csv::Reader::from_path(input_csv)
        .with_context(|| format!("failed to open `{}`", input_csv.display()))?;
    let header = rdr
        .headers()
        .with_context(|| format!("failed to read header of `{}`", input_csv.display()))?
        .clone();

    let column = |name: &str| -> Result<usize> {
        header.iter().position(|h| h == name).with_context(|| {
            format!("`{}` has no `{}` column", input_csv.display(), name)
        })
    };
    let ts_idx = column(TIMESTAMP_COLUMN)?;
    let id_idx = column(TWEET_ID_COLUMN)?;

    let mut rows_in = 0usize;
    let mut dropped_empty_timestamp = 0usize;
    let mut kept: Vec<StringRecord> = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| {
            format!("CSV parse error in `{}` at record {}", input_csv.display(), idx + 1)
        })?;
        rows_in += 1;

        match record.get(ts_idx) {
            None | Some("") => {
                dropped_empty_timestamp += 1;
                continue;
            }
            Some(_) => {}
        }

        let rewritten: StringRecord = record
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == ts_idx {
                    cell.replace("+0000", "UTC")
                } else {
                    cell.to_string()
                }
            })
            .collect();
        kept.push(rewritten);
    }

    // keep-last dedup: a surviving row sits where its last occurrence was
    let mut last_index: HashMap<String, usize> = HashMap::new();
    for (i, record) in kept.iter().enumerate() {
        let id = record.get(id_idx).unwrap_or_default().to_string();
        last_index.insert(id, i);
    }

    let mut wtr = csv::Writer::from_path(output_csv)
        .with_context(|| format!("could not create `{}`", output_csv.display()))?;
    wtr.write_record(&header)
        .with_context(|| format!("failed to write header to `{}`", output_csv.display()))?;

    let mut rows_out = 0usize;
    for (i, record) in kept.iter().enumerate() {
        let id = record.get(id_idx).unwrap_or_default();
        if last_index[id] != i {
            continue;
        }
        wtr.write_record(record)
            .with_context(|| format!("failed to write row to `{}`", output_csv.display()))?;
        rows_out += 1;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush `{}`", output_csv.display()))?;

    Ok(CleanStats {
        rows_in,
        rows_out,
        dropped_empty_timestamp,
        duplicate_ids_removed: kept.len() - rows_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,tweetsift=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn read_lines(path: &Path) -> Result<Vec<String>> {
        Ok(fs::read_to_string(path)?
            .lines()
            .map(|l| l.to_string())
            .collect())
    }

    #[test]
    fn drops_empty_timestamps_rewrites_offset_and_dedups() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Tweet Id,Timestamp\n\
             1,2020-01-01+0000\n\
             1,\n\
             2,2020-01-02+0000\n",
        )?;

        let stats = clean_file(&input, &output)?;
        assert_eq!(
            stats,
            CleanStats {
                rows_in: 3,
                rows_out: 2,
                dropped_empty_timestamp: 1,
                duplicate_ids_removed: 0,
            }
        );

        let lines = read_lines(&output)?;
        assert_eq!(
            lines,
            vec!["Tweet Id,Timestamp", "1,2020-01-01UTC", "2,2020-01-02UTC"]
        );
        Ok(())
    }

    #[test]
    fn dedup_keeps_the_last_occurrence_in_place() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(
            &input,
            "Tweet Id,Timestamp,Text\n\
             1,2020-01-01 10:00UTC,first copy\n\
             2,2020-01-01 11:00UTC,other\n\
             1,2020-01-01 12:00UTC,second copy\n\
             3,2020-01-01 13:00UTC,tail\n",
        )?;

        let stats = clean_file(&input, &output)?;
        assert_eq!(stats.duplicate_ids_removed, 1);

        let lines = read_lines(&output)?;
        assert_eq!(
            lines,
            vec![
                "Tweet Id,Timestamp,Text",
                "2,2020-01-01 11:00UTC,other",
                "1,2020-01-01 12:00UTC,second copy",
                "3,2020-01-01 13:00UTC,tail",
            ]
        );
        Ok(())
    }

    #[test]
    fn dedup_happens_after_the_timestamp_filter() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        // the last occurrence of id 1 has no timestamp; the earlier row must
        // survive as the sole (and therefore last) remaining occurrence
        fs::write(
            &input,
            "Tweet Id,Timestamp\n\
             1,2020-01-01+0000\n\
             1,\n\
             2,2020-01-02+0000\n",
        )?;

        clean_file(&input, &output)?;
        let lines = read_lines(&output)?;
        assert_eq!(
            lines,
            vec!["Tweet Id,Timestamp", "1,2020-01-01UTC", "2,2020-01-02UTC"]
        );
        Ok(())
    }

    #[test]
    fn missing_required_column_is_an_error() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input = dir.path().join("in.csv");
        fs::write(&input, "Tweet Id,Text\n1,hello\n")?;
        let err = clean_file(&input, dir.path().join("out.csv")).unwrap_err();
        assert!(format!("{:#}", err).contains("Timestamp"));
        Ok(())
    }

    #[test]
    fn passthrough_files_are_copied_byte_for_byte() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        fs::create_dir_all(&input_dir)?;
        fs::create_dir_all(&output_dir)?;

        // deliberately not valid CSV; pass-through must not care
        let garbled = "Tweet Id,Timestamp\n\"unclosed quote,\n,,,,\nnot,a,csv";
        fs::write(input_dir.join("2012-waldo-canyon-fire-co.csv"), garbled)?;

        clean_dir(&input_dir, &output_dir)?;
        assert_eq!(
            fs::read(output_dir.join("2012-waldo-canyon-fire-co.csv"))?,
            garbled.as_bytes()
        );
        Ok(())
    }

    #[test]
    fn cleans_every_other_csv_in_the_directory() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        fs::create_dir_all(&input_dir)?;
        fs::create_dir_all(&output_dir)?;

        fs::write(
            input_dir.join("2014-carlton-complex-wa.csv"),
            "Tweet Id,Timestamp\n9,2014-07-14+0000\n",
        )?;
        fs::write(input_dir.join("notes.txt"), "not a csv, not scanned\n")?;

        clean_dir(&input_dir, &output_dir)?;
        let lines = read_lines(&output_dir.join("2014-carlton-complex-wa.csv"))?;
        assert_eq!(lines, vec!["Tweet Id,Timestamp", "9,2014-07-14UTC"]);
        assert!(!output_dir.join("notes.txt").exists());
        Ok(())
    }

    #[test]
    fn fails_if_output_dir_is_missing() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let input_dir = dir.path().join("in");
        fs::create_dir_all(&input_dir)?;
        fs::write(
            input_dir.join("a.csv"),
            "Tweet Id,Timestamp\n1,2020-01-01UTC\n",
        )?;

        let missing = dir.path().join("nope");
        let err = clean_dir(&input_dir, &missing).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!missing.exists());
        Ok(())
    }
}
