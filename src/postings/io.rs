// File I/O for postings: raw CSV in, processed JSONL between stages,
// cluster CSVs out.
//
// Every file is written to a temporary sibling and renamed into place only
// once it is complete, so a failed run never leaves a half-written output
// behind. The two cluster CSVs are renamed only after both are written.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::models::{ClusterAssignment, Posting, RawPosting};

/// Columns the raw scrape must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "function",
    "industries",
    "date_posted",
    "date_scraped",
];

/// Read the raw semicolon-delimited scrape.
pub fn read_raw(path: &Path) -> Result<Vec<RawPosting>> {
    let file = File::open(path).with_context(|| format!("Opening raw CSV {}", path.display()))?;
    read_raw_from(file).with_context(|| format!("Reading raw CSV {}", path.display()))
}

/// Read raw postings from any reader. Fails if a required column is missing.
pub fn read_raw_from<R: std::io::Read>(reader: R) -> Result<Vec<RawPosting>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        anyhow::bail!("Raw CSV is missing required columns: {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for (line, record) in rdr.deserialize::<RawPosting>().enumerate() {
        // +2: header line plus 1-based numbering
        let row = record.with_context(|| format!("Malformed row at line {}", line + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write the processed dataset as JSON Lines, one posting per line.
pub fn write_processed(path: &Path, postings: &[Posting]) -> Result<()> {
    write_atomic(path, |out| {
        for posting in postings {
            serde_json::to_writer(&mut *out, posting)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    })?;
    info!(rows = postings.len(), path = %path.display(), "Wrote processed dataset");
    Ok(())
}

/// Read the processed JSON Lines dataset.
pub fn read_processed(path: &Path) -> Result<Vec<Posting>> {
    let file = File::open(path).with_context(|| {
        format!(
            "Opening processed dataset {} (run `jobcluster preprocess` first)",
            path.display()
        )
    })?;

    let mut postings = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let posting: Posting = serde_json::from_str(&line)
            .with_context(|| format!("Malformed record at {}:{}", path.display(), i + 1))?;
        postings.push(posting);
    }
    Ok(postings)
}

#[derive(Serialize)]
struct IdRow<'a> {
    id: &'a str,
    cluster: i64,
}

#[derive(Serialize)]
struct LabelRow<'a> {
    title: &'a str,
    function: &'a str,
    industries: &'a str,
    cluster: i64,
}

/// Paths of the two cluster CSVs for a given prefix.
pub fn output_paths(output_dir: &Path, prefix: &str) -> (PathBuf, PathBuf) {
    (
        output_dir.join(format!("{prefix}.csv")),
        output_dir.join(format!("{prefix}_id.csv")),
    )
}

/// Write `<prefix>.csv` (title, function, industries, cluster) and
/// `<prefix>_id.csv` (id, cluster), both sorted ascending by cluster.
///
/// The sort is stable, so postings keep their input order within a cluster.
pub fn write_assignments(
    output_dir: &Path,
    prefix: &str,
    assignments: &[ClusterAssignment],
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Creating output directory {}", output_dir.display()))?;

    let mut sorted: Vec<&ClusterAssignment> = assignments.iter().collect();
    sorted.sort_by_key(|a| a.cluster);

    let (labels_path, ids_path) = output_paths(output_dir, prefix);

    // Both temp files are complete before either output is replaced, so a
    // failed run never leaves new labels next to stale ids.
    let labels_tmp = write_temp(&labels_path, |out| {
        let mut wtr = csv::Writer::from_writer(out);
        for a in &sorted {
            wtr.serialize(LabelRow {
                title: &a.title,
                function: &a.function,
                industries: &a.industries,
                cluster: a.cluster,
            })?;
        }
        wtr.flush()?;
        Ok(())
    })?;

    let ids_tmp = write_temp(&ids_path, |out| {
        let mut wtr = csv::Writer::from_writer(out);
        for a in &sorted {
            wtr.serialize(IdRow {
                id: &a.id,
                cluster: a.cluster,
            })?;
        }
        wtr.flush()?;
        Ok(())
    });
    let ids_tmp = match ids_tmp {
        Ok(tmp) => tmp,
        Err(e) => {
            let _ = fs::remove_file(&labels_tmp);
            return Err(e);
        }
    };

    commit(&ids_tmp, &ids_path)?;
    commit(&labels_tmp, &labels_path)?;

    info!(
        rows = sorted.len(),
        labels = %labels_path.display(),
        ids = %ids_path.display(),
        "Wrote cluster assignments"
    );
    Ok((labels_path, ids_path))
}

/// Count data rows in a CSV file (header excluded).
pub fn count_csv_rows(path: &Path, delimiter: u8) -> Result<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("Opening {}", path.display()))?;
    let mut count = 0;
    for record in rdr.records() {
        record?;
        count += 1;
    }
    Ok(count)
}

/// Write a file via a temporary sibling and rename it into place.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = write_temp(path, write)?;
    commit(&tmp, path)
}

/// Write the full contents to the `.tmp` sibling of `path` and return it.
/// The temp file is removed if writing fails.
fn write_temp<F>(path: &Path, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating directory {}", parent.display()))?;
    }

    let tmp = path.with_extension("tmp");
    let result = (|| -> Result<()> {
        let file =
            File::create(&tmp).with_context(|| format!("Creating {}", tmp.display()))?;
        let mut out = BufWriter::new(file);
        write(&mut out)?;
        out.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(tmp)
}

fn commit(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).with_context(|| format!("Moving {} into place", path.display()))
}
