use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::screening::ResultRecord;

const RESULT_COLUMNS: [&str; 7] = [
    "candidate_id",
    "full_name",
    "email",
    "resume_filename",
    "passed",
    "score",
    "reasons",
];

/// Gives up after this many taken names for one timestamp.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// File names of one export, both relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub csv_filename: String,
    pub excel_filename: String,
}

/// Writes the results as CSV and XLSX side by side.
///
/// Both files share the stem `screening-results-YYYYmmdd-HHMMSS`; when that
/// stem is taken (two requests in the same second), a `-N` suffix is added.
/// Existing files are never overwritten.
pub fn export_results(
    dir: &Path,
    results: &[ResultRecord],
    timestamp: DateTime<Utc>,
) -> Result<ExportedFiles> {
    let csv_filename = write_results_csv(dir, results, timestamp)?;
    let stem = csv_filename.trim_end_matches(".csv");
    let excel_filename = write_xlsx_with_stem(dir, results, stem)?;
    Ok(ExportedFiles {
        csv_filename,
        excel_filename,
    })
}

/// Writes the results as CSV into `dir` and returns the generated file name.
pub fn write_results_csv(
    dir: &Path,
    results: &[ResultRecord],
    timestamp: DateTime<Utc>,
) -> Result<String> {
    let (filename, file) = create_unique(dir, &base_stem(timestamp), "csv")?;
    let path = dir.join(&filename);

    let mut writer = csv::Writer::from_writer(file);
    if results.is_empty() {
        writer.write_record(RESULT_COLUMNS)?;
    }
    for record in results {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = results.len(), "Results exported");
    Ok(filename)
}

/// Writes the results as a single-sheet XLSX workbook into `dir` and returns
/// the generated file name.
pub fn write_results_xlsx(
    dir: &Path,
    results: &[ResultRecord],
    timestamp: DateTime<Utc>,
) -> Result<String> {
    write_xlsx_with_stem(dir, results, &base_stem(timestamp))
}

fn write_xlsx_with_stem(dir: &Path, results: &[ResultRecord], stem: &str) -> Result<String> {
    let buffer = results_workbook(results).context("Failed to build results workbook")?;

    let (filename, mut file) = create_unique(dir, stem, "xlsx")?;
    let path = dir.join(&filename);
    file.write_all(&buffer)
        .and_then(|_| file.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = results.len(), "Results exported");
    Ok(filename)
}

fn results_workbook(results: &[ResultRecord]) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Results")?;

    for (col, name) in RESULT_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (i, record) in results.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, record.candidate_id.as_str())?;
        sheet.write_string(row, 1, record.full_name.as_str())?;
        sheet.write_string(row, 2, record.email.as_str())?;
        sheet.write_string(row, 3, record.resume_filename.as_str())?;
        sheet.write_boolean(row, 4, record.passed)?;
        sheet.write_number(row, 5, record.score)?;
        sheet.write_string(row, 6, record.reasons.as_str())?;
    }

    workbook.save_to_buffer()
}

fn base_stem(timestamp: DateTime<Utc>) -> String {
    format!("screening-results-{}", timestamp.format("%Y%m%d-%H%M%S"))
}

/// Creates `<stem>.<ext>` in `dir`, or `<stem>-N.<ext>` for the first free N.
/// The file is opened with `create_new`, so a name is claimed atomically.
fn create_unique(dir: &Path, stem: &str, ext: &str) -> Result<(String, File)> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let filename = match attempt {
            0 => format!("{stem}.{ext}"),
            n => format!("{stem}-{n}.{ext}"),
        };
        let path = dir.join(&filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((filename, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to create {}", path.display())))
            }
        }
    }
    anyhow::bail!("No free export name for {stem}.{ext} in {}", dir.display())
}

/// Resolves a client-supplied file name inside `dir`. Returns `None` for
/// anything that is not a single plain path component.
pub fn resolve_export(dir: &Path, filename: &str) -> Option<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(dir.join(name)),
        _ => None,
    }
}
