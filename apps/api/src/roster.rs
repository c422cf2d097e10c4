//! Roster loading: turns an uploaded candidate sheet (CSV or Excel) into
//! `CandidateRecord`s, validating that the required columns exist.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Reader};
use thiserror::Error;
use tracing::info;

use crate::screening::CandidateRecord;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "candidate_id",
    "full_name",
    "email",
    "years_experience",
    "resume_filename",
];

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Candidate sheet must be a CSV or Excel file")]
    UnsupportedSheet,

    #[error("Candidate sheet is not valid UTF-8")]
    InvalidEncoding,

    #[error("Candidate sheet missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Candidate sheet could not be parsed: {0}")]
    Malformed(String),
}

/// Loads a roster from the uploaded sheet, dispatching on the file extension.
pub fn load_roster(filename: &str, content: &[u8]) -> Result<Vec<CandidateRecord>, RosterError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let (headers, rows) = match extension.as_str() {
        "csv" => read_csv(content)?,
        "xls" | "xlsx" => read_workbook(content)?,
        _ => return Err(RosterError::UnsupportedSheet),
    };

    let roster = build_records(&headers, rows)?;
    info!(filename, candidates = roster.len(), "Roster loaded");
    Ok(roster)
}

/// Splits a comma-separated keyword field, dropping blank entries.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(String::from)
        .collect()
}

type Table = (Vec<String>, Vec<Vec<String>>);

fn read_csv(content: &[u8]) -> Result<Table, RosterError> {
    let text = std::str::from_utf8(content).map_err(|_| RosterError::InvalidEncoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| RosterError::Malformed(e.to_string()))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| RosterError::Malformed(e.to_string()))?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok((headers, rows))
}

fn read_workbook(content: &[u8]) -> Result<Table, RosterError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(content.to_vec()))
        .map_err(|e| RosterError::Malformed(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| RosterError::Malformed("workbook has no worksheets".to_string()))?
        .map_err(|e| RosterError::Malformed(e.to_string()))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect::<Vec<_>>());

    let headers = rows.next().unwrap_or_default();
    Ok((headers, rows.collect()))
}

fn build_records(
    headers: &[String],
    rows: Vec<Vec<String>>,
) -> Result<Vec<CandidateRecord>, RosterError> {
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();

    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !index.contains_key(*col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(RosterError::MissingColumns(missing));
    }

    let cell = |row: &[String], column: &str| -> String {
        index
            .get(column)
            .and_then(|&i| row.get(i))
            .cloned()
            .unwrap_or_default()
    };

    // One candidate per data row, blank rows included.
    Ok(rows
        .iter()
        .map(|row| CandidateRecord {
            candidate_id: cell(row, "candidate_id"),
            full_name: cell(row, "full_name"),
            email: cell(row, "email"),
            years_experience: parse_years(&cell(row, "years_experience")),
            resume_filename: cell(row, "resume_filename"),
        })
        .collect())
}

/// Blank, unparseable, negative or non-finite values count as zero years.
fn parse_years(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|y| y.is_finite() && *y >= 0.0)
        .unwrap_or(0.0)
}
