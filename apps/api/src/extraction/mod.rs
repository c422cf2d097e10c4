//! Resume text extraction. Dispatches on the file extension and turns raw upload
//! bytes into plain text for the screening engine.
//!
//! Every function here is a pure function of `(filename, bytes)`: no filesystem
//! or network access.

pub mod docx;
pub mod pdf;
pub mod text;

use std::collections::HashMap;
use std::panic::{self, UnwindSafe};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Maps a resume filename to its extracted plain text.
pub type ResumeTexts = HashMap<String, String>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported resume format '{extension}' for file '{filename}'")]
    UnsupportedFormat { filename: String, extension: String },

    #[error("Could not read '{filename}': {reason}")]
    CorruptDocument { filename: String, reason: String },
}

impl ExtractionError {
    pub fn filename(&self) -> &str {
        match self {
            ExtractionError::UnsupportedFormat { filename, .. }
            | ExtractionError::CorruptDocument { filename, .. } => filename,
        }
    }
}

/// Supported resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    PlainText,
}

impl ResumeFormat {
    /// Resolves the format from a filename's extension, ignoring case.
    /// Returns the dotted, lower-cased extension on failure (`""` if there is none).
    pub fn from_filename(filename: &str) -> Result<Self, String> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        match extension.as_str() {
            ".pdf" => Ok(ResumeFormat::Pdf),
            ".docx" => Ok(ResumeFormat::Docx),
            ".txt" => Ok(ResumeFormat::PlainText),
            _ => Err(extension),
        }
    }
}

/// Extracts plain text from a single resume upload.
pub fn extract_text(filename: &str, content: &[u8]) -> Result<String, ExtractionError> {
    let format = ResumeFormat::from_filename(filename).map_err(|extension| {
        ExtractionError::UnsupportedFormat {
            filename: filename.to_string(),
            extension,
        }
    })?;

    let corrupt = |reason: String| ExtractionError::CorruptDocument {
        filename: filename.to_string(),
        reason,
    };

    let text = match format {
        ResumeFormat::Pdf => pdf::extract_pdf(content).map_err(corrupt)?,
        ResumeFormat::Docx => docx::extract_docx(content).map_err(corrupt)?,
        ResumeFormat::PlainText => text::decode_lossy(content),
    };

    debug!(filename, format = ?format, chars = text.len(), "Extracted resume text");
    Ok(text)
}

/// Runs a parser backend, reporting a panic inside it as an ordinary parse
/// failure. Both document backends can panic on malformed archives or streams.
pub(crate) fn guard_parser<T, F>(backend: &str, parse: F) -> Result<T, String>
where
    F: FnOnce() -> Result<T, String> + UnwindSafe,
{
    panic::catch_unwind(parse)
        .unwrap_or_else(|_| Err(format!("{backend} parser aborted on malformed input")))
}

/// What the caller does with a batch that contains unreadable resumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Report failures alongside the results; affected candidates score
    /// against an empty resume.
    #[default]
    Report,
    /// Abort the request with the first extraction error.
    Fail,
}

impl FailurePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" | "report" => Some(FailurePolicy::Report),
            "fail" => Some(FailurePolicy::Fail),
            _ => None,
        }
    }
}

/// A resume that could not be turned into text, as reported to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionFailure {
    pub filename: String,
    pub error: String,
}

impl From<&ExtractionError> for ExtractionFailure {
    fn from(e: &ExtractionError) -> Self {
        Self {
            filename: e.filename().to_string(),
            error: e.to_string(),
        }
    }
}

/// Outcome of extracting a whole batch of uploads.
#[derive(Debug, Default)]
pub struct ExtractionBatch {
    pub texts: ResumeTexts,
    pub errors: Vec<ExtractionError>,
}

impl ExtractionBatch {
    pub fn failures(&self) -> Vec<ExtractionFailure> {
        self.errors.iter().map(ExtractionFailure::from).collect()
    }

    /// Applies the caller's policy: either keep going with the failures
    /// reported, or surface the first error.
    pub fn enforce(mut self, policy: FailurePolicy) -> Result<Self, ExtractionError> {
        if policy == FailurePolicy::Fail && !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }
        Ok(self)
    }
}

/// Extracts every upload independently.
///
/// Uploads with a blank filename are skipped. A failing file is recorded in
/// `errors` and left out of `texts`, so candidates pointing at it are scored
/// against an empty resume while the rest of the batch proceeds.
pub fn extract_batch<'a, I>(uploads: I) -> ExtractionBatch
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut batch = ExtractionBatch::default();

    for (filename, content) in uploads {
        if filename.trim().is_empty() {
            warn!("Skipping resume upload without a filename");
            continue;
        }
        match extract_text(filename, content) {
            Ok(text) => {
                batch.texts.insert(filename.to_string(), text);
            }
            Err(e) => {
                warn!(filename, error = %e, "Resume extraction failed");
                batch.errors.push(e);
            }
        }
    }

    batch
}
