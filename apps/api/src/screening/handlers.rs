//! Axum route handlers for the Screening API.

use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::{export_results, resolve_export};
use crate::extraction::{extract_batch, ExtractionFailure, FailurePolicy};
use crate::roster::{load_roster, parse_keywords};
use crate::screening::{evaluate_candidates, summarize, ResultRecord, ScoringConfig, SummaryRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// A single uploaded file.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content: Bytes,
}

/// The multipart screening form, fully buffered.
#[derive(Debug, Default)]
pub struct ScreeningForm {
    pub candidate_sheet: Option<Upload>,
    pub resumes: Vec<Upload>,
    pub job_description: Option<String>,
    pub required_keywords: String,
    pub min_experience: f64,
    pub on_extraction_error: FailurePolicy,
}

#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub results: Vec<ResultRecord>,
    pub summary: SummaryRecord,
    pub csv_filename: String,
    pub excel_filename: String,
    pub extraction_failures: Vec<ExtractionFailure>,
}

impl ScreeningForm {
    /// Reads every multipart field. Unknown fields are drained and ignored.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, AppError> {
        let mut form = ScreeningForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().unwrap_or_default().to_string();

            match name.as_str() {
                "candidate_sheet" | "resumes" => {
                    let content = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read upload '{filename}': {e}"))
                    })?;
                    let upload = Upload { filename, content };
                    if name == "candidate_sheet" {
                        form.candidate_sheet = Some(upload);
                    } else {
                        form.resumes.push(upload);
                    }
                }
                "job_description" | "required_keywords" | "min_experience"
                | "on_extraction_error" => {
                    let value = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read field '{name}': {e}"))
                    })?;
                    form.set_text_field(&name, value)?;
                }
                _ => {
                    field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read field '{name}': {e}"))
                    })?;
                }
            }
        }

        Ok(form)
    }

    fn set_text_field(&mut self, name: &str, value: String) -> Result<(), AppError> {
        match name {
            "job_description" => self.job_description = Some(value),
            "required_keywords" => self.required_keywords = value,
            "min_experience" => self.min_experience = parse_min_experience(&value)?,
            "on_extraction_error" => {
                self.on_extraction_error = FailurePolicy::parse(&value).ok_or_else(|| {
                    AppError::Validation(format!(
                        "on_extraction_error must be 'report' or 'fail', got '{value}'"
                    ))
                })?
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_min_experience(raw: &str) -> Result<f64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("min_experience must be a number, got '{raw}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs roster loading, extraction, scoring and export for one request.
/// CPU-bound; call from `spawn_blocking`.
pub fn run_screening(
    form: ScreeningForm,
    output_dir: &FsPath,
) -> Result<ScreenResponse, AppError> {
    let sheet = form
        .candidate_sheet
        .filter(|s| !s.filename.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Candidate sheet is required".to_string()))?;
    let job_description = form
        .job_description
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let roster = load_roster(&sheet.filename, &sheet.content)?;

    let batch = extract_batch(
        form.resumes
            .iter()
            .map(|u| (u.filename.as_str(), &u.content[..])),
    )
    .enforce(form.on_extraction_error)?;

    let config = ScoringConfig::new(
        &job_description,
        parse_keywords(&form.required_keywords),
        form.min_experience,
    );
    let results = evaluate_candidates(&roster, &batch.texts, &config);
    let summary = summarize(&results);
    let files = export_results(output_dir, &results, Utc::now())?;

    info!(
        total = summary.total_candidates,
        passed = summary.passed,
        average_score = summary.average_score,
        extraction_failures = batch.errors.len(),
        "Screening complete"
    );

    Ok(ScreenResponse {
        results,
        summary,
        csv_filename: files.csv_filename,
        excel_filename: files.excel_filename,
        extraction_failures: batch.failures(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screen
///
/// Multipart fields: `candidate_sheet` (file), `resumes` (files, repeatable),
/// `job_description`, `required_keywords` (comma-separated), `min_experience`,
/// `on_extraction_error` (`report` | `fail`).
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreenResponse>, AppError> {
    let form = ScreeningForm::read(&mut multipart).await?;
    let output_dir = state.config.output_dir.clone();

    let response = tokio::task::spawn_blocking(move || run_screening(form, &output_dir))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Screening task failed: {e}")))??;

    Ok(Json(response))
}

/// GET /api/v1/download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = resolve_export(&state.config.output_dir, &filename)
        .ok_or_else(|| AppError::Validation(format!("Invalid file name '{filename}'")))?;

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => {
            return Err(AppError::Internal(
                anyhow::Error::new(e).context(format!("Failed to read {}", path.display())),
            ))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, download_content_type(&filename).to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    ))
}

fn download_content_type(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.ends_with(".csv") {
        "text/csv; charset=utf-8"
    } else if lower.ends_with(".xlsx") {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    } else {
        "application/octet-stream"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
