use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One roster row. Constructed once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub candidate_id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub years_experience: f64,
    pub resume_filename: String,
}

/// Screening requirements supplied once per request.
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub job_description: String,
    /// Lower-cased. Ordered so the "missing keywords" reason is deterministic.
    pub required_keywords: BTreeSet<String>,
    pub min_years_experience: f64,
}

impl ScoringConfig {
    pub fn new<I, S>(
        job_description: &str,
        required_keywords: I,
        min_years_experience: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            job_description: job_description.to_string(),
            required_keywords: required_keywords
                .into_iter()
                .map(|kw| kw.as_ref().to_lowercase())
                .collect(),
            min_years_experience,
        }
    }
}

/// Verdict for a single candidate, in roster order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub candidate_id: String,
    pub full_name: String,
    pub email: String,
    pub resume_filename: String,
    pub passed: bool,
    /// 0 – 100, two decimals. Independent of `passed`.
    pub score: f64,
    /// Empty when passed; otherwise failure reasons joined with " | ".
    pub reasons: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub total_candidates: usize,
    pub passed: usize,
    pub failed: usize,
    pub average_score: f64,
}
