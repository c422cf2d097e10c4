use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Experience ratio at which the experience sub-score saturates (200% of the minimum).
const EXPERIENCE_RATIO_CAP: f64 = 2.0;

/// JD tokens of this many characters or fewer are ignored.
const MIN_JD_TOKEN_CHARS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub experience: f64,
    pub jd_overlap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 0.4,
            experience: 0.4,
            jd_overlap: 0.2,
        }
    }
}

/// Share of required keywords found in the (already lower-cased) resume, 0 – 100.
/// No required keywords means a full score.
pub fn keyword_score(required_keywords: &BTreeSet<String>, resume_lower: &str) -> f64 {
    if required_keywords.is_empty() {
        return 100.0;
    }
    let present = required_keywords
        .iter()
        .filter(|kw| resume_lower.contains(kw.as_str()))
        .count();
    present as f64 / required_keywords.len() as f64 * 100.0
}

/// Experience relative to the minimum, saturating at twice the minimum.
/// A non-positive minimum means a full score.
pub fn experience_score(years_experience: f64, min_years_experience: f64) -> f64 {
    if min_years_experience <= 0.0 {
        return 100.0;
    }
    let ratio = years_experience / min_years_experience.max(1e-6);
    ratio.clamp(0.0, EXPERIENCE_RATIO_CAP) / EXPERIENCE_RATIO_CAP * 100.0
}

/// Bag-of-words overlap: the fraction of resume tokens that appear among the
/// JD's longer tokens, 0 – 100. A blank JD, or one without any token longer than
/// three characters, scores 100.
pub fn jd_overlap_score(job_description: &str, resume_text: &str) -> f64 {
    if job_description.trim().is_empty() {
        return 100.0;
    }
    let jd_keywords = jd_keyword_set(job_description);
    if jd_keywords.is_empty() {
        return 100.0;
    }

    let resume_tokens: Vec<String> = resume_text
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let overlap = resume_tokens
        .iter()
        .filter(|token| jd_keywords.contains(token.as_str()))
        .count();

    (overlap as f64 / resume_tokens.len().max(1) as f64).min(1.0) * 100.0
}

fn jd_keyword_set(job_description: &str) -> HashSet<String> {
    job_description
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_JD_TOKEN_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Weighted total, clamped to 0 – 100 and rounded to two decimals.
pub fn combined_score(
    keyword: f64,
    experience: f64,
    jd_overlap: f64,
    weights: &ScoringWeights,
) -> f64 {
    let total = weights.keyword * keyword
        + weights.experience * experience
        + weights.jd_overlap * jd_overlap;
    round2(total.clamp(0.0, 100.0))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
