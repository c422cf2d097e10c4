//! Screening engine: applies the experience and keyword gates to each candidate
//! and computes the weighted score.
//!
//! Each roster row is evaluated independently against immutable inputs, so the
//! output is a pure function of the arguments and always in roster order.

use tracing::{debug, info};

use crate::extraction::ResumeTexts;
use crate::screening::models::{CandidateRecord, ResultRecord, ScoringConfig, SummaryRecord};
use crate::screening::scoring::{
    combined_score, experience_score, jd_overlap_score, keyword_score, round2, ScoringWeights,
};

const REASON_SEPARATOR: &str = " | ";

/// Scores every candidate in the roster. Returns exactly one record per row.
pub fn evaluate_candidates(
    roster: &[CandidateRecord],
    resume_texts: &ResumeTexts,
    config: &ScoringConfig,
) -> Vec<ResultRecord> {
    let weights = ScoringWeights::default();
    let results: Vec<ResultRecord> = roster
        .iter()
        .map(|candidate| evaluate_candidate(candidate, resume_texts, config, &weights))
        .collect();

    info!(
        candidates = results.len(),
        passed = results.iter().filter(|r| r.passed).count(),
        "Screening batch evaluated"
    );
    results
}

fn evaluate_candidate(
    candidate: &CandidateRecord,
    resume_texts: &ResumeTexts,
    config: &ScoringConfig,
    weights: &ScoringWeights,
) -> ResultRecord {
    let resume_text = resume_texts
        .get(&candidate.resume_filename)
        .map(String::as_str)
        .unwrap_or("");
    let resume_lower = resume_text.to_lowercase();
    let years = sanitize_years(candidate.years_experience);

    let mut reasons = Vec::new();

    if years < config.min_years_experience {
        reasons.push(format!(
            "Years of experience {} is below minimum {}",
            format_years(years),
            format_years(config.min_years_experience)
        ));
    }

    let missing: Vec<&str> = config
        .required_keywords
        .iter()
        .filter(|kw| !resume_lower.contains(kw.as_str()))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        reasons.push(format!("Missing required keywords: {}", missing.join(", ")));
    }

    let keyword = keyword_score(&config.required_keywords, &resume_lower);
    let experience = experience_score(years, config.min_years_experience);
    let jd_overlap = jd_overlap_score(&config.job_description, resume_text);
    let score = combined_score(keyword, experience, jd_overlap, weights);

    debug!(
        candidate_id = %candidate.candidate_id,
        keyword, experience, jd_overlap, score,
        "Candidate scored"
    );

    ResultRecord {
        candidate_id: candidate.candidate_id.clone(),
        full_name: candidate.full_name.clone(),
        email: candidate.email.clone(),
        resume_filename: candidate.resume_filename.clone(),
        passed: reasons.is_empty(),
        score,
        reasons: reasons.join(REASON_SEPARATOR),
    }
}

/// Aggregates a result list. An empty list averages to 0.0.
pub fn summarize(results: &[ResultRecord]) -> SummaryRecord {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let average_score = if total == 0 {
        0.0
    } else {
        round2(results.iter().map(|r| r.score).sum::<f64>() / total as f64)
    };

    SummaryRecord {
        total_candidates: total,
        passed,
        failed: total - passed,
        average_score,
    }
}

/// Experience is non-negative; anything else counts as none.
fn sanitize_years(years: f64) -> f64 {
    if years.is_finite() && years > 0.0 {
        years
    } else {
        0.0
    }
}

/// Whole numbers keep one decimal place ("2.0"), others print as-is ("2.5").
fn format_years(years: f64) -> String {
    if years.is_finite() && years.fract() == 0.0 {
        format!("{years:.1}")
    } else {
        format!("{years}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, years: f64, resume: &str) -> CandidateRecord {
        CandidateRecord {
            candidate_id: id.to_string(),
            full_name: format!("Candidate {id}"),
            email: format!("{id}@example.com"),
            years_experience: years,
            resume_filename: resume.to_string(),
        }
    }

    fn texts(entries: &[(&str, &str)]) -> ResumeTexts {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_passing_candidate_scenario() {
        let roster = vec![candidate("1", 5.0, "a.txt")];
        let resumes = texts(&[("a.txt", "Experienced Python engineer")]);
        let config = ScoringConfig::new("", ["python"], 3.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert_eq!(results[0].reasons, "");
        // 0.4*100 + 0.4*83.33 + 0.2*100 (blank JD) = 93.33
        assert_eq!(results[0].score, 93.33);
    }

    #[test]
    fn test_passing_candidate_with_jd() {
        let roster = vec![candidate("1", 5.0, "a.txt")];
        let resumes = texts(&[("a.txt", "Experienced Python engineer")]);
        let config = ScoringConfig::new("Python engineer wanted", ["python"], 3.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        // JD keywords {python, engineer, wanted}; 2 of 3 resume tokens overlap → 66.67
        // 40 + 33.333 + 13.333 = 86.67
        assert!(results[0].passed);
        assert!((results[0].score - 86.67).abs() < 0.01, "Score was {}", results[0].score);
    }

    #[test]
    fn test_missing_keyword_fails() {
        let roster = vec![candidate("2", 10.0, "b.txt")];
        let resumes = texts(&[("b.txt", "Python and Go developer")]);
        let config = ScoringConfig::new("", ["Java"], 0.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert!(!results[0].passed);
        assert!(results[0]
            .reasons
            .contains("Missing required keywords: java"));
    }

    #[test]
    fn test_missing_keywords_are_sorted() {
        let roster = vec![candidate("3", 1.0, "c.txt")];
        let resumes = texts(&[("c.txt", "python")]);
        let config = ScoringConfig::new("", ["sql", "python", "aws", "docker"], 0.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(
            results[0].reasons,
            "Missing required keywords: aws, docker, sql"
        );
    }

    #[test]
    fn test_experience_reason_format() {
        let roster = vec![candidate("4", 2.0, "d.txt")];
        let resumes = texts(&[("d.txt", "rust")]);
        let config = ScoringConfig::new("", ["rust"], 3.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert!(!results[0].passed);
        assert_eq!(
            results[0].reasons,
            "Years of experience 2.0 is below minimum 3.0"
        );
    }

    #[test]
    fn test_both_gates_fail_joins_reasons() {
        let roster = vec![candidate("5", 1.5, "e.txt")];
        let resumes = texts(&[("e.txt", "frontend work")]);
        let config = ScoringConfig::new("", ["rust"], 2.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(
            results[0].reasons,
            "Years of experience 1.5 is below minimum 2.0 | Missing required keywords: rust"
        );
    }

    #[test]
    fn test_zero_minimum_gives_full_experience_score() {
        let roster = vec![candidate("6", 0.0, "f.txt")];
        let resumes = texts(&[("f.txt", "rust")]);
        let config = ScoringConfig::new("", Vec::<String>::new(), 0.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert!(results[0].passed);
        assert_eq!(results[0].score, 100.0);
    }

    #[test]
    fn test_missing_resume_treated_as_empty() {
        let roster = vec![
            candidate("7", 4.0, "missing.pdf"),
            candidate("8", 4.0, "present.txt"),
        ];
        let resumes = texts(&[("present.txt", "kubernetes operator")]);
        let config = ScoringConfig::new("Kubernetes operator", ["kubernetes"], 2.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].candidate_id, "7");
        assert!(!results[0].passed);
        assert!(results[0].reasons.contains("kubernetes"));
        // keyword 0, experience 100, jd 0 → 40
        assert_eq!(results[0].score, 40.0);
        assert_eq!(results[1].candidate_id, "8");
        assert!(results[1].passed);
    }

    #[test]
    fn test_failing_candidate_can_score_high() {
        let roster = vec![candidate("9", 2.9, "g.txt")];
        let resumes = texts(&[("g.txt", "rust")]);
        let config = ScoringConfig::new("", ["rust"], 3.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert!(!results[0].passed);
        // 40 + 0.4 * 48.33 + 20 = 79.33
        assert_eq!(results[0].score, 79.33);
    }

    #[test]
    fn test_invalid_years_count_as_zero() {
        let roster = vec![candidate("10", f64::NAN, "h.txt"), candidate("11", -4.0, "h.txt")];
        let resumes = texts(&[("h.txt", "rust")]);
        let config = ScoringConfig::new("", ["rust"], 1.0);

        for result in evaluate_candidates(&roster, &resumes, &config) {
            assert!(!result.passed);
            assert!(result.reasons.starts_with("Years of experience 0.0"));
            assert!((0.0..=100.0).contains(&result.score));
        }
    }

    #[test]
    fn test_scores_bounded_and_pass_matches_gates() {
        let roster: Vec<_> = (0..20)
            .map(|i| candidate(&i.to_string(), i as f64 * 0.75, &format!("r{}.txt", i % 4)))
            .collect();
        let resumes = texts(&[
            ("r0.txt", "Rust Kafka Kubernetes distributed systems"),
            ("r1.txt", "python django"),
            ("r2.txt", ""),
        ]);
        let config = ScoringConfig::new(
            "Senior Rust engineer for distributed systems with Kafka",
            ["rust", "kafka"],
            5.0,
        );

        let results = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(results.len(), roster.len());
        for (c, r) in roster.iter().zip(&results) {
            assert_eq!(c.candidate_id, r.candidate_id);
            assert!((0.0..=100.0).contains(&r.score), "Score was {}", r.score);
            let text = resumes
                .get(&c.resume_filename)
                .map(|t| t.to_lowercase())
                .unwrap_or_default();
            let gates = c.years_experience >= config.min_years_experience
                && config.required_keywords.iter().all(|k| text.contains(k.as_str()));
            assert_eq!(r.passed, gates, "candidate {}", c.candidate_id);
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let roster = vec![candidate("1", 3.0, "a.txt"), candidate("2", 7.0, "b.txt")];
        let resumes = texts(&[("a.txt", "go rust"), ("b.txt", "java spring")]);
        let config = ScoringConfig::new("Backend engineer with Rust or Java", ["rust", "java"], 4.0);

        let first = evaluate_candidates(&roster, &resumes, &config);
        let second = evaluate_candidates(&roster, &resumes, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_of_empty_roster() {
        let summary = summarize(&[]);
        assert_eq!(
            summary,
            SummaryRecord {
                total_candidates: 0,
                passed: 0,
                failed: 0,
                average_score: 0.0,
            }
        );
    }

    #[test]
    fn test_summary_counts_and_average() {
        let roster = vec![
            candidate("1", 5.0, "a.txt"),
            candidate("2", 1.0, "a.txt"),
            candidate("3", 5.0, "none.txt"),
        ];
        let resumes = texts(&[("a.txt", "rust")]);
        let config = ScoringConfig::new("", ["rust"], 2.0);

        let results = evaluate_candidates(&roster, &resumes, &config);
        let summary = summarize(&results);
        assert_eq!(summary.total_candidates, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);

        let mean = results.iter().map(|r| r.score).sum::<f64>() / 3.0;
        assert!((summary.average_score - mean).abs() < 0.01);
    }

    #[test]
    fn test_format_years() {
        assert_eq!(format_years(2.0), "2.0");
        assert_eq!(format_years(2.5), "2.5");
        assert_eq!(format_years(0.0), "0.0");
    }
}
