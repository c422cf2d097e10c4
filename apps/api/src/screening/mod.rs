// Screening core: per-candidate gates, weighted scoring and batch summary.
// Pure and synchronous. Callers on the async runtime wrap it in spawn_blocking.

pub mod engine;
pub mod handlers;
pub mod models;
pub mod scoring;

pub use engine::{evaluate_candidates, summarize};
pub use models::{CandidateRecord, ResultRecord, ScoringConfig, SummaryRecord};
