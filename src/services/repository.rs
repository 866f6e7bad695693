#![allow(async_fn_in_trait)]

use std::collections::HashSet;
use thiserror::Error;

use crate::models::{
    CandidateId, Job, JobId, JobStats, JobStatus, LikedCandidate, OpinionKind, Skill, SkillId,
};

/// Errors raised by a data store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("SQLx error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Short label used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "not_found",
            StoreError::Validation(_) => "validation",
            StoreError::Database(_) | StoreError::Migrate(_) => "storage",
        }
    }
}

/// Read access to jobs, candidates, skills and opinions plus write access
/// to the match table. This is everything the matching pipeline needs.
pub trait CandidateRepository {
    async fn get_job(&self, job_id: JobId) -> Result<Job, StoreError>;

    /// Candidates whose title contains any of `tokens`, ignoring case
    async fn find_candidates_by_title_substring(
        &self,
        tokens: &[&str],
    ) -> Result<HashSet<CandidateId>, StoreError>;

    async fn find_candidates_by_exact_title(
        &self,
        title: &str,
    ) -> Result<HashSet<CandidateId>, StoreError>;

    async fn get_skill_by_name(&self, name: &str) -> Result<Skill, StoreError>;

    async fn find_candidates_by_skill(
        &self,
        skill_id: SkillId,
    ) -> Result<HashSet<CandidateId>, StoreError>;

    /// Whether the candidate has a like or dislike recorded against any job
    async fn has_any_opinion(&self, candidate_id: CandidateId) -> Result<bool, StoreError>;

    async fn has_opinion_for_job(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<bool, StoreError>;

    async fn count_candidates(&self) -> Result<usize, StoreError>;

    /// Insert one Match row per pair. Every pair is validated before any row
    /// is written; a single bad pair rejects the whole batch.
    async fn record_matches(&self, pairs: &[(CandidateId, JobId)]) -> Result<(), StoreError>;
}

/// Recruiter-facing operations: opinions, notes, job status and statistics
pub trait RecruiterRepository {
    /// Likes require an opened job, dislikes are accepted for any status
    async fn add_opinion(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        kind: OpinionKind,
    ) -> Result<(), StoreError>;

    /// Notes require a job that is not closed and a like for the same pair
    async fn add_note(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        note: &str,
    ) -> Result<(), StoreError>;

    /// Likes for the job, newest first
    async fn liked_candidates(&self, job_id: JobId) -> Result<Vec<LikedCandidate>, StoreError>;

    async fn update_job_status(&self, job_id: JobId, status: JobStatus) -> Result<(), StoreError>;

    async fn job_stats(&self, job_id: JobId) -> Result<JobStats, StoreError>;
}

/// Liveness probe for the backing store
pub trait StoreHealth {
    async fn health_check(&self) -> bool;
}

pub(crate) const JOB_NOT_OPEN: &str = "Job is not open - cannot add like";
pub(crate) const NOTE_REJECTED: &str =
    "Invalid entry - job must be open and candidate must be liked";
