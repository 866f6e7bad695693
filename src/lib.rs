//! Candidate Matcher - job to candidate matching service
//!
//! Matches job postings to candidate profiles by title and required skill,
//! skips candidates recruiters have already judged, ranks the rest and
//! records every run in the match table. Recruiter opinions, notes and
//! per-job statistics are served over a small HTTP API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{CandidateFinder, MatchError, MatchStage, RankerKind, RankingStrategy};
pub use models::{Candidate, CandidateId, Job, JobId, JobStats, JobStatus, OpinionKind, OpinionScope, Skill};
pub use services::{CandidateRepository, InMemoryStore, PostgresStore, RecruiterRepository, StoreError};
