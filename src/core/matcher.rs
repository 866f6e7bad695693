use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

use crate::core::{
    filters::{combine_candidates, filter_by_opinions},
    scoring::{PassThroughRanker, RankingContext, RankingStrategy},
    skill::match_by_skill,
    title::match_by_title,
};
use crate::models::{CandidateId, Job, JobId, OpinionScope};
use crate::services::{CandidateRepository, StoreError};

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Title,
    Skill,
    Opinions,
    Ranking,
    Recording,
}

impl MatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Title => "title",
            MatchStage::Skill => "skill",
            MatchStage::Opinions => "opinions",
            MatchStage::Ranking => "ranking",
            MatchStage::Recording => "recording",
        }
    }
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure inside the matching pipeline
#[derive(Debug, Error)]
#[error("{stage} stage failed for job {job_id}: {source}")]
pub struct MatchError {
    pub job_id: JobId,
    pub stage: MatchStage,
    #[source]
    pub source: StoreError,
}

impl MatchError {
    /// `not_found`, `validation` or `storage`
    pub fn kind(&self) -> &'static str {
        self.source.kind()
    }
}

trait StageContext<T> {
    fn stage(self, job_id: JobId, stage: MatchStage) -> Result<T, MatchError>;
}

impl<T> StageContext<T> for Result<T, StoreError> {
    fn stage(self, job_id: JobId, stage: MatchStage) -> Result<T, MatchError> {
        self.map_err(|source| MatchError {
            job_id,
            stage,
            source,
        })
    }
}

/// Finds, filters, ranks and records candidates for a job
///
/// # Pipeline Stages
/// 1. Title matching
/// 2. Skill matching
/// 3. Combining (intersection, or union when the intersection is empty)
/// 4. Opinion filtering
/// 5. Ranking
/// 6. Recording Match rows
///
/// Stages run one after another; nothing is cached between runs.
#[derive(Clone)]
pub struct CandidateFinder {
    ranker: Arc<dyn RankingStrategy>,
    opinion_scope: OpinionScope,
}

impl CandidateFinder {
    pub fn new(ranker: Arc<dyn RankingStrategy>, opinion_scope: OpinionScope) -> Self {
        Self {
            ranker,
            opinion_scope,
        }
    }

    pub fn opinion_scope(&self) -> OpinionScope {
        self.opinion_scope
    }

    /// Run the matching pipeline for `job`.
    ///
    /// Never fails: any error is logged and an empty list is returned, and no
    /// Match rows are written for a failed run.
    pub async fn find_candidates<R>(&self, repo: &R, job: &Job) -> Vec<CandidateId>
    where
        R: CandidateRepository,
    {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("candidate_finder", job_id = job.job_id, %run_id);

        async {
            match self.try_find_candidates(repo, job).await {
                Ok(candidates) => {
                    tracing::info!(
                        "All candidates for job {}: {:?}",
                        job.job_id,
                        candidates
                    );
                    candidates
                }
                Err(e) => {
                    tracing::error!(
                        stage = e.stage.as_str(),
                        kind = e.kind(),
                        "Error getting all matching candidates: {}",
                        e
                    );
                    Vec::new()
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the matching pipeline, surfacing the first error
    pub async fn try_find_candidates<R>(
        &self,
        repo: &R,
        job: &Job,
    ) -> Result<Vec<CandidateId>, MatchError>
    where
        R: CandidateRepository,
    {
        let job_id = job.job_id;

        // Stage 1 & 2: independent title and skill matches
        let by_title = match_by_title(repo, job_id)
            .await
            .stage(job_id, MatchStage::Title)?;
        let by_skill = match_by_skill(repo, &job.skill)
            .await
            .stage(job_id, MatchStage::Skill)?;

        // Stage 3: prefer candidates matching both
        let potential = combine_candidates(&by_title, &by_skill);

        tracing::debug!(
            "Job {}: {} title matches, {} skill matches, {} combined",
            job_id,
            by_title.len(),
            by_skill.len(),
            potential.len()
        );

        // Stage 4: skip anyone already judged
        let remaining = filter_by_opinions(repo, potential, job_id, self.opinion_scope)
            .await
            .stage(job_id, MatchStage::Opinions)?;

        // Stage 5: rank
        let population = if self.ranker.needs_population() {
            repo.count_candidates()
                .await
                .stage(job_id, MatchStage::Ranking)?
        } else {
            0
        };
        let context = RankingContext {
            skill_holders: &by_skill,
            population,
        };
        let ranked = self.ranker.rank(remaining, job, &context);

        // Stage 6: persist
        if !ranked.is_empty() {
            let pairs: Vec<(CandidateId, JobId)> =
                ranked.iter().map(|&candidate_id| (candidate_id, job_id)).collect();
            repo.record_matches(&pairs)
                .await
                .stage(job_id, MatchStage::Recording)?;
            tracing::info!("Added {} matched candidates for job {}", ranked.len(), job_id);
        }

        Ok(ranked)
    }
}

impl Default for CandidateFinder {
    fn default() -> Self {
        Self::new(Arc::new(PassThroughRanker), OpinionScope::Global)
    }
}

impl fmt::Debug for CandidateFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFinder")
            .field("opinion_scope", &self.opinion_scope)
            .finish_non_exhaustive()
    }
}
