use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::{CandidateId, Job};

/// Population data available to a ranking strategy
#[derive(Debug, Clone, Copy)]
pub struct RankingContext<'a> {
    /// Candidates holding the job's required skill
    pub skill_holders: &'a HashSet<CandidateId>,
    /// Total number of candidates in the store, or 0 when the strategy
    /// does not use it
    pub population: usize,
}

/// Orders matched candidates for a job.
///
/// Implementations must return exactly the candidates they were given.
pub trait RankingStrategy: Send + Sync {
    /// Whether `RankingContext::population` must be filled in
    fn needs_population(&self) -> bool {
        false
    }

    fn rank(
        &self,
        candidates: Vec<CandidateId>,
        job: &Job,
        context: &RankingContext<'_>,
    ) -> Vec<CandidateId>;
}

/// Keeps candidates in the order they arrive
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughRanker;

impl RankingStrategy for PassThroughRanker {
    fn rank(
        &self,
        candidates: Vec<CandidateId>,
        _job: &Job,
        _context: &RankingContext<'_>,
    ) -> Vec<CandidateId> {
        candidates
    }
}

/// Rewards candidates holding a rare skill.
///
/// A skill held by 70% of candidates is worth 30 points, one held by 1% is
/// worth 99. Points are summed over the job's skills (jobs carry a single
/// skill today) and candidates are sorted by descending score, then by id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillRarityRanker;

impl RankingStrategy for SkillRarityRanker {
    fn needs_population(&self) -> bool {
        true
    }

    fn rank(
        &self,
        mut candidates: Vec<CandidateId>,
        _job: &Job,
        context: &RankingContext<'_>,
    ) -> Vec<CandidateId> {
        let points = skill_rarity_points(context.skill_holders.len(), context.population);
        let score = |id: &CandidateId| {
            if context.skill_holders.contains(id) {
                points
            } else {
                0.0
            }
        };

        candidates.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });

        candidates
    }
}

/// Points (0-100) for a skill held by `holders` out of `population` candidates
#[inline]
pub fn skill_rarity_points(holders: usize, population: usize) -> f64 {
    if population == 0 {
        return 0.0;
    }

    let share = holders as f64 / population as f64;
    ((1.0 - share) * 100.0).clamp(0.0, 100.0)
}

/// Ranking strategy selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankerKind {
    #[default]
    Passthrough,
    SkillRarity,
}

impl RankerKind {
    pub fn build(self) -> Arc<dyn RankingStrategy> {
        match self {
            RankerKind::Passthrough => Arc::new(PassThroughRanker),
            RankerKind::SkillRarity => Arc::new(SkillRarityRanker),
        }
    }
}
