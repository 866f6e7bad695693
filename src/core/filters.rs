use std::collections::{BTreeSet, HashSet};

use crate::models::{CandidateId, JobId, OpinionScope};
use crate::services::{CandidateRepository, StoreError};

/// Merge title and skill matches.
///
/// Candidates matching on both title and skill are preferred. When no
/// candidate matches on both, anyone matching on either is accepted. The
/// result is ordered by candidate id.
pub fn combine_candidates(
    by_title: &HashSet<CandidateId>,
    by_skill: &HashSet<CandidateId>,
) -> BTreeSet<CandidateId> {
    let both: BTreeSet<CandidateId> = by_title.intersection(by_skill).copied().collect();

    if !both.is_empty() {
        return both;
    }

    by_title.union(by_skill).copied().collect()
}

/// Drop candidates that already received a like or dislike.
///
/// With `OpinionScope::Global` an opinion recorded against any job counts,
/// not only one for `job_id`. Input order is preserved.
pub async fn filter_by_opinions<R, I>(
    repo: &R,
    candidates: I,
    job_id: JobId,
    scope: OpinionScope,
) -> Result<Vec<CandidateId>, StoreError>
where
    R: CandidateRepository,
    I: IntoIterator<Item = CandidateId>,
{
    let mut remaining = Vec::new();

    for candidate_id in candidates {
        let judged = match scope {
            OpinionScope::Global => repo.has_any_opinion(candidate_id).await?,
            OpinionScope::Job => repo.has_opinion_for_job(candidate_id, job_id).await?,
        };

        if judged {
            tracing::trace!("Candidate {} already has an opinion, skipping", candidate_id);
        } else {
            remaining.push(candidate_id);
        }
    }

    Ok(remaining)
}
