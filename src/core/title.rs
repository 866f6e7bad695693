use std::collections::HashSet;

use crate::models::{CandidateId, JobId};
use crate::services::{CandidateRepository, StoreError};

/// How a job title is compared against candidate titles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleQuery<'a> {
    /// Two-word title: a candidate matches if its title contains either
    /// word, ignoring case
    Partial([&'a str; 2]),
    /// Anything else: the candidate title must equal the job title
    Exact(&'a str),
}

/// Decide how to search for a job title.
///
/// Titles are assumed to be at most two words. Only a title with exactly two
/// whitespace-separated tokens gets the partial treatment, so
/// "Software Engineer" also finds "Software Developer" while "Chef" or
/// "Senior Software Engineer" need an exact title.
pub fn title_query(title: &str) -> TitleQuery<'_> {
    let mut tokens = title.split_whitespace();

    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) => TitleQuery::Partial([first, second]),
        _ => TitleQuery::Exact(title),
    }
}

/// Candidates whose title matches the stored title of `job_id`
pub async fn match_by_title<R>(
    repo: &R,
    job_id: JobId,
) -> Result<HashSet<CandidateId>, StoreError>
where
    R: CandidateRepository,
{
    let job = repo.get_job(job_id).await?;

    let matches = match title_query(&job.title) {
        TitleQuery::Partial(tokens) => repo.find_candidates_by_title_substring(&tokens).await?,
        TitleQuery::Exact(title) => repo.find_candidates_by_exact_title(title).await?,
    };

    tracing::debug!("Title '{}' matched {} candidates", job.title, matches.len());

    Ok(matches)
}
