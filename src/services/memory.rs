use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::models::{
    Candidate, CandidateId, Job, JobId, JobStats, JobStatus, LikedCandidate, Match, Note,
    Opinion, OpinionKind, Skill, SkillId,
};
use crate::services::repository::{
    CandidateRepository, RecruiterRepository, StoreError, StoreHealth, JOB_NOT_OPEN, NOTE_REJECTED,
};

#[derive(Debug, Default)]
struct Tables {
    jobs: HashMap<JobId, Job>,
    candidates: HashMap<CandidateId, Candidate>,
    skills: HashMap<SkillId, Skill>,
    opinions: Vec<Opinion>,
    notes: Vec<Note>,
    matches: Vec<Match>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn job(&self, job_id: JobId) -> Result<&Job, StoreError> {
        self.jobs
            .get(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))
    }
}

/// In-process store backed by plain collections
///
/// Implements both repository traits with the same semantics as the
/// Postgres store. Used by tests, benchmarks and local experiments.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a skill and return its id. Names are stored as given.
    pub async fn add_skill(&self, skill_name: &str) -> SkillId {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.skills.insert(
            id,
            Skill {
                id,
                skill_name: skill_name.to_string(),
            },
        );
        id
    }

    pub async fn add_candidate(&self, title: &str, skills: &[SkillId]) -> CandidateId {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.candidates.insert(
            id,
            Candidate {
                candidate_id: id,
                title: title.to_string(),
                skills: skills.to_vec(),
            },
        );
        id
    }

    pub async fn add_job(&self, title: &str, status: JobStatus, skill: &str) -> JobId {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.jobs.insert(
            id,
            Job {
                job_id: id,
                title: title.to_string(),
                status,
                skill: skill.to_string(),
            },
        );
        id
    }

    /// Record an opinion directly, bypassing the job status rules
    pub async fn insert_opinion(&self, candidate_id: CandidateId, job_id: JobId, kind: OpinionKind) {
        let mut tables = self.tables.write().await;
        tables.opinions.push(Opinion {
            candidate_id,
            job_id,
            kind,
            recorded_at: chrono::Utc::now(),
        });
    }

    /// Snapshot of every Match row, oldest first
    pub async fn matches(&self) -> Vec<Match> {
        self.tables.read().await.matches.clone()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.tables.read().await.notes.clone()
    }

    pub async fn job(&self, job_id: JobId) -> Option<Job> {
        self.tables.read().await.jobs.get(&job_id).cloned()
    }
}

impl CandidateRepository for InMemoryStore {
    async fn get_job(&self, job_id: JobId) -> Result<Job, StoreError> {
        self.tables.read().await.job(job_id).cloned()
    }

    async fn find_candidates_by_title_substring(
        &self,
        tokens: &[&str],
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let needles: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let tables = self.tables.read().await;

        Ok(tables
            .candidates
            .values()
            .filter(|c| {
                let title = c.title.to_lowercase();
                needles.iter().any(|needle| title.contains(needle.as_str()))
            })
            .map(|c| c.candidate_id)
            .collect())
    }

    async fn find_candidates_by_exact_title(
        &self,
        title: &str,
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .candidates
            .values()
            .filter(|c| c.title == title)
            .map(|c| c.candidate_id)
            .collect())
    }

    async fn get_skill_by_name(&self, name: &str) -> Result<Skill, StoreError> {
        let tables = self.tables.read().await;

        tables
            .skills
            .values()
            .find(|s| s.skill_name == name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("skill {}", name)))
    }

    async fn find_candidates_by_skill(
        &self,
        skill_id: SkillId,
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let tables = self.tables.read().await;

        Ok(tables
            .candidates
            .values()
            .filter(|c| c.skills.contains(&skill_id))
            .map(|c| c.candidate_id)
            .collect())
    }

    async fn has_any_opinion(&self, candidate_id: CandidateId) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.opinions.iter().any(|o| o.candidate_id == candidate_id))
    }

    async fn has_opinion_for_job(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .opinions
            .iter()
            .any(|o| o.candidate_id == candidate_id && o.job_id == job_id))
    }

    async fn count_candidates(&self) -> Result<usize, StoreError> {
        Ok(self.tables.read().await.candidates.len())
    }

    async fn record_matches(&self, pairs: &[(CandidateId, JobId)]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        for (candidate_id, job_id) in pairs {
            if !tables.candidates.contains_key(candidate_id) {
                return Err(StoreError::Validation(format!(
                    "candidate {} does not exist",
                    candidate_id
                )));
            }
            if !tables.jobs.contains_key(job_id) {
                return Err(StoreError::Validation(format!("job {} does not exist", job_id)));
            }
        }

        let now = chrono::Utc::now();
        tables
            .matches
            .extend(pairs.iter().map(|&(candidate_id, job_id)| Match {
                candidate_id,
                job_id,
                time_matched: now,
            }));

        Ok(())
    }
}

impl RecruiterRepository for InMemoryStore {
    async fn add_opinion(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        kind: OpinionKind,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let job = tables.job(job_id)?;
        if kind == OpinionKind::Like && !job.status.is_open() {
            return Err(StoreError::Validation(JOB_NOT_OPEN.to_string()));
        }
        if !tables.candidates.contains_key(&candidate_id) {
            return Err(StoreError::Validation(format!(
                "candidate {} does not exist",
                candidate_id
            )));
        }

        tables.opinions.push(Opinion {
            candidate_id,
            job_id,
            kind,
            recorded_at: chrono::Utc::now(),
        });

        Ok(())
    }

    async fn add_note(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        note: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let closed = tables.job(job_id)?.status.is_closed();
        let liked = tables.opinions.iter().any(|o| {
            o.kind == OpinionKind::Like && o.candidate_id == candidate_id && o.job_id == job_id
        });
        if closed || !liked {
            return Err(StoreError::Validation(NOTE_REJECTED.to_string()));
        }

        tables.notes.push(Note {
            candidate_id,
            job_id,
            note: note.to_string(),
        });

        Ok(())
    }

    async fn liked_candidates(&self, job_id: JobId) -> Result<Vec<LikedCandidate>, StoreError> {
        let tables = self.tables.read().await;
        tables.job(job_id)?;

        let mut liked: Vec<LikedCandidate> = tables
            .opinions
            .iter()
            .filter(|o| o.kind == OpinionKind::Like && o.job_id == job_id)
            .map(|o| LikedCandidate {
                candidate_id: o.candidate_id,
                job_id,
                time_liked: o.recorded_at,
                notes: tables
                    .notes
                    .iter()
                    .filter(|n| n.candidate_id == o.candidate_id && n.job_id == job_id)
                    .map(|n| n.note.clone())
                    .collect(),
            })
            .collect();

        // Newest first; insertion order breaks timestamp ties
        liked.reverse();
        liked.sort_by(|a, b| b.time_liked.cmp(&a.time_liked));

        Ok(liked)
    }

    async fn update_job_status(&self, job_id: JobId, status: JobStatus) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        let job = tables
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;
        job.status = status;

        Ok(())
    }

    async fn job_stats(&self, job_id: JobId) -> Result<JobStats, StoreError> {
        let tables = self.tables.read().await;
        tables.job(job_id)?;

        let count_opinions = |kind: OpinionKind| {
            tables
                .opinions
                .iter()
                .filter(|o| o.kind == kind && o.job_id == job_id)
                .count() as i64
        };
        let matched: HashSet<CandidateId> = tables
            .matches
            .iter()
            .filter(|m| m.job_id == job_id)
            .map(|m| m.candidate_id)
            .collect();

        Ok(JobStats {
            num_likes: count_opinions(OpinionKind::Like),
            num_dislikes: count_opinions(OpinionKind::Dislike),
            num_notes: tables.notes.iter().filter(|n| n.job_id == job_id).count() as i64,
            num_matches: matched.len() as i64,
        })
    }
}

impl StoreHealth for InMemoryStore {
    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_substring_search_ignores_case() {
        let store = InMemoryStore::new();
        let dev = store.add_candidate("Software Developer", &[]).await;
        let chef = store.add_candidate("Head Chef", &[]).await;

        let found = store
            .find_candidates_by_title_substring(&["software", "ENGINEER"])
            .await
            .unwrap();

        assert!(found.contains(&dev));
        assert!(!found.contains(&chef));
    }

    #[tokio::test]
    async fn test_record_matches_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let job = store.add_job("Chef", JobStatus::Opened, "Cooking").await;
        let chef = store.add_candidate("Chef", &[]).await;

        let err = store
            .record_matches(&[(chef, job), (9999, job)])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.matches().await.is_empty());
    }

    #[tokio::test]
    async fn test_like_requires_open_job() {
        let store = InMemoryStore::new();
        let job = store.add_job("Chef", JobStatus::Pending, "Cooking").await;
        let chef = store.add_candidate("Chef", &[]).await;

        let err = store
            .add_opinion(chef, job, OpinionKind::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref msg) if msg == JOB_NOT_OPEN));

        // Dislikes have no status requirement
        store.add_opinion(chef, job, OpinionKind::Dislike).await.unwrap();
    }

    #[tokio::test]
    async fn test_stats_count_distinct_matched_candidates() {
        let store = InMemoryStore::new();
        let job = store.add_job("Chef", JobStatus::Opened, "Cooking").await;
        let chef = store.add_candidate("Chef", &[]).await;

        store.record_matches(&[(chef, job)]).await.unwrap();
        store.record_matches(&[(chef, job)]).await.unwrap();

        let stats = store.job_stats(job).await.unwrap();
        assert_eq!(stats.num_matches, 1);
        assert_eq!(store.matches().await.len(), 2);
    }
}
