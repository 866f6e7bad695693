use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::time::Duration;

use crate::models::{
    CandidateId, Job, JobId, JobStats, JobStatus, LikedCandidate, OpinionKind, Skill, SkillId,
};
use crate::services::repository::{
    CandidateRepository, RecruiterRepository, StoreError, StoreHealth, JOB_NOT_OPEN, NOTE_REJECTED,
};

/// Job status as stored in the `job_status` Postgres enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
pub enum DbJobStatus {
    Opened,
    Closed,
    Pending,
}

impl From<JobStatus> for DbJobStatus {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Opened => DbJobStatus::Opened,
            JobStatus::Closed => DbJobStatus::Closed,
            JobStatus::Pending => DbJobStatus::Pending,
        }
    }
}

impl From<DbJobStatus> for JobStatus {
    fn from(value: DbJobStatus) -> Self {
        match value {
            DbJobStatus::Opened => JobStatus::Opened,
            DbJobStatus::Closed => JobStatus::Closed,
            DbJobStatus::Pending => JobStatus::Pending,
        }
    }
}

fn opinion_table(kind: OpinionKind) -> (&'static str, &'static str) {
    match kind {
        OpinionKind::Like => ("likes", "time_liked"),
        OpinionKind::Dislike => ("dislikes", "time_disliked"),
    }
}

/// PostgreSQL-backed store for jobs, candidates, opinions, notes and matches
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn job_status(&self, job_id: JobId) -> Result<JobStatus, StoreError> {
        let row = sqlx::query("SELECT status FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;

        Ok(row.get::<DbJobStatus, _>("status").into())
    }

    async fn candidate_exists(&self, candidate_id: CandidateId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM candidates WHERE candidate_id = $1) AS found")
            .bind(candidate_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn count_for_job(&self, table: &str, job_id: JobId) -> Result<i64, StoreError> {
        let query = format!("SELECT COUNT(*) AS total FROM {} WHERE job_id = $1", table);
        let row = sqlx::query(&query).bind(job_id).fetch_one(&self.pool).await?;

        Ok(row.get("total"))
    }
}

fn collect_ids(rows: &[sqlx::postgres::PgRow]) -> HashSet<CandidateId> {
    rows.iter().map(|row| row.get("candidate_id")).collect()
}

impl CandidateRepository for PostgresStore {
    async fn get_job(&self, job_id: JobId) -> Result<Job, StoreError> {
        let row = sqlx::query("SELECT job_id, title, status, skill FROM jobs WHERE job_id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("job {}", job_id)))?;

        Ok(Job {
            job_id: row.get("job_id"),
            title: row.get("title"),
            status: row.get::<DbJobStatus, _>("status").into(),
            skill: row.get("skill"),
        })
    }

    async fn find_candidates_by_title_substring(
        &self,
        tokens: &[&str],
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let needles: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        // strpos avoids LIKE wildcard escaping
        let query = r#"
            SELECT DISTINCT candidate_id
            FROM candidates
            WHERE EXISTS (
                SELECT 1 FROM UNNEST($1::text[]) AS needle
                WHERE strpos(lower(title), needle) > 0
            )
        "#;

        let rows = sqlx::query(query).bind(&needles).fetch_all(&self.pool).await?;
        Ok(collect_ids(&rows))
    }

    async fn find_candidates_by_exact_title(
        &self,
        title: &str,
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let rows = sqlx::query("SELECT candidate_id FROM candidates WHERE title = $1")
            .bind(title)
            .fetch_all(&self.pool)
            .await?;

        Ok(collect_ids(&rows))
    }

    async fn get_skill_by_name(&self, name: &str) -> Result<Skill, StoreError> {
        let row = sqlx::query("SELECT id, skill_name FROM skills WHERE skill_name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("skill {}", name)))?;

        Ok(Skill {
            id: row.get("id"),
            skill_name: row.get("skill_name"),
        })
    }

    async fn find_candidates_by_skill(
        &self,
        skill_id: SkillId,
    ) -> Result<HashSet<CandidateId>, StoreError> {
        let rows = sqlx::query("SELECT candidate_id FROM candidate_skills WHERE skill_id = $1")
            .bind(skill_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(collect_ids(&rows))
    }

    async fn has_any_opinion(&self, candidate_id: CandidateId) -> Result<bool, StoreError> {
        let query = r#"
            SELECT EXISTS(SELECT 1 FROM likes WHERE candidate_id = $1)
                OR EXISTS(SELECT 1 FROM dislikes WHERE candidate_id = $1) AS found
        "#;

        let row = sqlx::query(query).bind(candidate_id).fetch_one(&self.pool).await?;
        Ok(row.get("found"))
    }

    async fn has_opinion_for_job(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
    ) -> Result<bool, StoreError> {
        let query = r#"
            SELECT EXISTS(SELECT 1 FROM likes WHERE candidate_id = $1 AND job_id = $2)
                OR EXISTS(SELECT 1 FROM dislikes WHERE candidate_id = $1 AND job_id = $2) AS found
        "#;

        let row = sqlx::query(query)
            .bind(candidate_id)
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("found"))
    }

    async fn count_candidates(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM candidates")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("total").max(0) as usize)
    }

    async fn record_matches(&self, pairs: &[(CandidateId, JobId)]) -> Result<(), StoreError> {
        if pairs.is_empty() {
            return Ok(());
        }

        let candidate_ids: Vec<CandidateId> = pairs.iter().map(|(c, _)| *c).collect();
        let job_ids: Vec<JobId> = pairs.iter().map(|(_, j)| *j).collect();

        let mut tx = self.pool.begin().await?;

        // Validate every pair before writing anything
        let missing = sqlx::query(
            r#"
            SELECT p.candidate_id, p.job_id
            FROM UNNEST($1::bigint[], $2::bigint[]) AS p(candidate_id, job_id)
            LEFT JOIN candidates c ON c.candidate_id = p.candidate_id
            LEFT JOIN jobs j ON j.job_id = p.job_id
            WHERE c.candidate_id IS NULL OR j.job_id IS NULL
            LIMIT 1
            "#,
        )
        .bind(&candidate_ids)
        .bind(&job_ids)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(row) = missing {
            let candidate_id: CandidateId = row.get("candidate_id");
            let job_id: JobId = row.get("job_id");
            return Err(StoreError::Validation(format!(
                "invalid match ({}, {}): candidate or job does not exist",
                candidate_id, job_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO matches (candidate_id, job_id, time_matched)
            SELECT candidate_id, job_id, NOW()
            FROM UNNEST($1::bigint[], $2::bigint[]) AS p(candidate_id, job_id)
            "#,
        )
        .bind(&candidate_ids)
        .bind(&job_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Recorded {} match rows", pairs.len());

        Ok(())
    }
}

impl RecruiterRepository for PostgresStore {
    async fn add_opinion(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        kind: OpinionKind,
    ) -> Result<(), StoreError> {
        let status = self.job_status(job_id).await?;
        if kind == OpinionKind::Like && !status.is_open() {
            return Err(StoreError::Validation(JOB_NOT_OPEN.to_string()));
        }
        if !self.candidate_exists(candidate_id).await? {
            return Err(StoreError::Validation(format!(
                "candidate {} does not exist",
                candidate_id
            )));
        }

        let (table, time_column) = opinion_table(kind);
        let query = format!(
            "INSERT INTO {} (candidate_id, job_id, {}) VALUES ($1, $2, NOW())",
            table, time_column
        );

        sqlx::query(&query)
            .bind(candidate_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded {:?} for candidate {} on job {}", kind, candidate_id, job_id);

        Ok(())
    }

    async fn add_note(
        &self,
        candidate_id: CandidateId,
        job_id: JobId,
        note: &str,
    ) -> Result<(), StoreError> {
        let status = self.job_status(job_id).await?;

        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM likes WHERE candidate_id = $1 AND job_id = $2) AS liked",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        let liked: bool = row.get("liked");

        if status.is_closed() || !liked {
            return Err(StoreError::Validation(NOTE_REJECTED.to_string()));
        }

        sqlx::query("INSERT INTO notes (candidate_id, job_id, note) VALUES ($1, $2, $3)")
            .bind(candidate_id)
            .bind(job_id)
            .bind(note)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn liked_candidates(&self, job_id: JobId) -> Result<Vec<LikedCandidate>, StoreError> {
        self.job_status(job_id).await?;

        let query = r#"
            SELECT l.candidate_id, l.job_id, l.time_liked,
                   COALESCE(
                       ARRAY(
                           SELECT n.note FROM notes n
                           WHERE n.candidate_id = l.candidate_id AND n.job_id = l.job_id
                           ORDER BY n.id
                       ),
                       '{}'
                   ) AS notes
            FROM likes l
            WHERE l.job_id = $1
            ORDER BY l.time_liked DESC, l.id DESC
        "#;

        let rows = sqlx::query(query).bind(job_id).fetch_all(&self.pool).await?;

        Ok(rows
            .iter()
            .map(|row| LikedCandidate {
                candidate_id: row.get("candidate_id"),
                job_id: row.get("job_id"),
                time_liked: row.get("time_liked"),
                notes: row.get("notes"),
            })
            .collect())
    }

    async fn update_job_status(&self, job_id: JobId, status: JobStatus) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE jobs SET status = $1 WHERE job_id = $2")
            .bind(DbJobStatus::from(status))
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("job {}", job_id)));
        }

        tracing::info!("Job {} status updated to {}", job_id, status);

        Ok(())
    }

    async fn job_stats(&self, job_id: JobId) -> Result<JobStats, StoreError> {
        self.job_status(job_id).await?;

        let row = sqlx::query(
            "SELECT COUNT(DISTINCT candidate_id) AS total FROM matches WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(JobStats {
            num_likes: self.count_for_job("likes", job_id).await?,
            num_dislikes: self.count_for_job("dislikes", job_id).await?,
            num_notes: self.count_for_job("notes", job_id).await?,
            num_matches: row.get("total"),
        })
    }
}

impl StoreHealth for PostgresStore {
    /// Health check for the database connection
    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("PostgreSQL health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_conversion() {
        for status in [JobStatus::Opened, JobStatus::Closed, JobStatus::Pending] {
            assert_eq!(JobStatus::from(DbJobStatus::from(status)), status);
        }
    }

    #[test]
    fn test_opinion_tables() {
        assert_eq!(opinion_table(OpinionKind::Like), ("likes", "time_liked"));
        assert_eq!(opinion_table(OpinionKind::Dislike), ("dislikes", "time_disliked"));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_unknown_job_is_not_found() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let store = PostgresStore::from_settings(&url, Some(2), Some(1), None, None)
            .await
            .expect("Failed to connect");

        let err = store.get_job(i64::MAX).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
