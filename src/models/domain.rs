use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type CandidateId = i64;
pub type JobId = i64;
pub type SkillId = i64;

/// Hiring status of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Opened,
    Closed,
    Pending,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Opened => "opened",
            JobStatus::Closed => "closed",
            JobStatus::Pending => "pending",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Opened)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, JobStatus::Closed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not one of `opened`, `closed`, `pending`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to update job with status {0}")]
pub struct UnknownJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opened" => Ok(JobStatus::Opened),
            "closed" => Ok(JobStatus::Closed),
            "pending" => Ok(JobStatus::Pending),
            other => Err(UnknownJobStatus(other.to_string())),
        }
    }
}

/// A hiring requisition. Every job requires exactly one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: JobId,
    pub title: String,
    pub status: JobStatus,
    pub skill: String,
}

/// A job seeker profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: CandidateId,
    pub title: String,
    #[serde(default)]
    pub skills: Vec<SkillId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub skill_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionKind {
    Like,
    Dislike,
}

/// A recruiter's judgment on a candidate for a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opinion {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub kind: OpinionKind,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Which opinions disqualify a candidate from being matched again.
///
/// `Global` treats an opinion recorded against any job as disqualifying.
/// `Job` only looks at opinions recorded against the job being matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionScope {
    #[default]
    Global,
    Job,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub note: String,
}

/// A persisted record that a candidate was matched to a job during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub time_matched: chrono::DateTime<chrono::Utc>,
}

/// Aggregate recruiter activity for a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStats {
    pub num_likes: i64,
    pub num_dislikes: i64,
    pub num_notes: i64,
    /// Distinct candidates matched, not Match rows
    pub num_matches: i64,
}

/// A like for a job together with the notes left on the same candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikedCandidate {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub time_liked: chrono::DateTime<chrono::Utc>,
    pub notes: Vec<String>,
}
