use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{CandidateId, JobId};

/// Request to like or dislike a candidate for a job
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpinionRequest {
    #[validate(range(min = 1))]
    pub job_id: JobId,
    #[validate(range(min = 1))]
    pub candidate_id: CandidateId,
    pub is_liked: bool,
}

/// Request to leave a note on a liked candidate
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NoteRequest {
    #[validate(range(min = 1))]
    pub job_id: JobId,
    #[validate(range(min = 1))]
    pub candidate_id: CandidateId,
    #[validate(length(min = 1))]
    pub note: String,
}

/// Request to change a job's status
///
/// The status is kept as a string so an unknown value can be reported
/// with the original text.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobStatusRequest {
    #[validate(range(min = 1))]
    pub job_id: JobId,
    #[validate(length(min = 1))]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_request_requires_text() {
        let req = NoteRequest {
            job_id: 1,
            candidate_id: 2,
            note: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_opinion_request_rejects_zero_ids() {
        let req = OpinionRequest {
            job_id: 0,
            candidate_id: 2,
            is_liked: true,
        };
        assert!(req.validate().is_err());
    }
}
