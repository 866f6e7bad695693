// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, CandidateId, Job, JobId, JobStats, JobStatus, LikedCandidate, Match, Note, Opinion,
    OpinionKind, OpinionScope, Skill, SkillId, UnknownJobStatus,
};
pub use requests::{NoteRequest, OpinionRequest, UpdateJobStatusRequest};
pub use responses::{ErrorResponse, HealthResponse, MessageResponse};
