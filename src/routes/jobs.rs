use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{
    ErrorResponse, JobId, JobStats, JobStatus, MessageResponse, NoteRequest, OpinionKind,
    OpinionRequest, UpdateJobStatusRequest,
};
use crate::routes::{store_error_response, validation_error_response, AppState};
use crate::services::{CacheKey, RecruiterRepository};

/// Configure recruiter routes: opinions, notes, job status and statistics
pub fn configure<S>(cfg: &mut web::ServiceConfig)
where
    S: RecruiterRepository + 'static,
{
    cfg.route("/candidate/opinion", web::post().to(add_opinion::<S>))
        .route("/candidate/note", web::post().to(add_note::<S>))
        .route("/job", web::put().to(update_job_status::<S>))
        .route("/job/{job_id}", web::get().to(get_job_stats::<S>));
}

/// Like or dislike a candidate for a job
///
/// POST /candidate/opinion
///
/// Request body:
/// ```json
/// { "job_id": 1, "candidate_id": 2, "is_liked": true }
/// ```
async fn add_opinion<S>(
    state: web::Data<AppState<S>>,
    req: web::Json<OpinionRequest>,
) -> HttpResponse
where
    S: RecruiterRepository,
{
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let (kind, message) = if req.is_liked {
        (OpinionKind::Like, "Like added")
    } else {
        (OpinionKind::Dislike, "Dislike added")
    };

    match state.store.add_opinion(req.candidate_id, req.job_id, kind).await {
        Ok(()) => {
            tracing::info!(
                "Recorded {:?} for candidate {} on job {}",
                kind,
                req.candidate_id,
                req.job_id
            );
            state.invalidate_stats(req.job_id).await;
            HttpResponse::Ok().json(MessageResponse::new(message))
        }
        Err(e) => {
            tracing::info!("Rejected opinion for job {}: {}", req.job_id, e);
            store_error_response(&e)
        }
    }
}

/// Add a note for a liked candidate
///
/// POST /candidate/note
///
/// Request body:
/// ```json
/// { "job_id": 1, "candidate_id": 2, "note": "Strong portfolio" }
/// ```
async fn add_note<S>(state: web::Data<AppState<S>>, req: web::Json<NoteRequest>) -> HttpResponse
where
    S: RecruiterRepository,
{
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    match state
        .store
        .add_note(req.candidate_id, req.job_id, &req.note)
        .await
    {
        Ok(()) => {
            tracing::info!("Created new note for job {}", req.job_id);
            state.invalidate_stats(req.job_id).await;
            HttpResponse::Ok().json(MessageResponse::new("Added note successfully"))
        }
        Err(e) => {
            tracing::info!("Rejected note for job {}: {}", req.job_id, e);
            store_error_response(&e)
        }
    }
}

/// Update a job's status
///
/// PUT /job
///
/// Request body:
/// ```json
/// { "job_id": 1, "status": "opened|closed|pending" }
/// ```
async fn update_job_status<S>(
    state: web::Data<AppState<S>>,
    req: web::Json<UpdateJobStatusRequest>,
) -> HttpResponse
where
    S: RecruiterRepository,
{
    if let Err(errors) = req.validate() {
        return validation_error_response(errors);
    }

    let status: JobStatus = match req.status.parse() {
        Ok(status) => status,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid status".to_string(),
                message: e.to_string(),
                status_code: 400,
            });
        }
    };

    match state.store.update_job_status(req.job_id, status).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse::new(format!(
            "Status updated to {}",
            status
        ))),
        Err(e) => store_error_response(&e),
    }
}

/// Likes, dislikes, notes and distinct matched candidates for a job
///
/// GET /job/{job_id}
async fn get_job_stats<S>(state: web::Data<AppState<S>>, path: web::Path<JobId>) -> HttpResponse
where
    S: RecruiterRepository,
{
    let job_id = path.into_inner();
    let cache_key = CacheKey::job_stats(job_id);

    if let Some(cache) = &state.cache {
        if let Ok(stats) = cache.get::<JobStats>(&cache_key).await {
            return HttpResponse::Ok().json(stats);
        }
    }

    match state.store.job_stats(job_id).await {
        Ok(stats) => {
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.set(&cache_key, &stats).await {
                    tracing::warn!("Failed to cache stats for job {}: {}", job_id, e);
                }
            }
            HttpResponse::Ok().json(stats)
        }
        Err(e) => store_error_response(&e),
    }
}
