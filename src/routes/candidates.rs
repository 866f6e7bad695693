use actix_web::{web, HttpResponse, Responder};

use crate::models::{HealthResponse, JobId};
use crate::routes::{store_error_response, AppState};
use crate::services::{CandidateRepository, RecruiterRepository, StoreHealth};

/// Configure candidate matching routes
pub fn configure<S>(cfg: &mut web::ServiceConfig)
where
    S: CandidateRepository + RecruiterRepository + StoreHealth + 'static,
{
    cfg.route("/health", web::get().to(health_check::<S>))
        .route("/candidates/{job_id}", web::get().to(get_candidates::<S>))
        .route("/candidates/liked/{job_id}", web::get().to(get_liked_candidates::<S>));
}

/// Health check endpoint
async fn health_check<S>(state: web::Data<AppState<S>>) -> impl Responder
where
    S: StoreHealth,
{
    let status = if state.store.health_check().await {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Matching candidate ids for a job
///
/// GET /candidates/{job_id}
///
/// Closed jobs answer 204 without running the matcher. Matching failures are
/// logged and answered with an empty list.
async fn get_candidates<S>(state: web::Data<AppState<S>>, path: web::Path<JobId>) -> HttpResponse
where
    S: CandidateRepository,
{
    let job_id = path.into_inner();

    let job = match state.store.get_job(job_id).await {
        Ok(job) => job,
        Err(e) => return store_error_response(&e),
    };

    if job.status.is_closed() {
        tracing::info!("Job {} is closed, not matching candidates", job_id);
        return HttpResponse::NoContent().finish();
    }

    let candidates = state.finder.find_candidates(state.store.as_ref(), &job).await;
    if !candidates.is_empty() {
        state.invalidate_stats(job_id).await;
    }

    HttpResponse::Ok().json(candidates)
}

/// Liked candidates for a job, newest first, with their notes
///
/// GET /candidates/liked/{job_id}
async fn get_liked_candidates<S>(
    state: web::Data<AppState<S>>,
    path: web::Path<JobId>,
) -> HttpResponse
where
    S: CandidateRepository + RecruiterRepository,
{
    let job_id = path.into_inner();

    let job = match state.store.get_job(job_id).await {
        Ok(job) => job,
        Err(e) => return store_error_response(&e),
    };

    if job.status.is_closed() {
        return HttpResponse::NoContent().finish();
    }

    match state.store.liked_candidates(job_id).await {
        Ok(liked) => HttpResponse::Ok().json(liked),
        Err(e) => {
            tracing::error!("Failed to fetch liked candidates for job {}: {}", job_id, e);
            store_error_response(&e)
        }
    }
}
