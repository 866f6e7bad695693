// Route exports
pub mod candidates;
pub mod jobs;

use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::core::CandidateFinder;
use crate::models::{ErrorResponse, JobId};
use crate::services::{
    CacheKey, CacheManager, CandidateRepository, RecruiterRepository, StoreError, StoreHealth,
};

/// Application state shared across all handlers
pub struct AppState<S> {
    pub store: Arc<S>,
    pub cache: Option<Arc<CacheManager>>,
    pub finder: CandidateFinder,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: self.cache.clone(),
            finder: self.finder.clone(),
        }
    }
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, cache: Option<Arc<CacheManager>>, finder: CandidateFinder) -> Self {
        Self {
            store,
            cache,
            finder,
        }
    }

    /// Drop cached statistics for a job after a write that changes them
    pub(crate) async fn invalidate_stats(&self, job_id: JobId) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.delete(&CacheKey::job_stats(job_id)).await {
                tracing::warn!("Failed to invalidate stats cache for job {}: {}", job_id, e);
            }
        }
    }
}

pub fn configure_routes<S>(cfg: &mut web::ServiceConfig)
where
    S: CandidateRepository + RecruiterRepository + StoreHealth + 'static,
{
    cfg.configure(candidates::configure::<S>)
        .configure(jobs::configure::<S>);
}

/// Map a store error onto an HTTP response
pub(crate) fn store_error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: msg.clone(),
            status_code: 404,
        }),
        StoreError::Validation(msg) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Invalid request".to_string(),
            message: msg.clone(),
            status_code: 400,
        }),
        StoreError::Database(_) | StoreError::Migrate(_) => {
            tracing::error!("Storage error: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Storage error".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

pub(crate) fn validation_error_response(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
