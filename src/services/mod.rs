// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod repository;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use memory::InMemoryStore;
pub use postgres::{DbJobStatus, PostgresStore};
pub use repository::{CandidateRepository, RecruiterRepository, StoreError, StoreHealth};
