//! Core candidate and query types

pub mod record;

pub use record::{CandidateRecord, Query, ScoredResult, DEFAULT_K, UNKNOWN_NAME};
