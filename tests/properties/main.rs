//! Property tests for extraction, embeddings and ranking.

mod determinism_tests;
mod extraction_tests;
mod ranking_tests;
