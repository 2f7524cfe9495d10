//! screener - resume screening engine
//!
//! Extracts structured candidate records from resumes, indexes them as
//! normalized embedding vectors, and ranks them against job requirements by
//! blending semantic similarity with skill overlap and experience fit.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod indexer;
pub mod loader;
pub mod search;
pub mod storage;
pub mod test_utils;
pub mod utils;

pub use error::{Result, ScreenerError};
