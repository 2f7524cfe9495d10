//! E2E test suite entry point.

mod index_workflow;
mod search_workflow;
