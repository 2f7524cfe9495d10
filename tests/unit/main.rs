//! Unit-level integration tests against the public library API.

mod builder_tests;
mod cli_parse_tests;
mod config_tests;
mod extract_tests;
mod vector_index_tests;
