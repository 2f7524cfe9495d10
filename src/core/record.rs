//! Candidate records, queries and scored results.
//!
//! A [`CandidateRecord`] is produced once per source document at index-build
//! time and never mutated afterwards; a rebuild replaces it wholesale.
//! [`ScoredResult`] is ephemeral and exists only for the lifetime of a query.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Name used when the first line does not look like a name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Default number of candidates returned by a query.
pub const DEFAULT_K: usize = 5;

/// Structured view of one resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Source file name, unique within a corpus
    pub id: String,
    /// Normalized document text (trimmed, non-empty lines)
    pub full_text: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    /// Lower-cased skills, at most 50
    pub skills: BTreeSet<String>,
    pub years_experience: u32,
    pub experience_section: String,
    pub education_section: String,
}

impl CandidateRecord {
    /// Record with every field at its documented default.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_text: String::new(),
            name: UNKNOWN_NAME.to_string(),
            email: None,
            phone: None,
            linkedin_url: None,
            skills: BTreeSet::new(),
            years_experience: 0,
            experience_section: String::new(),
            education_section: String::new(),
        }
    }
}

/// A job-requirements query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub skills: BTreeSet<String>,
    pub desired_years: u32,
    pub k: usize,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            skills: BTreeSet::new(),
            desired_years: 0,
            k: DEFAULT_K,
        }
    }

    /// Add desired skills; entries are trimmed and lower-cased.
    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skills.extend(
            skills
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );
        self
    }

    #[must_use]
    pub const fn with_desired_years(mut self, years: u32) -> Self {
        self.desired_years = years;
        self
    }

    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Parse a comma-separated skill list such as `"python, SQL ,aws"`.
    pub fn parse_skills(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// One ranked candidate with its score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub record: CandidateRecord,
    /// Cosine similarity between query and document embeddings
    pub embed_score: f32,
    pub skill_score: f32,
    pub exp_score: f32,
    pub composite_score: f32,
}
