//! Resume text → [`CandidateRecord`] extraction.
//!
//! Extraction is heuristic and total: malformed or empty input never fails,
//! every field falls back to its documented default instead.

pub mod contact;
pub mod experience;
pub mod sections;
pub mod skills;

use chrono::Datelike;
use tracing::trace;

use crate::core::CandidateRecord;

pub use contact::{extract_email, extract_linkedin, extract_name, extract_phone};
pub use experience::estimate_years_experience;
pub use sections::{education_section, experience_section};
pub use skills::{MAX_SKILLS, SKILL_VOCABULARY, extract_skills, section_skills};

/// Turns raw document text into a normalized record.
#[derive(Debug, Clone, Copy)]
pub struct RecordExtractor {
    current_year: i32,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    /// Extractor that resolves "present" against the system clock.
    pub fn new() -> Self {
        Self {
            current_year: chrono::Local::now().year(),
        }
    }

    /// Extractor pinned to a fixed calendar year.
    pub const fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn extract(&self, id: impl Into<String>, raw_text: &str) -> CandidateRecord {
        let full_text = normalize_text(raw_text);

        let record = CandidateRecord {
            id: id.into(),
            name: extract_name(&full_text),
            email: extract_email(&full_text),
            phone: extract_phone(&full_text),
            linkedin_url: extract_linkedin(&full_text),
            skills: extract_skills(&full_text),
            years_experience: estimate_years_experience(&full_text, self.current_year),
            experience_section: experience_section(&full_text),
            education_section: education_section(&full_text),
            full_text,
        };

        trace!(
            id = %record.id,
            skills = record.skills.len(),
            years = record.years_experience,
            "extracted record"
        );
        record
    }
}

/// Extract a standalone document with the current clock.
///
/// The record's `id` is left empty because there is no source file to name
/// it after. Records that go into an index must come from
/// [`RecordExtractor::extract`] with the file name as id, since ids are unique
/// within a corpus.
pub fn extract(raw_text: &str) -> CandidateRecord {
    RecordExtractor::new().extract(String::new(), raw_text)
}

/// Trim every line, drop blank ones, rejoin with `\n`.
pub fn normalize_text(raw_text: &str) -> String {
    raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
