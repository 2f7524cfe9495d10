//! Search results formatter
//!
//! Renders ranked candidates either as terminal text with a per-score
//! breakdown and a skill-highlighted snippet, or as a JSON document.

use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::core::ScoredResult;
use crate::search::highlight_skills;
use crate::utils::format::truncate_string;

/// Characters of resume text shown under each result.
pub const SNIPPET_CHARS: usize = 1000;

/// Ranked results for one query.
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<ScoredResult>,
    pub duration_ms: Option<u64>,
}

/// Serializable result for JSON output
#[derive(Debug, Clone, Serialize)]
struct SearchResultJson<'a> {
    rank: usize,
    id: &'a str,
    name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    linkedin_url: Option<&'a str>,
    skills: Vec<&'a str>,
    years_experience: u32,
    embed_score: f32,
    skill_score: f32,
    exp_score: f32,
    composite_score: f32,
    snippet: String,
}

#[derive(Debug, Clone, Serialize)]
struct SearchResponseJson<'a> {
    query: &'a str,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<u64>,
    results: Vec<SearchResultJson<'a>>,
}

impl SearchResults {
    pub fn new(query: impl Into<String>, results: Vec<ScoredResult>) -> Self {
        Self {
            query: query.into(),
            results,
            duration_ms: None,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// JSON payload for robot mode.
    pub fn to_json(&self) -> serde_json::Value {
        let response = SearchResponseJson {
            query: &self.query,
            count: self.results.len(),
            duration_ms: self.duration_ms,
            results: self
                .results
                .iter()
                .enumerate()
                .map(|(i, r)| SearchResultJson {
                    rank: i + 1,
                    id: &r.record.id,
                    name: &r.record.name,
                    email: r.record.email.as_deref(),
                    phone: r.record.phone.as_deref(),
                    linkedin_url: r.record.linkedin_url.as_deref(),
                    skills: r.record.skills.iter().map(String::as_str).collect(),
                    years_experience: r.record.years_experience,
                    embed_score: r.embed_score,
                    skill_score: r.skill_score,
                    exp_score: r.exp_score,
                    composite_score: r.composite_score,
                    snippet: snippet(r),
                })
                .collect(),
        };
        serde_json::to_value(response).unwrap_or_default()
    }

    /// Terminal rendering; `width` bounds the wrapped snippet.
    pub fn format_human(&self, width: usize) -> String {
        debug!(target: "search", results = self.results.len(), "rendering results");

        if self.results.is_empty() {
            return format!(
                "{} No candidates found for '{}'\n\nTry:\n  - Building the index: screener index <DIR>\n  - Using different keywords",
                "!".yellow(),
                self.query
            );
        }

        let mut out = format!("{} results for '{}'", self.results.len(), self.query);
        if let Some(ms) = self.duration_ms {
            out.push_str(&format!(" in {ms}ms"));
        }
        out.push_str("\n\n");

        for (i, result) in self.results.iter().enumerate() {
            let record = &result.record;
            out.push_str(&format!(
                "{}. {} {} {}\n",
                i + 1,
                record.id.bold(),
                format!("({})", record.name).dimmed(),
                format!("score {:.3}", result.composite_score).green(),
            ));
            out.push_str(&format!(
                "   embedding {:.3}  skills {:.2}  experience {:.2}\n",
                result.embed_score, result.skill_score, result.exp_score
            ));

            let skills: Vec<&str> = record.skills.iter().map(String::as_str).collect();
            let skills_line = if skills.is_empty() {
                "-".to_string()
            } else {
                skills.join(", ")
            };
            out.push_str(&format!(
                "   {} {skills_line}\n   {} {} years\n",
                "Skills:".dimmed(),
                "Experience:".dimmed(),
                record.years_experience
            ));

            let text = truncate_string(&flatten(&record.full_text), SNIPPET_CHARS / 4);
            let options = textwrap::Options::new(width.saturating_sub(3).max(20))
                .initial_indent("   ")
                .subsequent_indent("   ");
            // Wrap before highlighting so escape codes do not affect line width
            let wrapped = textwrap::fill(&text, options);
            out.push_str(&highlight_skills(&wrapped, skills.iter().copied(), |word| {
                word.green().bold().to_string()
            }));
            out.push_str("\n\n");
        }

        out
    }
}

fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn snippet(result: &ScoredResult) -> String {
    crate::utils::format::take_chars(&result.record.full_text, SNIPPET_CHARS).to_string()
}
