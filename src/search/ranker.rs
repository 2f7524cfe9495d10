//! Composite ranking: embedding similarity fused with skill and experience fit.
//!
//! ```text
//! composite = 0.55 * embed + 0.25 * skill + 0.15 * experience + 0.05 * (|skills| / 20)
//! ```
//!
//! The richness term is not clamped: a record with 40 skills earns a 0.10
//! bonus.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::{CandidateRecord, Query, ScoredResult};

/// Weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub embed: f32,
    pub skill: f32,
    pub experience: f32,
    pub richness: f32,
    /// Skill count that earns one full unit of the richness weight
    pub richness_scale: f32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            embed: 0.55,
            skill: 0.25,
            experience: 0.15,
            richness: 0.05,
            richness_scale: 20.0,
        }
    }
}

impl RankingWeights {
    /// Weighted sum of the four sub-scores.
    pub fn composite(&self, embed: f32, skill: f32, experience: f32, skill_count: usize) -> f32 {
        let richness = if self.richness_scale > 0.0 {
            skill_count as f32 / self.richness_scale
        } else {
            0.0
        };
        self.embed * embed
            + self.skill * skill
            + self.experience * experience
            + self.richness * richness
    }
}

/// Fraction of query skills the record has; 0.0 without query skills.
pub fn skill_score(query_skills: &BTreeSet<String>, record_skills: &BTreeSet<String>) -> f32 {
    if query_skills.is_empty() {
        return 0.0;
    }
    let matched = query_skills
        .iter()
        .filter(|skill| record_skills.contains(&skill.to_lowercase()))
        .count();
    matched as f32 / query_skills.len().max(1) as f32
}

/// Experience relative to the requirement, capped at 1.0; 0.0 without one.
pub fn experience_score(years: u32, desired_years: u32) -> f32 {
    if desired_years == 0 {
        return 0.0;
    }
    (years as f32 / desired_years as f32).min(1.0)
}

/// Score and order candidates with the default weights.
pub fn rank(candidates: Vec<(CandidateRecord, f32)>, query: &Query) -> Vec<ScoredResult> {
    rank_with(candidates, query, &RankingWeights::default())
}

/// Score every candidate and stable-sort by composite score, highest first.
pub fn rank_with(
    candidates: Vec<(CandidateRecord, f32)>,
    query: &Query,
    weights: &RankingWeights,
) -> Vec<ScoredResult> {
    let mut results: Vec<ScoredResult> = candidates
        .into_iter()
        .map(|(record, embed_score)| {
            let skill = skill_score(&query.skills, &record.skills);
            let experience = experience_score(record.years_experience, query.desired_years);
            let composite_score =
                weights.composite(embed_score, skill, experience, record.skills.len());
            ScoredResult {
                record,
                embed_score,
                skill_score: skill,
                exp_score: experience,
                composite_score,
            }
        })
        .collect();

    // sort_by is stable: equal scores keep input order
    results.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    results
}
