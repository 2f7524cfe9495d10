use std::collections::BTreeSet;

use proptest::prelude::*;

use screener::core::{CandidateRecord, Query};
use screener::search::{RankingWeights, rank};

fn record(id: usize, skills: &BTreeSet<String>, years: u32) -> CandidateRecord {
    let mut record = CandidateRecord::empty(format!("r{id}"));
    record.skills = skills.clone();
    record.years_experience = years;
    record
}

fn skill_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        prop::sample::select(vec!["python", "sql", "aws", "react", "docker", "excel"])
            .prop_map(str::to_string),
        0..6,
    )
}

proptest! {
    #[test]
    fn test_output_is_sorted_descending(
        candidates in prop::collection::vec((skill_set(), 0u32..30, -1.0f32..1.0), 0..20),
        query_skills in skill_set(),
        desired in 0u32..15,
    ) {
        let query = Query::new("q").with_skills(&query_skills).with_desired_years(desired);
        let input: Vec<(CandidateRecord, f32)> = candidates
            .iter()
            .enumerate()
            .map(|(i, (skills, years, embed))| (record(i, skills, *years), *embed))
            .collect();
        let results = rank(input, &query);

        prop_assert_eq!(results.len(), candidates.len());
        prop_assert!(results.windows(2).all(|w| w[0].composite_score >= w[1].composite_score));
        for r in &results {
            prop_assert!((0.0..=1.0).contains(&r.skill_score));
            prop_assert!((0.0..=1.0).contains(&r.exp_score));
        }
    }

    #[test]
    fn test_composite_monotonic_in_embed(
        low in -1.0f32..1.0,
        delta in 0.0f32..1.0,
        skill in 0.0f32..=1.0,
        exp in 0.0f32..=1.0,
        count in 0usize..60,
    ) {
        let weights = RankingWeights::default();
        let a = weights.composite(low, skill, exp, count);
        let b = weights.composite(low + delta, skill, exp, count);
        prop_assert!(b >= a);
    }

    #[test]
    fn test_equal_scores_keep_input_order(n in 1usize..15, embed in -1.0f32..1.0) {
        let empty = BTreeSet::new();
        let input: Vec<(CandidateRecord, f32)> =
            (0..n).map(|i| (record(i, &empty, 0), embed)).collect();
        let results = rank(input, &Query::new("q"));
        let ids: Vec<String> = results.into_iter().map(|r| r.record.id).collect();
        let expected: Vec<String> = (0..n).map(|i| format!("r{i}")).collect();
        prop_assert_eq!(ids, expected);
    }
}
