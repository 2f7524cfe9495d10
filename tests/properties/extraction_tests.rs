use proptest::prelude::*;

use screener::extract::{MAX_SKILLS, RecordExtractor, estimate_years_experience};

proptest! {
    #[test]
    fn test_extraction_never_panics_and_bounds_skills(text in "\\PC{0,400}") {
        let record = RecordExtractor::with_current_year(2024).extract("doc", &text);
        prop_assert!(record.skills.len() <= MAX_SKILLS);
        prop_assert!(!record.name.is_empty());
    }

    #[test]
    fn test_many_skill_fragments_are_capped(items in prop::collection::vec("[a-z]{3,10}", 0..120)) {
        let text = format!("Skills: {}", items.join(", "));
        let record = RecordExtractor::with_current_year(2024).extract("doc", &text);
        prop_assert!(record.skills.len() <= MAX_SKILLS);
    }

    #[test]
    fn test_skills_are_case_insensitive(upper in any::<bool>()) {
        let text = if upper { "Skills: PYTHON, DOCKER" } else { "skills: python, docker" };
        let record = RecordExtractor::with_current_year(2024).extract("doc", text);
        prop_assert!(record.skills.contains("python"));
        prop_assert!(record.skills.contains("docker"));
        prop_assert!(record.skills.iter().all(|s| s.to_lowercase() == *s));
    }

    #[test]
    fn test_closed_range_counts_difference(start in 1950u32..2024, span in 0u32..40) {
        let end = (start + span).min(2099);
        let text = format!("Engineer {start}-{end}");
        prop_assert_eq!(estimate_years_experience(&text, 2024), end - start);
    }
}
