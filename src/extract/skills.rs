//! Skill extraction: fixed vocabulary plus an explicit skills section.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Maximum number of skills kept per record.
pub const MAX_SKILLS: usize = 50;

/// Reference vocabulary matched by substring anywhere in the document.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "c++",
    "c#",
    "sql",
    "pandas",
    "numpy",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "machine learning",
    "deep learning",
    "react",
    "node",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "excel",
    "nlp",
    "computer vision",
    "javascript",
    "html",
    "css",
];

// The section ends at the next `word:` line in any letter case.
static SKILLS_SECTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?:technical skills|skills)[:\n](.*?)(?:\n[A-Z][a-z]+:|\z)")
        .expect("valid regex")
});

static SKILL_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\n/;•\-]").expect("valid regex"));

/// Union of vocabulary hits and skills-section fragments, capped at
/// [`MAX_SKILLS`] in discovery order.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    let vocabulary_hits = SKILL_VOCABULARY
        .iter()
        .filter(|skill| lowered.contains(*skill))
        .map(|skill| (*skill).to_string());

    for skill in vocabulary_hits.chain(section_skills(text)) {
        if seen.insert(skill.clone()) {
            ordered.push(skill);
        }
    }

    ordered.truncate(MAX_SKILLS);
    ordered.into_iter().collect()
}

/// Fragments listed under the first "Skills:" or "Technical Skills:" header.
pub fn section_skills(text: &str) -> Vec<String> {
    let Some(body) = SKILLS_SECTION_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
    else {
        return Vec::new();
    };

    SKILL_SEPARATOR_REGEX
        .split(body.as_str())
        .map(|part| part.trim().to_lowercase())
        .filter(|part| !part.is_empty())
        .collect()
}
