//! Skill highlighting for result snippets.

use regex::{Captures, RegexBuilder};

/// Wrap every whole-word, case-insensitive occurrence of each skill with
/// `mark`. Skills are applied in order, so a later skill can match text
/// produced by an earlier one.
pub fn highlight_skills<'a, I, F>(text: &str, skills: I, mark: F) -> String
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> String,
{
    let mut highlighted = text.to_string();
    for skill in skills {
        if skill.is_empty() {
            continue;
        }
        let pattern = format!(r"\b{}\b", regex::escape(skill));
        let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
            continue;
        };
        highlighted = re
            .replace_all(&highlighted, |caps: &Captures<'_>| mark(&caps[0]))
            .into_owned();
    }
    highlighted
}
