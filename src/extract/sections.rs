//! Experience and education section bodies.

use std::sync::LazyLock;

use regex::Regex;

static EXPERIENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:work experience|employment history|experience)[:\n](.*?)(?:\neducation[:\n]|\nprojects[:\n]|\z)",
    )
    .expect("valid regex")
});

static EDUCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)(?:academic qualifications|education)[:\n](.*?)(?:\n[A-Z][a-z]+:|\z)",
    )
    .expect("valid regex")
});

/// Body between an experience header and the education/projects header.
pub fn experience_section(text: &str) -> String {
    capture_body(&EXPERIENCE_REGEX, text)
}

/// Body between an education header and the next `word:` header line.
pub fn education_section(text: &str) -> String {
    capture_body(&EDUCATION_REGEX, text)
}

fn capture_body(regex: &Regex, text: &str) -> String {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
        .unwrap_or_default()
}
