//! Name and contact field extraction.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::UNKNOWN_NAME;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\-\s]{8,15}").expect("valid regex"));

static LINKEDIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?linkedin\.com/[A-Za-z0-9_/.-]+").expect("valid regex")
});

/// First line of the text when it has between one and five tokens.
pub fn extract_name(text: &str) -> String {
    let first_line = text.trim().lines().next().unwrap_or_default().trim();
    let tokens = first_line.split_whitespace().count();
    if (1..=5).contains(&tokens) {
        first_line.to_string()
    } else {
        UNKNOWN_NAME.to_string()
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_REGEX.find(text).map(|m| m.as_str().to_string())
}

/// The pattern lets separators run past the number, so trailing whitespace
/// is stripped from the match.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_REGEX
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|phone| !phone.is_empty())
}

pub fn extract_linkedin(text: &str) -> Option<String> {
    LINKEDIN_REGEX.find(text).map(|m| m.as_str().to_string())
}
