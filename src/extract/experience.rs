//! Years-of-experience estimation from date mentions.
//!
//! Two pattern families contribute independently: explicit year ranges
//! (`2018-2022`, `2019 to present`) and open-ended starts (`since 2015`,
//! `from 2012`). Overlapping mentions are all counted.

use std::sync::LazyLock;

use regex::Regex;

static YEAR_RANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:19|20)\d{2})\s*(?:-|–|—|to)\s*(present|19\d{2}|20\d{2})")
        .expect("valid regex")
});

static SINCE_YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:since|from)\s*((?:19|20)\d{2})").expect("valid regex"));

/// Sum of all range and since-year contributions, relative to `current_year`.
pub fn estimate_years_experience(text: &str, current_year: i32) -> u32 {
    let lowered = text.to_lowercase();

    let ranges: i64 = YEAR_RANGE_REGEX
        .captures_iter(&lowered)
        .filter_map(|caps| {
            let start = parse_year(caps.get(1)?.as_str())?;
            let end = match caps.get(2)?.as_str() {
                "present" => i64::from(current_year),
                year => parse_year(year)?,
            };
            Some((end - start).max(0))
        })
        .sum();

    let open_ended: i64 = SINCE_YEAR_REGEX
        .captures_iter(&lowered)
        .filter_map(|caps| parse_year(caps.get(1)?.as_str()))
        .map(|start| (i64::from(current_year) - start).max(0))
        .sum();

    u32::try_from(ranges + open_ended).unwrap_or(u32::MAX)
}

fn parse_year(raw: &str) -> Option<i64> {
    raw.parse().ok()
}
