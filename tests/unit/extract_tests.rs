use screener::extract::{
    RecordExtractor, education_section, estimate_years_experience, extract_phone, section_skills,
};
use screener::test_utils::{TestCase, run_table_tests};

#[test]
fn years_experience_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "closed_range",
            input: "Worked 2018-2022",
            expected: 4,
            should_panic: false,
        },
        TestCase {
            name: "since",
            input: "Since 2010",
            expected: 14,
            should_panic: false,
        },
        TestCase {
            name: "present",
            input: "Acme 2020 - present",
            expected: 4,
            should_panic: false,
        },
        TestCase {
            name: "to_separator",
            input: "Globex 2001 to 2005",
            expected: 4,
            should_panic: false,
        },
        TestCase {
            name: "reversed_range_is_zero",
            input: "2022-2018",
            expected: 0,
            should_panic: false,
        },
        TestCase {
            name: "future_since_is_clamped",
            input: "since 2030",
            expected: 0,
            should_panic: false,
        },
        TestCase {
            name: "double_counted",
            input: "from 2015 to 2020",
            expected: 14,
            should_panic: false,
        },
        TestCase {
            name: "no_dates",
            input: "Seasoned engineer",
            expected: 0,
            should_panic: false,
        },
    ];

    run_table_tests(cases, |text| estimate_years_experience(text, 2024))
}

#[test]
fn phone_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "international",
            input: "Call +1 415 555 0100 today",
            expected: Some("+1 415 555 0100".to_string()),
            should_panic: false,
        },
        TestCase {
            name: "dashes",
            input: "Phone: 555-123-4567",
            expected: Some("555-123-4567".to_string()),
            should_panic: false,
        },
        TestCase {
            name: "too_short",
            input: "Room 12345",
            expected: None,
            should_panic: false,
        },
    ];

    run_table_tests(cases, extract_phone)
}

#[test]
fn skills_section_end_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "title_case_header",
            input: "Skills:\nRust, Go\nExperience:\nAcme",
            expected: vec!["rust".to_string(), "go".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "upper_case_header",
            input: "SKILLS:\nRust, Go\nEXPERIENCE:\nAcme 2018-2022\nEDUCATION:\nBSc",
            expected: vec!["rust".to_string(), "go".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "lower_case_header",
            input: "skills: Rust\nprojects:\nRay tracer",
            expected: vec!["rust".to_string()],
            should_panic: false,
        },
        TestCase {
            name: "no_following_header",
            input: "SKILLS:\nRust\nGo",
            expected: vec!["rust".to_string(), "go".to_string()],
            should_panic: false,
        },
    ];

    run_table_tests(cases, section_skills)
}

#[test]
fn education_section_end_table() -> Result<(), String> {
    let cases = vec![
        TestCase {
            name: "title_case_header",
            input: "Education:\nBSc Physics\nCertifications:\nAWS SA",
            expected: "BSc Physics".to_string(),
            should_panic: false,
        },
        TestCase {
            name: "upper_case_header",
            input: "EDUCATION:\nBSc Physics\nCERTIFICATIONS:\nAWS SA",
            expected: "BSc Physics".to_string(),
            should_panic: false,
        },
        TestCase {
            name: "lower_case_header",
            input: "education:\nMSc Maths\nawards:\nDean's list",
            expected: "MSc Maths".to_string(),
            should_panic: false,
        },
    ];

    run_table_tests(cases, education_section)
}

#[test]
fn upper_case_resume_keeps_skills_clean() {
    let text = "Jane Doe\nSKILLS:\nRust, Go\nEXPERIENCE:\nAcme - Senior Engineer 2018-2022\nEDUCATION:\nBSc";
    let record = RecordExtractor::with_current_year(2024).extract("jane.txt", text);
    let skills: Vec<&str> = record.skills.iter().map(String::as_str).collect();
    assert_eq!(skills, vec!["go", "rust"]);
    assert_eq!(record.education_section, "BSc");
}

#[test]
fn full_record_from_resume() {
    let text = "\
        Maria Garcia\n\
        maria.garcia@example.com\n\
        +44 20 7946 0958\n\
        www.linkedin.com/in/mariagarcia\n\
        \n\
        Technical Skills: Python; TensorFlow / NLP, Excel\n\
        Work Experience:\n\
        ML Engineer, Initech 2017 - 2021\n\
        Research since 2021\n\
        Education:\n\
        PhD Computer Vision\n";

    let record = RecordExtractor::with_current_year(2024).extract("maria.txt", text);

    assert_eq!(record.id, "maria.txt");
    assert_eq!(record.name, "Maria Garcia");
    assert_eq!(record.email.as_deref(), Some("maria.garcia@example.com"));
    assert_eq!(record.phone.as_deref(), Some("+44 20 7946 0958"));
    assert_eq!(
        record.linkedin_url.as_deref(),
        Some("www.linkedin.com/in/mariagarcia")
    );
    for skill in ["python", "tensorflow", "nlp", "excel", "computer vision"] {
        assert!(record.skills.contains(skill), "missing {skill}");
    }
    assert_eq!(record.years_experience, 7);
    assert!(record.experience_section.starts_with("ML Engineer"));
    assert_eq!(record.education_section, "PhD Computer Vision");
}

#[test]
fn empty_text_yields_defaults() {
    let record = RecordExtractor::with_current_year(2024).extract("empty.txt", "   \n\n");
    assert_eq!(record.name, screener::core::UNKNOWN_NAME);
    assert!(record.email.is_none());
    assert!(record.skills.is_empty());
    assert_eq!(record.years_experience, 0);
    assert!(record.full_text.is_empty());
}
