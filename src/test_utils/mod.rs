//! Shared test utilities for screener.

pub mod fixtures;

pub use fixtures::{CorpusFixture, CountingEmbedder, FailingEmbedder, SAMPLE_RESUMES};

/// Table-driven test case structure.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
    pub should_panic: bool,
}

/// Run table-driven tests, stopping at the first failing case.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: std::fmt::Debug + Clone + std::panic::RefUnwindSafe,
    E: std::fmt::Debug + PartialEq,
    F: Fn(I) -> E + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    for case in cases {
        let start = std::time::Instant::now();
        println!("[TEST] {} <- {:?}", case.name, case.input);

        let result = std::panic::catch_unwind(|| test_fn(case.input.clone()));
        let elapsed = start.elapsed();

        match (result, case.should_panic) {
            (Err(_), true) => {
                println!("[TEST] PASSED (panicked as expected): {} ({elapsed:?})", case.name);
            }
            (Ok(_), true) => return Err(format!("Test '{}' expected panic", case.name)),
            (Err(_), false) => return Err(format!("Test '{}' panicked unexpectedly", case.name)),
            (Ok(actual), false) => {
                if actual != case.expected {
                    return Err(format!(
                        "Test '{}' failed: expected {:?}, got {:?}",
                        case.name, case.expected, actual
                    ));
                }
                println!("[TEST] PASSED: {} ({elapsed:?})", case.name);
            }
        }
    }
    Ok(())
}
