use std::path::Path;
use std::time::Duration;

use screener::config::Config;
use screener::test_utils::{TestCase, run_table_tests};
use tempfile::tempdir;

const CUSTOM: &str = r#"
[index]
index_path = "/var/lib/screener/vectors.bin"
corpus_dir = "cvs"
lock_timeout = "2m"

[embedding]
backend = "hash"
dims = 128
deadline = "10s"

[ranking]
embed_weight = 0.7
default_k = 10

[cache]
enabled = false
"#;

#[test]
fn explicit_file_is_merged_over_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, CUSTOM).unwrap();

    let config = Config::load(Some(&path), dir.path()).unwrap();

    assert_eq!(config.index.lock_timeout, Duration::from_secs(120));
    assert_eq!(config.embedding.dims, 128);
    assert_eq!(config.embedding.deadline, Some(Duration::from_secs(10)));
    assert_eq!(config.ranking.default_k, 10);
    assert!(!config.cache.enabled);
    // untouched fields keep their defaults
    assert_eq!(config.index.metadata_path, "index/metadata.json");
    assert!((config.ranking.skill_weight - 0.25).abs() < f32::EPSILON);
}

#[test]
fn paths_resolve_against_root() -> Result<(), String> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, CUSTOM).unwrap();
    let config = Config::load(Some(&path), dir.path()).unwrap();

    let cases = vec![
        TestCase {
            name: "absolute_index_path",
            input: "index",
            expected: Path::new("/var/lib/screener/vectors.bin").to_path_buf(),
            should_panic: false,
        },
        TestCase {
            name: "relative_metadata_path",
            input: "metadata",
            expected: Path::new("/root/x/index/metadata.json").to_path_buf(),
            should_panic: false,
        },
        TestCase {
            name: "relative_corpus_dir",
            input: "corpus",
            expected: Path::new("/root/x/cvs").to_path_buf(),
            should_panic: false,
        },
    ];

    run_table_tests(cases, |which| {
        let root = Path::new("/root/x");
        let paths = config.index_paths(root);
        match which {
            "index" => paths.index_path,
            "metadata" => paths.metadata_path,
            _ => config.corpus_dir(root),
        }
    })
}

#[test]
fn malformed_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[ranking]\nembed_weight = \"high\"\n").unwrap();

    let err = Config::load(Some(&path), dir.path()).unwrap_err();
    assert_eq!(err.code(), "config");
}

#[test]
fn missing_explicit_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load(Some(&dir.path().join("absent.toml")), dir.path()).unwrap();
    assert_eq!(config.embedding.backend, "hash");
    assert_eq!(config.cache.query_embeddings, 128);
}
