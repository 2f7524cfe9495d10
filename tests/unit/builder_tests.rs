use std::sync::Arc;
use std::time::Duration;

use screener::extract::RecordExtractor;
use screener::indexer::IndexBuilder;
use screener::loader::FsTextLoader;
use screener::search::{EmbeddingProvider, VectorIndex};
use screener::storage::BuildLock;
use screener::test_utils::{CorpusFixture, CountingEmbedder, FailingEmbedder};

fn builder(fixture: &CorpusFixture, embedder: Arc<dyn EmbeddingProvider>) -> IndexBuilder {
    IndexBuilder::new(Arc::new(FsTextLoader), embedder, fixture.index_paths())
        .with_extractor(RecordExtractor::with_current_year(2024))
        .with_lock_timeout(Duration::from_millis(100))
}

#[test]
fn empty_folder_makes_no_provider_or_index_calls() {
    let fixture = CorpusFixture::new();
    let embedder = Arc::new(CountingEmbedder::new(16));

    let built = builder(&fixture, embedder.clone())
        .build_from_folder(&fixture.corpus_dir)
        .unwrap();

    assert_eq!(built.report.indexed, 0);
    assert!(built.index.is_none());
    assert_eq!(embedder.calls(), 0);
    assert!(!fixture.index_paths().exists());
}

#[test]
fn all_documents_embedded_in_one_call() {
    let fixture = CorpusFixture::with_samples();
    let embedder = Arc::new(CountingEmbedder::new(32));

    let built = builder(&fixture, embedder.clone())
        .build_from_folder(&fixture.corpus_dir)
        .unwrap();

    assert_eq!(built.report.indexed, 3);
    assert_eq!(embedder.calls(), 1);
    assert_eq!(embedder.texts(), 3);

    let ids: Vec<&str> = built
        .index
        .as_ref()
        .unwrap()
        .metadata()
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(ids, vec!["alice.txt", "bob.txt", "carol.txt"]);
}

#[test]
fn unreadable_document_is_reported_and_skipped() {
    let fixture = CorpusFixture::with_samples();
    fixture.add_bytes("broken.docx", b"not a zip archive");

    let built = builder(&fixture, Arc::new(CountingEmbedder::new(16)))
        .build_from_folder(&fixture.corpus_dir)
        .unwrap();

    assert_eq!(built.report.indexed, 3);
    assert_eq!(built.report.failures.len(), 1);
    assert!(built.report.failures[0].path.ends_with("broken.docx"));
}

#[test]
fn failed_batch_falls_back_to_single_documents() {
    let fixture = CorpusFixture::with_samples();
    fixture.add_resume("poison.txt", "Skills: poisonpill");

    let built = builder(&fixture, Arc::new(FailingEmbedder::new(16, "poisonpill")))
        .build_from_folder(&fixture.corpus_dir)
        .unwrap();

    assert_eq!(built.report.indexed, 3);
    assert_eq!(built.report.failures.len(), 1);
    assert!(built.report.failures[0].path.ends_with("poison.txt"));
    assert!(built.report.failures[0].reason.contains("poisonpill"));
}

#[test]
fn rebuild_replaces_previous_index() {
    let fixture = CorpusFixture::with_samples();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(CountingEmbedder::new(16));
    let builder = builder(&fixture, embedder);
    builder.build_from_folder(&fixture.corpus_dir).unwrap();

    std::fs::remove_file(fixture.corpus_dir.join("bob.txt")).unwrap();
    builder.build_from_folder(&fixture.corpus_dir).unwrap();

    let loaded: VectorIndex<screener::core::CandidateRecord> =
        VectorIndex::load(&fixture.index_paths()).unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.metadata().iter().all(|r| r.id != "bob.txt"));
}

#[test]
fn concurrent_build_waits_for_lock() {
    let fixture = CorpusFixture::with_samples();
    let _held = BuildLock::try_acquire(&fixture.index_paths().lock_dir())
        .unwrap()
        .unwrap();

    let err = builder(&fixture, Arc::new(CountingEmbedder::new(16)))
        .build_from_folder(&fixture.corpus_dir)
        .unwrap_err();
    assert_eq!(err.code(), "lock_busy");
    let message = err.to_string();
    assert!(
        message.contains(&format!("pid {}", std::process::id())),
        "holder missing from: {message}"
    );
}
