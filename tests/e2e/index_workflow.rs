//! E2E Scenario: index a resume folder, reopen the engine, rebuild.

use std::sync::Arc;

use screener::indexer::IndexBuilder;
use screener::loader::FsTextLoader;
use screener::search::{EmbeddingProvider, HashEmbedder, SearchEngine};
use screener::test_utils::CorpusFixture;

fn setup() -> (CorpusFixture, SearchEngine, IndexBuilder) {
    let fixture = CorpusFixture::with_samples();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(128));
    let engine = SearchEngine::open(fixture.index_paths(), Arc::clone(&embedder)).unwrap();
    let builder = IndexBuilder::new(Arc::new(FsTextLoader), embedder, fixture.index_paths());
    (fixture, engine, builder)
}

#[test]
fn index_then_reopen() {
    let (fixture, engine, builder) = setup();
    assert!(!engine.is_built());

    let report = engine.rebuild(&builder, &fixture.corpus_dir).unwrap();
    assert_eq!(report.indexed, 3);
    assert!(report.failures.is_empty());
    assert!(fixture.index_paths().exists());

    let reopened =
        SearchEngine::open(fixture.index_paths(), Arc::new(HashEmbedder::new(128))).unwrap();
    let index = reopened.snapshot().unwrap();
    assert_eq!(index.len(), 3);
    assert_eq!(index.dimension(), 128);

    let alice = &index.metadata()[0];
    assert_eq!(alice.email.as_deref(), Some("alice@example.com"));
    assert!(alice.skills.contains("machine learning"));
}

#[test]
fn rebuild_swaps_without_disturbing_existing_snapshot() {
    let (fixture, engine, builder) = setup();
    engine.rebuild(&builder, &fixture.corpus_dir).unwrap();
    let before = engine.snapshot().unwrap();

    fixture.add_resume("dave.txt", "Dave Brown\nSkills: Java, SQL\nExperience:\nBank 2010-2020");
    let report = engine.rebuild(&builder, &fixture.corpus_dir).unwrap();
    assert_eq!(report.indexed, 4);

    // A snapshot taken before the rebuild still sees the old corpus
    assert_eq!(before.len(), 3);
    assert_eq!(engine.snapshot().unwrap().len(), 4);
}

#[test]
fn concurrent_searches_during_rebuild() {
    let (fixture, engine, builder) = setup();
    engine.rebuild(&builder, &fixture.corpus_dir).unwrap();
    let engine = Arc::new(engine);

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                for _ in 0..20 {
                    let results = engine
                        .search(&screener::core::Query::new("python sql"))
                        .unwrap();
                    assert!(results.len() == 3 || results.len() == 4);
                }
            })
        })
        .collect();

    fixture.add_resume("erin.txt", "Erin Black\nSkills: Excel");
    engine.rebuild(&builder, &fixture.corpus_dir).unwrap();

    for reader in readers {
        reader.join().unwrap();
    }
}
