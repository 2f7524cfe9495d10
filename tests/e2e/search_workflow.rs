//! E2E Scenario: ranked search over the sample corpus.

use std::sync::Arc;

use screener::core::Query;
use screener::indexer::IndexBuilder;
use screener::loader::FsTextLoader;
use screener::search::{EmbeddingProvider, HashEmbedder, RankingWeights, SearchEngine};
use screener::test_utils::CorpusFixture;

fn built_engine(fixture: &CorpusFixture) -> SearchEngine {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashEmbedder::new(128));
    let builder = IndexBuilder::new(Arc::new(FsTextLoader), Arc::clone(&embedder), fixture.index_paths());
    let engine = SearchEngine::new(fixture.index_paths(), embedder);
    engine.rebuild(&builder, &fixture.corpus_dir).unwrap();
    engine
}

#[test]
fn skills_and_experience_shape_the_ranking() {
    let fixture = CorpusFixture::with_samples();
    let engine = built_engine(&fixture);

    let query = Query::new("data scientist with python and machine learning")
        .with_skills(["python", "sql"])
        .with_desired_years(5)
        .with_k(3);
    let results = engine.search(&query).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].record.id, "alice.txt");
    assert_eq!(results[0].skill_score, 1.0);
    assert_eq!(results[0].exp_score, 1.0);
    assert!(results.windows(2).all(|w| w[0].composite_score >= w[1].composite_score));
}

#[test]
fn k_limits_result_count() {
    let fixture = CorpusFixture::with_samples();
    let engine = built_engine(&fixture);
    let results = engine.search(&Query::new("engineer").with_k(1)).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn composite_uses_configured_weights() {
    let fixture = CorpusFixture::with_samples();
    let engine = built_engine(&fixture).with_weights(RankingWeights {
        embed: 1.0,
        skill: 0.0,
        experience: 0.0,
        richness: 0.0,
        richness_scale: 20.0,
    });

    let results = engine.search(&Query::new("frontend react").with_k(3)).unwrap();
    for r in &results {
        assert!((r.composite_score - r.embed_score).abs() < 1e-6);
    }
}
