use screener::search::{EmbeddingProvider, HashEmbedder, IndexPaths, VectorIndex};
use tempfile::tempdir;

fn texts() -> Vec<String> {
    [
        "python pandas sql data analysis",
        "react javascript css frontend",
        "docker kubernetes aws platform",
        "java spring backend services",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[test]
fn every_document_is_its_own_nearest_neighbour() {
    let dir = tempdir().unwrap();
    let embedder = HashEmbedder::new(128);
    let texts = texts();
    let vectors = embedder.embed(&texts).unwrap();
    let index = VectorIndex::build(IndexPaths::in_dir(dir.path()), vectors.clone(), texts.clone())
        .unwrap();

    for (vector, text) in vectors.iter().zip(&texts) {
        let hits = index.search(vector, 1).unwrap();
        assert_eq!(hits[0].1, text);
        assert!((hits[0].0 - 1.0).abs() < 1e-4);
    }
}

#[test]
fn persisted_index_matches_in_memory_results() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::in_dir(dir.path());
    let embedder = HashEmbedder::new(64);
    let texts = texts();
    let built = VectorIndex::build(paths.clone(), embedder.embed(&texts).unwrap(), texts).unwrap();

    let loaded: VectorIndex<String> = VectorIndex::load(&paths).unwrap().unwrap();
    assert_eq!(loaded.len(), built.len());
    assert_eq!(loaded.dimension(), 64);

    let query = embedder.embed_text("kubernetes platform engineer");
    let a: Vec<(f32, String)> = built
        .search(&query, 3)
        .unwrap()
        .into_iter()
        .map(|(s, m)| (s, m.clone()))
        .collect();
    let b: Vec<(f32, String)> = loaded
        .search(&query, 3)
        .unwrap()
        .into_iter()
        .map(|(s, m)| (s, m.clone()))
        .collect();
    assert_eq!(a, b);
    assert_eq!(a[0].1, "docker kubernetes aws platform");
}

#[test]
fn k_larger_than_corpus_returns_everything_sorted() {
    let dir = tempdir().unwrap();
    let index = VectorIndex::build(
        IndexPaths::in_dir(dir.path()),
        vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]],
        vec!["x", "diag", "y"],
    )
    .unwrap();

    let hits = index.search(&[1.0, 0.0], 10).unwrap();
    let labels: Vec<&str> = hits.iter().map(|(_, m)| **m).collect();
    assert_eq!(labels, vec!["x", "diag", "y"]);
    assert!(hits.windows(2).all(|w| w[0].0 >= w[1].0));
}

#[test]
fn missing_metadata_means_not_built() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::in_dir(dir.path());
    VectorIndex::build(paths.clone(), vec![vec![1.0, 2.0]], vec![1u32]).unwrap();
    std::fs::remove_file(&paths.metadata_path).unwrap();

    let loaded: Option<VectorIndex<u32>> = VectorIndex::load(&paths).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn truncated_vectors_are_corrupt() {
    let dir = tempdir().unwrap();
    let paths = IndexPaths::in_dir(dir.path());
    VectorIndex::build(paths.clone(), vec![vec![1.0, 2.0], vec![3.0, 4.0]], vec![1u32, 2]).unwrap();

    let bytes = std::fs::read(&paths.index_path).unwrap();
    std::fs::write(&paths.index_path, &bytes[..bytes.len() - 4]).unwrap();

    let err = VectorIndex::<u32>::load(&paths).unwrap_err();
    assert_eq!(err.code(), "index_corrupt");
}
