use proptest::prelude::*;

use screener::search::{EmbeddingProvider, HashEmbedder};

proptest! {
    #[test]
    fn test_hash_embedding_deterministic(text in ".*") {
        let embedder = HashEmbedder::new(64);
        let first = embedder.embed_text(&text);
        let second = embedder.embed_text(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_hash_embedding_length(text in ".*", dim in 1usize..256usize) {
        let embedder = HashEmbedder::new(dim);
        let embedding = embedder.embed_text(&text);
        prop_assert_eq!(embedding.len(), dim);
    }

    #[test]
    fn test_hash_embedding_unit_or_zero(text in "[a-z ]{0,80}") {
        let embedding = HashEmbedder::new(32).embed_text(&text);
        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        prop_assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_batch_matches_single(texts in prop::collection::vec("[a-z ]{0,40}", 0..8)) {
        let embedder = HashEmbedder::new(48);
        let batch = embedder.embed(&texts).unwrap();
        prop_assert_eq!(batch.len(), texts.len());
        for (vector, text) in batch.iter().zip(&texts) {
            prop_assert_eq!(vector, &embedder.embed_text(text));
        }
    }
}
