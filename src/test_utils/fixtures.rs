use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::TempDir;

use crate::error::{Result, ScreenerError};
use crate::search::embeddings::{EmbeddingProvider, HashEmbedder};
use crate::search::vector_index::IndexPaths;

/// Small labelled corpus: (file name, resume text).
pub const SAMPLE_RESUMES: &[(&str, &str)] = &[
    (
        "alice.txt",
        "Alice Smith\nalice@example.com | +1 415 555 0100\nlinkedin.com/in/alicesmith\n\
         Skills: Python, Pandas, SQL, Machine Learning\n\
         Experience:\nData Scientist, Acme 2016-2022\nAnalyst since 2022\n\
         Education:\nMSc Statistics",
    ),
    (
        "bob.txt",
        "Bob Jones\nbob.jones@example.org\n\
         Technical Skills: React, JavaScript, HTML, CSS\n\
         Work Experience:\nFrontend Engineer 2019 - 2023\n\
         Education:\nBSc Computer Science",
    ),
    (
        "carol.txt",
        "Carol White\nDevOps engineer working with Docker, Kubernetes and AWS.\n\
         Employment History:\nPlatform team 2012 to 2020",
    ),
];

/// Temp workspace with a corpus folder and an index folder.
pub struct CorpusFixture {
    pub temp_dir: TempDir,
    pub corpus_dir: PathBuf,
    pub index_dir: PathBuf,
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let corpus_dir = temp_dir.path().join("resumes");
        let index_dir = temp_dir.path().join("index");
        std::fs::create_dir_all(&corpus_dir).expect("Failed to create corpus dir");

        println!("[FIXTURE] Created corpus at {corpus_dir:?}");

        Self {
            temp_dir,
            corpus_dir,
            index_dir,
        }
    }

    /// Fixture pre-populated with [`SAMPLE_RESUMES`].
    #[must_use]
    pub fn with_samples() -> Self {
        let fixture = Self::new();
        for (name, content) in SAMPLE_RESUMES {
            fixture.add_resume(name, content);
        }
        fixture
    }

    /// Write one document into the corpus folder.
    pub fn add_resume(&self, name: &str, content: &str) -> PathBuf {
        self.add_bytes(name, content.as_bytes())
    }

    pub fn add_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.corpus_dir.join(name);
        std::fs::write(&path, bytes).expect("Failed to write resume");
        println!("[FIXTURE] Wrote {path:?} ({} bytes)", bytes.len());
        path
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn index_paths(&self) -> IndexPaths {
        IndexPaths::in_dir(&self.index_dir)
    }
}

/// Hash embedder that counts how often it is called.
#[derive(Debug, Default)]
pub struct CountingEmbedder {
    inner: HashEmbedder,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl CountingEmbedder {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            inner: HashEmbedder::new(dim),
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total texts across all calls
    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl EmbeddingProvider for CountingEmbedder {
    fn name(&self) -> &str {
        "counting"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.embed(texts)
    }
}

/// Hash embedder that rejects any batch containing `poison`.
#[derive(Debug)]
pub struct FailingEmbedder {
    inner: HashEmbedder,
    poison: String,
}

impl FailingEmbedder {
    #[must_use]
    pub fn new(dim: usize, poison: impl Into<String>) -> Self {
        Self {
            inner: HashEmbedder::new(dim),
            poison: poison.into(),
        }
    }
}

impl EmbeddingProvider for FailingEmbedder {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.iter().any(|text| text.contains(&self.poison)) {
            return Err(ScreenerError::Embedding(format!(
                "rejected input containing {:?}",
                self.poison
            )));
        }
        self.inner.embed(texts)
    }
}
