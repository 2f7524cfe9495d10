//! Folder → index build orchestration.
//!
//! Loads every regular file directly inside a folder, extracts a record per
//! document, embeds the derived search texts in one batch, and persists a
//! fresh [`VectorIndex`]. Files that cannot be loaded are reported and
//! skipped; an empty corpus builds nothing.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::CandidateRecord;
use crate::error::{Result, ScreenerError};
use crate::extract::RecordExtractor;
use crate::loader::TextLoader;
use crate::search::embeddings::EmbeddingProvider;
use crate::search::vector_index::{IndexPaths, VectorIndex};
use crate::storage::BuildLock;
use crate::utils::format::take_chars;

/// Characters of full text used when a record has no structured signal.
pub const FALLBACK_TEXT_CHARS: usize = 2000;

/// Default wait for another process's build to finish.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// A document that was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Documents persisted into the index
    pub indexed: usize,
    pub failures: Vec<FileFailure>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

/// Build result; `index` is `None` when nothing was indexed.
#[derive(Debug)]
pub struct BuiltCorpus {
    pub report: BuildReport,
    pub index: Option<VectorIndex<CandidateRecord>>,
}

/// Progress notifications emitted while building.
#[derive(Debug, Clone, Copy)]
pub enum BuildProgress<'a> {
    /// Number of candidate files found in the folder
    Discovered(usize),
    Loaded(&'a Path),
    Failed(&'a Path, &'a str),
    /// Search texts about to be embedded
    Embedding(usize),
}

/// Builds a persisted index from a folder of documents.
pub struct IndexBuilder {
    extractor: RecordExtractor,
    loader: Arc<dyn TextLoader>,
    embedder: Arc<dyn EmbeddingProvider>,
    paths: IndexPaths,
    lock_timeout: Duration,
}

impl IndexBuilder {
    pub fn new(
        loader: Arc<dyn TextLoader>,
        embedder: Arc<dyn EmbeddingProvider>,
        paths: IndexPaths,
    ) -> Self {
        Self {
            extractor: RecordExtractor::new(),
            loader,
            embedder,
            paths,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_extractor(mut self, extractor: RecordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub const fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub fn build_from_folder(&self, folder: &Path) -> Result<BuiltCorpus> {
        self.build_from_folder_with(folder, |_| {})
    }

    /// Same as [`Self::build_from_folder`], reporting progress to `on_progress`.
    pub fn build_from_folder_with<F>(&self, folder: &Path, mut on_progress: F) -> Result<BuiltCorpus>
    where
        F: FnMut(BuildProgress<'_>),
    {
        let start = Instant::now();
        let files = discover_documents(folder)?;
        info!(folder = %folder.display(), files = files.len(), "building index");
        on_progress(BuildProgress::Discovered(files.len()));

        let mut failures = Vec::new();
        let mut records = Vec::with_capacity(files.len());
        for path in &files {
            match self.loader.load_text(path) {
                Ok(text) => {
                    let id = file_id(path);
                    records.push((path.clone(), self.extractor.extract(id, &text)));
                    on_progress(BuildProgress::Loaded(path));
                }
                Err(err) => {
                    let reason = err.to_string();
                    warn!(path = %path.display(), error = %reason, "skipping document");
                    on_progress(BuildProgress::Failed(path, &reason));
                    failures.push(FileFailure {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        if records.is_empty() {
            info!(failures = failures.len(), "no documents to index");
            return Ok(BuiltCorpus {
                report: BuildReport {
                    indexed: 0,
                    failures,
                    elapsed: start.elapsed(),
                },
                index: None,
            });
        }

        let lock_dir = self.paths.lock_dir();
        let _lock = BuildLock::acquire_timeout(&lock_dir, self.lock_timeout)?
            .ok_or_else(|| {
                let holder = BuildLock::read_lock_info(&lock_dir)
                    .ok()
                    .flatten()
                    .map_or_else(|| "another build".to_string(), |info| info.to_string());
                ScreenerError::LockBusy(format!(
                    "{} holds {} (waited {:?})",
                    holder,
                    lock_dir.display(),
                    self.lock_timeout
                ))
            })?;

        let texts: Vec<String> = records.iter().map(|(_, record)| search_text(record)).collect();
        on_progress(BuildProgress::Embedding(texts.len()));
        let (vectors, records) = self.embed_records(texts, records, &mut failures, &mut on_progress)?;

        if records.is_empty() {
            return Ok(BuiltCorpus {
                report: BuildReport {
                    indexed: 0,
                    failures,
                    elapsed: start.elapsed(),
                },
                index: None,
            });
        }

        let index = VectorIndex::build(self.paths.clone(), vectors, records)?;
        let report = BuildReport {
            indexed: index.len(),
            failures,
            elapsed: start.elapsed(),
        };
        info!(
            indexed = report.indexed,
            failed = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "index built"
        );
        Ok(BuiltCorpus {
            report,
            index: Some(index),
        })
    }

    /// Embed all texts in one call; if that fails for a non-fatal reason,
    /// embed one document at a time and drop the ones that still fail.
    fn embed_records<F>(
        &self,
        texts: Vec<String>,
        records: Vec<(PathBuf, CandidateRecord)>,
        failures: &mut Vec<FileFailure>,
        on_progress: &mut F,
    ) -> Result<(Vec<Vec<f32>>, Vec<CandidateRecord>)>
    where
        F: FnMut(BuildProgress<'_>),
    {
        let batch_err = match self.embed_checked(&texts) {
            Ok(vectors) => {
                let records = records.into_iter().map(|(_, record)| record).collect();
                return Ok((vectors, records));
            }
            Err(err) if err.is_fatal_to_build() => return Err(err),
            Err(err) => err,
        };
        warn!(error = %batch_err, "batch embedding failed, retrying per document");

        let mut vectors = Vec::with_capacity(texts.len());
        let mut kept = Vec::with_capacity(records.len());
        for (text, (path, record)) in texts.into_iter().zip(records) {
            match self.embed_checked(std::slice::from_ref(&text)) {
                Ok(mut single) => {
                    if let Some(vector) = single.pop() {
                        vectors.push(vector);
                        kept.push(record);
                    }
                }
                Err(err) if err.is_fatal_to_build() => return Err(err),
                Err(err) => {
                    let reason = err.to_string();
                    warn!(path = %path.display(), error = %reason, "embedding failed");
                    on_progress(BuildProgress::Failed(&path, &reason));
                    failures.push(FileFailure { path, reason });
                }
            }
        }
        Ok((vectors, kept))
    }

    fn embed_checked(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(provider = self.embedder.name(), texts = texts.len(), "embedding");
        let vectors = self.embedder.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(ScreenerError::Embedding(format!(
                "provider returned {} vectors for {} texts",
                vectors.len(),
                texts.len()
            )));
        }
        Ok(vectors)
    }
}

/// Text embedded for a record: skills, experience and education, or a
/// prefix of the full text when those are all empty.
pub fn search_text(record: &CandidateRecord) -> String {
    let skills = record
        .skills
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let structured = format!(
        "{} {} {}",
        skills, record.experience_section, record.education_section
    );
    let structured = structured.trim();
    if !structured.is_empty() {
        return structured.to_string();
    }

    let prefix = take_chars(&record.full_text, FALLBACK_TEXT_CHARS).trim();
    if prefix.is_empty() {
        record.id.clone()
    } else {
        prefix.to_string()
    }
}

/// Regular files directly inside `folder`, sorted by file name.
pub fn discover_documents(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ScreenerError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("corpus folder not found: {}", folder.display()),
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ScreenerError::Io(io::Error::other(err.to_string())))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
