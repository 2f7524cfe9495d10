//! Flat inner-product vector index with paired metadata persistence.
//!
//! Every stored vector is L2-normalized at build time, so the inner product
//! with a normalized query is the cosine similarity. Magnitude carries no
//! meaning for the embedding models in use.
//!
//! # On-disk layout
//!
//! Two co-located artifacts, both written through a temp file and rename:
//!
//! ```text
//! index_path     "SCRV" | version u32 | dimension u32 | count u64 | count*dimension f32 (LE)
//! metadata_path  { format_version, dimension, count, vectors_sha256, built_at, entries: [M] }
//! ```
//!
//! Position `i` in the vector file pairs with `entries[i]`. Missing either
//! artifact means "not built"; anything unreadable is [`ScreenerError::IndexCorrupt`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Result, ScreenerError};
use crate::utils::fs::write_atomic;

pub const FORMAT_VERSION: u32 = 1;
const MAGIC: &[u8; 4] = b"SCRV";
const HEADER_LEN: usize = 4 + 4 + 4 + 8;

/// Corpus size above which scoring fans out over rayon.
const PARALLEL_THRESHOLD: usize = 4096;

/// Locations of the two persisted artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexPaths {
    pub index_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl IndexPaths {
    pub fn new(index_path: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            metadata_path: metadata_path.into(),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("vectors.bin"), dir.join("metadata.json"))
    }

    /// Both artifacts are present.
    pub fn exists(&self) -> bool {
        self.index_path.is_file() && self.metadata_path.is_file()
    }

    /// Directory holding the vector file, used for the build lock.
    pub fn lock_dir(&self) -> PathBuf {
        self.index_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}

#[derive(Serialize)]
struct ManifestRef<'a, M> {
    format_version: u32,
    dimension: usize,
    count: usize,
    vectors_sha256: String,
    built_at: DateTime<Utc>,
    entries: &'a [M],
}

#[derive(Deserialize)]
struct Manifest<M> {
    format_version: u32,
    dimension: usize,
    count: usize,
    vectors_sha256: String,
    built_at: DateTime<Utc>,
    entries: Vec<M>,
}

/// Normalized vectors plus their opaque metadata payloads.
#[derive(Debug, Clone)]
pub struct VectorIndex<M> {
    paths: IndexPaths,
    dimension: usize,
    /// Row-major, `len() * dimension` values
    vectors: Vec<f32>,
    metadata: Vec<M>,
    built_at: DateTime<Utc>,
}

impl<M> VectorIndex<M> {
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    pub const fn paths(&self) -> &IndexPaths {
        &self.paths
    }

    pub const fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn metadata(&self) -> &[M] {
        &self.metadata
    }

    /// Stored (normalized) vector at `position`.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.vectors.get(start..start + self.dimension)
    }

    /// Up to `k` best matches by inner product, highest first. Equal scores
    /// keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, &M)>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(ScreenerError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut normalized = query.to_vec();
        l2_normalize(&mut normalized);

        let scores: Vec<f32> = if self.len() >= PARALLEL_THRESHOLD {
            self.vectors
                .par_chunks_exact(self.dimension)
                .map(|row| dot(row, &normalized))
                .collect()
        } else {
            self.vectors
                .chunks_exact(self.dimension)
                .map(|row| dot(row, &normalized))
                .collect()
        };

        let by_score = |a: &usize, b: &usize| {
            scores[*b]
                .total_cmp(&scores[*a])
                .then_with(|| a.cmp(b))
        };

        let k = k.min(scores.len());
        let mut order: Vec<usize> = (0..scores.len()).collect();
        if k < order.len() {
            order.select_nth_unstable_by(k - 1, by_score);
            order.truncate(k);
        }
        order.sort_unstable_by(by_score);

        Ok(order
            .into_iter()
            .map(|position| (scores[position], &self.metadata[position]))
            .collect())
    }
}

impl<M: Serialize> VectorIndex<M> {
    /// Normalize, validate and persist a new index, replacing any previous one.
    pub fn build(paths: IndexPaths, vectors: Vec<Vec<f32>>, metadata: Vec<M>) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(ScreenerError::EmptyInput(
                "cannot build an index from zero vectors".to_string(),
            ));
        };
        if vectors.len() != metadata.len() {
            return Err(ScreenerError::LengthMismatch {
                vectors: vectors.len(),
                metadata: metadata.len(),
            });
        }
        let dimension = first.len();
        if dimension == 0 {
            return Err(ScreenerError::EmptyInput(
                "vectors have zero dimensions".to_string(),
            ));
        }

        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for mut vector in vectors {
            if vector.len() != dimension {
                return Err(ScreenerError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            l2_normalize(&mut vector);
            flat.extend_from_slice(&vector);
        }

        let index = Self {
            paths,
            dimension,
            vectors: flat,
            metadata,
            built_at: Utc::now(),
        };
        index.persist()?;
        Ok(index)
    }

    fn persist(&self) -> Result<()> {
        let bytes = encode_vectors(self.dimension, self.len(), &self.vectors)?;
        let manifest = ManifestRef {
            format_version: FORMAT_VERSION,
            dimension: self.dimension,
            count: self.len(),
            vectors_sha256: sha256_hex(&bytes),
            built_at: self.built_at,
            entries: &self.metadata,
        };
        let manifest_json = serde_json::to_vec(&manifest)?;

        write_atomic(&self.paths.index_path, &bytes)?;
        write_atomic(&self.paths.metadata_path, &manifest_json)?;

        info!(
            count = self.len(),
            dimension = self.dimension,
            index = %self.paths.index_path.display(),
            "persisted vector index"
        );
        Ok(())
    }
}

impl<M: DeserializeOwned> VectorIndex<M> {
    /// `Ok(None)` when the index has not been built yet.
    pub fn load(paths: &IndexPaths) -> Result<Option<Self>> {
        if !paths.exists() {
            debug!(
                index = %paths.index_path.display(),
                metadata = %paths.metadata_path.display(),
                "no persisted index"
            );
            return Ok(None);
        }

        let bytes = std::fs::read(&paths.index_path)?;
        let manifest_bytes = std::fs::read(&paths.metadata_path)?;
        let manifest: Manifest<M> = serde_json::from_slice(&manifest_bytes)
            .map_err(|err| corrupt(&paths.metadata_path, &err.to_string()))?;

        if manifest.format_version != FORMAT_VERSION {
            return Err(corrupt(
                &paths.metadata_path,
                &format!("unsupported format version {}", manifest.format_version),
            ));
        }
        if manifest.vectors_sha256 != sha256_hex(&bytes) {
            return Err(corrupt(&paths.index_path, "checksum mismatch"));
        }

        let (dimension, count, vectors) = decode_vectors(&bytes)
            .map_err(|reason| corrupt(&paths.index_path, &reason))?;
        if dimension != manifest.dimension
            || count != manifest.count
            || count != manifest.entries.len()
        {
            return Err(corrupt(
                &paths.metadata_path,
                &format!(
                    "manifest describes {} x {} with {} entries, vectors are {count} x {dimension}",
                    manifest.count,
                    manifest.dimension,
                    manifest.entries.len()
                ),
            ));
        }

        info!(count, dimension, "loaded vector index");
        Ok(Some(Self {
            paths: paths.clone(),
            dimension,
            vectors,
            metadata: manifest.entries,
            built_at: manifest.built_at,
        }))
    }
}

/// Scale `vector` to unit length; zero vectors are left unchanged.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn corrupt(path: &Path, reason: &str) -> ScreenerError {
    ScreenerError::IndexCorrupt(format!("{}: {reason}", path.display()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn encode_vectors(dimension: usize, count: usize, vectors: &[f32]) -> Result<Vec<u8>> {
    let dimension_u32 = u32::try_from(dimension).map_err(|_| {
        ScreenerError::IndexCorrupt(format!("dimension {dimension} does not fit the format"))
    })?;
    let mut bytes = Vec::with_capacity(HEADER_LEN + vectors.len() * 4);
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&dimension_u32.to_le_bytes());
    bytes.extend_from_slice(&(count as u64).to_le_bytes());
    for value in vectors {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    Ok(bytes)
}

fn decode_vectors(bytes: &[u8]) -> std::result::Result<(usize, usize, Vec<f32>), String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("truncated header ({} bytes)", bytes.len()));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if &header[0..4] != MAGIC {
        return Err("bad magic".to_string());
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != FORMAT_VERSION {
        return Err(format!("unsupported vector format version {version}"));
    }
    let dimension = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let mut count_bytes = [0u8; 8];
    count_bytes.copy_from_slice(&header[12..20]);
    let count = usize::try_from(u64::from_le_bytes(count_bytes))
        .map_err(|_| "vector count overflows usize".to_string())?;

    let expected = count
        .checked_mul(dimension)
        .and_then(|values| values.checked_mul(4))
        .ok_or_else(|| "vector payload size overflows".to_string())?;
    if body.len() != expected {
        return Err(format!(
            "payload is {} bytes, expected {expected} for {count} x {dimension}",
            body.len()
        ));
    }

    let vectors = body
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok((dimension, count, vectors))
}
