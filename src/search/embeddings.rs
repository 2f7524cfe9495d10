//! Embedding providers.
//!
//! The engine depends on [`EmbeddingProvider`] only. [`HashEmbedder`] is the
//! offline default: FNV-1a feature hashing over tokens and token bigrams, no
//! model files, fully deterministic. [`DeadlineEmbedder`] bounds any provider
//! with a timeout and a [`CancelToken`].

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, ScreenerError};
use crate::search::vector_index::l2_normalize;

/// Text → fixed-dimension vector strategy.
pub trait EmbeddingProvider: Send + Sync {
    /// Short backend name for logs and stats
    fn name(&self) -> &str;

    /// Dimension of every vector this provider returns
    fn dimension(&self) -> usize;

    /// Embed a batch; output has the same length and order as `texts`.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| ScreenerError::Embedding("provider returned no vector".to_string()))
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const BIGRAM_WEIGHT: f32 = 0.5;

/// Hash embedder using FNV-1a
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    /// Embedding dimension (default: 384)
    dim: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dim: 384 }
    }
}

impl HashEmbedder {
    /// Create embedder with specified dimension
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// Embed text into an L2-normalized vector; empty text gives the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        let tokens = tokenize(text);

        for token in &tokens {
            self.accumulate(&mut vector, token.as_bytes(), 1.0);
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut vector, bigram.as_bytes(), BIGRAM_WEIGHT);
        }

        l2_normalize(&mut vector);
        vector
    }

    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let bucket = (hash % self.dim as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }

    /// Compute cosine similarity between two embeddings
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Lower-cased tokens; `+` and `#` stay attached so "c++" and "c#" survive.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cooperative cancellation shared between a caller and in-flight embed calls.
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<Mutex<Option<Sender<()>>>>,
    receiver: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    /// Cancel; waiters wake because the channel disconnects.
    pub fn cancel(&self) {
        self.sender.lock().take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.sender.lock().is_none()
    }
}

/// Runs the wrapped provider on a worker thread and gives up on timeout or
/// cancellation. The worker is detached, its late result is discarded.
pub struct DeadlineEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl DeadlineEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            timeout: None,
            cancel: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl EmbeddingProvider for DeadlineEmbedder {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.timeout.is_none() && self.cancel.is_none() {
            return self.inner.embed(texts);
        }
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ScreenerError::Cancelled);
        }

        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        let batch = texts.to_vec();
        std::thread::Builder::new()
            .name("screener-embed".to_string())
            .spawn(move || {
                // The receiver may already be gone after a timeout.
                let _ = result_tx.send(inner.embed(&batch));
            })?;

        let cancel_rx = self
            .cancel
            .as_ref()
            .map_or_else(crossbeam_channel::never, |token| token.receiver.clone());
        let deadline = self
            .timeout
            .map_or_else(crossbeam_channel::never, crossbeam_channel::after);

        debug!(
            provider = self.inner.name(),
            texts = texts.len(),
            timeout = ?self.timeout,
            "embedding with deadline"
        );

        crossbeam_channel::select! {
            recv(result_rx) -> message => message.unwrap_or_else(|_| {
                Err(ScreenerError::Embedding("embedding worker exited".to_string()))
            }),
            recv(cancel_rx) -> _ => {
                warn!(provider = self.inner.name(), "embedding cancelled");
                Err(ScreenerError::Cancelled)
            },
            recv(deadline) -> _ => {
                let timeout = self.timeout.unwrap_or_default();
                warn!(provider = self.inner.name(), ?timeout, "embedding timed out");
                Err(ScreenerError::EmbeddingTimeout(timeout))
            },
        }
    }
}
