use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenerError};
use crate::search::vector_index::IndexPaths;
use crate::search::{
    DeadlineEmbedder, EmbeddingProvider, HashEmbedder, OpenAiEmbedder, OpenAiSettings,
    RankingWeights,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("SCREENER_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let path = dirs::config_dir()
            .ok_or_else(|| ScreenerError::MissingConfig("config directory not found".to_string()))?
            .join("screener/config.toml");
        Self::load_patch(&path)
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        let path = root.join("config.toml");
        Self::load_patch(&path)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| ScreenerError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| ScreenerError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.ranking {
            self.ranking.merge(patch);
        }
        if let Some(patch) = patch.cache {
            self.cache.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("SCREENER_INDEX_PATH") {
            self.index.index_path = value;
        }
        if let Some(value) = env_string("SCREENER_METADATA_PATH") {
            self.index.metadata_path = value;
        }
        if let Some(value) = env_string("SCREENER_CORPUS_DIR") {
            self.index.corpus_dir = value;
        }
        if let Some(value) = env_duration("SCREENER_LOCK_TIMEOUT")? {
            self.index.lock_timeout = value;
        }

        if let Some(value) = env_string("SCREENER_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = env_u32("SCREENER_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = env_string("SCREENER_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = env_string("SCREENER_EMBEDDING_BASE_URL") {
            self.embedding.base_url = value;
        }
        if let Some(value) = env_string("SCREENER_EMBEDDING_API_KEY_ENV") {
            self.embedding.api_key_env = value;
        }
        if let Some(value) = env_duration("SCREENER_EMBEDDING_TIMEOUT")? {
            self.embedding.timeout = value;
        }
        if let Some(value) = env_duration("SCREENER_EMBEDDING_DEADLINE")? {
            self.embedding.deadline = Some(value);
        }
        if let Some(value) = env_u32("SCREENER_EMBEDDING_MAX_RETRIES")? {
            self.embedding.max_retries = value;
        }
        if let Some(value) = env_u32("SCREENER_EMBEDDING_BATCH_SIZE")? {
            self.embedding.batch_size = value;
        }

        if let Some(value) = env_f32("SCREENER_RANKING_EMBED_WEIGHT")? {
            self.ranking.embed_weight = value;
        }
        if let Some(value) = env_f32("SCREENER_RANKING_SKILL_WEIGHT")? {
            self.ranking.skill_weight = value;
        }
        if let Some(value) = env_f32("SCREENER_RANKING_EXPERIENCE_WEIGHT")? {
            self.ranking.experience_weight = value;
        }
        if let Some(value) = env_f32("SCREENER_RANKING_RICHNESS_WEIGHT")? {
            self.ranking.richness_weight = value;
        }
        if let Some(value) = env_f32("SCREENER_RANKING_RICHNESS_SCALE")? {
            self.ranking.richness_scale = value;
        }
        if let Some(value) = env_u32("SCREENER_RANKING_DEFAULT_K")? {
            self.ranking.default_k = value;
        }

        if env_bool("SCREENER_CACHE_DISABLED").unwrap_or(false) {
            self.cache.enabled = false;
        }
        if let Some(value) = env_bool("SCREENER_CACHE_ENABLED") {
            self.cache.enabled = value;
        }
        if let Some(value) = env_u32("SCREENER_CACHE_QUERY_EMBEDDINGS")? {
            self.cache.query_embeddings = value;
        }

        Ok(())
    }

    /// Artifact locations; relative paths resolve against `root`.
    pub fn index_paths(&self, root: &Path) -> IndexPaths {
        IndexPaths::new(
            resolve_path(root, &self.index.index_path),
            resolve_path(root, &self.index.metadata_path),
        )
    }

    pub fn corpus_dir(&self, root: &Path) -> PathBuf {
        resolve_path(root, &self.index.corpus_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub index_path: String,
    #[serde(default)]
    pub metadata_path: String,
    #[serde(default)]
    pub corpus_dir: String,
    /// How long a build waits for another build's lock
    #[serde(default, with = "humantime_serde")]
    pub lock_timeout: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_path: "index/vectors.bin".to_string(),
            metadata_path: "index/metadata.json".to_string(),
            corpus_dir: "resumes".to_string(),
            lock_timeout: Duration::from_secs(30),
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexPatch) {
        if let Some(value) = patch.index_path {
            self.index_path = value;
        }
        if let Some(value) = patch.metadata_path {
            self.metadata_path = value;
        }
        if let Some(value) = patch.corpus_dir {
            self.corpus_dir = value;
        }
        if let Some(value) = patch.lock_timeout {
            self.lock_timeout = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "hash" or "openai"
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub dims: u32,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub base_url: String,
    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: String,
    /// Per-request HTTP timeout
    #[serde(default, with = "humantime_serde")]
    pub timeout: Duration,
    /// Upper bound on a whole embed call, retries included
    #[serde(default, with = "humantime_serde")]
    pub deadline: Option<Duration>,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub batch_size: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "hash".to_string(),
            dims: 384,
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: Duration::from_secs(30),
            deadline: None,
            max_retries: 3,
            batch_size: 64,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = value;
        }
        if let Some(value) = patch.timeout {
            self.timeout = value;
        }
        if let Some(value) = patch.deadline {
            self.deadline = Some(value);
        }
        if let Some(value) = patch.max_retries {
            self.max_retries = value;
        }
        if let Some(value) = patch.batch_size {
            self.batch_size = value;
        }
    }

    /// Construct the configured provider, wrapped in a deadline when one is set.
    pub fn build_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        let provider: Arc<dyn EmbeddingProvider> = match self.backend.to_lowercase().as_str() {
            "hash" => Arc::new(HashEmbedder::new(self.dims as usize)),
            "openai" => {
                let api_key = std::env::var(&self.api_key_env).map_err(|_| {
                    ScreenerError::MissingConfig(format!(
                        "{} is not set (required by the openai embedding backend)",
                        self.api_key_env
                    ))
                })?;
                Arc::new(OpenAiEmbedder::new(OpenAiSettings {
                    api_key,
                    base_url: self.base_url.clone(),
                    model: self.model.clone(),
                    dimensions: self.dims as usize,
                    timeout: self.timeout,
                    max_retries: self.max_retries as usize,
                    batch_size: self.batch_size as usize,
                })?)
            }
            other => {
                return Err(ScreenerError::Config(format!(
                    "unknown embedding backend {other} (expected hash|openai)"
                )));
            }
        };

        Ok(match self.deadline {
            Some(deadline) => Arc::new(DeadlineEmbedder::new(provider).with_timeout(deadline)),
            None => provider,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub embed_weight: f32,
    #[serde(default)]
    pub skill_weight: f32,
    #[serde(default)]
    pub experience_weight: f32,
    #[serde(default)]
    pub richness_weight: f32,
    #[serde(default)]
    pub richness_scale: f32,
    #[serde(default)]
    pub default_k: u32,
}

impl Default for RankingConfig {
    fn default() -> Self {
        let weights = RankingWeights::default();
        Self {
            embed_weight: weights.embed,
            skill_weight: weights.skill,
            experience_weight: weights.experience,
            richness_weight: weights.richness,
            richness_scale: weights.richness_scale,
            default_k: crate::core::DEFAULT_K as u32,
        }
    }
}

impl RankingConfig {
    fn merge(&mut self, patch: RankingPatch) {
        if let Some(value) = patch.embed_weight {
            self.embed_weight = value;
        }
        if let Some(value) = patch.skill_weight {
            self.skill_weight = value;
        }
        if let Some(value) = patch.experience_weight {
            self.experience_weight = value;
        }
        if let Some(value) = patch.richness_weight {
            self.richness_weight = value;
        }
        if let Some(value) = patch.richness_scale {
            self.richness_scale = value;
        }
        if let Some(value) = patch.default_k {
            self.default_k = value;
        }
    }

    pub const fn weights(&self) -> RankingWeights {
        RankingWeights {
            embed: self.embed_weight,
            skill: self.skill_weight,
            experience: self.experience_weight,
            richness: self.richness_weight,
            richness_scale: self.richness_scale,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Distinct query embeddings kept in memory
    #[serde(default)]
    pub query_embeddings: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query_embeddings: crate::search::cache::DEFAULT_QUERY_CACHE_SIZE as u32,
        }
    }
}

impl CacheConfig {
    fn merge(&mut self, patch: CachePatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.query_embeddings {
            self.query_embeddings = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub index: Option<IndexPatch>,
    pub embedding: Option<EmbeddingPatch>,
    pub ranking: Option<RankingPatch>,
    pub cache: Option<CachePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IndexPatch {
    pub index_path: Option<String>,
    pub metadata_path: Option<String>,
    pub corpus_dir: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub lock_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub dims: Option<u32>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub deadline: Option<Duration>,
    pub max_retries: Option<u32>,
    pub batch_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RankingPatch {
    pub embed_weight: Option<f32>,
    pub skill_weight: Option<f32>,
    pub experience_weight: Option<f32>,
    pub richness_weight: Option<f32>,
    pub richness_scale: Option<f32>,
    pub default_k: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CachePatch {
    pub enabled: Option<bool>,
    pub query_embeddings: Option<u32>,
}

/// Expand `~`, then resolve relative paths against `root`.
pub fn resolve_path(root: &Path, input: &str) -> PathBuf {
    let expanded = expand_home(input);
    if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    }
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(stripped) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    if input == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(input)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u32>().map(Some).map_err(|err| {
            ScreenerError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_f32(key: &str) -> Result<Option<f32>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<f32>().map(Some).map_err(|err| {
            ScreenerError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_duration(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(value) => humantime_serde::re::humantime::parse_duration(&value)
            .map(Some)
            .map_err(|err| ScreenerError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
