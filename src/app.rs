use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::indexer::IndexBuilder;
use crate::loader::FsTextLoader;
use crate::search::{EmbeddingProvider, QueryCache, SearchEngine};

pub struct AppContext {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub engine: SearchEngine,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&root));
        let config = Config::load(cli.config.as_deref(), &root)?;

        let embedder = config.embedding.build_provider()?;
        let mut engine = SearchEngine::open(config.index_paths(&root), Arc::clone(&embedder))?
            .with_weights(config.ranking.weights());
        if config.cache.enabled {
            engine = engine.with_cache(QueryCache::new(config.cache.query_embeddings as usize));
        }

        Ok(Self {
            root,
            config_path,
            config,
            embedder,
            engine,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    /// Builder writing to the configured index paths.
    pub fn index_builder(&self) -> IndexBuilder {
        IndexBuilder::new(
            Arc::new(FsTextLoader),
            Arc::clone(&self.embedder),
            self.config.index_paths(&self.root),
        )
        .with_lock_timeout(self.config.index.lock_timeout)
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("SCREENER_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".screener") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| ScreenerError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("screener"))
    }
}

fn default_config_path(root: &Path) -> PathBuf {
    if root.ends_with(".screener") {
        root.join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| root.to_path_buf())
            .join("screener/config.toml")
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_dir())
}
