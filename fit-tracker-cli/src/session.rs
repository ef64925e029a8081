//! Per-invocation session state: config, backend client, session cache.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use fit_tracker::ai::{AiService, GeminiBackend};
use fit_tracker::cache::{FileStore, ResultCache};
use fit_tracker::{ApiError, BackendClient, Config};

pub struct Session {
    pub config: Config,
    config_path: PathBuf,
    client: BackendClient,
}

impl Session {
    /// Load the config from `path` or the default location
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => Config::config_file()?,
        };
        let config = Config::load_from(&config_path)?;

        let client = BackendClient::new(&config.api)?.with_token(config.auth.token.clone());

        Ok(Self {
            config,
            config_path,
            client,
        })
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save_to(&self.config_path)
    }

    /// Fail early when there is no saved token
    pub fn require_login(&self) -> Result<()> {
        if !self.client.is_authenticated() {
            return Err(anyhow!("Not logged in. Run `fit-tracker login` first."));
        }
        Ok(())
    }

    /// Session cache for AI results, empty or absent when caching is disabled
    pub fn cache(&self) -> ResultCache {
        if !self.config.cache.enabled {
            return ResultCache::disabled();
        }
        let store = FileStore::open(Config::session_cache_file(&self.config_path))
            .with_quota(self.config.cache.max_bytes);
        ResultCache::new(Arc::new(store))
    }

    /// Start or end a session: the previous session's AI results are discarded
    pub fn reset_cache(&self) {
        let store = FileStore::open(Config::session_cache_file(&self.config_path));
        ResultCache::new(Arc::new(store)).clear();
    }

    pub fn ai_service(&self) -> Result<AiService> {
        let backend = GeminiBackend::new(&self.config.ai)
            .context("The AI backend is not configured")?;
        Ok(AiService::new(
            Arc::new(backend),
            self.cache(),
            self.config.ai.retry_policy(),
        ))
    }

    /// Turn a backend error into a CLI error, logging out on rejected sessions
    pub fn fail(&mut self, err: ApiError) -> anyhow::Error {
        if err.is_auth_failure() && self.config.is_authenticated() {
            tracing::warn!("Session rejected by the backend: {}", err);
            self.config.clear_token();
            if let Err(save_err) = self.save_config() {
                tracing::warn!("Could not clear the saved token: {}", save_err);
            }
            self.reset_cache();
        }
        anyhow!(err.user_message())
    }
}
