use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// GraphQL endpoint; the GRAPHQL_URL environment variable wins over this.
    pub(crate) endpoint: Option<String>,
    /// Store-local hour after which a trading day counts as complete.
    pub(crate) cutover_hour: u32,
    /// Report mutations per write request.
    pub(crate) mutation_chunk_size: usize,
    /// Cap on concurrent outbound requests, process-wide.
    pub(crate) max_inflight: usize,
    /// Timezone used when a store carries no configuration of its own
    /// (the "network" pseudo store).
    pub(crate) fallback_timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: None,
            cutover_hour: 17,
            mutation_chunk_size: 5,
            max_inflight: 20,
            fallback_timezone: "Australia/Sydney".to_string(),
        }
    }
}

impl Config {
    pub(crate) fn load() -> Self {
        // Try config locations in order of priority
        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), %e, "failed to parse config");
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/storecalc/config.toml (Linux/cross-platform)
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("storecalc").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support etc.)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("storecalc").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.storecalc.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".storecalc.toml"));
        }

        paths
    }

    pub(crate) fn endpoint(&self) -> Result<String, AppError> {
        if let Ok(url) = std::env::var("GRAPHQL_URL")
            && !url.trim().is_empty()
        {
            return Ok(url);
        }
        self.endpoint.clone().ok_or(AppError::MissingEndpoint)
    }
}
