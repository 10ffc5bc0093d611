//! Backend base URL resolution.
//!
//! Resolved once at start, in order: the `PIGGYBANK_API_URL` environment
//! variable, `api_url` from `~/.piggybank/config.yaml`, then a build-dependent
//! fallback (`localhost:8080` for debug builds).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{API_URL_ENV, CONFIG_FILE_NAME, DEV_API_URL, PROD_API_URL};
use crate::storage::config_dir;

/// Optional on-disk configuration
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api_url: Option<String>,
}

impl FileConfig {
    /// Missing or unreadable files count as empty config
    pub fn load(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return FileConfig::default();
        };
        match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config file");
                FileConfig::default()
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlSource {
    Environment,
    ConfigFile,
    Fallback,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub source: UrlSource,
    pub config_dir: PathBuf,
}

impl Config {
    /// Resolve from the process environment and the default config directory
    pub fn load() -> Self {
        let dir = config_dir();
        let file = FileConfig::load(&dir.join(CONFIG_FILE_NAME));
        let env = std::env::var(API_URL_ENV).ok();
        Self::resolve(env, file, dir)
    }

    pub fn resolve(env: Option<String>, file: FileConfig, config_dir: PathBuf) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let (url, source) = if let Some(url) = non_empty(env) {
            (url, UrlSource::Environment)
        } else if let Some(url) = non_empty(file.api_url) {
            (url, UrlSource::ConfigFile)
        } else {
            (default_url().to_string(), UrlSource::Fallback)
        };

        Config {
            api_url: url.trim().trim_end_matches('/').to_string(),
            source,
            config_dir,
        }
    }
}

/// Development-time fallback when nothing is configured
pub fn default_url() -> &'static str {
    if cfg!(debug_assertions) {
        DEV_API_URL
    } else {
        PROD_API_URL
    }
}
