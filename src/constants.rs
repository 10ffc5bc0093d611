//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Base URL used by debug builds when nothing else is configured
pub const DEV_API_URL: &str = "http://localhost:8080";

/// Base URL used by release builds when nothing else is configured
pub const PROD_API_URL: &str = "https://api.piggybank.zenith.ovh";

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "PIGGYBANK_API_URL";

/// Storage key holding the session token
pub const TOKEN_KEY: &str = "@piggybank/token";

/// Directory (under the home directory) for config, storage and logs
pub const CONFIG_DIR_NAME: &str = ".piggybank";

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const STORAGE_FILE_NAME: &str = "storage.yaml";
pub const LOG_FILE_NAME: &str = "piggybank.log";

/// How often the backend health monitor polls `/health`
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Application name
pub const APP_NAME: &str = "Piggybank";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
