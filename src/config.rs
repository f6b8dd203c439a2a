// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Snapshot file for the habit store; `None` keeps data in memory
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional: `PORT` (default 8080), `FRONTEND_URL`
    /// (default localhost dev server), `HABITS_DB` (snapshot file path;
    /// unset means no persistence).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            snapshot_path: env::var("HABITS_DB").ok().map(PathBuf::from),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            snapshot_path: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
