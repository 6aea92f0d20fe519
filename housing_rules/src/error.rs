//! Errors raised while loading rule data and configuration.

use std::path::PathBuf;

/// Failures at the load boundary. Layout mutations and price computation never fail.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("affinity {value} for '{npc}' -> '{target}' is outside -2..=2")]
    InvalidAffinity {
        npc: String,
        target: String,
        value: i64,
    },
}

pub type Result<T> = std::result::Result<T, RulesError>;
