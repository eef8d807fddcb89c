//! CLI subcommands.

pub mod catalog;
pub mod run;

use std::path::Path;

use storefront_cart::catalog::CatalogError;
use storefront_cart::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Page markup could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog selectors are invalid.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Widget configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No tokio runtime for the auto-hide timer.
    #[error("Runtime error: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read page markup from disk.
fn read_page(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.display().to_string(),
        source,
    })
}
