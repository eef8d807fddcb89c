//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_HIDE_TIMEOUT_MS` - Auto-hide delay in milliseconds (default: 3000)
//! - `CART_TEMPLATE_PATH` - File overriding the outer cart template
//! - `CART_ITEM_TEMPLATE_PATH` - File overriding the cart line template
//! - `CART_ESCAPE_HTML` - Escape product names in markup (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cart::DEFAULT_HIDE_TIMEOUT;
use crate::templates::{CartTemplates, Escape, TemplateError};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
}

/// Cart widget configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// How long a shown cart stays on the page
    pub hide_timeout: Duration,
    /// Outer cart template override
    pub cart_template_path: Option<PathBuf>,
    /// Cart line template override
    pub item_template_path: Option<PathBuf>,
    /// How product names are written into markup
    pub escape: Escape,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            hide_timeout: DEFAULT_HIDE_TIMEOUT,
            cart_template_path: None,
            item_template_path: None,
            escape: Escape::Html,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl WidgetConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let hide_timeout = match lookup("CART_HIDE_TIMEOUT_MS") {
            Some(value) => Duration::from_millis(value.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("CART_HIDE_TIMEOUT_MS".to_string(), e.to_string())
            })?),
            None => DEFAULT_HIDE_TIMEOUT,
        };

        let escape = match lookup("CART_ESCAPE_HTML") {
            Some(value) => {
                if parse_bool("CART_ESCAPE_HTML", &value)? {
                    Escape::Html
                } else {
                    Escape::None
                }
            }
            None => Escape::Html,
        };

        Ok(Self {
            hide_timeout,
            cart_template_path: lookup("CART_TEMPLATE_PATH").map(PathBuf::from),
            item_template_path: lookup("CART_ITEM_TEMPLATE_PATH").map(PathBuf::from),
            escape,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Read the configured templates, defaulting where no path is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Template` if a template file cannot be read.
    pub fn templates(&self) -> Result<CartTemplates, ConfigError> {
        Ok(CartTemplates::load(
            self.cart_template_path.as_deref(),
            self.item_template_path.as_deref(),
        )?)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a boolean flag (`true`/`false`, `1`/`0`, `yes`/`no`).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WidgetConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WidgetConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.hide_timeout, Duration::from_millis(3000));
        assert_eq!(config.escape, Escape::Html);
    }

    #[test]
    fn test_hide_timeout() {
        let config = load(&[("CART_HIDE_TIMEOUT_MS", "1500")]).unwrap();
        assert_eq!(config.hide_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_hide_timeout() {
        let err = load(&[("CART_HIDE_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "CART_HIDE_TIMEOUT_MS"));
    }

    #[test]
    fn test_escape_flag() {
        let config = load(&[("CART_ESCAPE_HTML", "false")]).unwrap();
        assert_eq!(config.escape, Escape::None);

        let config = load(&[("CART_ESCAPE_HTML", "YES")]).unwrap();
        assert_eq!(config.escape, Escape::Html);

        assert!(load(&[("CART_ESCAPE_HTML", "maybe")]).is_err());
    }

    #[test]
    fn test_template_paths() {
        let config = load(&[("CART_TEMPLATE_PATH", "/nonexistent/cart.html")]).unwrap();
        assert_eq!(
            config.cart_template_path,
            Some(PathBuf::from("/nonexistent/cart.html"))
        );
        assert!(matches!(config.templates(), Err(ConfigError::Template(_))));
    }

    #[test]
    fn test_templates_default() {
        let config = WidgetConfig::default();
        assert_eq!(config.templates().unwrap(), CartTemplates::default());
    }
}
