//! Shop configuration loaded from a local JSON file.
//!
//! # File Format
//!
//! ```json
//! {
//!   "storefront_api_link": "https://your-store.myshopify.com/api/2024-07/graphql.json",
//!   "storefront_access_token": "...",
//!   "admin_api_link": "https://your-store.myshopify.com/admin/api/2024-07",
//!   "admin_access_token": "...",
//!   "api_key": "..."
//! }
//! ```
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOP_CONFIG_PATH` - Path to the JSON file (default: `Intermediate/ProjectFiles/ShopConfig.json`)
//! - `SHOP_REQUEST_TIMEOUT_SECS` - Deadline for a single API call (default: 30)

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

/// Default location of the config file, relative to the project directory.
pub const DEFAULT_CONFIG_PATH: &str = "Intermediate/ProjectFiles/ShopConfig.json";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

// Config file keys.
const STOREFRONT_API_LINK: &str = "storefront_api_link";
const STOREFRONT_ACCESS_TOKEN: &str = "storefront_access_token";
const ADMIN_API_LINK: &str = "admin_api_link";
const ADMIN_ACCESS_TOKEN: &str = "admin_access_token";
const API_KEY: &str = "api_key";

/// A string value by key. Absent keys and values of any other type are
/// `None`; the latter are logged.
fn string_field(raw: &Map<String, Value>, key: &'static str) -> Option<String> {
    match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            warn!(key, found = %json_type(other), "Shop config value is not a string, ignoring it");
            None
        }
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Endpoints and credentials for the Storefront and Admin APIs.
///
/// Loaded once at startup and shared read-only. Implements `Debug` manually
/// to redact secret fields.
#[derive(Clone)]
pub struct ShopConfig {
    storefront_api_link: String,
    storefront_access_token: SecretString,
    admin_api_link: String,
    admin_access_token: SecretString,
    api_key: Option<SecretString>,
    request_timeout: Duration,
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("storefront_api_link", &self.storefront_api_link)
            .field("storefront_access_token", &"[REDACTED]")
            .field("admin_api_link", &self.admin_api_link)
            .field("admin_access_token", &"[REDACTED]")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::empty()
    }
}

impl ShopConfig {
    /// Build a config from explicit values.
    #[must_use]
    pub fn new(
        storefront_api_link: impl Into<String>,
        storefront_access_token: impl Into<String>,
        admin_api_link: impl Into<String>,
        admin_access_token: impl Into<String>,
    ) -> Self {
        Self {
            storefront_api_link: storefront_api_link.into(),
            storefront_access_token: SecretString::from(storefront_access_token.into()),
            admin_api_link: admin_api_link.into(),
            admin_access_token: SecretString::from(admin_access_token.into()),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// A config with every value empty. Sessions built on it cannot reach
    /// the API.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("", "", "", "")
    }

    /// Override the per-call deadline.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Parse a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not a JSON object. Keys
    /// that are missing or not strings load as empty and do not affect the
    /// other keys.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: Map<String, Value> = serde_json::from_str(json)?;
        let text = |key| string_field(&raw, key).unwrap_or_default();

        let config = Self {
            storefront_api_link: text(STOREFRONT_API_LINK),
            storefront_access_token: SecretString::from(text(STOREFRONT_ACCESS_TOKEN)),
            admin_api_link: text(ADMIN_API_LINK),
            admin_access_token: SecretString::from(text(ADMIN_ACCESS_TOKEN)),
            api_key: string_field(&raw, API_KEY).map(SecretString::from),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        config.warn_on_invalid_links();
        Ok(config)
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading shop config");
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to an empty config on failure.
    ///
    /// The failure is logged. An empty config leaves every remote operation
    /// failing with a precondition error instead of aborting the process.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            error!(error = %e, "Shop config unavailable, continuing with empty values");
            Self::empty()
        })
    }

    /// Load the config from the path named by the environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `SHOP_REQUEST_TIMEOUT_SECS` is
    /// not a number. A missing or unreadable config file is not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let path = std::env::var("SHOP_CONFIG_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::load_or_empty(&path).with_env_overrides()
    }

    /// Apply `SHOP_REQUEST_TIMEOUT_SECS` if set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the value is not a number.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(secs) = std::env::var("SHOP_REQUEST_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("SHOP_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(self)
    }

    /// Storefront GraphQL endpoint.
    #[must_use]
    pub fn storefront_api_link(&self) -> &str {
        &self.storefront_api_link
    }

    /// Storefront API access token.
    #[must_use]
    pub fn storefront_access_token(&self) -> &str {
        self.storefront_access_token.expose_secret()
    }

    /// Admin REST base URL (e.g. `https://store/admin/api/2024-07`).
    #[must_use]
    pub fn admin_api_link(&self) -> &str {
        &self.admin_api_link
    }

    /// Admin API access token.
    #[must_use]
    pub fn admin_access_token(&self) -> &str {
        self.admin_access_token.expose_secret()
    }

    /// App API key, if configured.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret())
    }

    /// Deadline for a single API call.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Admin endpoint listing all products.
    #[must_use]
    pub fn admin_products_url(&self) -> String {
        format!("{}/products.json", self.admin_api_link.trim_end_matches('/'))
    }

    /// Whether the storefront endpoint and token are both set.
    #[must_use]
    pub fn has_storefront(&self) -> bool {
        !self.storefront_api_link.is_empty() && !self.storefront_access_token().is_empty()
    }

    /// Whether the admin endpoint and token are both set.
    #[must_use]
    pub fn has_admin(&self) -> bool {
        !self.admin_api_link.is_empty() && !self.admin_access_token().is_empty()
    }

    fn warn_on_invalid_links(&self) {
        for (key, link) in [
            (STOREFRONT_API_LINK, &self.storefront_api_link),
            (ADMIN_API_LINK, &self.admin_api_link),
        ] {
            if link.is_empty() {
                warn!(key, "Shop config value is empty");
            } else if let Err(e) = url::Url::parse(link) {
                warn!(key, error = %e, "Shop config value is not a valid URL");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "api_key": "key-123",
        "storefront_api_link": "https://shop.example/api/2024-07/graphql.json",
        "storefront_access_token": "sf-token",
        "admin_api_link": "https://shop.example/admin/api/2024-07/",
        "admin_access_token": "admin-token"
    }"#;

    #[test]
    fn test_from_json_reads_all_fields() {
        let config = ShopConfig::from_json(FULL).unwrap();
        assert_eq!(
            config.storefront_api_link(),
            "https://shop.example/api/2024-07/graphql.json"
        );
        assert_eq!(config.storefront_access_token(), "sf-token");
        assert_eq!(config.admin_access_token(), "admin-token");
        assert_eq!(config.api_key(), Some("key-123"));
        assert!(config.has_storefront());
        assert!(config.has_admin());
    }

    #[test]
    fn test_missing_keys_load_empty() {
        let config = ShopConfig::from_json(r#"{"storefront_api_link": "https://x"}"#).unwrap();
        assert_eq!(config.storefront_access_token(), "");
        assert_eq!(config.admin_api_link(), "");
        assert!(!config.has_storefront());
        assert!(!config.has_admin());
    }

    #[test]
    fn test_wrong_typed_values_are_ignored_per_key() {
        let json = r#"{
            "api_key": 12345,
            "storefront_api_link": "https://shop.example/api/2024-07/graphql.json",
            "storefront_access_token": "sf-token",
            "admin_api_link": ["https://shop.example/admin"],
            "admin_access_token": null
        }"#;
        let config = ShopConfig::from_json(json).unwrap();
        assert!(config.has_storefront());
        assert_eq!(config.storefront_access_token(), "sf-token");
        assert_eq!(config.admin_api_link(), "");
        assert_eq!(config.admin_access_token(), "");
        assert_eq!(config.api_key(), None);
        assert!(!config.has_admin());
    }

    #[test]
    fn test_load_or_empty_keeps_valid_values() {
        let path = std::env::temp_dir().join(format!(
            "shopcart-config-partial-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"storefront_api_link": "https://x", "storefront_access_token": "t", "admin_access_token": null}"#,
        )
        .unwrap();
        let config = ShopConfig::load_or_empty(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.storefront_api_link(), "https://x");
        assert!(config.has_storefront());
    }

    #[test]
    fn test_non_object_is_an_error() {
        assert!(matches!(
            ShopConfig::from_json(r#"["storefront_api_link"]"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let result = ShopConfig::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        let config = ShopConfig::load_or_empty(Path::new("/nonexistent/ShopConfig.json"));
        assert_eq!(config.storefront_api_link(), "");
        assert_eq!(config.admin_access_token(), "");
    }

    #[test]
    fn test_admin_products_url_trims_trailing_slash() {
        let config = ShopConfig::from_json(FULL).unwrap();
        assert_eq!(
            config.admin_products_url(),
            "https://shop.example/admin/api/2024-07/products.json"
        );
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = ShopConfig::from_json(FULL).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("sf-token"));
        assert!(!debug.contains("admin-token"));
        assert!(!debug.contains("key-123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!("shopcart-config-{}.json", std::process::id()));
        std::fs::write(&path, FULL).unwrap();
        let config = ShopConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.storefront_access_token(), "sf-token");
    }
}
