//! Client configuration loader for Buddy.
//!
//! Reads `config.toml` from the data directory (`~/.buddy/` in production)
//! and deserializes it into [`ClientConfig`]. Falls back to defaults when
//! the file is missing or malformed, then applies environment overrides.

use std::path::Path;

use buddy_types::config::ClientConfig;

/// Environment variable overriding `base_url`.
pub const API_URL_ENV: &str = "BUDDY_API_URL";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply environment overrides on top of a loaded config.
///
/// `lookup` is `std::env::var(..).ok()` in production.
pub fn apply_env_overrides(
    mut config: ClientConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientConfig {
    if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.is_empty()) {
        tracing::debug!(base_url = %url, "Using {API_URL_ENV} override");
        config.base_url = url;
    }
    config
}

/// Load `config.toml` and apply process environment overrides.
pub async fn resolve_client_config(data_dir: &Path) -> ClientConfig {
    let config = load_client_config(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}
