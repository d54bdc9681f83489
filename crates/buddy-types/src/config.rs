//! Client configuration types for Buddy.
//!
//! `ClientConfig` represents the `config.toml` that tells the client which
//! backend to talk to and how.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Buddy client.
///
/// Loaded from `~/.buddy/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the companion backend (no trailing `/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport-level request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("buddy/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}
