//! Application state shared by all CLI commands.
//!
//! Resolves the data directory and client configuration once, then builds
//! the concrete submission client on demand.

use buddy_infra::config::resolve_client_config;
use buddy_infra::filesystem::resolve_data_dir;
use buddy_infra::http::HttpSubmissionClient;
use buddy_types::config::ClientConfig;

pub struct AppState {
    pub config: ClientConfig,
}

impl AppState {
    /// Resolve the data directory and load `config.toml` plus env overrides.
    ///
    /// `api_url` (from `--api-url`) takes priority over both.
    pub async fn init(api_url: Option<String>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = resolve_client_config(&data_dir).await;
        if let Some(url) = api_url {
            config.base_url = url;
        }
        tracing::debug!(data_dir = %data_dir.display(), base_url = %config.base_url, "Client configured");
        Ok(Self { config })
    }

    pub fn submission_client(&self) -> anyhow::Result<HttpSubmissionClient> {
        Ok(HttpSubmissionClient::new(&self.config)?)
    }
}
