use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://gamebanana.com";

/// Manifests are tiny JSON documents; anything past this is not worth fetching.
pub const DEFAULT_MAX_MANIFEST_SIZE: u64 = 512 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub game_id: u64,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_max_manifest_size")]
    pub max_manifest_size: u64,
    #[serde(default = "default_manifest_concurrency")]
    pub manifest_concurrency: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ProviderConfig {
    pub fn new(game_id: u64) -> Self {
        Self {
            game_id,
            api_base_url: default_api_base_url(),
            max_manifest_size: default_max_manifest_size(),
            manifest_concurrency: default_manifest_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn concurrency(&self) -> usize {
        self.manifest_concurrency.max(1)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_max_manifest_size() -> u64 {
    DEFAULT_MAX_MANIFEST_SIZE
}

fn default_manifest_concurrency() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("gamebanana-provider/{}", env!("CARGO_PKG_VERSION"))
}
