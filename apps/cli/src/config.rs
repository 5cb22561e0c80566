use std::path::Path;

use anyhow::{Context, Result, bail};
use gamebanana_provider::ProviderConfig;
use serde::Deserialize;

use crate::io;

/// Optional `gb-packages.toml`. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub game_id: Option<u64>,
    pub api_url: Option<String>,
    pub max_manifest_size: Option<u64>,
    pub manifest_concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
}

pub struct Overrides {
    pub game_id: Option<u64>,
    pub api_url: Option<String>,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    let text = io::read_to_string(path)?;
    toml::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Flag (or its environment variable, handled by clap) first, then the
/// config file, then library defaults.
pub fn resolve_provider_config(
    overrides: Overrides,
    file: Option<FileConfig>,
) -> Result<ProviderConfig> {
    let file = file.unwrap_or_default();

    let Some(game_id) = overrides.game_id.or(file.game_id) else {
        bail!("A game id is required: pass --game-id, set GAMEBANANA_GAME_ID or add game_id to the config file.");
    };

    let mut config = ProviderConfig::new(game_id);
    if let Some(url) = normalize_optional(overrides.api_url).or_else(|| normalize_optional(file.api_url)) {
        config = config.with_api_base_url(url);
    }
    if let Some(size) = file.max_manifest_size {
        config.max_manifest_size = size;
    }
    if let Some(concurrency) = file.manifest_concurrency {
        config.manifest_concurrency = concurrency;
    }
    if let Some(timeout) = file.request_timeout_secs {
        config.request_timeout_secs = timeout;
    }
    Ok(config)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|val| {
        let trimmed = val.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
