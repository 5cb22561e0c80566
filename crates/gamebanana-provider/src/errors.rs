use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Failed to parse JSON: {source}. Body: {body}")]
    Parse {
        source: serde_json::Error,
        body: String,
    },
    #[error("Response from {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },
}

/// Reasons a release manifest is rejected. All of them are soft: the
/// candidate file is skipped and resolution moves on.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid release manifest: {0}")]
    Json(#[from] serde_json::Error),
    #[error("release manifest lists no releases")]
    NoReleases,
    #[error("release manifest has no extra data")]
    MissingExtraData,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("search was cancelled")]
    Cancelled,

    #[error("mod search failed: {0}")]
    Api(#[from] HttpError),

    #[error("mod {mod_id} lists integrations for file {file_id}, which is missing from its file list")]
    MissingFile { mod_id: u64, file_id: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProviderError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
