use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::api::{MOD_PROPERTIES, RemoteMod, decode_mod_page};
use crate::config::ProviderConfig;
use crate::errors::{HttpError, ProviderError};

/// Text search against the remote catalogue. `Ok(None)` means the remote
/// answered with nothing at all, which callers treat as an empty page.
#[async_trait]
pub trait ModApi: Send + Sync {
    async fn search_mods(
        &self,
        text: &str,
        game_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Option<Vec<RemoteMod>>, HttpError>;
}

/// Raw bytes for a file URL. Used for release manifests.
#[async_trait]
pub trait ByteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

pub struct GameBananaClient {
    client: Client,
    base_url: String,
    max_fetch_size: u64,
}

impl GameBananaClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()
            .map_err(ProviderError::Client)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.api_base_url().to_string(),
            max_fetch_size: config.max_manifest_size,
        }
    }

    fn search_url(
        &self,
        text: &str,
        game_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("{}/apiv6/Mod/ByName", self.base_url),
            [
                ("_sName", format!("*{text}*")),
                ("_idGameRow", game_id.to_string()),
                ("_nPage", page.to_string()),
                ("_nPerpage", page_size.to_string()),
                ("_csvProperties", MOD_PROPERTIES.join(",")),
            ],
        )
    }
}

#[async_trait]
impl ModApi for GameBananaClient {
    async fn search_mods(
        &self,
        text: &str,
        game_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Option<Vec<RemoteMod>>, HttpError> {
        let url = self.search_url(text, game_id, page, page_size)?;
        debug!(%url, "searching GameBanana");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(HttpError::Status {
                status,
                body: String::from_utf8_lossy(&body).to_string(),
            });
        }

        let entries = serde_json::from_slice::<Option<Vec<serde_json::Value>>>(&body).map_err(
            |err| HttpError::Parse {
                source: err,
                body: String::from_utf8_lossy(&body).to_string(),
            },
        )?;
        Ok(entries.map(decode_mod_page))
    }
}

#[async_trait]
impl ByteFetcher for GameBananaClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::Status { status, body });
        }

        let too_large = || HttpError::TooLarge {
            url: url.to_string(),
            limit: self.max_fetch_size,
        };
        if response
            .content_length()
            .is_some_and(|length| length > self.max_fetch_size)
        {
            return Err(too_large());
        }

        // Content-Length may be absent or wrong; count what actually arrives.
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_fetch_size {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}
