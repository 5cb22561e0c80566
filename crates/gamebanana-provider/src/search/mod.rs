use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::{ByteFetcher, GameBananaClient, ModApi};
use crate::config::ProviderConfig;
use crate::errors::ProviderError;
use crate::fallback::resolve_from_integrations;
use crate::html::{DefaultHtmlConverter, HtmlConverter};
use crate::manifest::resolve_from_manifests;
use crate::package::NormalizedPackage;


/// Searches GameBanana and turns the hits into downloadable packages.
pub struct PackageSearch {
    api: Arc<dyn ModApi>,
    fetcher: Arc<dyn ByteFetcher>,
    html: Arc<dyn HtmlConverter>,
    config: ProviderConfig,
}

impl PackageSearch {
    pub fn new(
        api: Arc<dyn ModApi>,
        fetcher: Arc<dyn ByteFetcher>,
        html: Arc<dyn HtmlConverter>,
        config: ProviderConfig,
    ) -> Self {
        Self {
            api,
            fetcher,
            html,
            config,
        }
    }

    /// Wires the reqwest-backed client and the default HTML converter.
    pub fn gamebanana(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Arc::new(GameBananaClient::new(&config)?);
        Ok(Self::new(
            client.clone(),
            client,
            Arc::new(DefaultHtmlConverter),
            config,
        ))
    }

    /// Runs one search page. GameBanana pages rather than offsets, so the
    /// page is `skip / take + 1`; offsets that are not a multiple of `take`
    /// land on the enclosing page.
    ///
    /// Manifest-backed packages are preferred. Only when no mod in the whole
    /// batch resolves through a manifest are integration links used instead.
    /// A page without manifest-backed mods can therefore make continuation
    /// paging inconsistent.
    #[tracing::instrument(skip(self, token), fields(game_id = self.config.game_id))]
    pub async fn search(
        &self,
        text: &str,
        skip: u32,
        take: u32,
        token: &CancellationToken,
    ) -> Result<Vec<NormalizedPackage>, ProviderError> {
        let Some(page) = page_for(skip, take) else {
            return Ok(Vec::new());
        };

        let mods = cancellable(
            token,
            self.api.search_mods(text, self.config.game_id, page, take),
        )
        .await??;
        let mods = match mods {
            Some(mods) if !mods.is_empty() => mods,
            _ => {
                debug!(page, "search returned no mods");
                return Ok(Vec::new());
            }
        };

        let packages = resolve_from_manifests(
            &mods,
            self.fetcher.as_ref(),
            self.html.as_ref(),
            &self.config,
            token,
        )
        .await?;
        if !packages.is_empty() {
            info!(page, mods = mods.len(), packages = packages.len(), "resolved packages from release manifests");
            return Ok(packages);
        }

        if token.is_cancelled() {
            return Err(ProviderError::Cancelled);
        }
        let packages = resolve_from_integrations(&mods, self.html.as_ref())?;
        info!(page, mods = mods.len(), packages = packages.len(), "resolved packages from integration links");
        Ok(packages)
    }
}

/// One-based page index for an offset/limit request. `None` when `take` is
/// zero or the page number does not fit in a `u32`.
pub fn page_for(skip: u32, take: u32) -> Option<u32> {
    if take == 0 {
        return None;
    }
    (skip / take).checked_add(1)
}

/// Races `future` against the token. Cancellation wins ties.
pub(crate) async fn cancellable<F: Future>(
    token: &CancellationToken,
    future: F,
) -> Result<F::Output, ProviderError> {
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ProviderError::Cancelled),
        output = future => Ok(output),
    }
}
