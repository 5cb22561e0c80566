pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod html;
pub mod manifest;
pub mod normalize;
pub mod package;
pub mod search;
pub mod version;

#[cfg(test)]
mod test_support;

pub use client::{ByteFetcher, GameBananaClient, ModApi};
pub use config::ProviderConfig;
pub use errors::{HttpError, ManifestError, ProviderError};
pub use html::{DefaultHtmlConverter, HtmlConverter};
pub use package::{GAMEBANANA_SOURCE, NormalizedPackage, PackageImage, PackageThumbnail};
pub use search::{PackageSearch, page_for};
pub use tokio_util::sync::CancellationToken;
