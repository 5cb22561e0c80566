//! Release manifests: small JSON documents that mod authors upload next to
//! their archives. A manifest names the archive of every release, so it is
//! the most reliable way to find the right download among a mod's files.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::api::{RemoteFile, RemoteMod};
use crate::client::ByteFetcher;
use crate::config::ProviderConfig;
use crate::errors::{ManifestError, ProviderError};
use crate::html::HtmlConverter;
use crate::normalize::base_package;
use crate::package::NormalizedPackage;
use crate::search::cancellable;
use crate::version::select_latest;

const MANIFEST_EXTENSION: &str = ".json";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReleaseManifest {
    #[serde(default)]
    pub releases: Option<Vec<Release>>,
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Overrides carried in a manifest's `ExtraData`. Blank values mean "keep
/// what the API said".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestOverrides {
    #[serde(default)]
    pub id_override: Option<String>,
    #[serde(default)]
    pub name_override: Option<String>,
    #[serde(default)]
    pub description_override: Option<String>,
    #[serde(default)]
    pub readme: Option<String>,
}

impl ReleaseManifest {
    /// Parses and validates a manifest. Only manifests that list at least one
    /// release and carry `ExtraData` are accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let manifest: ReleaseManifest = serde_json::from_slice(bytes)?;
        if manifest.releases().is_empty() {
            return Err(ManifestError::NoReleases);
        }
        if manifest.extra_data.is_none() {
            return Err(ManifestError::MissingExtraData);
        }
        Ok(manifest)
    }

    pub fn releases(&self) -> &[Release] {
        self.releases.as_deref().unwrap_or_default()
    }

    pub fn latest_release(&self) -> Option<&Release> {
        select_latest(self.releases(), |release| release.version())
    }

    pub fn overrides(&self) -> Result<ManifestOverrides, serde_json::Error> {
        match &self.extra_data {
            Some(value) => ManifestOverrides::deserialize(value),
            None => Ok(ManifestOverrides::default()),
        }
    }
}

impl Release {
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or_default()
    }

    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or_default()
    }
}

impl ManifestOverrides {
    pub fn apply(&self, package: &mut NormalizedPackage) {
        if let Some(id) = non_blank(&self.id_override) {
            package.id = id.to_string();
        }
        if let Some(name) = non_blank(&self.name_override) {
            package.name = name.to_string();
        }
        if let Some(description) = non_blank(&self.description_override) {
            package.description = description.to_string();
        }
        if let Some(readme) = non_blank(&self.readme) {
            package.markdown_readme = Some(readme.to_string());
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Files worth fetching as manifests: `.json`, small, and downloadable.
/// A file that does not declare its size is never fetched.
pub fn manifest_candidates(remote: &RemoteMod, max_size: u64) -> Vec<&RemoteFile> {
    remote
        .files()
        .iter()
        .filter(|file| {
            file.file_name()
                .to_ascii_lowercase()
                .ends_with(MANIFEST_EXTENSION)
        })
        .filter(|file| file.size.is_some_and(|size| size <= max_size))
        .filter(|file| !file.download_url().is_empty())
        .collect()
}

/// GameBanana rewrites uploaded file names and appends a hash, so a release's
/// archive is found by prefix. Every spelling the upload may have been
/// normalized to is listed here, lower-cased, longest first. The full name is
/// kept next to its stem since a dotted name may carry no extension at all.
pub fn expected_file_name_starts(file_name: &str) -> Vec<String> {
    let name = file_name.trim().to_lowercase();
    let stem = Path::new(&name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();

    let mut starts: Vec<String> = [name, stem]
        .into_iter()
        .filter(|base| !base.is_empty())
        .flat_map(|base| {
            [
                base.replace(' ', "_"),
                base.replace('.', "_"),
                base.replace([' ', '.'], "_"),
                base,
            ]
        })
        .collect();
    starts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    starts.dedup();
    starts
}

/// The mod file whose name starts with the most specific expected start.
pub fn find_release_file<'a>(
    files: &'a [RemoteFile],
    release: &Release,
    manifest_file_id: u64,
) -> Option<&'a RemoteFile> {
    let starts = expected_file_name_starts(release.file_name());
    let names: Vec<(&RemoteFile, String)> = files
        .iter()
        .filter(|file| file.id != manifest_file_id)
        .map(|file| (file, file.file_name().to_lowercase()))
        .collect();

    starts.iter().find_map(|start| {
        names
            .iter()
            .find(|(_, name)| name.starts_with(start.as_str()))
            .map(|(file, _)| *file)
    })
}

/// Builds the package a manifest points at, or `None` when the manifest
/// cannot be tied to one of the mod's files.
pub fn package_from_manifest(
    remote: &RemoteMod,
    manifest_file: &RemoteFile,
    manifest: &ReleaseManifest,
    html: &dyn HtmlConverter,
) -> Option<NormalizedPackage> {
    let Some(release) = manifest.latest_release() else {
        debug!(
            mod_id = remote.id,
            file = manifest_file.file_name(),
            "manifest has no release with a parseable version"
        );
        return None;
    };

    let Some(target) = find_release_file(remote.files(), release, manifest_file.id) else {
        debug!(
            mod_id = remote.id,
            release_file = release.file_name(),
            "no uploaded file matches the manifest release"
        );
        return None;
    };

    let mut package = base_package(remote, target, html);
    package.version = Some(release.version().trim().to_string());

    match manifest.overrides() {
        Ok(overrides) => overrides.apply(&mut package),
        Err(err) => debug!(mod_id = remote.id, "ignoring unreadable manifest extra data: {err}"),
    }

    if package.readme().trim().is_empty() {
        package.markdown_readme = Some(html.to_markdown(remote.description_html()));
    }

    Some(package)
}

/// Resolves every mod in the batch through its release manifests. Per-file
/// failures are skipped; only cancellation is returned as an error.
pub async fn resolve_from_manifests(
    mods: &[RemoteMod],
    fetcher: &dyn ByteFetcher,
    html: &dyn HtmlConverter,
    config: &ProviderConfig,
    token: &CancellationToken,
) -> Result<Vec<NormalizedPackage>, ProviderError> {
    let per_mod: Vec<Vec<NormalizedPackage>> = stream::iter(
        mods.iter()
            .map(|remote| resolve_mod(remote, fetcher, html, config, token)),
    )
    .buffered(config.concurrency())
    .try_collect()
    .await?;

    Ok(per_mod.into_iter().flatten().collect())
}

async fn resolve_mod(
    remote: &RemoteMod,
    fetcher: &dyn ByteFetcher,
    html: &dyn HtmlConverter,
    config: &ProviderConfig,
    token: &CancellationToken,
) -> Result<Vec<NormalizedPackage>, ProviderError> {
    let mut packages = Vec::new();
    for candidate in manifest_candidates(remote, config.max_manifest_size) {
        let bytes = match cancellable(token, fetcher.fetch(candidate.download_url())).await? {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(mod_id = remote.id, file = candidate.file_name(), "manifest fetch failed: {err}");
                continue;
            }
        };

        let manifest = match ReleaseManifest::parse(&bytes) {
            Ok(manifest) => manifest,
            Err(err) => {
                debug!(mod_id = remote.id, file = candidate.file_name(), "not a release manifest: {err}");
                continue;
            }
        };

        if let Some(package) = package_from_manifest(remote, candidate, &manifest, html) {
            packages.push(package);
        }
    }
    Ok(packages)
}
