use tracing::debug;
use url::Url;

use crate::api::{Credits, PreviewMedia, RemoteFile, RemoteImage, RemoteMod};
use crate::html::HtmlConverter;
use crate::package::{GAMEBANANA_SOURCE, NormalizedPackage, PackageImage, PackageThumbnail};

/// Every credited name across all categories, in source order.
pub fn author_names(credits: Option<&Credits>) -> Vec<&str> {
    credits
        .into_iter()
        .flat_map(|categories| categories.values())
        .flatten()
        .filter_map(|credit| credit.name.as_deref().map(str::trim))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Short author line for listings: at most two names, then an ellipsis.
pub fn join_authors(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first}, {second}"),
        [first, second, ..] => format!("{first}, {second}, ..."),
    }
}

pub fn images(preview: Option<&PreviewMedia>) -> Vec<PackageImage> {
    preview
        .and_then(|media| media.images.as_deref())
        .unwrap_or_default()
        .iter()
        .filter_map(image)
        .collect()
}

fn image(remote: &RemoteImage) -> Option<PackageImage> {
    let base = remote.base_url.as_deref().map(str::trim).filter(|v| !v.is_empty())?;
    let file = remote.file.as_deref().map(str::trim).filter(|v| !v.is_empty())?;

    let base_url = match Url::parse(&format!("{}/", base.trim_end_matches('/'))) {
        Ok(url) => url,
        Err(err) => {
            debug!("skipping image with invalid base url {base:?}: {err}");
            return None;
        }
    };
    let uri = base_url.join(file).ok()?;

    let thumbnails: Vec<PackageThumbnail> = [
        (remote.file_100.as_deref(), 100),
        (remote.file_220.as_deref(), 220),
        (remote.file_530.as_deref(), 530),
    ]
    .into_iter()
    .filter_map(|(path, width_hint)| {
        let path = path.map(str::trim).filter(|v| !v.is_empty())?;
        let resolved = base_url.join(path).ok()?;
        Some(PackageThumbnail {
            uri: resolved.to_string(),
            width_hint,
        })
    })
    .collect();

    Some(PackageImage {
        uri: uri.to_string(),
        caption: remote
            .caption
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        thumbnails: (!thumbnails.is_empty()).then_some(thumbnails),
    })
}

/// Fields shared by both resolution paths. Callers adjust name, version,
/// description, readme and download URL afterwards.
pub(crate) fn base_package(
    remote: &RemoteMod,
    file: &RemoteFile,
    html: &dyn HtmlConverter,
) -> NormalizedPackage {
    NormalizedPackage {
        id: remote.id.to_string(),
        name: remote.name().to_string(),
        authors: join_authors(&author_names(remote.credits.as_ref())),
        description: html.to_plain_text(remote.description_html()),
        markdown_readme: None,
        source: GAMEBANANA_SOURCE.to_string(),
        version: remote
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
        file_size: file.size(),
        download_url: file.download_url().to_string(),
        project_url: Some(remote.project_url()),
        images: images(remote.preview_media.as_ref()),
    }
}
