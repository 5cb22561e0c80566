//! Packages derived straight from GameBanana's mod-manager integration links,
//! used when no release manifest could be resolved for the batch.

use tracing::debug;

use crate::api::RemoteMod;
use crate::errors::ProviderError;
use crate::html::HtmlConverter;
use crate::normalize::base_package;
use crate::package::NormalizedPackage;

pub fn resolve_from_integrations(
    mods: &[RemoteMod],
    html: &dyn HtmlConverter,
) -> Result<Vec<NormalizedPackage>, ProviderError> {
    let mut packages = Vec::new();
    for remote in mods {
        packages.extend(resolve_mod(remote, html)?);
    }
    Ok(packages)
}

fn resolve_mod(
    remote: &RemoteMod,
    html: &dyn HtmlConverter,
) -> Result<Vec<NormalizedPackage>, ProviderError> {
    let (Some(integrations), Some(files)) = (&remote.integrations, &remote.files) else {
        return Ok(Vec::new());
    };

    let plain_description = html.to_plain_text(remote.description_html());
    let readme = html.to_markdown(remote.description_html());

    let mut packages: Vec<NormalizedPackage> = Vec::new();
    for (file_id, links) in integrations {
        let file = files
            .iter()
            .find(|file| file.id.to_string() == file_id.trim())
            .ok_or_else(|| ProviderError::MissingFile {
                mod_id: remote.id,
                file_id: file_id.clone(),
            })?;

        for link in links.iter().filter(|link| link.is_loader_download_url()) {
            if link.download_url().is_empty() {
                debug!(mod_id = remote.id, file_id = %file_id, "integration link without a URL");
                continue;
            }

            let mut package = base_package(remote, file, html);
            if !packages.is_empty() {
                package.name = format!("{} [{}]", package.name, packages.len());
            }
            package.description = format!("[{}] {}", file.label(), plain_description);
            package.markdown_readme = Some(readme.clone());
            package.download_url = link.download_url().to_string();
            packages.push(package);
        }
    }

    Ok(packages)
}
