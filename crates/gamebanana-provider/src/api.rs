//! Records returned by the GameBanana API.
//!
//! Everything in here comes from an untrusted remote. Apart from the row ids,
//! every field is optional, and map-shaped fields tolerate the `[]` that PHP
//! emits for an empty associative array.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Fields requested through `_csvProperties`; keep in sync with [`RemoteMod`].
pub const MOD_PROPERTIES: &[&str] = &[
    "_idRow",
    "_sName",
    "_sText",
    "_sVersion",
    "_sProfileUrl",
    "_aCredits",
    "_aFiles",
    "_aModManagerIntegrations",
    "_aPreviewMedia",
];

pub type Credits = IndexMap<String, Vec<RemoteCredit>>;
pub type Integrations = IndexMap<String, Vec<IntegrationLink>>;

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMod {
    #[serde(rename = "_idRow")]
    pub id: u64,
    #[serde(rename = "_sName")]
    pub name: Option<String>,
    /// HTML body of the mod page.
    #[serde(rename = "_sText")]
    pub description: Option<String>,
    #[serde(rename = "_sVersion")]
    pub version: Option<String>,
    #[serde(rename = "_sProfileUrl")]
    pub profile_url: Option<String>,
    #[serde(rename = "_aCredits", default, deserialize_with = "lenient_object")]
    pub credits: Option<Credits>,
    #[serde(rename = "_aFiles")]
    pub files: Option<Vec<RemoteFile>>,
    #[serde(
        rename = "_aModManagerIntegrations",
        default,
        deserialize_with = "lenient_object"
    )]
    pub integrations: Option<Integrations>,
    #[serde(rename = "_aPreviewMedia", default, deserialize_with = "lenient_object")]
    pub preview_media: Option<PreviewMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    #[serde(rename = "_idRow")]
    pub id: u64,
    #[serde(rename = "_sFile")]
    pub file_name: Option<String>,
    #[serde(rename = "_sDescription")]
    pub description: Option<String>,
    #[serde(rename = "_nFilesize")]
    pub size: Option<u64>,
    #[serde(rename = "_sDownloadUrl")]
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCredit {
    #[serde(rename = "_sName")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationLink {
    #[serde(rename = "_sDownloadUrl")]
    pub download_url: Option<String>,
    #[serde(rename = "_bIsLoaderDownloadUrl")]
    pub is_loader_download_url: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewMedia {
    #[serde(rename = "_aImages")]
    pub images: Option<Vec<RemoteImage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteImage {
    #[serde(rename = "_sBaseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "_sFile")]
    pub file: Option<String>,
    #[serde(rename = "_sCaption")]
    pub caption: Option<String>,
    #[serde(rename = "_sFile100")]
    pub file_100: Option<String>,
    #[serde(rename = "_sFile220")]
    pub file_220: Option<String>,
    #[serde(rename = "_sFile530")]
    pub file_530: Option<String>,
}

impl RemoteMod {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn description_html(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn files(&self) -> &[RemoteFile] {
        self.files.as_deref().unwrap_or_default()
    }

    pub fn project_url(&self) -> String {
        match self.profile_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("https://gamebanana.com/mods/{}", self.id),
        }
    }
}

impl RemoteFile {
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or_default()
    }

    pub fn download_url(&self) -> &str {
        self.download_url.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or_default()
    }

    /// The description when it has content, otherwise the file name.
    pub fn label(&self) -> &str {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => description,
            _ => self.file_name(),
        }
    }
}

impl IntegrationLink {
    pub fn is_loader_download_url(&self) -> bool {
        self.is_loader_download_url.unwrap_or(false)
    }

    pub fn download_url(&self) -> &str {
        self.download_url.as_deref().map(str::trim).unwrap_or_default()
    }
}

/// Decodes one page of search results. Entries that do not match the
/// expected shape are dropped so a single broken record cannot sink the page.
pub fn decode_mod_page(entries: Vec<serde_json::Value>) -> Vec<RemoteMod> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<RemoteMod>(entry) {
            Ok(remote) => Some(remote),
            Err(err) => {
                warn!("dropping malformed mod record: {err}");
                None
            }
        })
        .collect()
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        Some(object @ serde_json::Value::Object(_)) => match serde_json::from_value(object) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                warn!("ignoring malformed object field: {err}");
                Ok(None)
            }
        },
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_php_arrays_decode_as_absent() {
        let remote: RemoteMod = serde_json::from_value(json!({
            "_idRow": 1,
            "_sName": "Mod",
            "_aCredits": [],
            "_aModManagerIntegrations": [],
            "_aPreviewMedia": []
        }))
        .unwrap();
        assert!(remote.credits.is_none());
        assert!(remote.integrations.is_none());
        assert!(remote.preview_media.is_none());
    }

    #[test]
    fn credit_categories_keep_source_order() {
        let remote: RemoteMod = serde_json::from_value(json!({
            "_idRow": 1,
            "_aCredits": {
                "Zeta": [{ "_sName": "first" }],
                "Alpha": [{ "_sName": "second" }]
            }
        }))
        .unwrap();
        let categories: Vec<&str> = remote
            .credits
            .as_ref()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(categories, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn null_fields_are_tolerated() {
        let remote: RemoteMod = serde_json::from_value(json!({
            "_idRow": 9,
            "_sName": null,
            "_sText": null,
            "_aFiles": null,
            "_aCredits": null
        }))
        .unwrap();
        assert_eq!(remote.name(), "");
        assert!(remote.files().is_empty());
        assert_eq!(remote.project_url(), "https://gamebanana.com/mods/9");
    }

    #[test]
    fn malformed_entries_are_dropped_from_a_page() {
        let page = decode_mod_page(vec![
            json!({ "_idRow": 1, "_sName": "ok" }),
            json!({ "_sName": "no id" }),
            json!("garbage"),
            json!({ "_idRow": 2, "_sName": "also ok" }),
        ]);
        let ids: Vec<u64> = page.iter().map(|remote| remote.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn file_label_prefers_description() {
        let file: RemoteFile = serde_json::from_value(json!({
            "_idRow": 3,
            "_sFile": "mod.zip",
            "_sDescription": "  "
        }))
        .unwrap();
        assert_eq!(file.label(), "mod.zip");

        let described: RemoteFile = serde_json::from_value(json!({
            "_idRow": 3,
            "_sFile": "mod.zip",
            "_sDescription": "Main file"
        }))
        .unwrap();
        assert_eq!(described.label(), "Main file");
    }
}
