use serde::{Deserialize, Serialize};

pub const GAMEBANANA_SOURCE: &str = "GameBanana";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPackage {
    pub id: String,
    pub name: String,
    pub authors: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_readme: Option<String>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub file_size: u64,
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    pub images: Vec<PackageImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageImage {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// `None` when the remote offered no width variant; never an empty list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<PackageThumbnail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageThumbnail {
    pub uri: String,
    pub width_hint: u32,
}

impl NormalizedPackage {
    pub fn readme(&self) -> &str {
        self.markdown_readme.as_deref().unwrap_or_default()
    }
}
