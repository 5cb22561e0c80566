use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::api::RemoteMod;
use crate::client::{ByteFetcher, ModApi};
use crate::errors::HttpError;
use crate::html::HtmlConverter;

pub fn remote_mod(value: serde_json::Value) -> RemoteMod {
    serde_json::from_value(value).expect("test mod record should deserialize")
}

pub fn manifest_bytes(releases: &[(&str, &str)], extra_data: serde_json::Value) -> Vec<u8> {
    let releases: Vec<serde_json::Value> = releases
        .iter()
        .map(|(version, file_name)| {
            serde_json::json!({ "Version": version, "FileName": file_name })
        })
        .collect();
    serde_json::to_vec(&serde_json::json!({ "Releases": releases, "ExtraData": extra_data }))
        .expect("manifest should serialize")
}

/// Tags its input so tests can tell which conversion produced a field.
pub struct StubHtml;

impl HtmlConverter for StubHtml {
    fn to_plain_text(&self, html: &str) -> String {
        format!("text:{html}")
    }

    fn to_markdown(&self, html: &str) -> String {
        format!("md:{html}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    pub text: String,
    pub game_id: u64,
    pub page: u32,
    pub page_size: u32,
}

pub struct FakeApi {
    result: Option<Vec<RemoteMod>>,
    fail_with: Option<u16>,
    calls: Mutex<Vec<SearchCall>>,
}

impl FakeApi {
    pub fn returning(result: Option<Vec<RemoteMod>>) -> Self {
        Self {
            result,
            fail_with: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            result: None,
            fail_with: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModApi for FakeApi {
    async fn search_mods(
        &self,
        text: &str,
        game_id: u64,
        page: u32,
        page_size: u32,
    ) -> Result<Option<Vec<RemoteMod>>, HttpError> {
        self.calls.lock().unwrap().push(SearchCall {
            text: text.to_string(),
            game_id,
            page,
            page_size,
        });
        if let Some(status) = self.fail_with {
            return Err(HttpError::Status {
                status: StatusCode::from_u16(status).unwrap(),
                body: "fake failure".to_string(),
            });
        }
        Ok(self.result.clone())
    }
}

enum FakeResponse {
    Body(Vec<u8>),
    Status(u16),
    Cancel(CancellationToken),
}

#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, FakeResponse>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Body(body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Status(status));
        self
    }

    /// Fetching `url` cancels `token` and then never completes.
    pub fn cancelling_on(mut self, url: &str, token: CancellationToken) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Cancel(token));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ByteFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(FakeResponse::Body(body)) => Ok(body.clone()),
            Some(FakeResponse::Status(status)) => Err(HttpError::Status {
                status: StatusCode::from_u16(*status).unwrap(),
                body: String::new(),
            }),
            Some(FakeResponse::Cancel(token)) => {
                token.cancel();
                std::future::pending().await
            }
            None => Err(HttpError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            }),
        }
    }
}
