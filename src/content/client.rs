use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{valid_chapter, Chapter, Verse};

pub const DEFAULT_HOST: &str = "bhagavad-gita3.p.rapidapi.com";

const HOST_HEADER: &str = "X-RapidAPI-Host";
const KEY_HEADER: &str = "X-RapidAPI-Key";

#[derive(Debug, Error)]
pub enum ContentError {
    /// No API key was configured.
    #[error("RapidAPI key is not configured")]
    MissingKey,
    /// Chapter or verse number outside the text.
    #[error("invalid chapter or verse number")]
    InvalidReference,
    /// The API answered with a non-success status.
    #[error("content API returned {0}")]
    Status(StatusCode),
    #[error("content API request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct GitaClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    key: Option<String>,
}

impl GitaClient {
    pub fn new(host: String, key: Option<String>) -> Self {
        let base_url = format!("https://{host}");
        Self::with_base_url(base_url, host, key)
    }

    /// Same as [`GitaClient::new`] but sends requests to `base_url` instead
    /// of `https://{host}`.
    pub fn with_base_url(base_url: String, host: String, key: Option<String>) -> Self {
        let key = key.filter(|k| !k.trim().is_empty());
        if key.is_none() {
            tracing::error!("RapidAPI key is not configured, content pages will show an error");
        }
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            host,
            key,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.key.is_some()
    }

    pub async fn chapters(&self) -> Result<Vec<Chapter>, ContentError> {
        self.get("/v2/chapters/?skip=0&limit=18").await
    }

    pub async fn chapter(&self, chapter: u32) -> Result<Chapter, ContentError> {
        if !valid_chapter(chapter) {
            return Err(ContentError::InvalidReference);
        }
        self.get(&format!("/v2/chapters/{chapter}/")).await
    }

    pub async fn chapter_verses(&self, chapter: u32) -> Result<Vec<Verse>, ContentError> {
        if !valid_chapter(chapter) {
            return Err(ContentError::InvalidReference);
        }
        self.get(&format!("/v2/chapters/{chapter}/verses/")).await
    }

    pub async fn verse(&self, chapter: u32, verse: u32) -> Result<Verse, ContentError> {
        if !valid_chapter(chapter) || verse < 1 {
            return Err(ContentError::InvalidReference);
        }
        self.get(&format!("/v2/chapters/{chapter}/verses/{verse}/"))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ContentError> {
        let Some(key) = &self.key else {
            tracing::error!("refusing to call content API without a RapidAPI key");
            return Err(ContentError::MissingKey);
        };

        let url = format!("{}{path}", self.base_url);
        tracing::debug!("fetching {url}");

        let resp = self
            .http
            .get(&url)
            .header(HOST_HEADER, &self.host)
            .header(KEY_HEADER, key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("content API error for {path}: {status} - {text}");
            return Err(ContentError::Status(status));
        }

        Ok(resp.json::<T>().await?)
    }
}
