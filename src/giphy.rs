use std::time::Duration;

use serde_json::Value;

use crate::{db::gifs::TITLE_MAX_CHARS, AppResult, GetField};

/// Giphy never gets asked for more than this many gifs per term.
pub const RESULT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifRecord {
    pub title: String,
    pub embed_url: String,
}

#[derive(Clone)]
pub struct Giphy {
    http: reqwest::Client,
    search_url: String,
    api_key: String,
}

impl Giphy {
    pub fn new(api_key: String, search_url: String, timeout: Duration) -> AppResult<Self> {
        let http = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .build()?;

        Ok(Giphy { http, search_url, api_key })
    }

    /// One keyword search, no retries. Every way this can go wrong, including
    /// an empty result list, comes back as [`crate::AppError::Upstream`].
    pub async fn search(&self, query: &str) -> AppResult<Vec<GifRecord>> {
        self.fetch(query).await.map_err(|err| err.upstream())
    }

    async fn fetch(&self, query: &str) -> AppResult<Vec<GifRecord>> {
        let limit = RESULT_LIMIT.to_string();
        tracing::info!("asking giphy for {query:?}");

        let body: Value = self.http.get(&self.search_url)
            .query(&[("api_key", self.api_key.as_str()), ("q", query), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let records = body.get_array_field("data")?
            .iter()
            .take(RESULT_LIMIT)
            .map(|gif| Ok(GifRecord {
                title: gif.get_str_field("title")?.chars().take(TITLE_MAX_CHARS).collect(),
                embed_url: gif.get_str_field("embed_url")?,
            }))
            .collect::<AppResult<Vec<_>>>()?;

        if records.is_empty() {
            return Err(format!("no gifs found for {query:?}").into());
        }

        Ok(records)
    }
}
