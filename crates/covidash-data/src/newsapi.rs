use std::time::Duration;

use async_trait::async_trait;
use covidash_core::Article;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{FetchError, Result};
use crate::source::NewsSource;

/// Client for the NewsAPI `/v2/everything` endpoint.
pub struct NewsApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

impl NewsApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "newsapi"
    }

    async fn fetch_articles(&self, search_terms: &str) -> Result<Vec<Article>> {
        let url = format!("{}/v2/everything", self.base_url);

        info!(terms = %search_terms, "requesting news articles");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("q", search_terms),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "news API error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: EverythingResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!(count = body.articles.len(), "news articles received");
        Ok(body.articles)
    }
}
