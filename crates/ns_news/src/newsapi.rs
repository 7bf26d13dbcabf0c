use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use url::Url;
use ns_core::config::endpoint_url;
use ns_core::{default_if_absent, Article, Error, NewsSource, Result, Service};

#[derive(Deserialize)]
struct HeadlinesResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    articles: Option<Vec<RawArticle>>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    author: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    source: Option<RawSource>,
}

#[derive(Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        Article {
            title: default_if_absent(raw.title, ""),
            description: default_if_absent(raw.description, ""),
            content: default_if_absent(raw.content, ""),
            url: default_if_absent(raw.url, ""),
            source: default_if_absent(raw.source.and_then(|s| s.name), ""),
            author: raw.author,
            published_at: raw
                .published_at
                .and_then(|ts| DateTime::parse_from_rfc3339(&ts).ok())
                .map(|ts| ts.with_timezone(&Utc)),
        }
    }
}

/// Client for the NewsAPI `top-headlines` endpoint.
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn headlines_url(&self, country: &str) -> Result<Url> {
        let mut url = endpoint_url(&self.base_url, "v2/top-headlines")?;
        url.query_pairs_mut()
            .append_pair("country", country)
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn top_headlines(&self, country: &str) -> Result<Vec<Article>> {
        let url = self.headlines_url(country)?;
        tracing::debug!("Fetching top headlines for country={}", country);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::unreachable(Service::News, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::unreachable(Service::News, e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<HeadlinesResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::warn!("News source rejected request with {}: {}", status, message);
            return Err(Error::upstream(Service::News, Some(status.as_u16()), message));
        }

        let parsed: HeadlinesResponse = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(Service::News, e.to_string()))?;

        if parsed.status.as_deref() == Some("error") {
            let message = parsed
                .message
                .or(parsed.code)
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(Error::upstream(Service::News, Some(status.as_u16()), message));
        }

        let articles: Vec<Article> = parsed
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(Article::from)
            .collect();
        tracing::debug!("News source returned {} articles", articles.len());
        Ok(articles)
    }
}
