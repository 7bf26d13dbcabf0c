use std::fmt;
use url::Url;
use crate::{Error, Result};

pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_COUNTRY: &str = "us";

/// Resolves `path` under `base_url`, keeping any path prefix the base carries
/// (`https://proxy/newsapi` + `v2/x` is `https://proxy/newsapi/v2/x`).
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)
        .map_err(|e| Error::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::Config(format!("invalid endpoint '{}' under '{}': {}", path, base_url, e)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ModelKind {
    /// Google Gemini, streamed over server-sent events
    #[default]
    Gemini,
    /// Offline model echoing the start of the article
    Dummy,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Gemini => write!(f, "gemini"),
            ModelKind::Dummy => write!(f, "dummy"),
        }
    }
}

/// Process-wide settings, built once at start-up and handed to whoever needs them.
#[derive(Clone)]
pub struct AppConfig {
    pub news_api_key: String,
    pub gemini_api_key: Option<String>,
    pub country: String,
    pub model: ModelKind,
    pub gemini_model: String,
    pub news_base_url: String,
    pub gemini_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            news_api_key: String::new(),
            gemini_api_key: None,
            country: DEFAULT_COUNTRY.to_string(),
            model: ModelKind::default(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            news_base_url: DEFAULT_NEWS_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("news_api_key", &"<redacted>")
            .field("gemini_api_key", &self.gemini_api_key.as_deref().map(|_| "<redacted>"))
            .field("country", &self.country)
            .field("model", &self.model)
            .field("gemini_model", &self.gemini_model)
            .field("news_base_url", &self.news_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .finish()
    }
}

impl AppConfig {
    pub fn new(news_api_key: impl Into<String>, gemini_api_key: Option<String>) -> Self {
        Self {
            news_api_key: news_api_key.into(),
            gemini_api_key,
            ..Default::default()
        }
    }

    /// Fails fast on missing credentials instead of deferring to an upstream 401.
    pub fn validate(&self) -> Result<()> {
        if self.news_api_key.trim().is_empty() {
            return Err(Error::Config("NEWS_API_KEY is required".to_string()));
        }
        if self.model == ModelKind::Gemini
            && self.gemini_api_key.as_deref().map_or(true, |key| key.trim().is_empty())
        {
            return Err(Error::Config("GEMINI_API_KEY is required".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(Error::Config("country must not be empty".to_string()));
        }
        for (name, value) in [
            ("news base URL", &self.news_base_url),
            ("Gemini base URL", &self.gemini_base_url),
        ] {
            Url::parse(value)
                .map_err(|e| Error::Config(format!("invalid {name} '{value}': {e}")))?;
        }
        Ok(())
    }
}
