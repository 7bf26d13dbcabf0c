use crate::types::Article;

/// Number of headlines surfaced per homepage request.
pub const MAX_ARTICLES: usize = 5;

/// Lenient field access for upstream payloads: absent or `null` becomes `default`.
pub fn default_if_absent(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

/// Keeps the first `MAX_ARTICLES` entries in source order.
pub fn top_articles(mut articles: Vec<Article>) -> Vec<Article> {
    articles.truncate(MAX_ARTICLES);
    articles
}
