use askama::Template;
use ns_core::Article;

/// One headline as the homepage shows it.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source: String,
    pub published: Option<String>,
    pub text: String,
}

impl From<&Article> for ArticleView {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            snippet: article.snippet().to_string(),
            url: article.url.clone(),
            source: article.source.clone(),
            published: article
                .published_at
                .map(|ts| ts.format("%b %-d, %Y %H:%M UTC").to_string()),
            text: article.simplifiable_text(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub articles: Vec<ArticleView>,
}

impl IndexTemplate {
    pub fn new(articles: &[Article]) -> Self {
        Self {
            articles: articles.iter().map(ArticleView::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_escapes_article_text() {
        let article = Article {
            title: "<script>alert(1)</script>".to_string(),
            description: "Tom & Jerry".to_string(),
            url: "https://example.com/a".to_string(),
            ..Default::default()
        };
        let html = IndexTemplate::new(&[article]).render().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn test_index_with_no_articles() {
        let html = IndexTemplate::new(&[]).render().unwrap();
        assert_eq!(html.matches("class=\"article\"").count(), 0);
        assert!(html.contains("No headlines right now."));
    }
}
