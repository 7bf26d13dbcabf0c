use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &str;

    /// Ranked headlines for a country, in the order the source returns them.
    async fn top_headlines(&self, country: &str) -> Result<Vec<Article>>;
}
