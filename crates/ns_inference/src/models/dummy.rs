use async_trait::async_trait;
use futures::{stream, StreamExt};
use std::fmt;
use ns_core::{Result, TextStream};
use super::InferenceModel;

const SUMMARY_WORDS: usize = 20;

/// Offline stand-in that streams back the first words of the article, one
/// word per fragment.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn stream_completion(&self, prompt: &str) -> Result<TextStream> {
        // Drop the instruction line; only the article is echoed.
        let article = prompt.split_once("\n\n").map_or(prompt, |(_, rest)| rest);
        let fragments: Vec<Result<String>> = article
            .split_whitespace()
            .take(SUMMARY_WORDS)
            .map(|word| Ok(format!("{} ", word)))
            .collect();
        Ok(stream::iter(fragments).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{simplify_prompt, simplify_text};

    #[tokio::test]
    async fn test_dummy_model_streams_words() {
        let model = DummyModel::new();
        let stream = model
            .stream_completion(&simplify_prompt("This is a test article."))
            .await
            .unwrap();
        let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["This ", "is ", "a ", "test ", "article. "]);
    }

    #[tokio::test]
    async fn test_dummy_model_caps_length() {
        let model = DummyModel::new();
        let text = (0..50).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let summary = simplify_text(&model, &text).await.unwrap();
        assert_eq!(summary.split_whitespace().count(), SUMMARY_WORDS);
        assert!(summary.starts_with("w0 w1"));
    }
}
