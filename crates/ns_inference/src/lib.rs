use futures::StreamExt;
use ns_core::{InferenceModel, Result, TextStream};

pub mod models;
pub mod sse;

pub use models::create_model;

/// Instruction prepended to every article sent for simplification.
pub const SIMPLIFY_INSTRUCTION: &str =
    "Simplify this news article in 2-3 easy to understand sentences:";

pub fn simplify_prompt(content: &str) -> String {
    format!("{}\n\n{}", SIMPLIFY_INSTRUCTION, content)
}

/// Concatenates fragments in delivery order and trims the result.
///
/// The first failing fragment aborts the whole completion; no partial text
/// is returned.
pub async fn collect_completion(mut stream: TextStream) -> Result<String> {
    let mut text = String::new();
    let mut fragments = 0usize;
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?);
        fragments += 1;
    }
    tracing::debug!("Collected {} completion fragments ({} bytes)", fragments, text.len());
    Ok(text.trim().to_string())
}

/// Rewrites `content` in plain language. Blank content yields an empty
/// summary without contacting the model.
pub async fn simplify_text(model: &dyn InferenceModel, content: &str) -> Result<String> {
    if content.trim().is_empty() {
        return Ok(String::new());
    }
    let stream = model.stream_completion(&simplify_prompt(content)).await?;
    collect_completion(stream).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use ns_core::{Error, Service};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct ScriptedModel {
        fragments: Vec<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl InferenceModel for ScriptedModel {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn stream_completion(&self, prompt: &str) -> Result<TextStream> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let fragments: Vec<Result<String>> =
                self.fragments.iter().map(|f| Ok(f.to_string())).collect();
            Ok(stream::iter(fragments).boxed())
        }
    }

    #[tokio::test]
    async fn test_collect_completion_keeps_delivery_order() {
        let fragments = vec![Ok("The ".to_string()), Ok("sky ".to_string()), Ok("is blue.".to_string())];
        let text = collect_completion(stream::iter(fragments).boxed()).await.unwrap();
        assert_eq!(text, "The sky is blue.");
    }

    #[tokio::test]
    async fn test_collect_completion_trims_and_splits_mid_word() {
        let fragments = vec![
            Ok("  \nPri".to_string()),
            Ok("ces ".to_string()),
            Ok(String::new()),
            Ok("rose.\n\n".to_string()),
        ];
        let text = collect_completion(stream::iter(fragments).boxed()).await.unwrap();
        assert_eq!(text, "Prices rose.");
    }

    #[tokio::test]
    async fn test_collect_completion_fails_on_broken_fragment() {
        let fragments = vec![
            Ok("Partial ".to_string()),
            Err(Error::upstream(Service::Summarization, None, "stream reset")),
            Ok("never seen".to_string()),
        ];
        let err = collect_completion(stream::iter(fragments).boxed()).await.unwrap_err();
        assert_eq!(err.code(), "summarization_source_unavailable");
    }

    #[tokio::test]
    async fn test_simplify_text_sends_instruction_and_content() {
        let model = ScriptedModel {
            fragments: vec!["Short ", "version."],
            ..Default::default()
        };
        let summary = simplify_text(&model, "A long article.").await.unwrap();
        assert_eq!(summary, "Short version.");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            "Simplify this news article in 2-3 easy to understand sentences:\n\nA long article."
        );
    }

    #[tokio::test]
    async fn test_simplify_text_blank_content_skips_model() {
        let model = ScriptedModel {
            fragments: vec!["should not appear"],
            ..Default::default()
        };
        assert_eq!(simplify_text(&model, "").await.unwrap(), "");
        assert_eq!(simplify_text(&model, "  \n").await.unwrap(), "");
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
