use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use crate::Result;

/// Incremental completion text. Finite and consumed once; fragment
/// boundaries carry no meaning.
pub type TextStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Send a single user-role prompt and return the completion as it streams in.
    async fn stream_completion(&self, prompt: &str) -> Result<TextStream>;
}
