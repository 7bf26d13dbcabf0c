use std::sync::Arc;
use ns_core::{AppConfig, Error, ModelKind, Result};

pub mod dummy;
pub mod gemini;

pub use dummy::DummyModel;
pub use gemini::GeminiModel;
pub use ns_core::InferenceModel;

pub async fn create_model(config: &AppConfig) -> Result<Arc<dyn InferenceModel>> {
    match config.model {
        ModelKind::Gemini => {
            let api_key = config
                .gemini_api_key
                .clone()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| Error::Config("GEMINI_API_KEY is required".to_string()))?;
            let model = GeminiModel::new(api_key)
                .with_base_url(config.gemini_base_url.clone())
                .with_model(config.gemini_model.clone());
            Ok(Arc::new(model))
        }
        ModelKind::Dummy => Ok(Arc::new(DummyModel::new())),
    }
}
