use std::sync::Arc;
use ns_core::{AppConfig, InferenceModel, NewsSource};

/// Read-only handles shared by every request.
pub struct AppState {
    pub config: AppConfig,
    pub news_source: Arc<dyn NewsSource>,
    pub inference_model: Arc<dyn InferenceModel>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        news_source: Arc<dyn NewsSource>,
        inference_model: Arc<dyn InferenceModel>,
    ) -> Self {
        Self {
            config,
            news_source,
            inference_model,
        }
    }
}
