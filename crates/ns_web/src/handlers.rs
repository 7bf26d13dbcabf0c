use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Html, IntoResponse},
    Json,
};
use askama::Template;
use serde_json::json;
use std::sync::Arc;
use ns_core::{top_articles, Error, SimplificationRequest, SimplificationResult};
use crate::error::{ApiError, PageError};
use crate::templates::IndexTemplate;
use crate::AppState;

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, PageError> {
    let articles = state
        .news_source
        .top_headlines(&state.config.country)
        .await?;
    let received = articles.len();
    let articles = top_articles(articles);
    tracing::info!(
        "📰 Showing {} of {} headlines from {}",
        articles.len(),
        received,
        state.news_source.name()
    );

    let html = IndexTemplate::new(&articles)
        .render()
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(Html(html))
}

pub async fn simplify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SimplificationRequest>, JsonRejection>,
) -> Result<Json<SimplificationResult>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        "🧠 Simplifying {} chars with {}",
        request.content.len(),
        state.inference_model.name()
    );
    let summary =
        ns_inference::simplify_text(state.inference_model.as_ref(), &request.content).await?;
    Ok(Json(SimplificationResult { summary }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
