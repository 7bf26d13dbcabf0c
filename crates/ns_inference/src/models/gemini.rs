use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use url::Url;
use ns_core::config::{endpoint_url, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
use ns_core::{Error, Result, Service, TextStream};
use crate::sse::SseDecoder;
use super::InferenceModel;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ApiError {
    code: Option<u16>,
    message: Option<String>,
}

impl StreamChunk {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect::<String>())
            .unwrap_or_default()
    }
}

pub struct GeminiModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn stream_url(&self) -> Result<Url> {
        let path = format!("v1beta/models/{}:streamGenerateContent", self.model);
        let mut url = endpoint_url(&self.base_url, &path)?;
        url.query_pairs_mut().append_pair("alt", "sse");
        Ok(url)
    }
}

impl fmt::Debug for GeminiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl InferenceModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn stream_completion(&self, prompt: &str) -> Result<TextStream> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.stream_url()?)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::unreachable(Service::Summarization, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::warn!("Gemini rejected completion request with {}: {}", status, message);
            return Err(Error::upstream(Service::Summarization, Some(status.as_u16()), message));
        }

        tracing::debug!("Streaming completion from {}", self.model);
        Ok(decode_fragments(response.bytes_stream().boxed()))
    }
}

/// Pulls `error.message` out of a Gemini error body, which the streaming
/// endpoint sometimes wraps in a one-element array.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error").or_else(|| value.get(0)?.get("error"))?;
    error.get("message")?.as_str().map(str::to_string)
}

fn parse_chunk(payload: &str) -> Result<String> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|e| Error::malformed(Service::Summarization, e.to_string()))?;
    if let Some(error) = chunk.error {
        return Err(Error::upstream(
            Service::Summarization,
            error.code,
            error.message.unwrap_or_else(|| "stream aborted".to_string()),
        ));
    }
    Ok(chunk.text())
}

struct DecodeState<B> {
    bytes: BoxStream<'static, std::result::Result<B, reqwest::Error>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

/// Turns an SSE byte stream into completion fragments. Stops after the first
/// error.
pub(crate) fn decode_fragments<B>(
    bytes: BoxStream<'static, std::result::Result<B, reqwest::Error>>,
) -> TextStream
where
    B: AsRef<[u8]> + Send + 'static,
{
    let state = DecodeState {
        bytes,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(payload) = state.pending.pop_front() {
                if payload.trim().is_empty() {
                    continue;
                }
                let fragment = parse_chunk(&payload);
                if fragment.is_err() {
                    state.pending.clear();
                    state.finished = true;
                }
                return Some((fragment, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.push(chunk.as_ref());
                    state.pending.extend(events);
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(Error::unreachable(Service::Summarization, e)), state));
                }
                None => {
                    state.finished = true;
                    let decoder = std::mem::take(&mut state.decoder);
                    state.pending.extend(decoder.finish());
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collect_completion, simplify_text};
    use mockito::Matcher;
    use serde_json::json;

    const STREAM_PATH: &str = "/v1beta/models/gemini-2.5-flash:streamGenerateContent";

    fn sse_chunk(text: &str) -> String {
        let chunk = json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        });
        format!("data: {}\r\n\r\n", chunk)
    }

    fn byte_stream(chunks: Vec<&'static str>) -> BoxStream<'static, std::result::Result<&'static [u8], reqwest::Error>> {
        stream::iter(chunks.into_iter().map(|c| Ok(c.as_bytes()))).boxed()
    }

    #[tokio::test]
    async fn test_decode_fragments_across_chunk_boundaries() {
        let bytes = byte_stream(vec![
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"The \"}]}}]}\n",
            "\ndata: {\"candidates\":[{\"content\":{\"parts\":[{\"te",
            "xt\":\"sky \"},{\"text\":\"is \"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"blue.\"}]}}]}",
        ]);
        let fragments: Vec<String> = decode_fragments(bytes).map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["The ", "sky is ", "blue."]);
    }

    #[tokio::test]
    async fn test_chunks_without_text_yield_empty_fragments() {
        let bytes = byte_stream(vec![
            "data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n\n",
            "data: {\"usageMetadata\":{\"totalTokenCount\":3}}\n\n",
        ]);
        let fragments: Vec<String> = decode_fragments(bytes).map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["", ""]);
    }

    #[tokio::test]
    async fn test_error_chunk_ends_stream() {
        let bytes = byte_stream(vec![
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Half\"}]}}]}\n\n",
            "data: {\"error\":{\"code\":503,\"message\":\"overloaded\"}}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"late\"}]}}]}\n\n",
        ]);
        let err = collect_completion(decode_fragments(bytes)).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_malformed_chunk() {
        let bytes = byte_stream(vec!["data: not json\n\n"]);
        let err = collect_completion(decode_fragments(bytes)).await.unwrap_err();
        assert_eq!(err.code(), "upstream_malformed");
    }

    #[tokio::test]
    async fn test_stream_completion_against_mock() {
        let mut server = mockito::Server::new_async().await;
        let body = [sse_chunk("The "), sse_chunk("sky "), sse_chunk("is blue.")].concat();
        let mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "contents": [{
                    "role": "user",
                    "parts": [{"text": "Simplify this news article in 2-3 easy to understand sentences:\n\nX"}]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "text/event-stream")
            .with_body(body)
            .create_async()
            .await;

        let model = GeminiModel::new("test-key").with_base_url(server.url());
        let summary = simplify_text(&model, "X").await.unwrap();
        assert_eq!(summary, "The sky is blue.");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_request_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", STREAM_PATH)
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"[{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}]"#)
            .create_async()
            .await;

        let model = GeminiModel::new("bad-key").with_base_url(server.url());
        let Err(err) = model.stream_completion("prompt").await else {
            panic!("rejected request should not start a stream");
        };
        match err {
            Error::Upstream { service, status, message } => {
                assert_eq!(service, Service::Summarization);
                assert_eq!(status, Some(400));
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(r#"{"error":{"message":"quota"}}"#).as_deref(), Some("quota"));
        assert_eq!(error_message(r#"[{"error":{"message":"bad"}}]"#).as_deref(), Some("bad"));
        assert_eq!(error_message("oops"), None);
    }

    #[test]
    fn test_stream_url_under_proxy_path() {
        let model = GeminiModel::new("k").with_base_url("https://proxy.example.com/gemini");
        assert_eq!(
            model.stream_url().unwrap().as_str(),
            "https://proxy.example.com/gemini/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let model = GeminiModel::new("very-secret");
        assert!(!format!("{:?}", model).contains("very-secret"));
    }
}
