//! LLM Client — the single point of entry for remote text-generation calls.
//!
//! Scorers depend only on the `TextGenerationClient` trait; the concrete
//! transport is chosen at bootstrap and injected through `AppState`.
//!
//! One attempt per call, bounded by the configured timeout. Failures are
//! reported to the caller, never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Groq exposes an OpenAI-compatible chat-completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TIMEOUT_SECS: u64 = 45;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("unreadable response envelope: {0}")]
    InvalidEnvelope(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LlmError::Transport(e) if e.is_timeout())
    }
}

/// A single generation request. Borrowed so prompts are never copied.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub system: Option<&'a str>,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Capability interface for remote text generation.
#[async_trait]
pub trait TextGenerationClient: Send + Sync {
    /// Returns the raw text of the model's reply.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Raw-HTTP client for OpenAI-compatible chat-completions APIs (Groq by default).
#[derive(Clone)]
pub struct ChatCompletionsClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl TextGenerationClient for ChatCompletionsClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("LLM API returned {}", status);
            // Prefer the structured error message when the body carries one
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::InvalidEnvelope(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Returns the slice from the first `{` to the last `}`, if both exist in order.
/// Models often wrap JSON in prose or code fences; this recovers the object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Truncates to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Router};

    /// Serves a canned response on an ephemeral port and returns its URL.
    async fn spawn_stub(status: StatusCode, body: &'static str, delay: Duration) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move || async move {
                tokio::time::sleep(delay).await;
                (status, body)
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    fn client_for(url: String, timeout: Duration) -> ChatCompletionsClient {
        ChatCompletionsClient::new("test-key".into(), url, "test-model".into(), timeout).unwrap()
    }

    fn request(prompt: &str) -> GenerationRequest<'_> {
        GenerationRequest {
            system: Some("be terse"),
            prompt,
            max_tokens: 64,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice_content() {
        let url = spawn_stub(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"ats_score\": 81}"}}],
               "usage":{"prompt_tokens":12,"completion_tokens":5}}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(url, Duration::from_secs(5));

        let reply = client.generate(request("score this")).await.unwrap();
        assert_eq!(reply, "{\"ats_score\": 81}");
        assert_eq!(client.model(), "test-model");
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error_with_detail() {
        let url = spawn_stub(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API Key"}}"#,
            Duration::ZERO,
        )
        .await;
        let client = client_for(url, Duration::from_secs(5));

        match client.generate(request("x")).await {
            Err(LlmError::Service { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unstructured_error_body_is_kept_verbatim() {
        let url = spawn_stub(StatusCode::BAD_GATEWAY, "upstream down", Duration::ZERO).await;
        let client = client_for(url, Duration::from_secs(5));

        match client.generate(request("x")).await {
            Err(LlmError::Service { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let url = spawn_stub(StatusCode::OK, r#"{"choices":[]}"#, Duration::ZERO).await;
        let client = client_for(url, Duration::from_secs(5));

        assert!(matches!(
            client.generate(request("x")).await,
            Err(LlmError::EmptyContent)
        ));
    }

    #[tokio::test]
    async fn test_garbage_envelope_is_invalid_envelope() {
        let url = spawn_stub(StatusCode::OK, "<html>oops</html>", Duration::ZERO).await;
        let client = client_for(url, Duration::from_secs(5));

        assert!(matches!(
            client.generate(request("x")).await,
            Err(LlmError::InvalidEnvelope(_))
        ));
    }

    #[tokio::test]
    async fn test_slow_server_times_out_as_transport_failure() {
        let url = spawn_stub(StatusCode::OK, "{}", Duration::from_secs(3)).await;
        let client = client_for(url, Duration::from_millis(100));

        let err = client.generate(request("x")).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");

        let (status, code, message) = crate::errors::AppError::from(err).describe();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "REMOTE_TRANSPORT_FAILURE");
        assert!(message.starts_with("AI analysis timed out"), "{message}");
    }

    #[test]
    fn test_extract_json_object_strips_prose_and_fences() {
        let reply = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps.";
        assert_eq!(extract_json_object(reply), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_extract_json_object_none_without_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }
}
