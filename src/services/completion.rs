// src/services/completion.rs
//! Client for a hosted, OpenAI-compatible chat-completion API.
//!
//! One non-streaming `POST {base_url}/v1/chat/completions` per call with a
//! single user message. The reply is the trimmed content of the first
//! choice; blank content is reported as [`Completion::Empty`] rather than
//! as an error so the caller can answer with a static message.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::CompletionConfig;
use crate::error::{ChatError, make_snippet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Reply(String),
    Empty,
}

impl Completion {
    pub fn from_text(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some(t) if !t.is_empty() => Completion::Reply(t.to_string()),
            _ => Completion::Empty,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, ChatError>;
}

#[derive(Debug)]
pub struct OpenAiClient {
    client: reqwest::Client,
    url_chat: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Builds the HTTP client with auth header and timeout. Without an API
    /// key the request goes out unauthenticated and the provider rejects it.
    pub fn new(cfg: &CompletionConfig) -> Result<Self, ChatError> {
        let mut headers = header::HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            let value = header::HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| ChatError::Decode(format!("invalid API key header: {e}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{}/v1/chat/completions", cfg.base_url.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.base_url,
            timeout_secs = cfg.timeout.as_secs(),
            has_api_key = cfg.api_key.is_some(),
            "completion client initialized"
        );

        Ok(Self {
            client,
            url_chat,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, ChatError> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            stream: false,
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "POST {}", self.url_chat);

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(
                %status,
                %snippet,
                model = %self.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );
            return Err(ChatError::Status {
                status,
                url: self.url_chat.clone(),
                snippet,
            });
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            ChatError::Decode(format!("{e}; expected `choices[0].message.content`"))
        })?;

        // Only blank text counts as "no answer"; a missing choice or null
        // content is a malformed response.
        let content = out
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::Decode("response has no choices".into()))?
            .message
            .content
            .ok_or_else(|| ChatError::Decode("choices[0].message.content is null".into()))?;
        let completion = Completion::from_text(Some(content.as_str()));

        info!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis(),
            empty = matches!(completion, Completion::Empty),
            "chat completion finished"
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn cfg(base_url: String) -> CompletionConfig {
        CompletionConfig {
            api_key: Some("sk-test".into()),
            base_url,
            model: "gpt-3.5-turbo".into(),
            temperature: 0.4,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn blank_text_is_empty() {
        assert_eq!(Completion::from_text(None), Completion::Empty);
        assert_eq!(Completion::from_text(Some(" \n\t")), Completion::Empty);
        assert_eq!(
            Completion::from_text(Some("  Hallo ")),
            Completion::Reply("Hallo".into())
        );
    }

    #[tokio::test]
    async fn sends_single_user_message_and_trims_reply() {
        let seen: Arc<Mutex<Option<(Value, Option<String>)>>> = Arc::default();
        let sink = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *sink.lock().unwrap() = Some((body, auth));
                    Json(json!({
                        "choices": [{ "message": { "role": "assistant", "content": "  Gern beraten wir Sie.\n" } }]
                    }))
                }
            }),
        );
        let base = serve(app).await;

        let client = OpenAiClient::new(&cfg(format!("{base}/"))).unwrap();
        let out = client.complete("Frage?").await.unwrap();
        assert_eq!(out, Completion::Reply("Gern beraten wir Sie.".into()));

        let (body, auth) = seen.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["stream"], false);
        assert!((body["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Frage?");
    }

    #[tokio::test]
    async fn empty_choices_are_decode_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let client = OpenAiClient::new(&cfg(serve(app).await)).unwrap();
        let err = client.complete("x").await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn null_content_is_decode_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] }))
            }),
        );
        let client = OpenAiClient::new(&cfg(serve(app).await)).unwrap();
        let err = client.complete("x").await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }

    #[tokio::test]
    async fn blank_content_is_empty_completion() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                Json(json!({ "choices": [{ "message": { "role": "assistant", "content": "  \n " } }] }))
            }),
        );
        let client = OpenAiClient::new(&cfg(serve(app).await)).unwrap();
        assert_eq!(client.complete("x").await.unwrap(), Completion::Empty);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let client = OpenAiClient::new(&cfg(serve(app).await)).unwrap();
        let err = client.complete("x").await.unwrap_err();
        match err {
            ChatError::Status { status, snippet, .. } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(snippet, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let app = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
        let client = OpenAiClient::new(&cfg(serve(app).await)).unwrap();
        let err = client.complete("x").await.unwrap_err();
        assert!(matches!(err, ChatError::Decode(_)));
    }
}
