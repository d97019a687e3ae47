//! Streaming chat-completion client.
//!
//! Sends a two-message (system + user) chat request with `stream: true` and
//! exposes the response as a stream of plain-text fragments decoded by
//! [`DeltaDecoder`].

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, Stream, StreamExt};
use payroll_core::sse::DeltaDecoder;
use serde::Serialize;
use serde_json::Value;

/// Default API root; `/chat/completions` is appended.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model name.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default generation budget.
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// Used when a failed upstream response carries no readable error message.
pub const GENERIC_UPSTREAM_MESSAGE: &str = "Failed to contact the completion API";

/// Text fragments in arrival order. An `Err` item ends the stream.
pub type FragmentStream = BoxStream<'static, Result<String, CompletionError>>;

/// Errors from the completion API layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The request could not be sent (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("Completion API error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the response body, or a generic message.
        message: String,
    },

    /// The response body failed after streaming had started.
    #[error("Completion stream interrupted: {0}")]
    Stream(#[source] reqwest::Error),
}

impl CompletionError {
    /// Message safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            Self::Request(_) | Self::Stream(_) => GENERIC_UPSTREAM_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Body of a streaming `POST /chat/completions` request.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// Connection settings for [`CompletionApi`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

/// HTTP client for the chat-completion API.
pub struct CompletionApi {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl CompletionApi {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CompletionConfig) -> Self {
        Self { client, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the streaming request for a system instruction and user prompt.
    pub fn chat_request(&self, system: &str, user: String, temperature: f32) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            stream: true,
            max_tokens: self.config.max_tokens,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }

    /// Send `request` and return its content deltas as a text stream.
    ///
    /// Fails before any fragment is produced if the request cannot be sent
    /// or the API answers with a non-2xx status.
    pub async fn stream_chat(
        &self,
        request: &ChatRequest,
    ) -> Result<FragmentStream, CompletionError> {
        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(CompletionError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = upstream_error_message(&body);
            tracing::warn!(
                status = status.as_u16(),
                %message,
                "Completion API rejected request"
            );
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(decode_fragments(Box::pin(response.bytes_stream())))
    }
}

/// Pull `error.message` out of an error response body.
pub fn upstream_error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string())
}

struct FragmentState<S> {
    upstream: S,
    decoder: DeltaDecoder,
    ready: VecDeque<String>,
    finished: bool,
}

/// Turn a raw event-stream body into text fragments.
///
/// Malformed events are skipped. A transport error is yielded once and ends
/// the stream. At end of body the trailing partial line gets one final
/// parse attempt.
pub fn decode_fragments<S, B>(upstream: S) -> FragmentStream
where
    S: Stream<Item = Result<B, reqwest::Error>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
{
    let state = FragmentState {
        upstream,
        decoder: DeltaDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.ready.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.finished {
                return None;
            }
            match state.upstream.next().await {
                Some(Ok(chunk)) => {
                    let fragments = state.decoder.push(chunk.as_ref());
                    state.ready.extend(fragments);
                }
                Some(Err(err)) => {
                    state.finished = true;
                    return Some((Err(CompletionError::Stream(err)), state));
                }
                None => {
                    state.finished = true;
                    state.ready.extend(state.decoder.finish());
                }
            }
        }
    })
    .boxed()
}
