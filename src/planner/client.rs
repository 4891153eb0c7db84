//! Reqwest-based client for OpenAI-compatible Chat Completions, streaming or not.

use std::{pin::Pin, time::Duration};

use async_stream::try_stream;
use futures_core::Stream;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AnalystError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(60);
        let base_url = cfg.api_base_url().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url, api_key: cfg.api_key() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn headers(&self, streaming: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if streaming {
            headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        }
        if let Some(key) = &self.api_key {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
        }
        Ok(headers)
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send one request and return the first choice's message text.
    pub async fn chat(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String> {
        let body = request_body(messages, opts, false);
        let resp = self
            .http
            .post(self.url())
            .headers(self.headers(false)?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalystError::Api { status: status.as_u16(), body });
        }

        let completion: Completion = resp.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(AnalystError::EmptyResponse)
    }

    /// Stream content deltas as server-sent events arrive.
    pub fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        opts: ChatOptions,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>> {
        let http = self.http.clone();
        let url = self.url();
        let headers = self.headers(true);

        Box::pin(try_stream! {
            let body = request_body(&messages, &opts, true);
            let resp = http
                .post(url)
                .headers(headers?)
                .json(&body)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                Err(AnalystError::Api { status: status.as_u16(), body })?;
                return;
            }

            let mut lines = LineBuffer::default();
            let mut stream = resp.bytes_stream();
            use futures_util::StreamExt as _;

            while let Some(chunk) = stream.next().await {
                let bytes = chunk?;
                for line in lines.push(&bytes) {
                    match parse_sse_line(&line) {
                        Some(SseLine::Done) => {
                            yield StreamEvent::Done;
                            return;
                        }
                        Some(SseLine::Content(parts)) => {
                            for part in parts {
                                yield StreamEvent::Content(part);
                            }
                        }
                        None => {}
                    }
                }
            }
            if let Some(SseLine::Content(parts)) = lines.finish().as_deref().and_then(parse_sse_line) {
                for part in parts {
                    yield StreamEvent::Content(part);
                }
            }
            yield StreamEvent::Done;
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum StreamEvent {
    Content(String),
    Done,
}

fn request_body(messages: &[ChatMessage], opts: &ChatOptions, stream: bool) -> serde_json::Value {
    serde_json::json!({
        "model": opts.model,
        "max_tokens": opts.max_tokens,
        "messages": messages,
        "stream": stream,
    })
}

/// Splits a byte stream into lines. Bytes are held until their line is
/// complete, so a character split across network chunks decodes intact.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever trailed the last newline.
    fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}

#[derive(Debug, PartialEq)]
enum SseLine {
    Content(Vec<String>),
    Done,
}

/// Interpret one line of an SSE body. Comments, blank lines and payloads
/// that are not completion chunks yield `None`.
fn parse_sse_line(line: &str) -> Option<SseLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    let payload = line.strip_prefix("data:")?.trim();
    if payload == "[DONE]" {
        return Some(SseLine::Done);
    }
    match serde_json::from_str::<Chunk>(payload) {
        Ok(chunk) => {
            let parts: Vec<String> = chunk
                .choices
                .into_iter()
                .filter_map(|c| c.delta.and_then(|d| d.content))
                .filter(|t| !t.is_empty())
                .collect();
            Some(SseLine::Content(parts))
        }
        Err(e) => {
            debug!(error = %e, "ignoring malformed stream line");
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

// Minimal chunk structures for OpenAI-like streaming
#[derive(Debug, Deserialize)]
struct Chunk {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    delta: Option<Message>,
}
