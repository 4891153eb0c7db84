//! Turning a natural-language question into a [`QueryPlan`] via a hosted model.

pub mod client;
pub mod prompt;

use futures_util::StreamExt;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AnalystError, Result};
use crate::plan::{extract_plan, QueryPlan};

pub use client::{ChatMessage, ChatOptions, LlmClient, Role, StreamEvent};
pub use prompt::{PlanRequest, SYSTEM_PROMPT};

#[derive(Debug, Clone)]
pub struct Planner {
    client: LlmClient,
    model: String,
    max_tokens: u32,
    streaming: bool,
    config_path: String,
}

impl Planner {
    /// Build from config; `model` overrides `DEFAULT_MODEL` when given.
    pub fn from_config(cfg: &Config, model: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: LlmClient::from_config(cfg)?,
            model: model.map(str::to_string).unwrap_or_else(|| cfg.model()),
            max_tokens: cfg
                .get_u64("MAX_TOKENS")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(1024),
            streaming: !cfg.get_bool("DISABLE_STREAMING"),
            config_path: cfg.config_path.display().to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub fn messages(request: &PlanRequest) -> Vec<ChatMessage> {
        vec![
            ChatMessage::new(Role::System, SYSTEM_PROMPT),
            ChatMessage::new(Role::User, request.user_message()),
        ]
    }

    /// Ask the model for a plan. Returns the plan and the raw text it came from.
    pub async fn plan(&self, request: &PlanRequest) -> Result<(QueryPlan, String)> {
        if !self.client.has_api_key() {
            return Err(AnalystError::MissingApiKey(self.config_path.clone()));
        }
        let messages = Self::messages(request);
        let opts = ChatOptions { model: self.model.clone(), max_tokens: self.max_tokens };
        info!(model = %self.model, streaming = self.streaming, "requesting query plan");

        let text = if self.streaming {
            let mut stream = self.client.chat_stream(messages, opts);
            let mut text = String::new();
            while let Some(ev) = stream.next().await {
                match ev? {
                    StreamEvent::Content(t) => text.push_str(&t),
                    StreamEvent::Done => break,
                }
            }
            text
        } else {
            self.client.chat(&messages, &opts).await?
        };

        if text.trim().is_empty() {
            return Err(AnalystError::EmptyResponse);
        }
        debug!(chars = text.len(), "planner replied");
        let plan = extract_plan(&text)?;
        Ok((plan, text))
    }
}
