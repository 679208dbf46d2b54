//! Language model client seam.
//!
//! The summarizer only needs "send these chat turns, get one reply back".
//! [`LanguageModel`] captures that; [`openai::OpenAiClient`] implements it
//! against any OpenAI-compatible chat-completions endpoint.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Roles accepted by chat-completion endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A model that turns a chat exchange into a single reply text.
///
/// Errors are whatever the transport or provider produced; callers pass them
/// through untouched. Timeouts are the implementation's concern.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn send_request(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Model identifier for logs.
    fn model_name(&self) -> &str;
}

/// Create the configured model client.
pub fn create_client(config: &crate::config::CondenseConfig) -> Result<Box<dyn LanguageModel>> {
    let client = openai::OpenAiClient::new(&config.llm, config.api_key())?;
    Ok(Box::new(client))
}
