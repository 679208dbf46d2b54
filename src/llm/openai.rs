//! OpenAI-compatible chat-completions client.
//!
//! Works with api.openai.com and with local servers that speak the same
//! protocol (Ollama, vLLM, llama.cpp). When no API key is configured the
//! request is sent without an `Authorization` header.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, LanguageModel};
use crate::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: chat_endpoint(&config.base_url),
            model: config.model.clone(),
            api_key,
            temperature: config.temperature,
        })
    }
}

/// `{base_url}/chat/completions`, tolerating a trailing slash.
fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pull `choices[0].message.content` out of a response body.
fn extract_reply(body: ChatResponse) -> Result<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| anyhow!("missing choices[0].message.content in model response"))
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn send_request(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            turns = messages.len(),
            "sending chat completion request"
        );

        let response = request
            .send()
            .await
            .with_context(|| format!("HTTP request failed for {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("model request failed with HTTP {status}: {text}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("invalid chat completion JSON")?;
        extract_reply(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatRole;

    #[test]
    fn endpoint_strips_trailing_slash() {
        assert_eq!(
            chat_endpoint("http://localhost:11434/v1/"),
            "http://localhost:11434/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn request_serializes_lowercase_roles() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.0,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["model"], "m");
    }

    #[test]
    fn extract_reply_reads_first_choice() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "summary text"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(body).unwrap(), "summary text");
    }

    #[test]
    fn extract_reply_errors_without_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(extract_reply(body).is_err());

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(extract_reply(body).is_err());
    }

    #[test]
    fn chat_role_deserializes_lowercase() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role": "assistant", "content": "ok"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
    }
}
