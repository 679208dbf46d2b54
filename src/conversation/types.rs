//! Chat message type definitions.
//!
//! Defines [`Role`], [`ContentPart`] (text or a reference to non-text content),
//! and [`Message`] (one turn of a conversation history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Output of a tool call, as recorded in agent histories.
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "tool" => Ok(Self::Tool),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// One part of a message body.
///
/// Only [`ContentPart::Text`] carries inline data; the other variants are
/// references that render as placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    Image { image_id: String },
    File { file_id: String },
    CloudFile { cloud_file_uri: String },
    /// Any part type this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Message body as it may appear on the wire: a bare string or a list of parts.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Plain(String),
    Parts(Vec<ContentPart>),
}

impl From<RawContent> for Vec<ContentPart> {
    fn from(raw: RawContent) -> Self {
        match raw {
            RawContent::Plain(text) => vec![ContentPart::Text { text }],
            RawContent::Parts(parts) => parts,
        }
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentPart>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    RawContent::deserialize(deserializer).map(Into::into)
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Optional identifier; synthetic messages get a UUID v7.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Role,
    #[serde(deserialize_with = "deserialize_content")]
    pub content: Vec<ContentPart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self {
            id: None,
            role,
            content,
            created_at: None,
        }
    }

    /// A single-text user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::text(text)])
    }

    /// A single-text assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::text(text)])
    }

    /// Wrap an intermediate summary as a fresh user message.
    pub fn synthetic_summary(summary: impl Into<String>) -> Self {
        Self {
            id: Some(uuid::Uuid::now_v7().to_string()),
            role: Role::User,
            content: vec![ContentPart::text(summary)],
            created_at: Some(Utc::now()),
        }
    }
}
