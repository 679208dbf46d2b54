//! Conversation histories: message types, transcript rendering, and loading
//! message lists from JSON.

pub mod transcript;
pub mod types;

pub use transcript::render_transcript;
pub use types::{ContentPart, Message, Role};

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Parse a JSON array of messages.
pub fn parse_messages(json: &str) -> Result<Vec<Message>> {
    serde_json::from_str(json).context("failed to parse message list JSON")
}

/// Load a message list from a file, or from stdin when `path` is `None` or `-`.
pub fn load_messages(path: Option<&Path>) -> Result<Vec<Message>> {
    let json = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read messages from {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read messages from stdin")?;
            buf
        }
    };
    let messages = parse_messages(&json)?;
    tracing::debug!(count = messages.len(), "messages loaded");
    Ok(messages)
}
