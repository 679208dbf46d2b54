//! Flattening a message sequence into a plain-text transcript.

use super::types::{ContentPart, Message};

/// Separator between content parts of one message.
const PART_SEPARATOR: &str = "\n";
/// Separator between messages.
const MESSAGE_SEPARATOR: &str = "\n\n";

/// Render one content part. Non-text parts become bracketed placeholders;
/// binary content is never inlined.
pub fn render_part(part: &ContentPart) -> String {
    match part {
        ContentPart::Text { text } => text.clone(),
        ContentPart::Image { image_id } => format!("[Image: {image_id}]"),
        ContentPart::File { file_id } => format!("[File: {file_id}]"),
        ContentPart::CloudFile { cloud_file_uri } => format!("[Cloud file: {cloud_file_uri}]"),
        ContentPart::Unknown => "[Unknown content]".to_string(),
    }
}

/// Render a message as `"<role>: <content>"`.
pub fn render_message(message: &Message) -> String {
    let body = message
        .content
        .iter()
        .map(render_part)
        .collect::<Vec<_>>()
        .join(PART_SEPARATOR);
    format!("{}: {}", message.role, body)
}

/// Render a whole sequence, messages separated by a blank line.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join(MESSAGE_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::types::Role;

    #[test]
    fn renders_role_prefix_and_blank_line_between_messages() {
        let messages = vec![Message::user("hello"), Message::assistant("hi there")];
        assert_eq!(render_transcript(&messages), "user: hello\n\nassistant: hi there");
    }

    #[test]
    fn multi_part_message_joins_with_newline() {
        let msg = Message::new(
            Role::User,
            vec![
                ContentPart::text("see attached"),
                ContentPart::Image { image_id: "img-42".into() },
                ContentPart::File { file_id: "file-7".into() },
                ContentPart::CloudFile { cloud_file_uri: "s3://bucket/key".into() },
                ContentPart::Unknown,
            ],
        );
        assert_eq!(
            render_message(&msg),
            "user: see attached\n[Image: img-42]\n[File: file-7]\n[Cloud file: s3://bucket/key]\n[Unknown content]"
        );
    }

    #[test]
    fn empty_content_renders_role_only() {
        let msg = Message::new(Role::System, vec![]);
        assert_eq!(render_message(&msg), "system: ");
    }

    #[test]
    fn empty_sequence_renders_empty_string() {
        assert_eq!(render_transcript(&[]), "");
    }
}
