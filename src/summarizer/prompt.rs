//! Fixed prompt text and the three-turn summarization request.

use crate::llm::ChatMessage;

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Your job is to summarize a history of previous messages in a conversation between an AI \
assistant and a human. The conversation you are given is from a fixed context window and may \
not be complete. Messages sent by the AI are marked with the 'assistant' role. Messages the \
user sends are marked with the 'user' role; they may also include system messages and tool \
output. Summarize what happened in the conversation from the perspective of the AI, in the \
first person. Keep names, decisions, open tasks, and concrete facts. Reply with the summary \
only.";

pub const DEFAULT_ACKNOWLEDGEMENT: &str = "\
Understood, I will respond with a summary of the message (and only the summary, nothing else) \
once I receive the conversation history. I'm ready.";

/// Build the request sent for one transcript: system instruction, canned
/// assistant acknowledgement, then the transcript as the user turn.
pub fn build_request(system_prompt: &str, acknowledgement: &str, transcript: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::assistant(acknowledgement),
        ChatMessage::user(transcript),
    ]
}
