//! Recursive, token-budget-aware conversation summarization for LLM agents.
//!
//! condense compresses a chat history that no longer fits a model's context
//! window into a single summary. Histories that fit are summarized in one model
//! call; larger ones are split into contiguous batches, each batch is
//! summarized independently, and the results are joined, re-summarizing the
//! joined text when it is still too large.
//!
//! # Architecture
//!
//! - **Budget**: ceiling = `context_window * warning_threshold`; no single model
//!   call is sent a transcript estimated above it
//! - **Tokens**: Hugging Face `tokenizer.json` via the `tokenizers` crate, or a
//!   `chars / 4` heuristic
//! - **Model**: any OpenAI-compatible chat-completions endpoint
//! - **Evaluation**: sequential and depth first, driven by an explicit work stack
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`conversation`] — Message types, transcript rendering, JSON loading
//! - [`llm`] — The [`llm::LanguageModel`] seam and its HTTP client
//! - [`summarizer`] — Budgeting, batch planning, and the recursive summarizer
//! - [`tokenizer`] — The [`tokenizer::TokenCounter`] seam and its implementations

pub mod config;
pub mod conversation;
pub mod llm;
pub mod summarizer;
pub mod tokenizer;
