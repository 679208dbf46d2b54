//! Token estimation.
//!
//! Provides the [`TokenCounter`] trait, a Hugging Face `tokenizer.json` backed
//! implementation, and a character heuristic that needs no model files. The
//! counter is created via [`create_counter`] from configuration.

pub mod huggingface;

use anyhow::Result;

/// Average characters per token used by the heuristic counter.
pub const CHARS_PER_TOKEN: usize = 4;

/// Trait for estimating how many tokens a text occupies.
///
/// Implementations must be deterministic: the same text always yields the
/// same count. All methods are synchronous.
pub trait TokenCounter: Send + Sync {
    /// Count the tokens in `text`.
    fn count_tokens(&self, text: &str) -> Result<usize>;

    /// Short label for logs and diagnostics.
    fn name(&self) -> &str;
}

/// `ceil(chars / 4)` estimate. Cheap, model-agnostic, and always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicCounter;

impl TokenCounter for HeuristicCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.chars().count().div_ceil(CHARS_PER_TOKEN))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Create a token counter from config.
///
/// `"huggingface"` loads `tokenizer.json` from the cache directory (run
/// `condense tokenizer download` first); `"heuristic"` needs nothing.
pub fn create_counter(
    config: &crate::config::TokenizerConfig,
) -> Result<Box<dyn TokenCounter>> {
    match config.provider.as_str() {
        "huggingface" => {
            let counter = huggingface::HfTokenCounter::new(config)?;
            Ok(Box::new(counter))
        }
        "heuristic" => Ok(Box::new(HeuristicCounter)),
        other => anyhow::bail!(
            "unknown tokenizer provider: {other}. Supported: huggingface, heuristic"
        ),
    }
}
