//! Hugging Face tokenizer-backed token counter.
//!
//! Implements [`TokenCounter`] by loading a `tokenizer.json` with the
//! `tokenizers` crate and counting encoding ids. Truncation is disabled so long
//! transcripts are counted in full.

use anyhow::Result;
use tokenizers::Tokenizer;

use super::TokenCounter;
use crate::config::TokenizerConfig;

/// File name looked up inside the tokenizer cache directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct HfTokenCounter {
    tokenizer: Tokenizer,
}

impl HfTokenCounter {
    pub fn new(config: &TokenizerConfig) -> Result<Self> {
        let cache_dir = crate::config::expand_tilde(&config.cache_dir);
        let tokenizer_path = cache_dir.join(TOKENIZER_FILE);

        anyhow::ensure!(
            tokenizer_path.exists(),
            "Tokenizer not found at {}. Run `condense tokenizer download` first.",
            tokenizer_path.display()
        );

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("failed to load tokenizer: {e}"))?;

        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("failed to disable truncation: {e}"))?;
        tokenizer.with_padding(None);

        tracing::info!(tokenizer = %tokenizer_path.display(), "tokenizer loaded");

        Ok(Self { tokenizer })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        if text.is_empty() {
            return Ok(0);
        }
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("tokenization failed: {e}"))?;
        Ok(encoding.get_ids().len())
    }

    fn name(&self) -> &str {
        "huggingface"
    }
}
