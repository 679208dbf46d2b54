pub mod doctor;
pub mod estimate;
pub mod summarize;

use anyhow::{Context, Result};
use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use condense::config::CondenseConfig;
use condense::llm::LanguageModel;
use condense::summarizer::{Summarizer, SummarizerSettings, TokenBudget};
use condense::tokenizer::{self, huggingface::TOKENIZER_FILE, HeuristicCounter, TokenCounter};

/// Budget and tokenizer overrides shared by `summarize` and `estimate`.
#[derive(Debug, Clone, Default)]
pub struct BudgetOverrides {
    pub context_window: Option<usize>,
    pub threshold: Option<f64>,
    pub heuristic: bool,
}

/// Build a summarizer from config, applying command-line overrides.
pub fn build_summarizer(config: &CondenseConfig, overrides: &BudgetOverrides) -> Result<Summarizer> {
    let context_window = overrides.context_window.unwrap_or(config.llm.context_window);
    let threshold = overrides
        .threshold
        .unwrap_or(config.summarizer.warning_threshold);
    let budget = TokenBudget::new(context_window, threshold)?;

    let counter: Arc<dyn TokenCounter> = if overrides.heuristic {
        Arc::new(HeuristicCounter)
    } else {
        Arc::from(tokenizer::create_counter(&config.tokenizer)?)
    };
    let model: Arc<dyn LanguageModel> = Arc::from(condense::llm::create_client(config)?);

    tracing::info!(
        context_window,
        threshold,
        ceiling = budget.ceiling(),
        tokenizer = counter.name(),
        model = model.model_name(),
        "summarizer ready"
    );

    let settings = SummarizerSettings::from_config(&config.summarizer);
    Ok(Summarizer::new(model, counter, budget, settings)?)
}

/// Download the tokenizer definition to the cache directory.
pub async fn tokenizer_download(config: &CondenseConfig) -> Result<()> {
    let cache_dir = config.resolved_tokenizer_dir();
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("failed to create cache dir: {}", cache_dir.display()))?;

    let tokenizer_path = cache_dir.join(TOKENIZER_FILE);

    if tokenizer_path.exists() {
        println!("Tokenizer already exists at {}", tokenizer_path.display());
    } else {
        println!("Downloading {TOKENIZER_FILE}...");
        download_file(&config.tokenizer.url, &tokenizer_path).await?;
        println!("Tokenizer saved to {}", tokenizer_path.display());
    }

    println!("Tokenizer download complete. Ready for use.");
    Ok(())
}

/// Fetch `url` into `dest`, writing to a `.tmp` sibling and renaming on success.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("HTTP request failed for {url}"))?;

    anyhow::ensure!(
        response.status().is_success(),
        "download failed with HTTP {}",
        response.status()
    );

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})")
                    .context("invalid progress template")?
                    .progress_chars("##-"),
            );
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let tmp_path = dest.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp_path)
        .await
        .with_context(|| format!("failed to create temp file: {}", tmp_path.display()))?;

    let written = match write_chunks(response.bytes_stream(), &mut file, &pb).await {
        Ok(written) => written,
        Err(e) => {
            drop(file);
            let _ = tokio::fs::remove_file(&tmp_path).await;
            pb.abandon();
            return Err(e);
        }
    };
    drop(file);

    tokio::fs::rename(&tmp_path, dest)
        .await
        .context("failed to rename temp file")?;

    pb.finish_and_clear();
    tracing::debug!(url, bytes = written, dest = %dest.display(), "download finished");
    Ok(())
}

/// Copy a byte stream into `out`, advancing `pb` per chunk. Returns the byte count.
async fn write_chunks<S, B, E, W>(chunks: S, out: &mut W, pb: &ProgressBar) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
    W: AsyncWrite + Unpin,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut written = 0u64;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.context("error reading response")?;
        let bytes = chunk.as_ref();
        out.write_all(bytes).await.context("error writing to file")?;
        written += bytes.len() as u64;
        pb.inc(bytes.len() as u64);
    }
    out.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    #[tokio::test]
    async fn chunks_are_written_in_order_and_counted() {
        let chunks = stream::iter(vec![
            Ok::<_, std::io::Error>(b"{\"model\":".to_vec()),
            Ok(Vec::new()),
            Ok(b"{}}".to_vec()),
        ]);
        let pb = ProgressBar::hidden();
        let mut out = Vec::new();

        let written = write_chunks(chunks, &mut out, &pb).await.unwrap();

        assert_eq!(written, 12);
        assert_eq!(pb.position(), 12);
        assert_eq!(out, b"{\"model\":{}}");
    }

    #[tokio::test]
    async fn stream_error_stops_the_copy() {
        let chunks = stream::iter(vec![
            Ok(b"partial".to_vec()),
            Err(std::io::Error::other("connection reset")),
            Ok(b"never".to_vec()),
        ]);
        let pb = ProgressBar::hidden();
        let mut out = Vec::new();

        let err = write_chunks(chunks, &mut out, &pb).await.unwrap_err();

        assert_eq!(err.to_string(), "error reading response");
        assert_eq!(out, b"partial");
        assert_eq!(pb.position(), 7);
    }
}
