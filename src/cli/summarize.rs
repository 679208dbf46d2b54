use anyhow::Result;
use std::path::Path;

use condense::config::CondenseConfig;
use condense::conversation::load_messages;
use condense::summarizer::{StatsObserver, TracingObserver};

use super::BudgetOverrides;

/// Summarize a message list and print the summary to stdout.
pub async fn summarize(
    config: &CondenseConfig,
    input: Option<&Path>,
    overrides: &BudgetOverrides,
    show_stats: bool,
) -> Result<()> {
    let messages = load_messages(input)?;
    let summarizer = super::build_summarizer(config, overrides)?;

    let mut observer = StatsObserver::new(TracingObserver);
    let summary = summarizer
        .summarize_observed(messages, &mut observer)
        .await?;

    tracing::info!(
        model_calls = observer.stats.model_calls,
        max_depth = observer.stats.max_depth,
        "summary complete"
    );

    println!("{summary}");

    if show_stats {
        eprintln!("{}", serde_json::to_string_pretty(&observer.stats)?);
    }

    Ok(())
}
