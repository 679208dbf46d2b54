//! CLI `estimate` command — show the token estimate and batch plan without
//! calling the model.

use anyhow::Result;
use std::path::Path;

use condense::config::CondenseConfig;
use condense::conversation::load_messages;

use super::BudgetOverrides;

pub fn estimate(
    config: &CondenseConfig,
    input: Option<&Path>,
    overrides: &BudgetOverrides,
) -> Result<()> {
    let messages = load_messages(input)?;
    let summarizer = super::build_summarizer(config, overrides)?;
    let budget = summarizer.budget();
    let settings = summarizer.settings();
    let (tokens, plan) = summarizer.plan(&messages)?;

    println!("Token Estimate");
    println!("{}", "=".repeat(40));
    println!("  Messages:            {}", messages.len());
    println!("  Transcript tokens:   {tokens}");
    println!("  Context window:      {}", budget.context_window());
    println!("  Warning threshold:   {}", budget.warning_threshold());
    println!("  Ceiling:             {}", budget.ceiling());
    println!("  Batch target:        {}", settings.batch_target_fraction);
    println!("  Min batches:         {}", settings.min_batches);
    println!("  Max depth:           {}", settings.max_depth);
    println!();

    match plan {
        None if budget.fits(tokens) => {
            println!("Fits in one call.");
        }
        None => {
            println!("Single message over the ceiling; it will be sent as is.");
        }
        Some(plan) => {
            let batches = messages.len().div_ceil(plan.batch_size);
            println!("Over budget, top-level split:");
            println!("  Target per batch:    {:.0} tokens", plan.target_tokens);
            println!("  Planned batches:     {}", plan.num_batches);
            println!("  Batch size:          {} message(s)", plan.batch_size);
            println!("  Actual batches:      {batches}");
        }
    }

    Ok(())
}
