//! CLI `doctor` command — check configuration, tokenizer, and credentials.

use anyhow::Result;

use condense::config::{default_config_path, CondenseConfig};
use condense::summarizer::{SummarizerSettings, TokenBudget};
use condense::tokenizer::{self, huggingface::TOKENIZER_FILE};

pub fn doctor(config: &CondenseConfig) -> Result<()> {
    let config_path = default_config_path();
    let tokenizer_path = config.resolved_tokenizer_dir().join(TOKENIZER_FILE);

    println!("condense Health Report");
    println!("======================");
    println!();
    println!(
        "Config file:       {} ({})",
        config_path.display(),
        if config_path.exists() { "found" } else { "defaults" }
    );
    println!();
    println!("Model:");
    println!("  Endpoint:        {}", config.llm.base_url);
    println!("  Name:            {}", config.llm.model);
    match config.api_key() {
        Some(_) => println!("  API key:         set (${})", config.llm.api_key_env),
        None => println!(
            "  API key:         not set (${}); requests go out unauthenticated",
            config.llm.api_key_env
        ),
    }
    println!();
    println!("Budget:");
    match TokenBudget::new(config.llm.context_window, config.summarizer.warning_threshold) {
        Ok(budget) => println!(
            "  Ceiling:         {} tokens ({} x {})",
            budget.ceiling(),
            budget.context_window(),
            budget.warning_threshold()
        ),
        Err(e) => println!("  ERROR:           {e}"),
    }
    let settings = SummarizerSettings::from_config(&config.summarizer);
    println!(
        "  Batching:        target {} of ceiling, at least {} batches, depth <= {}",
        settings.batch_target_fraction, settings.min_batches, settings.max_depth
    );
    println!();
    println!("Tokenizer:");
    println!("  Provider:        {}", config.tokenizer.provider);
    if config.tokenizer.provider == "huggingface" {
        println!(
            "  File:            {} ({})",
            tokenizer_path.display(),
            if tokenizer_path.exists() { "found" } else { "missing" }
        );
    }
    match tokenizer::create_counter(&config.tokenizer) {
        Ok(counter) => println!("  Status:          OK ({})", counter.name()),
        Err(e) => {
            println!("  Status:          FAILED ({e})");
            println!();
            println!("Recovery steps:");
            println!("  1. Run `condense tokenizer download`");
            println!("  2. Or set [tokenizer] provider = \"heuristic\" in the config file");
        }
    }

    Ok(())
}
