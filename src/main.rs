mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use condense::config::CondenseConfig;

#[derive(Parser)]
#[command(name = "condense", version, about = "Recursive conversation summarizer for LLM agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
struct BudgetArgs {
    /// Context window of the target model, in tokens
    #[arg(long)]
    context_window: Option<usize>,
    /// Fraction of the context window a single call may use (0 < f <= 1)
    #[arg(long)]
    threshold: Option<f64>,
    /// Estimate tokens as chars / 4 instead of loading a tokenizer
    #[arg(long)]
    heuristic: bool,
}

impl From<BudgetArgs> for cli::BudgetOverrides {
    fn from(args: BudgetArgs) -> Self {
        Self {
            context_window: args.context_window,
            threshold: args.threshold,
            heuristic: args.heuristic,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a JSON message list (file or stdin) and print the summary
    Summarize {
        /// Path to a JSON array of messages; `-` or omitted reads stdin
        input: Option<PathBuf>,
        #[command(flatten)]
        budget: BudgetArgs,
        /// Print run statistics as JSON to stderr
        #[arg(long)]
        stats: bool,
    },
    /// Show the token estimate and batch plan without calling the model
    Estimate {
        input: Option<PathBuf>,
        #[command(flatten)]
        budget: BudgetArgs,
    },
    /// Manage the tokenizer definition
    Tokenizer {
        #[command(subcommand)]
        action: TokenizerAction,
    },
    /// Check configuration, tokenizer, and credentials
    Doctor,
}

#[derive(Subcommand)]
enum TokenizerAction {
    /// Download tokenizer.json to ~/.condense/tokenizer/
    Download,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = CondenseConfig::load()?;

    // Log to stderr so stdout carries only command output.
    let filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Summarize {
            input,
            budget,
            stats,
        } => {
            cli::summarize::summarize(&config, input.as_deref(), &budget.into(), stats).await?;
        }
        Command::Estimate { input, budget } => {
            cli::estimate::estimate(&config, input.as_deref(), &budget.into())?;
        }
        Command::Tokenizer { action } => match action {
            TokenizerAction::Download => {
                cli::tokenizer_download(&config).await?;
            }
        },
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}
