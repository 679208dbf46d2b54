//! Recursive, token-budget-aware conversation summarization.
//!
//! [`Summarizer::summarize`] renders a message list to a transcript and, when
//! the transcript fits the [`TokenBudget`] ceiling, asks the model for one
//! summary. Otherwise the list is split into contiguous batches, each batch is
//! summarized the same way, and the batch summaries are joined. If the joined
//! text is still over the ceiling, the summaries become messages of their own
//! and the whole procedure runs again on them.
//!
//! The recursion is driven by an explicit stack of [`Frame`]s, so arbitrarily
//! deep reductions use constant call-stack space. Batches are processed one at
//! a time, depth first, in input order.

pub mod budget;
pub mod observer;
pub mod prompt;

use std::sync::Arc;

use thiserror::Error;

use crate::config::SummarizerConfig;
use crate::conversation::{render_transcript, Message};
use crate::llm::LanguageModel;
use crate::tokenizer::TokenCounter;

pub use budget::{partition, plan_batches, BatchPlan, TokenBudget};
pub use observer::{StatsObserver, SummaryObserver, SummaryStats, TracingObserver};

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("cannot summarize an empty message list")]
    EmptyInput,

    #[error(
        "invalid token budget: context window {context_window} with warning threshold \
         {warning_threshold} (threshold must be in (0, 1] and leave at least one token)"
    )]
    InvalidBudget {
        context_window: usize,
        warning_threshold: f64,
    },

    #[error("invalid summarizer settings: {0}")]
    InvalidSettings(String),

    #[error("summarization exceeded the maximum recursion depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    #[error(transparent)]
    Tokenizer(anyhow::Error),

    #[error(transparent)]
    Model(anyhow::Error),
}

/// Tunables for batching and prompting.
#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    /// Fraction of the ceiling each batch aims for.
    pub batch_target_fraction: f64,
    /// Lower bound on the number of batches per split.
    pub min_batches: usize,
    /// Deepest logical recursion level allowed before giving up.
    pub max_depth: usize,
    pub delimiter: String,
    pub system_prompt: String,
    pub acknowledgement: String,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self::from_config(&SummarizerConfig::default())
    }
}

impl SummarizerSettings {
    pub fn from_config(config: &SummarizerConfig) -> Self {
        Self {
            batch_target_fraction: config.batch_target_fraction,
            min_batches: config.min_batches,
            max_depth: config.max_depth,
            delimiter: config.delimiter.clone(),
            system_prompt: config.system_prompt.clone(),
            acknowledgement: config.acknowledgement.clone(),
        }
    }

    fn validate(&self) -> Result<(), SummarizeError> {
        if !(self.batch_target_fraction > 0.0 && self.batch_target_fraction <= 1.0) {
            return Err(SummarizeError::InvalidSettings(format!(
                "batch_target_fraction must be in (0, 1], got {}",
                self.batch_target_fraction
            )));
        }
        if self.min_batches < 2 {
            return Err(SummarizeError::InvalidSettings(format!(
                "min_batches must be at least 2, got {}",
                self.min_batches
            )));
        }
        if self.max_depth == 0 {
            return Err(SummarizeError::InvalidSettings(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// What happened to one message list.
enum Step {
    Summary(String),
    Split(Vec<Vec<Message>>),
}

/// What to do with a finished set of batch summaries.
enum Combined {
    Done(String),
    Again(Vec<Message>),
}

/// A split whose batches are still being summarized.
struct Frame {
    depth: usize,
    pending: std::vec::IntoIter<Vec<Message>>,
    summaries: Vec<String>,
}

pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
    counter: Arc<dyn TokenCounter>,
    budget: TokenBudget,
    settings: SummarizerSettings,
}

impl Summarizer {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        counter: Arc<dyn TokenCounter>,
        budget: TokenBudget,
        settings: SummarizerSettings,
    ) -> Result<Self, SummarizeError> {
        settings.validate()?;
        Ok(Self {
            model,
            counter,
            budget,
            settings,
        })
    }

    pub fn budget(&self) -> &TokenBudget {
        &self.budget
    }

    pub fn settings(&self) -> &SummarizerSettings {
        &self.settings
    }

    /// Summarize `messages`, logging each decision through `tracing`.
    pub async fn summarize(&self, messages: Vec<Message>) -> Result<String, SummarizeError> {
        self.summarize_observed(messages, &mut TracingObserver).await
    }

    /// Summarize `messages`, reporting each decision to `observer`.
    ///
    /// Model and tokenizer errors are returned as-is; nothing is retried and no
    /// partial summary is produced.
    pub async fn summarize_observed(
        &self,
        messages: Vec<Message>,
        observer: &mut dyn SummaryObserver,
    ) -> Result<String, SummarizeError> {
        if messages.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut messages = messages;
        let mut depth = 0usize;

        'descend: loop {
            if depth > self.settings.max_depth {
                return Err(SummarizeError::DepthExceeded {
                    max_depth: self.settings.max_depth,
                });
            }

            let mut summary = match self.step(messages, depth, observer).await? {
                Step::Summary(summary) => summary,
                Step::Split(batches) => {
                    let mut pending = batches.into_iter();
                    // A split always yields at least two batches.
                    let Some(first) = pending.next() else {
                        return Err(SummarizeError::EmptyInput);
                    };
                    stack.push(Frame {
                        depth,
                        pending,
                        summaries: Vec::new(),
                    });
                    messages = first;
                    depth += 1;
                    continue 'descend;
                }
            };

            loop {
                let Some(mut frame) = stack.pop() else {
                    return Ok(summary);
                };
                frame.summaries.push(summary);

                if let Some(next) = frame.pending.next() {
                    depth = frame.depth + 1;
                    stack.push(frame);
                    messages = next;
                    continue 'descend;
                }

                match self.combine(frame.summaries, frame.depth, observer)? {
                    Combined::Done(joined) => summary = joined,
                    Combined::Again(wrapped) => {
                        messages = wrapped;
                        depth = frame.depth + 1;
                        continue 'descend;
                    }
                }
            }
        }
    }

    /// Estimate `messages` and return the split that would be made, or `None`
    /// when they fit in one call. Does not contact the model.
    pub fn plan(&self, messages: &[Message]) -> Result<(usize, Option<BatchPlan>), SummarizeError> {
        if messages.is_empty() {
            return Err(SummarizeError::EmptyInput);
        }
        let tokens = self.count(&render_transcript(messages))?;
        if self.budget.fits(tokens) || messages.len() <= 1 {
            return Ok((tokens, None));
        }
        Ok((tokens, Some(self.plan_for(tokens, messages.len()))))
    }

    fn count(&self, text: &str) -> Result<usize, SummarizeError> {
        self.counter
            .count_tokens(text)
            .map_err(SummarizeError::Tokenizer)
    }

    fn plan_for(&self, tokens: usize, message_count: usize) -> BatchPlan {
        plan_batches(
            tokens,
            message_count,
            self.budget.ceiling(),
            self.settings.batch_target_fraction,
            self.settings.min_batches,
        )
    }

    /// Either summarize `messages` with one model call or split them.
    async fn step(
        &self,
        messages: Vec<Message>,
        depth: usize,
        observer: &mut dyn SummaryObserver,
    ) -> Result<Step, SummarizeError> {
        let transcript = render_transcript(&messages);
        let tokens = self.count(&transcript)?;

        if self.budget.fits(tokens) || messages.len() <= 1 {
            if !self.budget.fits(tokens) {
                tracing::warn!(
                    depth,
                    tokens,
                    ceiling = self.budget.ceiling(),
                    "single message exceeds the token ceiling and cannot be split"
                );
            }
            observer.direct_call(depth, messages.len(), tokens);
            let request = prompt::build_request(
                &self.settings.system_prompt,
                &self.settings.acknowledgement,
                &transcript,
            );
            let reply = self
                .model
                .send_request(&request)
                .await
                .map_err(SummarizeError::Model)?;
            return Ok(Step::Summary(reply));
        }

        let message_count = messages.len();
        let plan = self.plan_for(tokens, message_count);
        let batches = partition(messages, plan.batch_size);
        observer.split(depth, message_count, &plan, batches.len());
        Ok(Step::Split(batches))
    }

    fn combine(
        &self,
        mut summaries: Vec<String>,
        depth: usize,
        observer: &mut dyn SummaryObserver,
    ) -> Result<Combined, SummarizeError> {
        if summaries.len() == 1 {
            if let Some(only) = summaries.pop() {
                return Ok(Combined::Done(only));
            }
        }

        let joined = summaries.join(&self.settings.delimiter);
        let tokens = self.count(&joined)?;

        if self.budget.fits(tokens) {
            observer.combined(depth, summaries.len(), tokens);
            return Ok(Combined::Done(joined));
        }

        observer.resummarize(depth, summaries.len(), tokens);
        Ok(Combined::Again(
            summaries
                .into_iter()
                .map(Message::synthetic_summary)
                .collect(),
        ))
    }
}
