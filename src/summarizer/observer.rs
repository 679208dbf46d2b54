//! Observation hooks for summarization decisions.
//!
//! Every decision the summarizer makes is reported to a [`SummaryObserver`]
//! passed in by the caller. [`TracingObserver`] turns them into log records;
//! [`StatsObserver`] tallies them. Observers never influence the result.

use serde::Serialize;

use super::budget::BatchPlan;

pub trait SummaryObserver: Send {
    /// A transcript fits (or cannot be split further) and goes to the model.
    fn direct_call(&mut self, _depth: usize, _messages: usize, _tokens: usize) {}

    /// A sequence is over the ceiling and is being split.
    fn split(&mut self, _depth: usize, _messages: usize, _plan: &BatchPlan, _batches: usize) {}

    /// Batch summaries were joined and fit the ceiling.
    fn combined(&mut self, _depth: usize, _summaries: usize, _tokens: usize) {}

    /// Joined summaries are still over the ceiling and are summarized again.
    fn resummarize(&mut self, _depth: usize, _summaries: usize, _tokens: usize) {}
}

/// Logs each decision with `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SummaryObserver for TracingObserver {
    fn direct_call(&mut self, depth: usize, messages: usize, tokens: usize) {
        tracing::info!(depth, messages, tokens, "summarizing transcript in one call");
    }

    fn split(&mut self, depth: usize, messages: usize, plan: &BatchPlan, batches: usize) {
        tracing::info!(
            depth,
            messages,
            tokens = plan.total_tokens,
            target_tokens = plan.target_tokens,
            num_batches = plan.num_batches,
            batch_size = plan.batch_size,
            batches,
            "transcript over budget, splitting into batches"
        );
    }

    fn combined(&mut self, depth: usize, summaries: usize, tokens: usize) {
        tracing::info!(depth, summaries, tokens, "batch summaries joined");
    }

    fn resummarize(&mut self, depth: usize, summaries: usize, tokens: usize) {
        tracing::info!(
            depth,
            summaries,
            tokens,
            "joined summaries still over budget, summarizing again"
        );
    }
}

/// Counts of what a summarization run did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub model_calls: usize,
    pub splits: usize,
    pub batches: usize,
    pub resummarizations: usize,
    pub max_depth: usize,
    /// Largest transcript estimate sent in a single call.
    pub max_call_tokens: usize,
}

/// Collects [`SummaryStats`] and forwards every event to an inner observer.
#[derive(Debug, Default)]
pub struct StatsObserver<O = TracingObserver> {
    pub stats: SummaryStats,
    inner: O,
}

impl<O: SummaryObserver> StatsObserver<O> {
    pub fn new(inner: O) -> Self {
        Self {
            stats: SummaryStats::default(),
            inner,
        }
    }

    fn reached(&mut self, depth: usize) {
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }
}

impl<O: SummaryObserver> SummaryObserver for StatsObserver<O> {
    fn direct_call(&mut self, depth: usize, messages: usize, tokens: usize) {
        self.reached(depth);
        self.stats.model_calls += 1;
        self.stats.max_call_tokens = self.stats.max_call_tokens.max(tokens);
        self.inner.direct_call(depth, messages, tokens);
    }

    fn split(&mut self, depth: usize, messages: usize, plan: &BatchPlan, batches: usize) {
        self.reached(depth);
        self.stats.splits += 1;
        self.stats.batches += batches;
        self.inner.split(depth, messages, plan, batches);
    }

    fn combined(&mut self, depth: usize, summaries: usize, tokens: usize) {
        self.inner.combined(depth, summaries, tokens);
    }

    fn resummarize(&mut self, depth: usize, summaries: usize, tokens: usize) {
        self.stats.resummarizations += 1;
        self.inner.resummarize(depth, summaries, tokens);
    }
}
