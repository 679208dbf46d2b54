#![allow(dead_code)]

use async_trait::async_trait;
use condense::conversation::Message;
use condense::llm::{ChatMessage, LanguageModel};
use condense::summarizer::{
    BatchPlan, Summarizer, SummarizerSettings, SummaryObserver, TokenBudget,
};
use condense::tokenizer::TokenCounter;
use std::sync::{Arc, Mutex};

type ReplyFn = dyn Fn(usize, &str) -> anyhow::Result<String> + Send + Sync;

/// Fake model that records every request and answers through a closure
/// receiving the zero-based call index and the transcript (user turn).
pub struct ScriptedModel {
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    reply: Box<ReplyFn>,
}

impl ScriptedModel {
    pub fn new(reply: impl Fn(usize, &str) -> anyhow::Result<String> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        })
    }

    /// Replies `s1`, `s2`, ... in call order.
    pub fn numbered() -> Arc<Self> {
        Self::new(|i, _| Ok(format!("s{}", i + 1)))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    /// The transcript (last turn) of every request, in call order.
    pub fn transcripts(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| r.last().map(|m| m.content.clone()).unwrap_or_default())
            .collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn send_request(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(messages.to_vec());
            requests.len() - 1
        };
        let transcript = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        (self.reply)(index, transcript)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// One token per character.
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> anyhow::Result<usize> {
        Ok(text.chars().count())
    }

    fn name(&self) -> &str {
        "chars"
    }
}

/// `tokens_per_marker` tokens for every occurrence of `marker`; everything
/// else is free. Lets a test pin transcript estimates exactly.
pub struct MarkerCounter {
    pub marker: &'static str,
    pub tokens_per_marker: usize,
}

impl TokenCounter for MarkerCounter {
    fn count_tokens(&self, text: &str) -> anyhow::Result<usize> {
        Ok(text.matches(self.marker).count() * self.tokens_per_marker)
    }

    fn name(&self) -> &str {
        "marker"
    }
}

/// Observer that keeps every split plan and event in order.
#[derive(Default)]
pub struct RecordingObserver {
    pub splits: Vec<(usize, usize, BatchPlan, usize)>,
    pub direct: Vec<(usize, usize, usize)>,
    pub combined: Vec<(usize, usize, usize)>,
    pub resummarized: Vec<(usize, usize, usize)>,
}

impl SummaryObserver for RecordingObserver {
    fn direct_call(&mut self, depth: usize, messages: usize, tokens: usize) {
        self.direct.push((depth, messages, tokens));
    }

    fn split(&mut self, depth: usize, messages: usize, plan: &BatchPlan, batches: usize) {
        self.splits.push((depth, messages, *plan, batches));
    }

    fn combined(&mut self, depth: usize, summaries: usize, tokens: usize) {
        self.combined.push((depth, summaries, tokens));
    }

    fn resummarize(&mut self, depth: usize, summaries: usize, tokens: usize) {
        self.resummarized.push((depth, summaries, tokens));
    }
}

/// Build a summarizer with threshold 1.0 so the ceiling equals `ceiling`.
pub fn summarizer(
    model: Arc<ScriptedModel>,
    counter: impl TokenCounter + 'static,
    ceiling: usize,
) -> Summarizer {
    summarizer_with(model, counter, ceiling, SummarizerSettings::default())
}

pub fn summarizer_with(
    model: Arc<ScriptedModel>,
    counter: impl TokenCounter + 'static,
    ceiling: usize,
    settings: SummarizerSettings,
) -> Summarizer {
    Summarizer::new(
        model,
        Arc::new(counter),
        TokenBudget::new(ceiling, 1.0).unwrap(),
        settings,
    )
    .unwrap()
}

/// `n` user messages `m0`, `m1`, ... each padded with `filler` characters.
pub fn numbered_messages(n: usize, filler: usize) -> Vec<Message> {
    (0..n)
        .map(|i| Message::user(format!("m{i}{}", "x".repeat(filler))))
        .collect()
}

/// Deterministic pseudo-random sequence (LCG) for property-style tests.
pub struct Lcg(pub u64);

impl Lcg {
    pub fn next_below(&mut self, bound: usize) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}
