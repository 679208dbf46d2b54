//! Token ceiling and batch planning.
//!
//! [`TokenBudget`] turns a context window and warning threshold into the
//! ceiling a single model call must stay under. [`plan_batches`] decides how to
//! split an over-budget sequence, and [`partition`] performs the split.

use serde::Serialize;

use super::SummarizeError;

/// The per-call token ceiling: `floor(context_window * warning_threshold)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenBudget {
    context_window: usize,
    warning_threshold: f64,
    ceiling: usize,
}

impl TokenBudget {
    /// Fails unless `0 < warning_threshold <= 1` and the ceiling is at least one token.
    pub fn new(context_window: usize, warning_threshold: f64) -> Result<Self, SummarizeError> {
        let invalid = || SummarizeError::InvalidBudget {
            context_window,
            warning_threshold,
        };
        if !(warning_threshold > 0.0 && warning_threshold <= 1.0) {
            return Err(invalid());
        }
        let ceiling = (context_window as f64 * warning_threshold).floor() as usize;
        if ceiling == 0 {
            return Err(invalid());
        }
        Ok(Self {
            context_window,
            warning_threshold,
            ceiling,
        })
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// `true` when a transcript of `tokens` may be sent in one call.
    pub fn fits(&self, tokens: usize) -> bool {
        tokens <= self.ceiling
    }
}

/// How an over-budget sequence will be split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchPlan {
    /// Token estimate of the whole sequence.
    pub total_tokens: usize,
    /// Tokens each batch should aim for.
    pub target_tokens: f64,
    /// Number of batches the estimate calls for (may exceed the message count).
    pub num_batches: usize,
    /// Messages per batch, never below one.
    pub batch_size: usize,
}

/// Plan the split of `message_count` messages estimated at `total_tokens`.
///
/// `num_batches = max(min_batches, floor(total / target) + 1)` and
/// `batch_size = max(1, floor(message_count / num_batches))`.
pub fn plan_batches(
    total_tokens: usize,
    message_count: usize,
    ceiling: usize,
    batch_target_fraction: f64,
    min_batches: usize,
) -> BatchPlan {
    let target_tokens = ceiling as f64 * batch_target_fraction;
    // The float-to-int cast saturates for tiny targets.
    let by_size = ((total_tokens as f64 / target_tokens).floor() as usize).saturating_add(1);
    let num_batches = by_size.max(min_batches).max(1);
    let batch_size = (message_count / num_batches).max(1);
    BatchPlan {
        total_tokens,
        target_tokens,
        num_batches,
        batch_size,
    }
}

/// Split `items` into contiguous batches of `batch_size` (the last may be
/// shorter). A zero size is treated as one. Concatenating the result gives
/// back the input.
pub fn partition<T>(items: Vec<T>, batch_size: usize) -> Vec<Vec<T>> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(items.len().div_ceil(batch_size));
    let capacity = batch_size.min(items.len());
    let mut current = Vec::with_capacity(capacity);
    for item in items {
        current.push(item);
        if current.len() == batch_size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(capacity)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_is_window_times_threshold() {
        let budget = TokenBudget::new(8192, 0.75).unwrap();
        assert_eq!(budget.ceiling(), 6144);
        assert!(budget.fits(6144));
        assert!(!budget.fits(6145));
    }

    #[test]
    fn fractional_ceiling_rounds_down() {
        let budget = TokenBudget::new(1001, 0.5).unwrap();
        assert_eq!(budget.ceiling(), 500);
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        assert!(TokenBudget::new(1000, 0.0).is_err());
        assert!(TokenBudget::new(1000, -0.5).is_err());
        assert!(TokenBudget::new(1000, 1.5).is_err());
        assert!(TokenBudget::new(1000, f64::NAN).is_err());
        assert!(TokenBudget::new(1000, 1.0).is_ok());
    }

    #[test]
    fn zero_ceiling_is_rejected() {
        assert!(matches!(
            TokenBudget::new(1, 0.5),
            Err(SummarizeError::InvalidBudget { context_window: 1, .. })
        ));
        assert!(TokenBudget::new(0, 1.0).is_err());
    }

    #[test]
    fn plan_for_many_tokens_few_messages_clamps_batch_size() {
        // 10 messages, 5000 tokens, ceiling 1000, target 500
        let plan = plan_batches(5000, 10, 1000, 0.5, 2);
        assert_eq!(plan.target_tokens, 500.0);
        assert_eq!(plan.num_batches, 11);
        assert_eq!(plan.batch_size, 1);
    }

    #[test]
    fn plan_with_tiny_target_does_not_overflow() {
        let plan = plan_batches(1_000_000, 10, 1, 1e-20, 2);
        assert_eq!(plan.num_batches, usize::MAX);
        assert_eq!(plan.batch_size, 1);
    }

    #[test]
    fn plan_applies_minimum_batch_count() {
        // Just over the ceiling: floor(1001 / 500) + 1 = 3
        let plan = plan_batches(1001, 12, 1000, 0.5, 2);
        assert_eq!(plan.num_batches, 3);
        assert_eq!(plan.batch_size, 4);

        // A generous target would ask for one batch; the floor lifts it to two.
        let plan = plan_batches(1001, 12, 1000, 1.0, 2);
        assert_eq!(plan.num_batches, 2);
        assert_eq!(plan.batch_size, 6);
    }

    #[test]
    fn plan_with_custom_fraction_and_floor() {
        let plan = plan_batches(3000, 100, 1000, 0.25, 4);
        assert_eq!(plan.target_tokens, 250.0);
        assert_eq!(plan.num_batches, 13);
        assert_eq!(plan.batch_size, 7);

        let plan = plan_batches(1100, 100, 1000, 0.9, 4);
        assert_eq!(plan.num_batches, 4);
        assert_eq!(plan.batch_size, 25);
    }

    #[test]
    fn partition_is_contiguous_and_complete() {
        for len in 0..20usize {
            for size in 0..8usize {
                let items: Vec<usize> = (0..len).collect();
                let batches = partition(items.clone(), size);
                let effective = size.max(1);

                assert!(batches.iter().all(|b| !b.is_empty()));
                assert!(batches.iter().all(|b| b.len() <= effective));
                if let Some((last, init)) = batches.split_last() {
                    assert!(init.iter().all(|b| b.len() == effective));
                    assert!(last.len() <= effective);
                }
                let rejoined: Vec<usize> = batches.into_iter().flatten().collect();
                assert_eq!(rejoined, items);
            }
        }
    }

    #[test]
    fn partition_with_huge_batch_size_keeps_one_batch() {
        assert_eq!(partition(vec![1, 2, 3], usize::MAX), vec![vec![1, 2, 3]]);
        assert!(partition(Vec::<u8>::new(), usize::MAX).is_empty());
    }

    #[test]
    fn partition_last_batch_shorter() {
        let batches = partition(vec!['a', 'b', 'c', 'd', 'e'], 2);
        assert_eq!(batches, vec![vec!['a', 'b'], vec!['c', 'd'], vec!['e']]);
    }
}
