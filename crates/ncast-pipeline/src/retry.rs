//! Bounded pass-level retry settings for the speech pipeline.
//!
//! The speech pipeline repeats full passes to absorb transient synthesis
//! failures. The loop is bounded: a pass budget plus exponential backoff
//! between passes, so a persistent failure or an unreachable target count
//! cannot spin forever.

use std::time::Duration;

/// Retry behavior between speech passes.
#[derive(Debug, Clone)]
pub struct RetrySettings {
    /// Maximum number of full passes (including the first).
    pub max_passes: u32,
    /// Base delay between passes (doubles each pass).
    pub base_delay: Duration,
    /// Cap on the delay between passes.
    pub max_delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_passes: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetrySettings {
    /// Set the pass budget. Clamped to at least one pass.
    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Set the base delay between passes.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before pass number `pass` (1-based; the first pass has none).
    pub fn delay_before_pass(&self, pass: u32) -> Duration {
        let doublings = pass.saturating_sub(2).min(31);
        self.base_delay
            .saturating_mul(2u32.pow(doublings))
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_per_pass_and_caps() {
        let retry = RetrySettings::default().with_base_delay(Duration::from_secs(1));

        assert_eq!(retry.delay_before_pass(2), Duration::from_secs(1));
        assert_eq!(retry.delay_before_pass(3), Duration::from_secs(2));
        assert_eq!(retry.delay_before_pass(4), Duration::from_secs(4));
        assert!(retry.delay_before_pass(30) <= Duration::from_secs(60));
    }

    #[test]
    fn pass_budget_never_drops_below_one() {
        assert_eq!(RetrySettings::default().with_max_passes(0).max_passes, 1);
    }
}
