//! Reconnect Backoff Module
//!
//! Exponential backoff for the push channel's reconnect path. Backoff is
//! per incident: a successful open resets the attempt counter, so the
//! next drop starts the schedule from the base delay again.

use std::time::Duration;

// == Backoff Constants ==
/// Delay before the first reconnect attempt, in milliseconds.
pub const BASE_DELAY_MS: u64 = 1_000;

/// Ceiling on any single reconnect delay, in milliseconds.
pub const MAX_DELAY_MS: u64 = 30_000;

/// Consecutive failed attempts allowed before the channel gives up and
/// surfaces a terminal disconnected state.
pub const MAX_ATTEMPTS: u32 = 5;

/// The delay the schedule assigns to a given attempt number.
///
/// `min(1000 * 2^attempt, 30000)` milliseconds.
pub fn delay_for_attempt(attempt: u32) -> Duration {
    // The doubling passes MAX_DELAY_MS long before the shift could
    // overflow, so large attempt numbers clamp straight to the ceiling.
    let ms = if attempt >= 15 {
        MAX_DELAY_MS
    } else {
        (BASE_DELAY_MS << attempt).min(MAX_DELAY_MS)
    };
    Duration::from_millis(ms)
}

// == Reconnect Policy ==
/// Tracks consecutive reconnect attempts for one incident.
#[derive(Debug, Default)]
pub struct ReconnectPolicy {
    attempt: u32,
}

impl ReconnectPolicy {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the delay to wait before the next reconnect attempt, or
    /// None once the attempt budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= MAX_ATTEMPTS {
            return None;
        }
        let delay = delay_for_attempt(self.attempt);
        self.attempt += 1;
        Some(delay)
    }

    /// Resets the counter after a successful open.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of attempts consumed in the current incident.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence() {
        let mut policy = ReconnectPolicy::new();

        let delays: Vec<u64> = std::iter::from_fn(|| policy.next_delay())
            .map(|d| d.as_millis() as u64)
            .collect();

        assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 16_000]);
    }

    #[test]
    fn test_backoff_exhausts_after_max_attempts() {
        let mut policy = ReconnectPolicy::new();

        for _ in 0..MAX_ATTEMPTS {
            assert!(policy.next_delay().is_some());
        }

        assert_eq!(policy.next_delay(), None);
        assert_eq!(policy.next_delay(), None);
        assert_eq!(policy.attempt(), MAX_ATTEMPTS);
    }

    #[test]
    fn test_delay_formula_caps_at_thirty_seconds() {
        // A sixth attempt would be capped by the formula even though the
        // attempt ceiling stops the schedule before it fires.
        assert_eq!(delay_for_attempt(5), Duration::from_millis(30_000));
        assert_eq!(delay_for_attempt(20), Duration::from_millis(30_000));
        assert_eq!(delay_for_attempt(63), Duration::from_millis(30_000));
        assert_eq!(delay_for_attempt(64), Duration::from_millis(30_000));
    }

    #[test]
    fn test_reset_restarts_schedule() {
        let mut policy = ReconnectPolicy::new();

        policy.next_delay();
        policy.next_delay();
        policy.next_delay();
        policy.reset();

        assert_eq!(policy.attempt(), 0);
        assert_eq!(policy.next_delay(), Some(Duration::from_millis(1_000)));
    }
}
