use std::time::Duration;

/// Decision returned by the retry policy after a finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop: the attempt succeeded or the attempt budget is spent.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy for command retries.
///
/// The first attempt always runs immediately. The delay before the second
/// attempt is `initial_delay`, and each further delay doubles the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Zero means the
    /// command is never run.
    pub max_tries: u32,
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Optional upper bound on a single delay. `None` doubles without a cap.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: None,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_tries: u32, initial_delay: Duration) -> Self {
        Self {
            max_tries,
            initial_delay,
            max_delay: None,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    /// Delay charged before the attempt with the given 0-based number.
    ///
    /// Attempt 0 has no delay; attempt `n >= 1` waits `initial_delay * 2^(n-1)`,
    /// saturating instead of overflowing, then capped by `max_delay`.
    pub fn delay_before(&self, attempt_number: u32) -> Duration {
        if attempt_number == 0 {
            return Duration::ZERO;
        }
        // Apply 2^(n-1) in u32-sized steps so doubling stays exact until the
        // duration itself saturates.
        let mut remaining = attempt_number - 1;
        let mut raw = self.initial_delay;
        while remaining > 0 && !raw.is_zero() && raw != Duration::MAX {
            let step = remaining.min(31);
            raw = raw.saturating_mul(1u32 << step);
            remaining -= step;
        }
        match self.max_delay {
            Some(cap) => raw.min(cap),
            None => raw,
        }
    }

    /// Decide what to do after `attempts_made` attempts, the last of which
    /// exited with `exit_status`.
    pub fn decide(&self, attempts_made: u32, exit_status: i32) -> RetryDecision {
        if exit_status == 0 || attempts_made >= self.max_tries {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_before(attempts_made))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_values() {
        let p = RetryPolicy::default();
        assert_eq!(p.max_tries, 5);
        assert_eq!(p.initial_delay, Duration::from_secs(1));
        assert!(p.max_delay.is_none());
    }

    #[test]
    fn first_attempt_has_no_delay() {
        let p = RetryPolicy::default();
        assert_eq!(p.delay_before(0), Duration::ZERO);
    }

    #[test]
    fn delays_double_from_initial() {
        let p = RetryPolicy::new(10, Duration::from_millis(250));
        assert_eq!(p.delay_before(1), Duration::from_millis(250));
        assert_eq!(p.delay_before(2), Duration::from_millis(500));
        assert_eq!(p.delay_before(3), Duration::from_secs(1));
        assert_eq!(p.delay_before(4), Duration::from_secs(2));
    }

    #[test]
    fn doubling_continues_past_attempt_32() {
        let p = RetryPolicy::new(u32::MAX, Duration::from_nanos(1));
        assert_eq!(p.delay_before(32), Duration::from_nanos(1 << 31));
        assert_eq!(p.delay_before(33), p.delay_before(32) * 2);
        assert_eq!(p.delay_before(40), Duration::from_nanos(1 << 39));
        assert_eq!(p.delay_before(64), Duration::from_nanos(1 << 63));
    }

    #[test]
    fn huge_attempt_numbers_saturate() {
        let p = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        assert_eq!(p.delay_before(200), Duration::MAX);
        assert_eq!(p.delay_before(u32::MAX), Duration::MAX);
    }

    #[test]
    fn zero_initial_delay_stays_zero() {
        let p = RetryPolicy::new(u32::MAX, Duration::ZERO);
        assert_eq!(p.delay_before(u32::MAX), Duration::ZERO);
    }

    #[test]
    fn cap_bounds_every_delay() {
        let p = RetryPolicy::new(20, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(10));
        assert_eq!(p.delay_before(4), Duration::from_secs(8));
        assert_eq!(p.delay_before(5), Duration::from_secs(10));
        assert_eq!(p.delay_before(19), Duration::from_secs(10));
    }

    #[test]
    fn success_never_retries() {
        let p = RetryPolicy::default();
        assert_eq!(p.decide(1, 0), RetryDecision::NoRetry);
    }

    #[test]
    fn respects_max_tries() {
        let p = RetryPolicy::new(3, Duration::from_secs(1));
        assert_eq!(
            p.decide(1, 1),
            RetryDecision::RetryAfter(Duration::from_secs(1))
        );
        assert_eq!(
            p.decide(2, 1),
            RetryDecision::RetryAfter(Duration::from_secs(2))
        );
        assert_eq!(p.decide(3, 1), RetryDecision::NoRetry);
    }
}
