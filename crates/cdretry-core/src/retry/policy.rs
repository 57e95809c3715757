use std::time::Duration;

use crate::error::TypedError;

use super::classify::classify;
use super::error::PolicyError;
use super::jitter::{FixedJitter, JitterSource, RandJitter};

/// Total attempts, including the first.
pub const MAX_RETRIES: u32 = 3;
/// Delay before the second attempt, before jitter.
pub const BASE_DELAY: Duration = Duration::from_millis(1000);
/// Default upper bound of the jitter ratio.
pub const JITTER_RATIO: f64 = 0.10;
/// Largest jitter ratio a policy accepts. Above roughly 0.11 the delay of
/// attempt n+1 could fall below 1.8x the delay of attempt n.
pub const MAX_JITTER_RATIO: f64 = 0.10;

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with bounded upward jitter.
///
/// The delay after attempt `n` (1-based) is `base_delay * 2^(n-1) * (1 + j)` with
/// `j` drawn from `[0, jitter_ratio]`. Only transient-network errors are retried,
/// and never once `max_attempts` attempts have been made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: BASE_DELAY,
            jitter_ratio: JITTER_RATIO,
        }
    }
}

impl RetryPolicy {
    /// Build a validated policy.
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        jitter_ratio: f64,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::InvalidConfig(
                "max_attempts must be >= 1".to_string(),
            ));
        }
        if base_delay.is_zero() {
            return Err(PolicyError::InvalidConfig(
                "base_delay must be > 0".to_string(),
            ));
        }
        if !(0.0..=MAX_JITTER_RATIO).contains(&jitter_ratio) {
            return Err(PolicyError::InvalidConfig(format!(
                "jitter_ratio must be within [0, {}] (got {})",
                MAX_JITTER_RATIO, jitter_ratio
            )));
        }
        let policy = Self {
            max_attempts,
            base_delay,
            jitter_ratio,
        };
        // The last delay ever computed is the one after attempt max_attempts - 1.
        if max_attempts > 1 {
            policy.delay_bounds(max_attempts - 1)?;
        }
        Ok(policy)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn jitter_ratio(&self) -> f64 {
        self.jitter_ratio
    }

    /// True iff `attempt < max_attempts` and the error is transient-network.
    pub fn should_retry(&self, error: &TypedError, attempt: u32) -> Result<bool, PolicyError> {
        if attempt == 0 {
            return Err(PolicyError::InvalidAttempt(attempt));
        }
        Ok(attempt < self.max_attempts && classify(error).is_retryable())
    }

    /// Delay to wait after attempt `attempt` fails, before the next one starts.
    pub fn retry_delay(
        &self,
        attempt: u32,
        jitter: &mut dyn JitterSource,
    ) -> Result<Duration, PolicyError> {
        let scaled = self.scaled_base(attempt)?;
        let ratio = jitter.sample(self.jitter_ratio);
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, self.jitter_ratio)
        };
        let nanos = (scaled.as_nanos() as f64 * (1.0 + ratio)).floor();
        if nanos >= u64::MAX as f64 {
            return Err(PolicyError::DelayOverflow(attempt));
        }
        // Float rounding on very large delays must not undercut the unjittered value.
        Ok(Duration::from_nanos(nanos as u64).max(scaled))
    }

    /// Smallest and largest delay `retry_delay(attempt, _)` can return.
    pub fn delay_bounds(&self, attempt: u32) -> Result<(Duration, Duration), PolicyError> {
        let low = self.scaled_base(attempt)?;
        let high = self.retry_delay(attempt, &mut FixedJitter(self.jitter_ratio))?;
        Ok((low, high))
    }

    /// Combined decision used by the retry loop.
    pub fn decide(
        &self,
        error: &TypedError,
        attempt: u32,
        jitter: &mut dyn JitterSource,
    ) -> Result<RetryDecision, PolicyError> {
        if !self.should_retry(error, attempt)? {
            return Ok(RetryDecision::NoRetry);
        }
        Ok(RetryDecision::RetryAfter(self.retry_delay(attempt, jitter)?))
    }

    fn scaled_base(&self, attempt: u32) -> Result<Duration, PolicyError> {
        if attempt == 0 {
            return Err(PolicyError::InvalidAttempt(attempt));
        }
        2u32.checked_pow(attempt - 1)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .ok_or(PolicyError::DelayOverflow(attempt))
    }
}

/// [`RetryPolicy::should_retry`] under the default policy.
pub fn should_retry(error: &TypedError, attempt: u32) -> Result<bool, PolicyError> {
    RetryPolicy::default().should_retry(error, attempt)
}

/// [`RetryPolicy::retry_delay`] under the default policy with thread-local randomness.
pub fn get_retry_delay(attempt: u32) -> Result<Duration, PolicyError> {
    RetryPolicy::default().retry_delay(attempt, &mut RandJitter::thread())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn transient_errors_retry_until_last_attempt() {
        for code in ["NETWORK_ERROR", "TIMEOUT_ERROR", "HTTP_500", "HTTP_502", "HTTP_503"] {
            let e = TypedError::new(code, "x");
            assert_eq!(should_retry(&e, 1), Ok(true), "{code}");
            assert_eq!(should_retry(&e, 2), Ok(true), "{code}");
            assert_eq!(should_retry(&e, 3), Ok(false), "{code}");
        }
    }

    #[test]
    fn client_and_unknown_errors_never_retry() {
        for code in ["HTTP_400", "HTTP_401", "HTTP_403", "HTTP_404", "VALIDATION_ERROR", "WHATEVER"] {
            let e = TypedError::new(code, "x");
            for attempt in 1..=3 {
                assert_eq!(should_retry(&e, attempt), Ok(false), "{code} @ {attempt}");
            }
        }
    }

    #[test]
    fn attempt_zero_is_invalid() {
        let e = TypedError::network("offline");
        assert_eq!(should_retry(&e, 0), Err(PolicyError::InvalidAttempt(0)));
        assert_eq!(get_retry_delay(0), Err(PolicyError::InvalidAttempt(0)));
    }

    #[test]
    fn default_delays_stay_in_bounds() {
        for _ in 0..200 {
            let d1 = get_retry_delay(1).unwrap();
            let d2 = get_retry_delay(2).unwrap();
            let d3 = get_retry_delay(3).unwrap();
            assert!(d1 >= ms(1000) && d1 <= ms(1100), "{d1:?}");
            assert!(d2 >= ms(2000) && d2 <= ms(2200), "{d2:?}");
            assert!(d3 >= ms(4000) && d3 <= ms(4400), "{d3:?}");
        }
    }

    #[test]
    fn pinned_jitter_hits_exact_edges() {
        let p = RetryPolicy::default();
        assert_eq!(p.retry_delay(1, &mut FixedJitter(0.0)).unwrap(), ms(1000));
        assert_eq!(p.retry_delay(1, &mut FixedJitter(0.1)).unwrap(), ms(1100));
        assert_eq!(p.retry_delay(3, &mut FixedJitter(0.1)).unwrap(), ms(4400));
        // Out-of-range samples are clamped to the policy's ratio.
        assert_eq!(p.retry_delay(2, &mut FixedJitter(0.9)).unwrap(), ms(2200));
        assert_eq!(p.delay_bounds(2).unwrap(), (ms(2000), ms(2200)));
    }

    #[test]
    fn delay_growth_exceeds_1_8x_worst_case() {
        let p = RetryPolicy::default();
        for n in 1..=20 {
            // Worst case: max jitter on attempt n, none on attempt n + 1.
            let cur = p.retry_delay(n, &mut FixedJitter(JITTER_RATIO)).unwrap();
            let next = p.retry_delay(n + 1, &mut FixedJitter(0.0)).unwrap();
            assert!(next.as_secs_f64() > 1.8 * cur.as_secs_f64(), "n={n}");
        }
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let p = RetryPolicy::default();
        let mut a = RandJitter::seeded(99);
        let mut b = RandJitter::seeded(99);
        for n in 1..=5 {
            assert_eq!(p.retry_delay(n, &mut a), p.retry_delay(n, &mut b));
        }
    }

    #[test]
    fn huge_attempts_overflow_instead_of_panicking() {
        let p = RetryPolicy::default();
        assert_eq!(
            p.retry_delay(40, &mut FixedJitter(0.0)),
            Err(PolicyError::DelayOverflow(40))
        );
    }

    #[test]
    fn decide_combines_classification_and_delay() {
        let p = RetryPolicy::default();
        let mut j = FixedJitter(0.0);
        assert_eq!(
            p.decide(&TypedError::timeout("slow"), 2, &mut j),
            Ok(RetryDecision::RetryAfter(ms(2000)))
        );
        assert_eq!(
            p.decide(&TypedError::from_status(401), 1, &mut j),
            Ok(RetryDecision::NoRetry)
        );
        assert_eq!(
            p.decide(&TypedError::timeout("slow"), 3, &mut j),
            Ok(RetryDecision::NoRetry)
        );
    }

    #[test]
    fn new_validates_parameters() {
        assert!(RetryPolicy::new(0, ms(10), 0.0).is_err());
        assert!(RetryPolicy::new(3, Duration::ZERO, 0.0).is_err());
        assert!(RetryPolicy::new(3, ms(10), 0.2).is_err());
        assert!(RetryPolicy::new(3, ms(10), f64::NAN).is_err());
        assert!(RetryPolicy::new(64, ms(1000), 0.1).is_err());
        let p = RetryPolicy::new(5, ms(250), 0.05).unwrap();
        assert_eq!(p.max_attempts(), 5);
        assert_eq!(p.base_delay(), ms(250));
        assert_eq!(RetryPolicy::new(3, BASE_DELAY, JITTER_RATIO).unwrap(), RetryPolicy::default());
    }

    #[test]
    fn should_retry_is_pure() {
        let e = TypedError::new("HTTP_502", "bad gateway");
        let before = e.clone();
        for _ in 0..50 {
            assert_eq!(should_retry(&e, 1), Ok(true));
        }
        assert_eq!(e, before);
    }
}
