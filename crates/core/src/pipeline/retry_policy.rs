use std::fmt::Display;
use std::time::Duration;

use crate::shared::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS};

/// Bounded retry for one unit of work.
///
/// `max_attempts` counts every call, including the first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    /// Base delay between attempts; attempt `n` waits `n * delay`.
    delay: Duration,
}

/// All attempts failed. Carries the last cause.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Call `attempt` until it succeeds or the budget runs out. Each
    /// failure is logged with its cause and the attempts left.
    pub fn run<T, E: Display>(
        &self,
        label: &str,
        mut attempt: impl FnMut(u32) -> Result<T, E>,
    ) -> Result<T, RetryExhausted<E>> {
        let mut n = 1;
        loop {
            match attempt(n) {
                Ok(value) => return Ok(value),
                Err(e) if n >= self.max_attempts => {
                    log::warn!(
                        "{label}: attempt {n}/{} failed: {e}; giving up",
                        self.max_attempts
                    );
                    return Err(RetryExhausted {
                        attempts: n,
                        last_error: e,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "{label}: attempt {n}/{} failed: {e}; {} retries left",
                        self.max_attempts,
                        self.max_attempts - n
                    );
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay * n);
                    }
                    n += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[test]
    fn test_first_success_makes_one_call() {
        let mut calls = 0;
        let result: Result<&str, RetryExhausted<String>> = instant(3).run("seg", |_| {
            calls += 1;
            Ok("done")
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_succeeds_after_transient_failures() {
        let result = instant(3).run("seg", |n| {
            if n < 3 {
                Err(format!("boom {n}"))
            } else {
                Ok(n)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_exhaustion_reports_last_error_and_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = instant(3).run("seg", |n| {
            calls += 1;
            Err(format!("boom {n}"))
        });
        let exhausted = result.unwrap_err();
        assert_eq!(calls, 3);
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last_error, "boom 3");
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = instant(0);
        assert_eq!(policy.max_attempts(), 1);
        let mut calls = 0;
        let _: Result<(), _> = policy.run("seg", |_| {
            calls += 1;
            Err("nope")
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.delay(), Duration::from_secs(1));
    }
}
