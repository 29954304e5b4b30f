//! Bounded-retry polling against a [`Clock`].

use std::time::Duration;

use mfe_shell_sdk::Clock;

/// Interval and deadline for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollPolicy {
    #[must_use]
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Duration::from_millis(2000))
    }
}

/// The probe never succeeded within the policy's timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("condition not met within {timeout:?} (waited {waited:?})")]
pub struct PollTimeout {
    pub timeout: Duration,
    pub waited: Duration,
}

/// Run `probe` until it returns `true`, sleeping `policy.interval` between
/// attempts. Returns the time waited.
///
/// The probe runs once before any sleep. The poll fails only after strictly
/// more than `policy.timeout` has elapsed, so it never gives up early.
///
/// # Errors
/// Returns `PollTimeout` when the deadline passes with the probe still false.
pub async fn poll_until<F>(
    clock: &dyn Clock,
    policy: PollPolicy,
    mut probe: F,
) -> Result<Duration, PollTimeout>
where
    F: FnMut() -> bool,
{
    let started = clock.elapsed();
    let interval = policy.interval.max(Duration::from_millis(1));

    loop {
        let waited = clock.elapsed().saturating_sub(started);
        if probe() {
            return Ok(waited);
        }
        if waited > policy.timeout {
            return Err(PollTimeout {
                timeout: policy.timeout,
                waited,
            });
        }
        clock.sleep(interval).await;
    }
}

#[cfg(all(test, feature = "tokio"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::clock::TokioClock;

    #[tokio::test(start_paused = true)]
    async fn immediate_success_does_not_sleep() {
        let clock = TokioClock::new();
        let waited = poll_until(&clock, PollPolicy::default(), || true)
            .await
            .unwrap();
        assert_eq!(waited, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_probe_flips() {
        let clock = TokioClock::new();
        let calls = Cell::new(0);
        let waited = poll_until(&clock, PollPolicy::default(), || {
            calls.set(calls.get() + 1);
            calls.get() == 4
        })
        .await
        .unwrap();

        assert_eq!(calls.get(), 4);
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_only_after_deadline() {
        let clock = TokioClock::new();
        let policy = PollPolicy::new(Duration::from_millis(100), Duration::from_millis(2000));
        let err = poll_until(&clock, policy, || false).await.unwrap_err();

        assert!(err.waited > policy.timeout);
        assert!(err.waited <= policy.timeout + policy.interval);
        assert_eq!(err.timeout, policy.timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_advances() {
        let clock = TokioClock::new();
        let policy = PollPolicy::new(Duration::ZERO, Duration::from_millis(5));
        let err = poll_until(&clock, policy, || false).await.unwrap_err();
        assert!(err.waited > Duration::from_millis(5));
    }
}
