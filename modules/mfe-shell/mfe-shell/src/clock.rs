//! Native clock backed by tokio's timer.
//!
//! Honors tokio's paused test time, so readiness timeouts can be exercised
//! without waiting on the wall clock.

#[cfg(feature = "tokio")]
pub use tokio_clock::TokioClock;

#[cfg(feature = "tokio")]
mod tokio_clock {
    use std::time::Duration;

    use mfe_shell_sdk::Clock;
    use tokio::time::Instant;

    #[derive(Debug, Clone, Copy)]
    pub struct TokioClock {
        start: Instant,
    }

    impl TokioClock {
        #[must_use]
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
            }
        }
    }

    impl Default for TokioClock {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Clock for TokioClock {
        fn elapsed(&self) -> Duration {
            self.start.elapsed()
        }

        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }
}
