//! Cancellation and bounded waits for the blocking device operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use bbnate_traits::Clock;

/// Shared cancel flag. Clones observe the same flag, so one can be handed to
/// a signal handler while the device polls another.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can be reused for the next cycle.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Why a bounded wait stopped without a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStop {
    Cancelled,
    TimedOut,
}

/// Bound on a blocking poll: optional timeout plus optional cancel token.
/// `WaitLimit::unbounded()` never stops on its own.
#[derive(Debug, Clone, Default)]
pub struct WaitLimit {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl WaitLimit {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn timeout(d: Duration) -> Self {
        Self {
            timeout: Some(d),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_timeout(mut self, d: Option<Duration>) -> Self {
        self.timeout = d;
        self
    }

    /// Check the bound for a wait that began at `started`.
    pub fn check<C: Clock + ?Sized>(&self, clock: &C, started: Instant) -> Option<WaitStop> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Some(WaitStop::Cancelled);
        }
        match self.timeout {
            Some(limit) if clock.now().saturating_duration_since(started) >= limit => {
                Some(WaitStop::TimedOut)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbnate_hardware::SimulatedClock;

    #[test]
    fn unbounded_never_stops() {
        let clock = SimulatedClock::new();
        let t0 = clock.now();
        clock.advance(Duration::from_secs(3600));
        assert_eq!(WaitLimit::unbounded().check(&clock, t0), None);
    }

    #[test]
    fn cancellation_wins_over_timeout() {
        let clock = SimulatedClock::new();
        let t0 = clock.now();
        let token = CancelToken::new();
        let limit = WaitLimit::timeout(Duration::from_millis(10)).with_cancel(token.clone());
        assert_eq!(limit.check(&clock, t0), None);
        clock.advance(Duration::from_millis(10));
        assert_eq!(limit.check(&clock, t0), Some(WaitStop::TimedOut));
        token.cancel();
        assert_eq!(limit.check(&clock, t0), Some(WaitStop::Cancelled));
        token.reset();
        assert!(!token.is_cancelled());
    }
}
