//! Circuit breaker over `ModelProvider` calls (§4.2, §5): trips to `Open`
//! after `fail_max` consecutive failures, then after `reset_after` admits a
//! single `HalfOpen` probe before closing or reopening.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

/// Snapshot returned by `admit` — tells the caller whether to place the
/// call and, if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Allowed,
    Rejected,
}

pub struct CircuitBreaker {
    fail_max: u32,
    reset_after: Duration,
    consecutive_failures: AtomicU32,
    /// Millis since breaker construction at which the breaker opened; 0 means
    /// not open. Stored as millis so it's representable in an atomic.
    opened_at_millis: AtomicU64,
    start: Instant,
    /// Guards the HalfOpen probe so only one caller gets to test the
    /// provider while the breaker is recovering.
    probe_in_flight: Mutex<bool>,
}

impl CircuitBreaker {
    pub fn new(fail_max: u32, reset_after: Duration) -> Self {
        Self {
            fail_max,
            reset_after,
            consecutive_failures: AtomicU32::new(0),
            opened_at_millis: AtomicU64::new(0),
            start: Instant::now(),
            probe_in_flight: Mutex::new(false),
        }
    }

    pub fn state(&self) -> BreakerState {
        let opened_at = self.opened_at_millis.load(Ordering::SeqCst);
        if opened_at == 0 {
            return BreakerState::Closed;
        }
        let elapsed = self.start.elapsed().as_millis() as u64;
        if elapsed.saturating_sub(opened_at) >= self.reset_after.as_millis() as u64 {
            BreakerState::HalfOpen
        } else {
            BreakerState::Open
        }
    }

    /// Call before placing a request. `Rejected` means fail fast with
    /// `ServiceUnavailable` (§7) without invoking the provider.
    pub fn admit(&self) -> Admission {
        match self.state() {
            BreakerState::Closed => Admission::Allowed,
            BreakerState::Open => Admission::Rejected,
            BreakerState::HalfOpen => {
                let mut guard = self.probe_in_flight.lock().expect("breaker probe mutex poisoned");
                if *guard {
                    Admission::Rejected
                } else {
                    *guard = true;
                    Admission::Allowed
                }
            }
        }
    }

    pub fn on_success(&self) {
        let was_open = self.opened_at_millis.swap(0, Ordering::SeqCst) != 0;
        self.consecutive_failures.store(0, Ordering::SeqCst);
        *self.probe_in_flight.lock().expect("breaker probe mutex poisoned") = false;
        if was_open {
            info!("router breaker probe succeeded, closing");
        }
    }

    pub fn on_failure(&self) {
        *self.probe_in_flight.lock().expect("breaker probe mutex poisoned") = false;
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        if failures >= self.fail_max {
            let now = self.start.elapsed().as_millis() as u64;
            let was_already_open = self.opened_at_millis.swap(now.max(1), Ordering::SeqCst) != 0;
            // Re-arm the open window even if it was already open: a failed
            // HalfOpen probe restarts the full reset_after wait.
            if was_already_open {
                warn!("router breaker probe failed, reopening");
            } else {
                warn!(failures, "router breaker tripped open");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_fail_max_consecutive_failures() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        for _ in 0..2 {
            assert_eq!(breaker.admit(), Admission::Allowed);
            breaker.on_failure();
        }
        assert_eq!(breaker.state(), BreakerState::Closed);
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Open);
        assert_eq!(breaker.admit(), Admission::Rejected);
    }

    #[test]
    fn success_resets_failure_count() {
        let breaker = CircuitBreaker::new(3, Duration::from_secs(60));
        breaker.on_failure();
        breaker.on_failure();
        breaker.on_success();
        breaker.on_failure();
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::Closed);
    }

    #[test]
    fn half_open_admits_a_single_probe() {
        let breaker = CircuitBreaker::new(1, Duration::from_millis(0));
        breaker.on_failure();
        assert_eq!(breaker.state(), BreakerState::HalfOpen);
        assert_eq!(breaker.admit(), Admission::Allowed);
        assert_eq!(breaker.admit(), Admission::Rejected);
    }
}
