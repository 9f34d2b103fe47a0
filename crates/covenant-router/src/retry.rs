//! Bounded retry with exponential backoff and full jitter, for Transient and
//! Timeout failures only (§4.2, §7 — other kinds are not retried).

use std::time::Duration;

use rand::Rng;

/// Delay before retry attempt `attempt` (0-indexed: the delay taken *after*
/// the first failure, before the second try), drawn uniformly from
/// `[0, min(cap, base * 2^attempt)]`.
pub fn backoff_delay(attempt: u32, base_secs: f64, cap_secs: f64) -> Duration {
    let upper = (base_secs * 2f64.powi(attempt as i32)).min(cap_secs).max(0.0);
    let jittered = rand::thread_rng().gen_range(0.0..=upper.max(f64::EPSILON));
    Duration::from_secs_f64(jittered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_never_exceeds_cap() {
        for attempt in 0..10 {
            let delay = backoff_delay(attempt, 0.5, 8.0);
            assert!(delay.as_secs_f64() <= 8.0);
        }
    }

    #[test]
    fn delay_grows_with_attempt_before_hitting_cap() {
        let first = backoff_delay(0, 0.5, 100.0);
        let later = backoff_delay(5, 0.5, 100.0);
        assert!(first.as_secs_f64() <= 0.5 + 1e-9);
        assert!(later.as_secs_f64() <= 16.0 + 1e-9);
    }
}
