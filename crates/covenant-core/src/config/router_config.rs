use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ComplexityTier;

/// Price schedule for one model, dollars per million tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceSchedule {
    pub in_per_million: f64,
    pub out_per_million: f64,
}

/// A single row of the complexity → model mapping table (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTierEntry {
    pub model: String,
    pub price: PriceSchedule,
}

/// ModelRouter configuration: the tier table, timeouts, retry policy, and
/// circuit breaker thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub tiers: BTreeMap<ComplexityTier, ModelTierEntry>,
    /// Per-call timeout, seconds, before `min(timeout, max_timeout)` is applied.
    pub default_timeout_secs: u64,
    pub max_timeout_secs: u64,
    /// Bounded retry count for Transient/Timeout failures.
    pub max_retries: u32,
    /// Backoff cap, seconds: delay for attempt k is drawn from `[0, min(cap, base*2^k)]`.
    pub backoff_base_secs: f64,
    pub backoff_cap_secs: f64,
    /// Consecutive failures before the breaker opens.
    pub breaker_fail_max: u32,
    /// How long the breaker stays open before admitting a HalfOpen probe.
    pub breaker_reset_after_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            ComplexityTier::Simple,
            ModelTierEntry {
                model: "tier-simple-v1".to_string(),
                price: PriceSchedule { in_per_million: 0.25, out_per_million: 1.25 },
            },
        );
        tiers.insert(
            ComplexityTier::Balanced,
            ModelTierEntry {
                model: "tier-balanced-v1".to_string(),
                price: PriceSchedule { in_per_million: 3.0, out_per_million: 15.0 },
            },
        );
        tiers.insert(
            ComplexityTier::Complex,
            ModelTierEntry {
                model: "tier-complex-v1".to_string(),
                price: PriceSchedule { in_per_million: 15.0, out_per_million: 75.0 },
            },
        );
        tiers.insert(
            ComplexityTier::Reasoning,
            ModelTierEntry {
                model: "tier-reasoning-v1".to_string(),
                price: PriceSchedule { in_per_million: 15.0, out_per_million: 75.0 },
            },
        );

        Self {
            tiers,
            default_timeout_secs: 30,
            max_timeout_secs: 120,
            max_retries: 3,
            backoff_base_secs: 0.5,
            backoff_cap_secs: 8.0,
            breaker_fail_max: 5,
            breaker_reset_after_secs: 60,
        }
    }
}
