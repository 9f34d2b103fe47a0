use serde::{Deserialize, Serialize};

/// CostLedger retention: raw entries expire after `raw_retention_days`,
/// daily aggregates after `aggregate_retention_days` (§3, §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub raw_retention_days: u32,
    pub aggregate_retention_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            raw_retention_days: 7,
            aggregate_retention_days: 30,
        }
    }
}
