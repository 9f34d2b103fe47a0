use chrono::NaiveDate;

use crate::errors::CovenantResult;
use crate::models::{CostEntry, DailyCost};

/// CostLedger storage (collaborator, §6): "key-value with atomic counters
/// and TTLs". Day keys are formed as `cost:daily:YYYY-MM-DD` in UTC by the
/// implementation. TTLs for raw entries and aggregates are fixed at
/// construction time (from `LedgerConfig`); no background sweeper is
/// required — the backing store honours them on its own.
#[allow(async_fn_in_trait)]
pub trait LedgerStore: Send + Sync {
    /// Appends a raw entry under `day`.
    async fn record_raw(&self, day: NaiveDate, entry: &CostEntry) -> CovenantResult<()>;

    /// Atomically folds `entry` into the `day` aggregate.
    async fn merge_aggregate(&self, day: NaiveDate, entry: &CostEntry) -> CovenantResult<()>;

    /// Missing day returns `Ok(None)`, which the caller treats as a zeroed record.
    async fn get_aggregate(&self, day: NaiveDate) -> CovenantResult<Option<DailyCost>>;
}
