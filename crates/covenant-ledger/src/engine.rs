//! CostLedger — records per-call cost metrics and serves daily/ranged
//! aggregates (§4.1).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use covenant_core::errors::CovenantResult;
use covenant_core::models::{CostEntry, DailyCost};
use covenant_core::traits::LedgerStore;
use tracing::warn;

/// Generic over the backing store so tests can inject one that fails on
/// command (§4.1: "On backing-store failure...").
pub struct CostLedger<S: LedgerStore> {
    store: S,
    dropped_entries: AtomicU64,
}

impl<S: LedgerStore> CostLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store, dropped_entries: AtomicU64::new(0) }
    }

    /// Appends `entry`. When the backing store fails and `fail_silently` is
    /// true, the error is swallowed, the dropped-entry counter is
    /// incremented, and `Ok(())` is returned — callers that need to know
    /// about degraded recording pass `fail_silently=false` instead.
    pub async fn record(&self, entry: CostEntry, fail_silently: bool) -> CovenantResult<()> {
        let raw_result = self.store.record_raw(entry.day, &entry).await;
        let agg_result = self.store.merge_aggregate(entry.day, &entry).await;

        match (raw_result, agg_result) {
            (Ok(()), Ok(())) => Ok(()),
            (raw, agg) => {
                let err = raw.err().or(agg.err()).expect("at least one result was an error");
                if fail_silently {
                    self.dropped_entries.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %err, day = %entry.day, "cost ledger write dropped (fail_silently)");
                    Ok(())
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Missing day returns a zeroed record (§4.1).
    pub async fn daily(&self, day: NaiveDate) -> CovenantResult<DailyCost> {
        Ok(self.store.get_aggregate(day).await?.unwrap_or_default())
    }

    /// Sums per-day aggregates over `[from_day, to_day]` inclusive (§4.1).
    pub async fn range(&self, from_day: NaiveDate, to_day: NaiveDate) -> CovenantResult<DailyCost> {
        let mut total = DailyCost::default();
        let mut day = from_day;
        while day <= to_day {
            if let Some(agg) = self.store.get_aggregate(day).await? {
                total.merge(&agg);
            }
            day = day.succ_opt().expect("date overflow iterating ledger range");
        }
        Ok(total)
    }

    pub fn dropped_entries(&self) -> u64 {
        self.dropped_entries.load(Ordering::Relaxed)
    }
}
