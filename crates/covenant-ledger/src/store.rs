//! Default `LedgerStore`: two moka caches, one per retention window.
//!
//! Raw entries and daily aggregates are both evicted by moka's own TTL
//! sweep — there is no background task to maintain here (§4.1).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use covenant_core::errors::CovenantResult;
use covenant_core::models::{CostEntry, DailyCost};
use covenant_core::traits::LedgerStore;

/// Keyed by day + a monotonically increasing sequence number so repeated
/// `record_raw` calls for the same day don't collide.
type RawKey = (NaiveDate, u64);

pub struct MokaLedgerStore {
    raw: moka::sync::Cache<RawKey, CostEntry>,
    aggregates: moka::sync::Cache<NaiveDate, Arc<Mutex<DailyCost>>>,
    raw_seq: std::sync::atomic::AtomicU64,
}

impl MokaLedgerStore {
    pub fn new(raw_retention_days: u32, aggregate_retention_days: u32) -> Self {
        Self::with_ttls(
            Duration::from_secs(u64::from(raw_retention_days) * 86_400),
            Duration::from_secs(u64::from(aggregate_retention_days) * 86_400),
        )
    }

    /// Lets tests exercise TTL expiry without waiting days.
    pub fn with_ttls(raw_ttl: Duration, aggregate_ttl: Duration) -> Self {
        Self {
            raw: moka::sync::Cache::builder().time_to_live(raw_ttl).build(),
            aggregates: moka::sync::Cache::builder().time_to_live(aggregate_ttl).build(),
            raw_seq: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

impl LedgerStore for MokaLedgerStore {
    async fn record_raw(&self, day: NaiveDate, entry: &CostEntry) -> CovenantResult<()> {
        let seq = self.raw_seq.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.raw.insert((day, seq), entry.clone());
        Ok(())
    }

    async fn merge_aggregate(&self, day: NaiveDate, entry: &CostEntry) -> CovenantResult<()> {
        let bucket = self
            .aggregates
            .get_with(day, || Arc::new(Mutex::new(DailyCost::default())));
        // Lock scope stays local to this call — never held across an .await
        // (§5: the breaker/ledger mutexes are never held across I/O).
        let mut guard = bucket.lock().expect("ledger aggregate mutex poisoned");
        guard.record(entry);
        Ok(())
    }

    async fn get_aggregate(&self, day: NaiveDate) -> CovenantResult<Option<DailyCost>> {
        Ok(self.aggregates.get(&day).map(|bucket| bucket.lock().expect("ledger aggregate mutex poisoned").clone()))
    }
}
