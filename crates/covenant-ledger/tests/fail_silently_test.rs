use chrono::{NaiveDate, Utc};
use covenant_core::errors::{CovenantError, CovenantResult};
use covenant_core::models::{CostEntry, DailyCost, Operation};
use covenant_core::traits::LedgerStore;
use covenant_ledger::CostLedger;

/// A backing store that always fails, to exercise §4.1's
/// "On backing-store failure... fail_silently" clause.
struct AlwaysFailingStore;

impl LedgerStore for AlwaysFailingStore {
    async fn record_raw(&self, _day: NaiveDate, _entry: &CostEntry) -> CovenantResult<()> {
        Err(CovenantError::Transient("backing store unreachable".into()))
    }

    async fn merge_aggregate(&self, _day: NaiveDate, _entry: &CostEntry) -> CovenantResult<()> {
        Err(CovenantError::Transient("backing store unreachable".into()))
    }

    async fn get_aggregate(&self, _day: NaiveDate) -> CovenantResult<Option<DailyCost>> {
        Ok(None)
    }
}

fn sample_entry() -> CostEntry {
    CostEntry {
        day: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        model: "M1".to_string(),
        operation: Operation::Analyze,
        input_tokens: 10,
        output_tokens: 10,
        thinking_tokens: 0,
        cost: 0.01,
        occurred_at: Utc::now(),
    }
}

#[tokio::test]
async fn fail_silently_swallows_error_and_counts_drop() {
    let ledger = CostLedger::new(AlwaysFailingStore);
    let result = ledger.record(sample_entry(), true).await;
    assert!(result.is_ok());
    assert_eq!(ledger.dropped_entries(), 1);
}

#[tokio::test]
async fn without_fail_silently_the_error_surfaces() {
    let ledger = CostLedger::new(AlwaysFailingStore);
    let result = ledger.record(sample_entry(), false).await;
    assert!(result.is_err());
    assert_eq!(ledger.dropped_entries(), 0);
}
