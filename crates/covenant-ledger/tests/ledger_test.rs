use std::time::Duration;

use chrono::{NaiveDate, Utc};
use covenant_core::models::{CostEntry, Operation};
use covenant_ledger::{CostLedger, MokaLedgerStore};

fn entry(day: NaiveDate, model: &str, op: Operation, input: u64, output: u64, cost: f64) -> CostEntry {
    CostEntry {
        day,
        model: model.to_string(),
        operation: op,
        input_tokens: input,
        output_tokens: output,
        thinking_tokens: 0,
        cost,
        occurred_at: Utc::now(),
    }
}

/// Seed scenario 1 (§8).
#[tokio::test]
async fn daily_aggregation_matches_seed_scenario() {
    let ledger = CostLedger::new(MokaLedgerStore::new(7, 30));
    let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

    ledger.record(entry(day, "M1", Operation::Analyze, 1000, 500, 0.001), false).await.unwrap();
    ledger.record(entry(day, "M1", Operation::Analyze, 1000, 500, 0.001), false).await.unwrap();
    ledger.record(entry(day, "M2", Operation::Query, 200, 50, 0.0005), false).await.unwrap();

    let daily = ledger.daily(day).await.unwrap();
    assert_eq!(daily.total_calls, 3);
    assert!((daily.total_cost - 0.0025).abs() < 1e-9);
    assert_eq!(daily.total_input_tokens, 2200);
    assert_eq!(daily.total_output_tokens, 1050);
    assert_eq!(daily.by_model["M1"].calls, 2);
    assert!((daily.by_model["M1"].cost - 0.002).abs() < 1e-9);
    assert_eq!(daily.by_model["M2"].calls, 1);
    assert_eq!(daily.by_operation["analyze"].calls, 2);
    assert_eq!(daily.by_operation["query"].calls, 1);
}

#[tokio::test]
async fn missing_day_is_zeroed() {
    let ledger = CostLedger::new(MokaLedgerStore::new(7, 30));
    let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let daily = ledger.daily(day).await.unwrap();
    assert_eq!(daily.total_calls, 0);
    assert_eq!(daily.total_cost, 0.0);
}

#[tokio::test]
async fn range_sums_across_days_inclusive() {
    let ledger = CostLedger::new(MokaLedgerStore::new(7, 30));
    let day1 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
    let day3 = NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();

    ledger.record(entry(day1, "M1", Operation::Parse, 10, 1, 0.001), false).await.unwrap();
    ledger.record(entry(day2, "M1", Operation::Parse, 20, 2, 0.002), false).await.unwrap();
    // day3 has no entries and should not affect the sum.

    let summed = ledger.range(day1, day3).await.unwrap();
    assert_eq!(summed.total_calls, 2);
    assert!((summed.total_cost - 0.003).abs() < 1e-9);
}

/// Concurrent `record` calls for the same day must not lose updates (§4.1).
#[tokio::test]
async fn concurrent_records_for_same_day_are_not_lost() {
    use std::sync::Arc;

    let ledger = Arc::new(CostLedger::new(MokaLedgerStore::new(7, 30)));
    let day = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger
                .record(entry(day, "M1", Operation::Analyze, 1, 1, 0.0001), false)
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let daily = ledger.daily(day).await.unwrap();
    assert_eq!(daily.total_calls, 50);
}

/// Raw entries and aggregates each expire on their own TTL (§4.1).
#[tokio::test]
async fn aggregates_expire_after_their_ttl() {
    let store = MokaLedgerStore::with_ttls(Duration::from_millis(50), Duration::from_millis(50));
    let ledger = CostLedger::new(store);
    let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

    ledger.record(entry(day, "M1", Operation::Query, 1, 1, 0.01), false).await.unwrap();
    assert_eq!(ledger.daily(day).await.unwrap().total_calls, 1);

    tokio::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(ledger.daily(day).await.unwrap().total_calls, 0);
}
