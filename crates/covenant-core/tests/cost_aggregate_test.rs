use chrono::{NaiveDate, Utc};
use covenant_core::models::{CostEntry, DailyCost, Operation};

fn entry(model: &str, op: Operation, input: u64, output: u64, cost: f64) -> CostEntry {
    CostEntry {
        day: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        model: model.to_string(),
        operation: op,
        input_tokens: input,
        output_tokens: output,
        thinking_tokens: 0,
        cost,
        occurred_at: Utc::now(),
    }
}

/// Seed scenario 1 (§8): the aggregate arithmetic in isolation from the ledger's
/// storage layer.
#[test]
fn daily_cost_matches_seed_scenario() {
    let mut daily = DailyCost::default();
    daily.record(&entry("M1", Operation::Analyze, 1000, 500, 0.001));
    daily.record(&entry("M1", Operation::Analyze, 1000, 500, 0.001));
    daily.record(&entry("M2", Operation::Query, 200, 50, 0.0005));

    assert_eq!(daily.total_calls, 3);
    assert!((daily.total_cost - 0.0025).abs() < 1e-9);
    assert_eq!(daily.total_input_tokens, 2200);
    assert_eq!(daily.total_output_tokens, 1050);

    let m1 = &daily.by_model["M1"];
    assert_eq!(m1.calls, 2);
    assert!((m1.cost - 0.002).abs() < 1e-9);

    let m2 = &daily.by_model["M2"];
    assert_eq!(m2.calls, 1);
    assert!((m2.cost - 0.0005).abs() < 1e-9);

    assert_eq!(daily.by_operation["analyze"].calls, 2);
    assert_eq!(daily.by_operation["query"].calls, 1);
}

#[test]
fn range_merge_sums_per_day_aggregates() {
    let mut day1 = DailyCost::default();
    day1.record(&entry("M1", Operation::Parse, 100, 10, 0.01));

    let mut day2 = DailyCost::default();
    day2.record(&entry("M1", Operation::Parse, 200, 20, 0.02));

    let mut range = DailyCost::default();
    range.merge(&day1);
    range.merge(&day2);

    assert_eq!(range.total_calls, 2);
    assert!((range.total_cost - 0.03).abs() < 1e-9);
    assert_eq!(range.by_model["M1"].calls, 2);
}
