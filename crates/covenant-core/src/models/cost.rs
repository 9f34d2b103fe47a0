use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Operations CostLedger tags its entries with (§3). `Other` covers any
/// future operation name without forcing a schema migration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Parse,
    Analyze,
    Query,
    Other(String),
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Parse => write!(f, "parse"),
            Operation::Analyze => write!(f, "analyze"),
            Operation::Query => write!(f, "query"),
            Operation::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One raw ledger entry — the unit `CostLedger::record` appends (§3, §4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEntry {
    pub day: NaiveDate,
    pub model: String,
    pub operation: Operation,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_tokens: u64,
    pub cost: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Per-model or per-operation sub-bucket of a `DailyCost` aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBucket {
    pub calls: u64,
    pub cost: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_tokens: u64,
}

impl CostBucket {
    pub fn add_entry(&mut self, entry: &CostEntry) {
        self.calls += 1;
        self.cost += entry.cost;
        self.input_tokens += entry.input_tokens;
        self.output_tokens += entry.output_tokens;
        self.thinking_tokens += entry.thinking_tokens;
    }

    pub fn merge(&mut self, other: &CostBucket) {
        self.calls += other.calls;
        self.cost += other.cost;
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.thinking_tokens += other.thinking_tokens;
    }
}

/// The aggregate CostLedger serves for a single day, or for a summed range (§4.1).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    pub total_calls: u64,
    pub total_cost: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_thinking_tokens: u64,
    pub by_model: BTreeMap<String, CostBucket>,
    pub by_operation: BTreeMap<String, CostBucket>,
}

impl DailyCost {
    pub fn record(&mut self, entry: &CostEntry) {
        self.total_calls += 1;
        self.total_cost += entry.cost;
        self.total_input_tokens += entry.input_tokens;
        self.total_output_tokens += entry.output_tokens;
        self.total_thinking_tokens += entry.thinking_tokens;
        self.by_model.entry(entry.model.clone()).or_default().add_entry(entry);
        self.by_operation
            .entry(entry.operation.to_string())
            .or_default()
            .add_entry(entry);
    }

    /// Sum another day's aggregate into this one — used by `CostLedger::range`.
    pub fn merge(&mut self, other: &DailyCost) {
        self.total_calls += other.total_calls;
        self.total_cost += other.total_cost;
        self.total_input_tokens += other.total_input_tokens;
        self.total_output_tokens += other.total_output_tokens;
        self.total_thinking_tokens += other.total_thinking_tokens;
        for (model, bucket) in &other.by_model {
            self.by_model.entry(model.clone()).or_default().merge(bucket);
        }
        for (op, bucket) in &other.by_operation {
            self.by_operation.entry(op.clone()).or_default().merge(bucket);
        }
    }
}
