use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::risk::RiskReport;

/// One append-only record of a stage failure or skip (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub stage: String,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self { stage: stage.into(), message: message.into() }
    }
}

/// The mutable record threaded through AnalysisPipeline (§3). Each stage may
/// mutate only its declared output fields and may append to `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAnalysisState {
    pub contract_id: String,
    pub filename: String,
    pub parsed_text: Option<String>,
    pub sections: BTreeMap<String, String>,
    pub risk: Option<RiskReport>,
    pub key_terms: Option<BTreeMap<String, String>>,
    pub vector_chunk_ids: BTreeSet<String>,
    pub graph_written: bool,
    pub answer: Option<String>,
    pub total_cost: f64,
    pub errors: Vec<ErrorEntry>,
    /// Set by the caller before the run; the `answer` stage only runs when
    /// this is non-empty (§4.5 stage 5).
    pub query: Option<String>,
}

impl ContractAnalysisState {
    pub fn new(contract_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            contract_id: contract_id.into(),
            filename: filename.into(),
            parsed_text: None,
            sections: BTreeMap::new(),
            risk: None,
            key_terms: None,
            vector_chunk_ids: BTreeSet::new(),
            graph_written: false,
            answer: None,
            total_cost: 0.0,
            errors: Vec::new(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn push_error(&mut self, stage: &str, message: impl Into<String>) {
        self.errors.push(ErrorEntry::new(stage, message));
    }

    pub fn add_cost(&mut self, cost: f64) {
        self.total_cost += cost;
    }
}
