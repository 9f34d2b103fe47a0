use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which collaborator a `RetrievalResult` came from (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Vector,
    Graph,
}

/// A single fused retrieval hit, transient and owned by HybridRetriever (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub contract_id: String,
    pub content: String,
    pub source: ResultSource,
    pub vector_score: Option<f64>,
    pub graph_relevance: Option<f64>,
    pub rrf_score: f64,
    pub metadata: BTreeMap<String, String>,
}

/// Output of `HybridRetriever::retrieve` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridResponse {
    pub results: Vec<RetrievalResult>,
    pub vector_count: usize,
    pub graph_count: usize,
    pub estimated_tokens: u64,
}

/// Context assembled by GraphContextRetriever for one contract (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphContext {
    pub contract_id: String,
    pub contract_metadata: BTreeMap<String, String>,
    pub companies: Vec<super::graph_entities::CompanyNode>,
    pub clauses: Vec<super::graph_entities::ClauseNode>,
    pub risks: Vec<super::graph_entities::RiskFactorNode>,
    pub traversal_depth: usize,
}
