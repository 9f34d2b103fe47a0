use serde::{Deserialize, Serialize};

/// HybridRetriever defaults: fan-out widths and the RRF constant (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub n_vector: usize,
    pub n_graph: usize,
    pub rrf_k: f64,
    pub include_companies: bool,
    pub include_risks: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            n_vector: 5,
            n_graph: 3,
            rrf_k: 60.0,
            include_companies: true,
            include_risks: true,
        }
    }
}
