//! HybridRetriever (§4.4): fans out to VectorIndex and, per distinct
//! contract found by vector search, GraphContextRetriever — then fuses both
//! streams with RRF.

use std::collections::{BTreeMap, BTreeSet};

use covenant_core::config::RetrievalConfig;
use covenant_core::errors::CovenantResult;
use covenant_core::models::{GraphContext, HybridResponse, RiskLevel};
use covenant_core::traits::graph_store::GraphStore;
use covenant_core::traits::vector_index::{VectorIndex, VectorQuery};
use tracing::warn;

use crate::graph_context::GraphContextRetriever;
use crate::rrf::{self, RrfCandidate};

pub struct HybridRetriever<V: VectorIndex, G: GraphStore> {
    vector_index: V,
    graph_retriever: GraphContextRetriever<G>,
    config: RetrievalConfig,
}

#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    pub contract_id: Option<String>,
    pub n_vector: Option<usize>,
    pub n_graph: Option<usize>,
    pub include_companies: Option<bool>,
    pub include_risks: Option<bool>,
}

impl<V: VectorIndex, G: GraphStore> HybridRetriever<V, G> {
    pub fn new(vector_index: V, graph_store: G, config: RetrievalConfig) -> Self {
        Self { vector_index, graph_retriever: GraphContextRetriever::new(graph_store), config }
    }

    pub async fn retrieve(&self, query: &str, options: RetrieveOptions) -> CovenantResult<HybridResponse> {
        let n_vector = options.n_vector.unwrap_or(self.config.n_vector);
        let n_graph = options.n_graph.unwrap_or(self.config.n_graph);
        let include_companies = options.include_companies.unwrap_or(self.config.include_companies);
        let include_risks = options.include_risks.unwrap_or(self.config.include_risks);

        // Step 1: vector search. Vector failure is fatal for the call (§4.4).
        let vector_hits = self
            .vector_index
            .search(VectorQuery::Text(query), n_vector, options.contract_id.as_deref())
            .await?;

        // Step 2: unique contract_ids from the vector results.
        let contract_ids: BTreeSet<String> = vector_hits.iter().map(|hit| hit.contract_id.clone()).collect();

        // Step 3: concurrently fetch graph context per contract; a failure
        // for one contract is logged and that contract degrades to
        // vector-only (§4.4), the overall call still returns.
        let graph_contexts: Vec<Option<GraphContext>> = {
            let futures = contract_ids.iter().map(|contract_id| {
                self.graph_retriever.context_for_contract(contract_id, include_companies, true, include_risks, n_graph)
            });
            let results = futures::future::join_all(futures).await;
            results
                .into_iter()
                .zip(contract_ids.iter())
                .map(|(result, contract_id)| match result {
                    Ok(context) => context,
                    Err(err) => {
                        warn!(%contract_id, error = %err, "graph context lookup failed, degrading to vector-only");
                        None
                    }
                })
                .collect()
        };

        // Step 4: convert both streams into RRF candidates.
        let vector_candidates: Vec<RrfCandidate> = vector_hits
            .iter()
            .map(|hit| RrfCandidate {
                contract_id: hit.contract_id.clone(),
                content: hit.text.clone(),
                score: hit.relevance_score(),
                metadata: hit.metadata.clone(),
            })
            .collect();

        let graph_candidates: Vec<RrfCandidate> = graph_contexts.iter().flatten().flat_map(graph_context_candidates).collect();

        // Step 5 & 6: RRF fuse (already sorted + tie-broken by rrf::merge), estimate tokens.
        let results = rrf::merge(&vector_candidates, &graph_candidates, self.config.rrf_k);

        let total_chars: usize = results.iter().map(|r| r.content.len()).sum();
        let estimated_tokens = total_chars.div_ceil(4) as u64;

        Ok(HybridResponse {
            vector_count: vector_candidates.len(),
            graph_count: graph_candidates.len(),
            results,
            estimated_tokens,
        })
    }
}

/// Flattens one contract's graph context into RRF candidates, one per
/// clause and risk — the richest content the graph side can offer (§4.4:
/// "bounded relevance derived from entity prominence").
fn graph_context_candidates(context: &GraphContext) -> Vec<RrfCandidate> {
    let mut candidates = Vec::with_capacity(context.clauses.len() + context.risks.len());

    for clause in &context.clauses {
        let mut metadata = BTreeMap::new();
        metadata.insert("clause_id".to_string(), clause.clause_id.clone());
        metadata.insert("clause_type".to_string(), clause.clause_type.clone());
        candidates.push(RrfCandidate {
            contract_id: context.contract_id.clone(),
            content: clause.content.clone(),
            score: clause.importance.clamp(0.0, 1.0),
            metadata,
        });
    }

    for risk in &context.risks {
        let mut metadata = BTreeMap::new();
        metadata.insert("section".to_string(), risk.section.clone());
        candidates.push(RrfCandidate {
            contract_id: context.contract_id.clone(),
            content: format!("{}: {}", risk.concern, risk.recommendation),
            score: risk_level_weight(risk.risk_level),
            metadata,
        });
    }

    candidates
}

fn risk_level_weight(level: RiskLevel) -> f64 {
    match level {
        RiskLevel::Low => 0.3,
        RiskLevel::Medium => 0.6,
        RiskLevel::High => 1.0,
    }
}
