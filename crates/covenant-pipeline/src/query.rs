//! QueryPipeline (§4.6): retrieve-then-generate ad-hoc Q&A over a specific
//! or unspecified contract.

use std::sync::Arc;

use covenant_core::errors::{CovenantResult, ErrorKind};
use covenant_core::models::{ComplexityTier, Operation, ResultSource};
use covenant_core::traits::graph_store::GraphStore;
use covenant_core::traits::model_provider::ModelProvider;
use covenant_core::traits::ledger_store::LedgerStore;
use covenant_core::traits::vector_index::VectorIndex;
use covenant_ledger::CostLedger;
use covenant_retrieval::{HybridRetriever, RetrieveOptions};
use covenant_router::{GenerateOptions, ModelRouter};

const REFUSAL_TEXT: &str = "No relevant context was found.";

/// One cited source backing the answer (§4.6 step d).
#[derive(Debug, Clone)]
pub struct AnswerSource {
    pub index: usize,
    pub source: ResultSource,
    pub contract_id: String,
    pub score: f64,
    pub preview: String,
}

#[derive(Debug, Clone)]
pub struct QueryAnswer {
    pub text: String,
    pub sources: Vec<AnswerSource>,
    pub vector_count: usize,
    pub graph_count: usize,
    pub cost: f64,
    /// Set when generation failed (§7): the answer is a zero-cost empty
    /// record rather than a propagated error.
    pub error_kind: Option<ErrorKind>,
}

pub struct QueryPipeline<V: VectorIndex, G: GraphStore, P: ModelProvider, S: LedgerStore> {
    retriever: HybridRetriever<V, G>,
    router: Arc<ModelRouter<P>>,
    ledger: Arc<CostLedger<S>>,
}

impl<V: VectorIndex, G: GraphStore, P: ModelProvider, S: LedgerStore> QueryPipeline<V, G, P, S> {
    pub fn new(retriever: HybridRetriever<V, G>, router: Arc<ModelRouter<P>>, ledger: Arc<CostLedger<S>>) -> Self {
        Self { retriever, router, ledger }
    }

    pub async fn answer(&self, query: &str, contract_id: Option<&str>, n_results: usize) -> CovenantResult<QueryAnswer> {
        let retrieval = self
            .retriever
            .retrieve(
                query,
                RetrieveOptions { contract_id: contract_id.map(str::to_string), n_vector: Some(n_results), ..Default::default() },
            )
            .await?;

        if retrieval.results.is_empty() {
            return Ok(QueryAnswer {
                text: REFUSAL_TEXT.to_string(),
                sources: Vec::new(),
                vector_count: retrieval.vector_count,
                graph_count: retrieval.graph_count,
                cost: 0.0,
                error_kind: None,
            });
        }

        let top = &retrieval.results[..retrieval.results.len().min(n_results)];
        let prompt = build_prompt(query, top);

        let options = GenerateOptions {
            system_instruction: Some(
                "Answer using only the supplied context. Do not use outside knowledge. Cite sources with their [Source i] marker.".to_string(),
            ),
            ..Default::default()
        };

        let generation = match self.router.generate(&prompt, ComplexityTier::Simple, options).await {
            Ok(generation) => generation,
            Err(err) => {
                return Ok(QueryAnswer {
                    text: String::new(),
                    sources: Vec::new(),
                    vector_count: retrieval.vector_count,
                    graph_count: retrieval.graph_count,
                    cost: 0.0,
                    error_kind: Some(err.kind()),
                })
            }
        };

        self.ledger
            .record(
                covenant_core::models::CostEntry {
                    day: chrono::Utc::now().date_naive(),
                    model: generation.model.clone(),
                    operation: Operation::Query,
                    input_tokens: generation.input_tokens,
                    output_tokens: generation.output_tokens,
                    thinking_tokens: generation.thinking_tokens,
                    cost: generation.cost,
                    occurred_at: chrono::Utc::now(),
                },
                true,
            )
            .await?;

        let sources = top
            .iter()
            .enumerate()
            .map(|(i, result)| AnswerSource {
                index: i,
                source: result.source,
                contract_id: result.contract_id.clone(),
                score: result.rrf_score,
                preview: result.content.chars().take(100).collect(),
            })
            .collect();

        Ok(QueryAnswer {
            text: generation.text,
            sources,
            vector_count: retrieval.vector_count,
            graph_count: retrieval.graph_count,
            cost: generation.cost,
            error_kind: None,
        })
    }
}

fn build_prompt(query: &str, results: &[covenant_core::models::RetrievalResult]) -> String {
    let mut prompt = String::new();
    for (i, result) in results.iter().enumerate() {
        let kind = match result.source {
            ResultSource::Vector => "vector",
            ResultSource::Graph => "graph",
        };
        prompt.push_str(&format!("[Source {i} — {kind}]\n{}\n\n", result.content));
    }
    prompt.push_str(&format!("Question: {query}\n"));
    prompt
}
