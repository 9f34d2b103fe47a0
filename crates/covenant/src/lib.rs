//! Library entry points (§6): ingest a contract, answer a question scoped to
//! one contract or asked across all of them, read back a contract's graph
//! neighbourhood, and report daily cost. `Covenant` wires the four
//! collaborators (PdfParser, VectorIndex, GraphStore, ModelProvider) plus
//! their LedgerStore into the pipelines that do the actual work.

pub mod types;

use std::sync::Arc;

use chrono::NaiveDate;
use covenant_core::config::CovenantConfig;
use covenant_core::errors::CovenantResult;
use covenant_core::models::{ContractAnalysisState, DailyCost};
use covenant_core::traits::graph_store::GraphStore;
use covenant_core::traits::ledger_store::LedgerStore;
use covenant_core::traits::model_provider::ModelProvider;
use covenant_core::traits::pdf_parser::PdfParser;
use covenant_core::traits::vector_index::VectorIndex;
use covenant_ledger::CostLedger;
use covenant_pipeline::AnalysisPipeline;
use covenant_retrieval::HybridRetriever;
use covenant_router::ModelRouter;
use tracing::info;
use uuid::Uuid;

pub use types::{AnalysisResult, AnswerResult, ContractView};

pub struct Covenant<Pdf, V, G, P, S>
where
    Pdf: PdfParser,
    V: VectorIndex,
    G: GraphStore,
    P: ModelProvider,
    S: LedgerStore,
{
    graph_store: Arc<G>,
    ledger: Arc<CostLedger<S>>,
    analysis: AnalysisPipeline<Pdf, V, G, P, S>,
    query: covenant_pipeline::QueryPipeline<Arc<V>, Arc<G>, P, S>,
}

impl<Pdf, V, G, P, S> Covenant<Pdf, V, G, P, S>
where
    Pdf: PdfParser,
    V: VectorIndex,
    G: GraphStore,
    P: ModelProvider,
    S: LedgerStore,
{
    pub fn new(pdf_parser: Pdf, vector_index: V, graph_store: G, provider: P, ledger_store: S, config: CovenantConfig) -> Self {
        let vector_index = Arc::new(vector_index);
        let graph_store = Arc::new(graph_store);
        let router = Arc::new(ModelRouter::new(provider, config.router));
        let ledger = Arc::new(CostLedger::new(ledger_store));

        let analysis = AnalysisPipeline::new(
            pdf_parser,
            Arc::clone(&vector_index),
            Arc::clone(&graph_store),
            Arc::clone(&router),
            Arc::clone(&ledger),
            config.pipeline,
            config.retrieval.clone(),
        );

        let retriever = HybridRetriever::new(Arc::clone(&vector_index), Arc::clone(&graph_store), config.retrieval);
        let query = covenant_pipeline::QueryPipeline::new(retriever, Arc::clone(&router), Arc::clone(&ledger));

        Self { graph_store, ledger, analysis, query }
    }

    /// *Ingest* (§6): parses, analyzes, and persists a contract, returning
    /// every accumulated error rather than raising (§4.5, §7).
    pub async fn ingest(&self, file_bytes: &[u8], filename: &str) -> AnalysisResult {
        let state = ContractAnalysisState::new(Uuid::new_v4().to_string(), filename);
        let contract_id = state.contract_id.clone();
        let result: AnalysisResult = self.analysis.run(state, file_bytes).await.into();
        info!(%contract_id, errors = result.errors.len() as u64, total_cost = result.total_cost, "contract ingested");
        result
    }

    /// *Query (scoped)* (§6).
    pub async fn query_scoped(&self, contract_id: &str, query_text: &str, n_results: usize) -> CovenantResult<AnswerResult> {
        Ok(self.query.answer(query_text, Some(contract_id), n_results).await?.into())
    }

    /// *Query (global)* (§6).
    pub async fn query_global(&self, query_text: &str, n_results: usize) -> CovenantResult<AnswerResult> {
        Ok(self.query.answer(query_text, None, n_results).await?.into())
    }

    /// *Contract read* (§6): `None` when the contract has never been written.
    pub async fn contract_read(&self, contract_id: &str) -> CovenantResult<Option<ContractView>> {
        let Some(contract) = self.graph_store.get_contract(contract_id).await? else {
            return Ok(None);
        };
        let context = self.graph_store.context_for_contract(contract_id, true, true, true, usize::MAX).await?;
        let (companies, clauses, risks) = match context {
            Some(context) => (context.companies, context.clauses, context.risks),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };
        Ok(Some(ContractView { contract, companies, clauses, risks }))
    }

    /// *Cost daily* (§6): defaults to today in UTC (§3).
    pub async fn cost_daily(&self, day: Option<NaiveDate>) -> CovenantResult<DailyCost> {
        let day = day.unwrap_or_else(|| chrono::Utc::now().date_naive());
        self.ledger.daily(day).await
    }
}
