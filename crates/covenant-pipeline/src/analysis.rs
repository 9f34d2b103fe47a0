//! AnalysisPipeline (§4.5): parse → analyze_risk → persist_vectors →
//! persist_graph → answer, each stage wrapped in its own failure barrier.

use std::sync::Arc;
use std::time::Duration;

use covenant_core::config::{PipelineConfig, RetrievalConfig};
use covenant_core::models::{
    ClauseNode, CompanyNode, ComplexityTier, ContractAnalysisState, ContractNode, CostEntry, DocumentChunk, GraphWrite, Operation,
    RiskFactorNode, RiskLevel, RiskReport,
};
use covenant_core::traits::graph_store::GraphStore;
use covenant_core::traits::model_provider::ModelProvider;
use covenant_core::traits::ledger_store::LedgerStore;
use covenant_core::traits::pdf_parser::PdfParser;
use covenant_core::traits::vector_index::VectorIndex;
use covenant_ledger::CostLedger;
use covenant_retrieval::HybridRetriever;
use covenant_router::{GenerateOptions, ModelRouter};
use tracing::warn;

use crate::chunking::chunk_text;
use crate::query::QueryPipeline;
use crate::stage::DeadlineBudget;

pub struct AnalysisPipeline<Pdf: PdfParser, V: VectorIndex, G: GraphStore, P: ModelProvider, S: LedgerStore> {
    pdf_parser: Pdf,
    vector_index: Arc<V>,
    graph_store: Arc<G>,
    router: Arc<ModelRouter<P>>,
    ledger: Arc<CostLedger<S>>,
    pipeline_config: PipelineConfig,
    retrieval_config: RetrievalConfig,
}

impl<Pdf, V, G, P, S> AnalysisPipeline<Pdf, V, G, P, S>
where
    Pdf: PdfParser,
    V: VectorIndex,
    G: GraphStore,
    P: ModelProvider,
    S: LedgerStore,
{
    pub fn new(
        pdf_parser: Pdf,
        vector_index: Arc<V>,
        graph_store: Arc<G>,
        router: Arc<ModelRouter<P>>,
        ledger: Arc<CostLedger<S>>,
        pipeline_config: PipelineConfig,
        retrieval_config: RetrievalConfig,
    ) -> Self {
        Self { pdf_parser, vector_index, graph_store, router, ledger, pipeline_config, retrieval_config }
    }

    /// Runs all five stages against `state` (already carrying `contract_id`,
    /// `filename`, and an optional `query`) and the raw document `bytes`.
    /// Never returns an error — every stage failure becomes an `ErrorEntry`.
    pub async fn run(&self, mut state: ContractAnalysisState, bytes: &[u8]) -> ContractAnalysisState {
        let budget = DeadlineBudget::starting_now(Duration::from_secs(self.pipeline_config.overall_deadline_secs));
        let mut parsed_metadata = None;

        self.stage_parse(&mut state, &mut parsed_metadata, bytes).await;
        self.stage_analyze_risk(&mut state).await;
        self.stage_persist_vectors(&mut state).await;
        self.stage_persist_graph(&mut state, parsed_metadata.as_ref()).await;

        if budget.is_expired() {
            state.push_error("answer", "overall deadline exceeded before the answer stage");
        } else {
            self.stage_answer(&mut state).await;
        }

        state
    }

    async fn stage_parse(
        &self,
        state: &mut ContractAnalysisState,
        parsed_metadata: &mut Option<covenant_core::traits::pdf_parser::ParsedMetadata>,
        bytes: &[u8],
    ) {
        match self.pdf_parser.parse(bytes, &state.filename).await {
            Ok(document) => {
                state.parsed_text = Some(document.raw_text);
                state.sections = document.sections;
                *parsed_metadata = Some(document.metadata);
            }
            Err(err) => state.push_error("parse", err.to_string()),
        }
    }

    async fn stage_analyze_risk(&self, state: &mut ContractAnalysisState) {
        let Some(parsed_text) = state.parsed_text.as_ref().filter(|text| !text.is_empty()) else {
            state.push_error("analyze_risk", "skipped: parsed_text is empty");
            return;
        };

        let truncated: String = parsed_text.chars().take(self.pipeline_config.risk_prompt_max_chars).collect();
        let prompt = format!(
            "Analyze the following contract text for risk. Respond with JSON matching \
             {{risk_score, risk_level, concerning_clauses: [{{section, concern, risk_level, recommendation}}], key_terms}}.\n\n{truncated}"
        );

        let options = GenerateOptions { system_instruction: Some("Respond with JSON only.".to_string()), ..Default::default() };
        let generation = match self.router.generate(&prompt, ComplexityTier::Complex, options).await {
            Ok(result) => result,
            Err(err) => {
                state.push_error("analyze_risk", err.to_string());
                return;
            }
        };

        state.add_cost(generation.cost);
        self.record_cost(&generation.model, Operation::Analyze, generation.input_tokens, generation.output_tokens, generation.thinking_tokens, generation.cost)
            .await;

        let cleaned = strip_code_fence(&generation.text);
        let report: RiskReport = match serde_json::from_str(&cleaned) {
            Ok(report) => report,
            Err(err) => {
                state.push_error("analyze_risk", format!("model returned unparseable JSON: {err}"));
                return;
            }
        };

        if !report.is_band_consistent() {
            state.push_error("analyze_risk", "risk_level inconsistent with risk_score band");
            return;
        }

        state.key_terms = Some(report.key_terms.clone());
        state.risk = Some(report);
    }

    async fn stage_persist_vectors(&self, state: &mut ContractAnalysisState) {
        let Some(parsed_text) = state.parsed_text.as_ref().filter(|text| !text.is_empty()) else {
            state.push_error("persist_vectors", "skipped: parsed_text is empty");
            return;
        };

        let sections: Vec<(String, String)> = if state.sections.is_empty() {
            vec![("document".to_string(), parsed_text.clone())]
        } else {
            state.sections.iter().map(|(name, text)| (name.clone(), text.clone())).collect()
        };

        let mut pending_chunks = Vec::new();
        for (section_name, text) in &sections {
            for (idx, chunk) in chunk_text(text, self.pipeline_config.chunk_size, self.pipeline_config.chunk_overlap).into_iter().enumerate() {
                pending_chunks.push((format!("{}:{section_name}:{idx}", state.contract_id), section_name.clone(), idx, chunk));
            }
        }

        if pending_chunks.is_empty() {
            return;
        }

        let texts: Vec<String> = pending_chunks.iter().map(|(_, _, _, text)| text.clone()).collect();
        let embeddings = match self.router.embed(&texts).await {
            Ok(embeddings) => embeddings,
            Err(err) => {
                state.push_error("persist_vectors", err.to_string());
                return;
            }
        };

        let chunks: Vec<DocumentChunk> = pending_chunks
            .into_iter()
            .zip(embeddings)
            .map(|((chunk_id, section_name, chunk_index, text), embedding)| DocumentChunk {
                chunk_id,
                contract_id: state.contract_id.clone(),
                section_name,
                chunk_index,
                text,
                embedding,
                metadata: Default::default(),
            })
            .collect();

        match self.vector_index.upsert(&chunks).await {
            Ok(()) => state.vector_chunk_ids = chunks.into_iter().map(|chunk| chunk.chunk_id).collect(),
            Err(err) => state.push_error("persist_vectors", err.to_string()),
        }
    }

    async fn stage_persist_graph(&self, state: &mut ContractAnalysisState, parsed_metadata: Option<&covenant_core::traits::pdf_parser::ParsedMetadata>) {
        let risk_score = state.risk.as_ref().map(|report| report.risk_score).unwrap_or(0);
        let risk_level = state.risk.as_ref().map(|report| report.risk_level).unwrap_or(RiskLevel::Low);

        let contract = ContractNode { contract_id: state.contract_id.clone(), filename: state.filename.clone(), upload_date: chrono::Utc::now(), risk_score, risk_level };

        let companies = parsed_metadata
            .map(|metadata| metadata.parties.iter().map(|name| CompanyNode { name: name.clone(), role: "party".to_string() }).collect())
            .unwrap_or_default();

        let clauses: Vec<ClauseNode> = state
            .sections
            .iter()
            .map(|(section_name, text)| ClauseNode {
                clause_id: format!("{}:{section_name}", state.contract_id),
                section_name: section_name.clone(),
                content: text.clone(),
                clause_type: section_name.to_lowercase(),
                importance: 0.5,
            })
            .collect();

        let risks: Vec<RiskFactorNode> = state
            .risk
            .as_ref()
            .map(|report| {
                report
                    .concerning_clauses
                    .iter()
                    .map(|clause| RiskFactorNode { concern: clause.concern.clone(), risk_level: clause.risk_level, section: clause.section.clone(), recommendation: clause.recommendation.clone() })
                    .collect()
            })
            .unwrap_or_default();

        let write = GraphWrite { contract, companies, clauses, risks };
        match self.graph_store.write_contract(&write).await {
            Ok(()) => state.graph_written = true,
            Err(err) => state.push_error("persist_graph", err.to_string()),
        }
    }

    async fn stage_answer(&self, state: &mut ContractAnalysisState) {
        let Some(query) = state.query.clone().filter(|q| !q.is_empty()) else {
            return;
        };

        let retriever = HybridRetriever::new(Arc::clone(&self.vector_index), Arc::clone(&self.graph_store), self.retrieval_config.clone());
        let query_pipeline = QueryPipeline::new(retriever, Arc::clone(&self.router), Arc::clone(&self.ledger));

        match query_pipeline.answer(&query, Some(&state.contract_id), 5).await {
            Ok(result) => {
                state.answer = Some(result.text);
                state.add_cost(result.cost);
            }
            Err(err) => state.push_error("answer", err.to_string()),
        }
    }

    async fn record_cost(&self, model: &str, operation: Operation, input_tokens: u64, output_tokens: u64, thinking_tokens: u64, cost: f64) {
        let entry = CostEntry {
            day: chrono::Utc::now().date_naive(),
            model: model.to_string(),
            operation,
            input_tokens,
            output_tokens,
            thinking_tokens,
            cost,
            occurred_at: chrono::Utc::now(),
        };
        if let Err(err) = self.ledger.record(entry, true).await {
            warn!(error = %err, "analysis pipeline failed to record cost entry");
        }
    }
}

/// Strips leading/trailing Markdown code-fence markers before JSON parsing
/// (§9: "tolerate minor formatting noise").
fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();
    let without_prefix = trimmed.strip_prefix("```json").or_else(|| trimmed.strip_prefix("```")).unwrap_or(trimmed);
    without_prefix.strip_suffix("```").unwrap_or(without_prefix).trim().to_string()
}
