//! Public response shapes for the five library entry points (§6). These
//! mirror the internal pipeline records but are defined independently so the
//! facade's surface doesn't shift every time an internal stage changes.

use covenant_core::errors::ErrorKind;
use covenant_core::models::{CompanyNode, ContractAnalysisState, ContractNode, ErrorEntry, RiskFactorNode, RiskReport};
use covenant_pipeline::{AnswerSource, QueryAnswer};

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub contract_id: String,
    pub filename: String,
    pub risk: Option<RiskReport>,
    pub answer: Option<String>,
    pub vector_chunk_count: usize,
    pub graph_written: bool,
    pub total_cost: f64,
    pub errors: Vec<ErrorEntry>,
}

impl From<ContractAnalysisState> for AnalysisResult {
    fn from(state: ContractAnalysisState) -> Self {
        Self {
            contract_id: state.contract_id,
            filename: state.filename,
            risk: state.risk,
            answer: state.answer,
            vector_chunk_count: state.vector_chunk_ids.len(),
            graph_written: state.graph_written,
            total_cost: state.total_cost,
            errors: state.errors,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub text: String,
    pub sources: Vec<AnswerSource>,
    pub vector_count: usize,
    pub graph_count: usize,
    pub cost: f64,
    pub error_kind: Option<ErrorKind>,
}

impl From<QueryAnswer> for AnswerResult {
    fn from(answer: QueryAnswer) -> Self {
        Self {
            text: answer.text,
            sources: answer.sources,
            vector_count: answer.vector_count,
            graph_count: answer.graph_count,
            cost: answer.cost,
            error_kind: answer.error_kind,
        }
    }
}

/// A contract plus its directly-connected graph neighbourhood, for the
/// *Contract read* entry point (§6).
#[derive(Debug, Clone)]
pub struct ContractView {
    pub contract: ContractNode,
    pub companies: Vec<CompanyNode>,
    pub clauses: Vec<covenant_core::models::ClauseNode>,
    pub risks: Vec<RiskFactorNode>,
}
