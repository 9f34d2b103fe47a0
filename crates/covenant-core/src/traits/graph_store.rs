use std::sync::Arc;

use crate::errors::CovenantResult;
use crate::models::{
    ClauseNode, CompanyNode, ContractNode, GraphContext, GraphWrite, RiskFactorNode, RiskLevel,
};

/// A clause paired with the risks that share its section, for
/// `GraphStore::risk_context` (§4.3).
#[derive(Debug, Clone)]
pub struct RiskWithClause {
    pub risk: RiskFactorNode,
    pub clause: Option<ClauseNode>,
}

/// A clause paired with its related risk factors, for
/// `GraphStore::clause_type_context` (§4.3).
#[derive(Debug, Clone)]
pub struct ClauseWithRisks {
    pub clause: ClauseNode,
    pub related_risks: Vec<RiskFactorNode>,
}

/// GraphStore (collaborator, §6). A Cypher-like query surface with
/// uniqueness constraints on `Contract.contract_id`, `Clause.clause_id`,
/// `Company.name`. Every read here is a single traversal — GraphContextRetriever
/// never issues a follow-up query per result (no N+1, §4.3). A suspension
/// point (§5).
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Idempotent write on the unique keys (§3): calling twice with
    /// identical input produces identical graph state.
    async fn write_contract(&self, write: &GraphWrite) -> CovenantResult<()>;

    /// Deletes the contract and its outbound CONTAINS/HAS_RISK nodes and
    /// inbound PARTY_TO edges. Shared Company nodes are left in place (§3).
    async fn delete_contract(&self, contract_id: &str) -> CovenantResult<()>;

    async fn get_contract(&self, contract_id: &str) -> CovenantResult<Option<ContractNode>>;

    /// One traversal fetching connected companies/clauses/risks (§4.3).
    async fn context_for_contract(
        &self,
        contract_id: &str,
        include_companies: bool,
        include_clauses: bool,
        include_risks: bool,
        max_clauses: usize,
    ) -> CovenantResult<Option<GraphContext>>;

    async fn clause_type_context(
        &self,
        contract_id: &str,
        clause_type: &str,
    ) -> CovenantResult<Option<ClauseWithRisks>>;

    /// Ordered by descending `upload_date` (§4.3).
    async fn contracts_by_company(
        &self,
        company_name: &str,
        limit: usize,
    ) -> CovenantResult<Vec<ContractNode>>;

    async fn risk_context(
        &self,
        contract_id: &str,
        risk_level: Option<RiskLevel>,
    ) -> CovenantResult<Vec<RiskWithClause>>;

    /// Companies currently linked to a contract (PARTY_TO), used by the
    /// pipeline to derive idempotent `GraphWrite`s across repeated runs.
    async fn companies_for_contract(&self, contract_id: &str) -> CovenantResult<Vec<CompanyNode>>;
}

/// Lets callers share one store between AnalysisPipeline and QueryPipeline
/// via `Arc<G>` without a second trait bound.
impl<T: GraphStore> GraphStore for Arc<T> {
    async fn write_contract(&self, write: &GraphWrite) -> CovenantResult<()> {
        T::write_contract(self, write).await
    }

    async fn delete_contract(&self, contract_id: &str) -> CovenantResult<()> {
        T::delete_contract(self, contract_id).await
    }

    async fn get_contract(&self, contract_id: &str) -> CovenantResult<Option<ContractNode>> {
        T::get_contract(self, contract_id).await
    }

    async fn context_for_contract(
        &self,
        contract_id: &str,
        include_companies: bool,
        include_clauses: bool,
        include_risks: bool,
        max_clauses: usize,
    ) -> CovenantResult<Option<GraphContext>> {
        T::context_for_contract(self, contract_id, include_companies, include_clauses, include_risks, max_clauses).await
    }

    async fn clause_type_context(&self, contract_id: &str, clause_type: &str) -> CovenantResult<Option<ClauseWithRisks>> {
        T::clause_type_context(self, contract_id, clause_type).await
    }

    async fn contracts_by_company(&self, company_name: &str, limit: usize) -> CovenantResult<Vec<ContractNode>> {
        T::contracts_by_company(self, company_name, limit).await
    }

    async fn risk_context(&self, contract_id: &str, risk_level: Option<RiskLevel>) -> CovenantResult<Vec<RiskWithClause>> {
        T::risk_context(self, contract_id, risk_level).await
    }

    async fn companies_for_contract(&self, contract_id: &str) -> CovenantResult<Vec<CompanyNode>> {
        T::companies_for_contract(self, contract_id).await
    }
}
