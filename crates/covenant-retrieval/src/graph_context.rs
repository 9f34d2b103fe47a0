//! GraphContextRetriever: a thin typed wrapper over `GraphStore`'s four
//! read operations (§4.3). Each is a single traversal on the store side;
//! this layer adds no further queries.

use covenant_core::errors::CovenantResult;
use covenant_core::models::{ContractNode, GraphContext, RiskLevel};
use covenant_core::traits::graph_store::{ClauseWithRisks, GraphStore, RiskWithClause};

pub struct GraphContextRetriever<G: GraphStore> {
    store: G,
}

impl<G: GraphStore> GraphContextRetriever<G> {
    pub fn new(store: G) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &G {
        &self.store
    }

    pub async fn context_for_contract(
        &self,
        contract_id: &str,
        include_companies: bool,
        include_clauses: bool,
        include_risks: bool,
        max_clauses: usize,
    ) -> CovenantResult<Option<GraphContext>> {
        self.store
            .context_for_contract(contract_id, include_companies, include_clauses, include_risks, max_clauses)
            .await
    }

    pub async fn context_for_clause_type(
        &self,
        contract_id: &str,
        clause_type: &str,
    ) -> CovenantResult<Option<ClauseWithRisks>> {
        self.store.clause_type_context(contract_id, clause_type).await
    }

    pub async fn contracts_by_company(&self, company_name: &str, limit: usize) -> CovenantResult<Vec<ContractNode>> {
        self.store.contracts_by_company(company_name, limit).await
    }

    pub async fn risk_context(&self, contract_id: &str, risk_level: Option<RiskLevel>) -> CovenantResult<Vec<RiskWithClause>> {
        self.store.risk_context(contract_id, risk_level).await
    }
}
