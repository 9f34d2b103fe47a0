//! An in-memory `GraphStore`: a `petgraph::StableGraph` behind an `RwLock`,
//! modeled on `GraphManager`'s shared-graph pattern — node indices are kept
//! stable across removals so the id maps below stay valid.

use std::collections::BTreeMap;
use std::sync::RwLock;

use covenant_core::errors::CovenantResult;
use covenant_core::models::{
    ClauseNode, CompanyNode, ContractNode, GraphContext, GraphWrite, RelationshipKind, RiskFactorNode, RiskLevel,
};
use covenant_core::traits::graph_store::{ClauseWithRisks, GraphStore, RiskWithClause};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::Direction;

#[derive(Debug, Clone)]
enum Node {
    Contract(ContractNode),
    Company(CompanyNode),
    Clause(ClauseNode),
    RiskFactor(RiskFactorNode),
}

struct Inner {
    graph: StableGraph<Node, RelationshipKind>,
    contracts: BTreeMap<String, NodeIndex>,
    companies: BTreeMap<String, NodeIndex>,
    clauses: BTreeMap<String, NodeIndex>,
    /// Keyed by `{contract_id}:{section}:{concern}` — `RiskFactorNode` carries
    /// no identity field of its own, so the write path derives one.
    risks: BTreeMap<String, NodeIndex>,
}

impl Inner {
    fn new() -> Self {
        Self { graph: StableGraph::new(), contracts: BTreeMap::new(), companies: BTreeMap::new(), clauses: BTreeMap::new(), risks: BTreeMap::new() }
    }

    fn ensure_edge(&mut self, source: NodeIndex, target: NodeIndex, kind: RelationshipKind) {
        if self.graph.find_edge(source, target).is_none() {
            self.graph.add_edge(source, target, kind);
        }
    }
}

pub struct InMemoryGraphStore {
    inner: RwLock<Inner>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner::new()) }
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn risk_key(contract_id: &str, risk: &RiskFactorNode) -> String {
    format!("{contract_id}:{}:{}", risk.section, risk.concern)
}

impl GraphStore for InMemoryGraphStore {
    /// MERGE semantics on the unique keys (§3): re-running with identical
    /// input leaves the same nodes and edges in place.
    async fn write_contract(&self, write: &GraphWrite) -> CovenantResult<()> {
        let mut inner = self.inner.write().expect("graph store lock poisoned");
        let contract_id = write.contract.contract_id.clone();

        let contract_idx = match inner.contracts.get(&contract_id).copied() {
            Some(idx) => {
                *inner.graph.node_weight_mut(idx).expect("contract index out of sync") = Node::Contract(write.contract.clone());
                idx
            }
            None => {
                let idx = inner.graph.add_node(Node::Contract(write.contract.clone()));
                inner.contracts.insert(contract_id.clone(), idx);
                idx
            }
        };

        for company in &write.companies {
            let company_idx = match inner.companies.get(&company.name).copied() {
                Some(idx) => {
                    *inner.graph.node_weight_mut(idx).expect("company index out of sync") = Node::Company(company.clone());
                    idx
                }
                None => {
                    let idx = inner.graph.add_node(Node::Company(company.clone()));
                    inner.companies.insert(company.name.clone(), idx);
                    idx
                }
            };
            inner.ensure_edge(company_idx, contract_idx, RelationshipKind::PartyTo);
        }

        for clause in &write.clauses {
            let clause_idx = match inner.clauses.get(&clause.clause_id).copied() {
                Some(idx) => {
                    *inner.graph.node_weight_mut(idx).expect("clause index out of sync") = Node::Clause(clause.clone());
                    idx
                }
                None => {
                    let idx = inner.graph.add_node(Node::Clause(clause.clone()));
                    inner.clauses.insert(clause.clause_id.clone(), idx);
                    idx
                }
            };
            inner.ensure_edge(contract_idx, clause_idx, RelationshipKind::Contains);
        }

        for risk in &write.risks {
            let key = risk_key(&contract_id, risk);
            let risk_idx = match inner.risks.get(&key).copied() {
                Some(idx) => {
                    *inner.graph.node_weight_mut(idx).expect("risk index out of sync") = Node::RiskFactor(risk.clone());
                    idx
                }
                None => {
                    let idx = inner.graph.add_node(Node::RiskFactor(risk.clone()));
                    inner.risks.insert(key, idx);
                    idx
                }
            };
            inner.ensure_edge(contract_idx, risk_idx, RelationshipKind::HasRisk);
        }

        Ok(())
    }

    /// Drops the contract's outbound CONTAINS/HAS_RISK nodes and inbound
    /// PARTY_TO edges; shared `Company` nodes are left in place (§3).
    async fn delete_contract(&self, contract_id: &str) -> CovenantResult<()> {
        let mut inner = self.inner.write().expect("graph store lock poisoned");
        let Some(contract_idx) = inner.contracts.remove(contract_id) else {
            tracing::debug!(contract_id, "delete_contract called on an unknown contract, nothing to remove");
            return Ok(());
        };

        let outgoing: Vec<NodeIndex> = inner.graph.neighbors_directed(contract_idx, Direction::Outgoing).collect();
        for target in outgoing {
            match inner.graph.node_weight(target) {
                Some(Node::Clause(clause)) => {
                    let clause_id = clause.clause_id.clone();
                    inner.clauses.remove(&clause_id);
                }
                Some(Node::RiskFactor(_)) => {
                    inner.risks.retain(|_, idx| *idx != target);
                }
                _ => {}
            }
            inner.graph.remove_node(target);
        }

        let incoming_edges: Vec<EdgeIndex> = inner.graph.edges_directed(contract_idx, Direction::Incoming).map(|edge| edge.id()).collect();
        for edge_idx in incoming_edges {
            inner.graph.remove_edge(edge_idx);
        }

        inner.graph.remove_node(contract_idx);
        Ok(())
    }

    async fn get_contract(&self, contract_id: &str) -> CovenantResult<Option<ContractNode>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        Ok(inner.contracts.get(contract_id).and_then(|idx| match inner.graph.node_weight(*idx) {
            Some(Node::Contract(contract)) => Some(contract.clone()),
            _ => None,
        }))
    }

    async fn context_for_contract(
        &self,
        contract_id: &str,
        include_companies: bool,
        include_clauses: bool,
        include_risks: bool,
        max_clauses: usize,
    ) -> CovenantResult<Option<GraphContext>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let Some(&contract_idx) = inner.contracts.get(contract_id) else {
            return Ok(None);
        };
        let Some(Node::Contract(contract)) = inner.graph.node_weight(contract_idx) else {
            return Ok(None);
        };

        let mut contract_metadata = BTreeMap::new();
        contract_metadata.insert("filename".to_string(), contract.filename.clone());
        contract_metadata.insert("upload_date".to_string(), contract.upload_date.to_rfc3339());

        let companies = if include_companies {
            inner
                .graph
                .edges_directed(contract_idx, Direction::Incoming)
                .filter(|edge| *edge.weight() == RelationshipKind::PartyTo)
                .filter_map(|edge| match inner.graph.node_weight(edge.source()) {
                    Some(Node::Company(company)) => Some(company.clone()),
                    _ => None,
                })
                .collect()
        } else {
            Vec::new()
        };

        let clauses = if include_clauses {
            let mut clauses: Vec<ClauseNode> = inner
                .graph
                .edges_directed(contract_idx, Direction::Outgoing)
                .filter(|edge| *edge.weight() == RelationshipKind::Contains)
                .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                    Some(Node::Clause(clause)) => Some(clause.clone()),
                    _ => None,
                })
                .collect();
            clauses.truncate(max_clauses);
            clauses
        } else {
            Vec::new()
        };

        let risks = if include_risks {
            inner
                .graph
                .edges_directed(contract_idx, Direction::Outgoing)
                .filter(|edge| *edge.weight() == RelationshipKind::HasRisk)
                .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                    Some(Node::RiskFactor(risk)) => Some(risk.clone()),
                    _ => None,
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Some(GraphContext { contract_id: contract_id.to_string(), contract_metadata, companies, clauses, risks, traversal_depth: 1 }))
    }

    async fn clause_type_context(&self, contract_id: &str, clause_type: &str) -> CovenantResult<Option<ClauseWithRisks>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let Some(&contract_idx) = inner.contracts.get(contract_id) else {
            return Ok(None);
        };

        let clause = inner
            .graph
            .edges_directed(contract_idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == RelationshipKind::Contains)
            .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                Some(Node::Clause(clause)) if clause.clause_type == clause_type => Some(clause.clone()),
                _ => None,
            })
            .next();

        let Some(clause) = clause else {
            return Ok(None);
        };

        let related_risks = inner
            .graph
            .edges_directed(contract_idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == RelationshipKind::HasRisk)
            .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                Some(Node::RiskFactor(risk)) if risk.section == clause.section_name => Some(risk.clone()),
                _ => None,
            })
            .collect();

        Ok(Some(ClauseWithRisks { clause, related_risks }))
    }

    /// Ordered by descending `upload_date` (§4.3).
    async fn contracts_by_company(&self, company_name: &str, limit: usize) -> CovenantResult<Vec<ContractNode>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let Some(&company_idx) = inner.companies.get(company_name) else {
            return Ok(Vec::new());
        };

        let mut contracts: Vec<ContractNode> = inner
            .graph
            .edges_directed(company_idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == RelationshipKind::PartyTo)
            .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                Some(Node::Contract(contract)) => Some(contract.clone()),
                _ => None,
            })
            .collect();

        contracts.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        contracts.truncate(limit);
        Ok(contracts)
    }

    async fn risk_context(&self, contract_id: &str, risk_level: Option<RiskLevel>) -> CovenantResult<Vec<RiskWithClause>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let Some(&contract_idx) = inner.contracts.get(contract_id) else {
            return Ok(Vec::new());
        };

        let clauses_by_section: BTreeMap<String, ClauseNode> = inner
            .graph
            .edges_directed(contract_idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == RelationshipKind::Contains)
            .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                Some(Node::Clause(clause)) => Some((clause.section_name.clone(), clause.clone())),
                _ => None,
            })
            .collect();

        Ok(inner
            .graph
            .edges_directed(contract_idx, Direction::Outgoing)
            .filter(|edge| *edge.weight() == RelationshipKind::HasRisk)
            .filter_map(|edge| match inner.graph.node_weight(edge.target()) {
                Some(Node::RiskFactor(risk)) => Some(risk.clone()),
                _ => None,
            })
            .filter(|risk| risk_level.map_or(true, |wanted| wanted == risk.risk_level))
            .map(|risk| {
                let clause = clauses_by_section.get(&risk.section).cloned();
                RiskWithClause { risk, clause }
            })
            .collect())
    }

    async fn companies_for_contract(&self, contract_id: &str) -> CovenantResult<Vec<CompanyNode>> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let Some(&contract_idx) = inner.contracts.get(contract_id) else {
            return Ok(Vec::new());
        };

        Ok(inner
            .graph
            .edges_directed(contract_idx, Direction::Incoming)
            .filter(|edge| *edge.weight() == RelationshipKind::PartyTo)
            .filter_map(|edge| match inner.graph.node_weight(edge.source()) {
                Some(Node::Company(company)) => Some(company.clone()),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn contract(id: &str, upload_date: i64) -> ContractNode {
        ContractNode {
            contract_id: id.to_string(),
            filename: format!("{id}.pdf"),
            upload_date: Utc.timestamp_opt(upload_date, 0).unwrap(),
            risk_score: 5,
            risk_level: RiskLevel::Medium,
        }
    }

    fn sample_write(id: &str, upload_date: i64) -> GraphWrite {
        GraphWrite {
            contract: contract(id, upload_date),
            companies: vec![CompanyNode { name: "Acme Corp".to_string(), role: "party".to_string() }],
            clauses: vec![ClauseNode {
                clause_id: format!("{id}:Termination"),
                section_name: "Termination".to_string(),
                content: "Either party may terminate with 10 days notice.".to_string(),
                clause_type: "termination".to_string(),
                importance: 0.5,
            }],
            risks: vec![RiskFactorNode {
                concern: "one-sided notice period".to_string(),
                risk_level: RiskLevel::High,
                section: "Termination".to_string(),
                recommendation: "negotiate mutual notice".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn write_contract_is_idempotent() {
        let store = InMemoryGraphStore::new();
        let write = sample_write("c1", 1);
        store.write_contract(&write).await.unwrap();
        store.write_contract(&write).await.unwrap();

        let context = store.context_for_contract("c1", true, true, true, 10).await.unwrap().unwrap();
        assert_eq!(context.companies.len(), 1);
        assert_eq!(context.clauses.len(), 1);
        assert_eq!(context.risks.len(), 1);
    }

    #[tokio::test]
    async fn delete_contract_removes_clauses_and_risks_but_keeps_shared_company() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("c1", 1)).await.unwrap();
        store.write_contract(&sample_write("c2", 2)).await.unwrap();

        store.delete_contract("c1").await.unwrap();

        assert!(store.get_contract("c1").await.unwrap().is_none());
        assert!(store.context_for_contract("c1", true, true, true, 10).await.unwrap().is_none());

        let remaining = store.context_for_contract("c2", true, true, true, 10).await.unwrap().unwrap();
        assert_eq!(remaining.companies.len(), 1, "shared company must survive the other contract's deletion");

        let by_company = store.contracts_by_company("Acme Corp", 10).await.unwrap();
        assert_eq!(by_company.len(), 1);
        assert_eq!(by_company[0].contract_id, "c2");
    }

    #[tokio::test]
    async fn delete_contract_on_unknown_id_is_a_noop() {
        let store = InMemoryGraphStore::new();
        store.delete_contract("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn clause_type_context_pairs_the_clause_with_its_matching_risks() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("c1", 1)).await.unwrap();

        let found = store.clause_type_context("c1", "termination").await.unwrap().unwrap();
        assert_eq!(found.clause.clause_id, "c1:Termination");
        assert_eq!(found.related_risks.len(), 1);

        assert!(store.clause_type_context("c1", "indemnification").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn contracts_by_company_orders_by_descending_upload_date() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("older", 1)).await.unwrap();
        store.write_contract(&sample_write("newer", 100)).await.unwrap();

        let contracts = store.contracts_by_company("Acme Corp", 10).await.unwrap();
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].contract_id, "newer");
        assert_eq!(contracts[1].contract_id, "older");
    }

    #[tokio::test]
    async fn contracts_by_company_respects_the_limit() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("a", 1)).await.unwrap();
        store.write_contract(&sample_write("b", 2)).await.unwrap();

        let contracts = store.contracts_by_company("Acme Corp", 1).await.unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].contract_id, "b");
    }

    #[tokio::test]
    async fn risk_context_filters_by_risk_level() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("c1", 1)).await.unwrap();

        let all = store.risk_context("c1", None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].clause.is_some());

        let high_only = store.risk_context("c1", Some(RiskLevel::High)).await.unwrap();
        assert_eq!(high_only.len(), 1);

        let low_only = store.risk_context("c1", Some(RiskLevel::Low)).await.unwrap();
        assert!(low_only.is_empty());
    }

    #[tokio::test]
    async fn companies_for_contract_returns_the_parties() {
        let store = InMemoryGraphStore::new();
        store.write_contract(&sample_write("c1", 1)).await.unwrap();

        let companies = store.companies_for_contract("c1").await.unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Acme Corp");
    }
}
