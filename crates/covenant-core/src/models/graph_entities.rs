use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::RiskLevel;

/// Unique key: `contract_id`. Created before any edge that references it (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractNode {
    pub contract_id: String,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
}

/// Unique key: `name`. May be shared across contracts (PARTY_TO fan-in).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyNode {
    pub name: String,
    pub role: String,
}

/// Unique key: `clause_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseNode {
    pub clause_id: String,
    pub section_name: String,
    pub content: String,
    pub clause_type: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactorNode {
    pub concern: String,
    pub risk_level: RiskLevel,
    pub section: String,
    pub recommendation: String,
}

/// The three relationship kinds the core writes (§3). `GraphStore` is a
/// collaborator; these are the shapes the core hands it, not a materialised
/// in-core object graph (§9: no cycles are kept in the core's own memory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipKind {
    PartyTo,
    Contains,
    HasRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphWrite {
    pub contract: ContractNode,
    pub companies: Vec<CompanyNode>,
    pub clauses: Vec<ClauseNode>,
    pub risks: Vec<RiskFactorNode>,
}
